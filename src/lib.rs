//! Uniprocessor scheduling simulator.
//!
//! A [`Workload`] of `(arrival, burst)` pairs is run under FCFS, a
//! quantum-bounded earliest-ready-first policy (reported as SRT) and Round
//! Robin. Each run produces a [`Schedule`] (trace plus final process state)
//! that a [`Report`] turns into finish, waiting and turnaround times and CPU
//! utilization.

pub mod core;
pub mod scheduler;
pub mod sim;

pub use scheduler::{Policy, Scheduler};
pub use sim::{Report, Schedule, Sim, WaitingTime, Workload, simulate, simulate_all};
