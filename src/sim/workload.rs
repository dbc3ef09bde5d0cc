use std::num::{NonZeroU64, ParseIntError};
use std::str::FromStr;

use rand::prelude::*;
use thiserror::Error;

use crate::core::{Process, Ticks};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("missing {0}")]
    MissingValue(String),

    #[error("invalid {what} `{token}`: {source}")]
    InvalidInteger {
        what: String,
        token: String,
        source: ParseIntError,
    },

    #[error("time quantum must be greater than zero")]
    ZeroQuantum,

    #[error("unexpected trailing input `{0}`")]
    TrailingInput(String),

    #[error("latest arrival plus total burst does not fit in the simulated clock")]
    ClockOverflow,
}

/// Static attributes of one process. Its id is its position in the workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSpec {
    pub arrival_time: Ticks,
    pub cpu_burst: Ticks,
}

/// The process registry plus the two global parameters of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub context_switch_time: Ticks,
    pub time_quantum: NonZeroU64,
    pub processes: Vec<ProcessSpec>,
}

impl Workload {
    pub fn new(
        context_switch_time: Ticks,
        time_quantum: Ticks,
        processes: Vec<ProcessSpec>,
    ) -> Result<Self, InputError> {
        let time_quantum = NonZeroU64::new(time_quantum).ok_or(InputError::ZeroQuantum)?;
        // The clock never runs past the latest arrival plus every burst
        let latest_arrival = processes.iter().map(|p| p.arrival_time).max().unwrap_or(0);
        processes
            .iter()
            .try_fold(latest_arrival, |horizon, p| horizon.checked_add(p.cpu_burst))
            .ok_or(InputError::ClockOverflow)?;
        Ok(Self {
            context_switch_time,
            time_quantum,
            processes,
        })
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Fresh, independent per-run process state.
    pub fn fresh_processes(&self) -> Vec<Process> {
        self.processes
            .iter()
            .enumerate()
            .map(|(id, spec)| Process::new(id, spec.arrival_time, spec.cpu_burst))
            .collect()
    }

    /// Re-numbers the processes by arrival time, shorter burst first on ties.
    /// Equal entries keep their relative input order.
    pub fn into_arrival_order(mut self) -> Self {
        self.processes
            .sort_by(|a, b| {
                a.arrival_time
                    .cmp(&b.arrival_time)
                    .then_with(|| a.cpu_burst.cmp(&b.cpu_burst))
            });
        self
    }

    /// Seeded random workload: on each tick a process arrives with
    /// probability `p_arrival`, and is short with probability `p_short`.
    pub fn bernoulli(config: &GeneratorConfig) -> Result<Self, InputError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut processes = Vec::new();

        for t in 0..config.ticks {
            if rng.random::<f64>() < config.p_arrival {
                let cpu_burst = if rng.random::<f64>() < config.p_short {
                    config.short_ticks
                } else {
                    config.long_ticks
                };

                processes.push(ProcessSpec {
                    arrival_time: t,
                    cpu_burst,
                });
            }
        }

        Self::new(config.context_switch_time, config.time_quantum, processes)
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_ticks: Ticks,
    pub long_ticks: Ticks,
    pub seed: u64,
    pub context_switch_time: Ticks,
    pub time_quantum: Ticks,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ticks: 50,
            p_arrival: 0.3,
            p_short: 0.3,
            short_ticks: 2,
            long_ticks: 6,
            seed: 0,
            context_switch_time: 1,
            time_quantum: 3,
        }
    }
}

/// Whitespace separated integers:
/// `context_switch quantum count (arrival burst){count}`.
impl FromStr for Workload {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let mut next = |what: &str| -> Result<u64, InputError> {
            let token = tokens
                .next()
                .ok_or_else(|| InputError::MissingValue(what.to_string()))?;
            token
                .parse::<u64>()
                .map_err(|source| InputError::InvalidInteger {
                    what: what.to_string(),
                    token: token.to_string(),
                    source,
                })
        };

        let context_switch_time = next("context switch time")?;
        let time_quantum = next("time quantum")?;
        let count = next("process count")?;

        let mut processes = Vec::new();
        for id in 0..count {
            let arrival_time = next(&format!("arrival time of process {id}"))?;
            let cpu_burst = next(&format!("cpu burst of process {id}"))?;
            processes.push(ProcessSpec {
                arrival_time,
                cpu_burst,
            });
        }

        if let Some(extra) = tokens.next() {
            return Err(InputError::TrailingInput(extra.to_string()));
        }

        Self::new(context_switch_time, time_quantum, processes)
    }
}
