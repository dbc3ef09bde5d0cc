pub mod fcfs;
pub mod round_robin;
pub mod srt;

use std::fmt;

use thiserror::Error;

use crate::core::{ProcessId, SimCtx, Ticks};
pub use fcfs::FcfsScheduler;
pub use round_robin::RoundRobinScheduler;
pub use srt::SrtScheduler;

pub type EnqueueFlags = u64;

// Initial admission of a process at the start of a run
pub const ENQ_ARRIVAL: EnqueueFlags = 1 << 0;
// Re-insertion after the process used up its quantum
pub const ENQ_PREEMPT: EnqueueFlags = 1 << 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no runnable process, {pending} still incomplete")]
    NoRunnableProcess { pending: usize },

    #[error("process {pid} dispatched at t={at} for {slice} ticks would overflow the clock")]
    ClockOverflow {
        pid: ProcessId,
        at: Ticks,
        slice: Ticks,
    },
}

/// The next process to put on the CPU, and the earliest time it may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub pid: ProcessId,
    pub ready_at: Ticks,
}

/// A scheduling policy plugged into [`crate::core::SchedCore`].
///
/// The core owns the clock and the process arena; a policy only decides
/// queue placement, dispatch order and how long a dispatched process may
/// hold the CPU.
pub trait Scheduler {
    const POLICY: Policy;

    fn init(ctx: &mut SimCtx, quantum: Ticks) -> Self;

    fn exit(&mut self, _ctx: &mut SimCtx) {}

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: ProcessId, flags: EnqueueFlags);

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch>;

    // None means run to completion
    fn time_slice(&self, ctx: &SimCtx, pid: ProcessId) -> Option<Ticks>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    Fcfs,
    Srt,
    RoundRobin,
}

impl Policy {
    /// Order in which policies are run and reported.
    pub const ALL: [Policy; 3] = [Policy::Fcfs, Policy::Srt, Policy::RoundRobin];

    pub fn label(self) -> &'static str {
        match self {
            Policy::Fcfs => "FCFS",
            Policy::Srt => "SRT",
            Policy::RoundRobin => "Round Robin",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
