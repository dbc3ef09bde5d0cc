use super::{Dispatch, ENQ_PREEMPT, EnqueueFlags, Policy, Scheduler};
use crate::core::{ProcessId, QueueId, SimCtx, Ticks};

/// Quantum-bounded, earliest-ready-first scheduling.
///
/// Despite the name, remaining time is never compared: candidates are
/// ordered by `(ready time, pid)`. A process starts with its arrival time as
/// ready time; when its quantum expires it re-competes keyed by the clock at
/// which it was preempted.
pub struct SrtScheduler {
    ready_queue: QueueId,
    quantum: Ticks,
}

impl Scheduler for SrtScheduler {
    const POLICY: Policy = Policy::Srt;

    fn init(ctx: &mut SimCtx, quantum: Ticks) -> Self {
        Self {
            ready_queue: ctx.create_queue_priq(),
            quantum,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: ProcessId, flags: EnqueueFlags) {
        let ready_at = if flags & ENQ_PREEMPT != 0 {
            ctx.now
        } else {
            ctx.process(pid).arrival_time
        };
        ctx.queue_push_priq(self.ready_queue, pid, ready_at);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        ctx.queue_pop(self.ready_queue)
            .map(|(pid, ready_at)| Dispatch { pid, ready_at })
    }

    fn time_slice(&self, _ctx: &SimCtx, _pid: ProcessId) -> Option<Ticks> {
        Some(self.quantum)
    }
}
