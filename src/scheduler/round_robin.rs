use super::{Dispatch, EnqueueFlags, Policy, Scheduler};
use crate::core::{ProcessId, QueueId, SimCtx, Ticks};

/// Circular queue in id order. A process whose quantum expires goes to the
/// back of the queue; arrival times are never used to re-rank.
pub struct RoundRobinScheduler {
    queue: QueueId,
    quantum: Ticks,
}

impl Scheduler for RoundRobinScheduler {
    const POLICY: Policy = Policy::RoundRobin;

    fn init(ctx: &mut SimCtx, quantum: Ticks) -> Self {
        Self {
            queue: ctx.create_queue_fifo(),
            quantum,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: ProcessId, _flags: EnqueueFlags) {
        ctx.queue_push_back(self.queue, pid);
    }

    // A process that has not arrived yet still fast-forwards the clock when
    // it reaches the head of the queue, even if others behind it are ready.
    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        ctx.queue_pop(self.queue)
            .map(|(pid, ready_at)| Dispatch { pid, ready_at })
    }

    fn time_slice(&self, _ctx: &SimCtx, _pid: ProcessId) -> Option<Ticks> {
        Some(self.quantum)
    }
}
