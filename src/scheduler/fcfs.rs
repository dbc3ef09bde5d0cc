use super::{Dispatch, ENQ_PREEMPT, EnqueueFlags, Policy, Scheduler};
use crate::core::{ProcessId, QueueId, SimCtx, Ticks};

/// Strict input order, each process runs to completion.
pub struct FcfsScheduler {
    queue: QueueId,
}

impl Scheduler for FcfsScheduler {
    const POLICY: Policy = Policy::Fcfs;

    fn init(ctx: &mut SimCtx, _quantum: Ticks) -> Self {
        Self {
            queue: ctx.create_queue_fifo(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: ProcessId, flags: EnqueueFlags) {
        debug_assert!(flags & ENQ_PREEMPT == 0, "FCFS never preempts");
        ctx.queue_push_back(self.queue, pid);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        ctx.queue_pop(self.queue)
            .map(|(pid, ready_at)| Dispatch { pid, ready_at })
    }

    fn time_slice(&self, _ctx: &SimCtx, _pid: ProcessId) -> Option<Ticks> {
        None
    }
}
