use super::state::{ProcessState, SimCtx};

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        if let Some(pid) = ctx.running {
            debug_assert_eq!(
                ctx.process(pid).state,
                ProcessState::Running,
                "cpu.running process {pid} must be Running"
            );
        }
        debug_assert!(
            ctx.processes
                .iter()
                .filter(|p| p.state == ProcessState::Running)
                .count()
                <= 1,
            "More than one process Running on a single CPU"
        );

        for process in &ctx.processes {
            let pid = process.id;
            if process.is_completed() {
                debug_assert_eq!(
                    process.remaining_time, 0,
                    "Completed process {pid} has remaining time"
                );
                debug_assert!(
                    process
                        .completion_time
                        .is_some_and(|t| t >= process.arrival_time),
                    "Process {pid} completed before it arrived"
                );
            }
        }

        for (&pid, &queue_id) in &ctx.proc_to_queue {
            let process = ctx.process(pid);
            debug_assert_eq!(
                process.state,
                ProcessState::Ready,
                "Process {pid} in queue {queue_id:?} must be Ready"
            );
            if let Some(queue) = ctx.queues.get(queue_id) {
                debug_assert!(
                    queue.contains(pid),
                    "proc_to_queue claims process {pid} in queue {queue_id:?}, but queue does not contain it"
                );
            } else {
                debug_assert!(false, "proc_to_queue references unknown queue {queue_id:?}");
            }
        }

        for pair in ctx.trace.windows(2) {
            debug_assert!(
                pair[0].end <= pair[1].start,
                "Trace slices overlap: {:?} then {:?}",
                pair[0],
                pair[1]
            );
        }
        if let Some(last) = ctx.trace.last() {
            debug_assert!(last.end <= ctx.now, "Trace runs ahead of the clock");
        }
    }
}
