use log::{debug, trace};

use super::{
    event::SchedEvent,
    observer::Observer,
    state::{Process, SimCtx, Ticks},
};
use crate::scheduler::{DispatchError, ENQ_ARRIVAL, ENQ_PREEMPT, Scheduler};

pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    /// Builds a core over `processes` and admits every one of them, in id
    /// order, to the policy's run queue.
    pub fn new(processes: Vec<Process>, quantum: Ticks) -> Self {
        let mut ctx = SimCtx::new(processes);
        let mut scheduler = S::init(&mut ctx, quantum);
        for pid in 0..ctx.processes.len() {
            scheduler.enqueue(&mut ctx, pid, ENQ_ARRIVAL);
        }

        Self {
            ctx,
            scheduler,
            observer: Observer::new(),
        }
    }

    /// Makes one scheduling decision and runs the chosen process for one
    /// slice. Returns the events it produced.
    pub fn step(&mut self) -> Result<Vec<SchedEvent>, DispatchError> {
        let dispatch = match self.scheduler.dispatch(&mut self.ctx) {
            Some(dispatch) => dispatch,
            None => {
                let pending = self
                    .ctx
                    .processes
                    .iter()
                    .filter(|p| !p.is_completed())
                    .count();
                return Err(DispatchError::NoRunnableProcess { pending });
            }
        };
        let pid = dispatch.pid;
        let mut events = Vec::with_capacity(3);

        let remaining = self.ctx.process(pid).remaining_time;
        let slice = match self.scheduler.time_slice(&self.ctx, pid) {
            Some(quantum) => remaining.min(quantum),
            None => remaining,
        };
        let start = self.ctx.now.max(dispatch.ready_at);
        if start.checked_add(slice).is_none() {
            return Err(DispatchError::ClockOverflow { pid, at: start, slice });
        }

        let idle_from = self.ctx.now;
        if self.ctx.fast_forward_to(dispatch.ready_at).is_some() {
            events.push(SchedEvent::CpuIdle {
                from: idle_from,
                until: self.ctx.now,
            });
        }

        self.ctx.set_running(pid);
        debug!(
            "t={} dispatch pid={} slice={} remaining={}",
            self.ctx.now, pid, slice, remaining
        );
        events.push(SchedEvent::Dispatched {
            pid,
            at: self.ctx.now,
            slice,
        });

        self.ctx.run_for(pid, slice);

        let remaining = self.ctx.process(pid).remaining_time;
        if remaining == 0 {
            self.ctx.mark_completed(pid);
            events.push(SchedEvent::Completed {
                pid,
                at: self.ctx.now,
            });
        } else {
            self.ctx.mark_ready(pid);
            events.push(SchedEvent::Preempted {
                pid,
                at: self.ctx.now,
                remaining,
            });
            self.scheduler.enqueue(&mut self.ctx, pid, ENQ_PREEMPT);
        }

        for event in &events {
            trace!("{:?}", event);
        }
        self.observer.observe(&self.ctx);
        Ok(events)
    }

    pub fn all_completed(&self) -> bool {
        self.ctx.all_completed()
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
