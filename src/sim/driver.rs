use log::info;

use super::workload::Workload;
use crate::{
    core::{Process, ProcessId, SchedCore, SchedEvent, Slice, Ticks},
    scheduler::{
        DispatchError, FcfsScheduler, Policy, RoundRobinScheduler, Scheduler, SrtScheduler,
    },
};

/// One policy run over a workload. Each `Sim` owns its own copy of the
/// process state, so runs never observe each other's mutations.
pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(workload: &Workload) -> Self {
        Self {
            core: SchedCore::<S>::new(workload.fresh_processes(), workload.time_quantum.get()),
        }
    }

    pub fn step(&mut self) -> Result<Vec<SchedEvent>, DispatchError> {
        self.core.step()
    }

    pub fn all_processes_completed(&self) -> bool {
        self.core.all_completed()
    }

    pub fn run(mut self) -> Result<Schedule, DispatchError> {
        while !self.all_processes_completed() {
            self.step()?;
        }
        self.core.scheduler.exit(&mut self.core.ctx);

        let ctx = self.core.ctx;
        info!(
            "{} finished at t={} after {} dispatches",
            S::POLICY,
            ctx.now,
            ctx.trace.len()
        );

        Ok(Schedule {
            policy: S::POLICY,
            final_time: ctx.now,
            trace: ctx.trace,
            processes: ctx.processes,
        })
    }
}

/// A completed run: the final clock, the trace and final process state.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub policy: Policy,
    pub final_time: Ticks,
    pub trace: Vec<Slice>,
    pub processes: Vec<Process>,
}

impl Schedule {
    /// Process ids in dispatch order, one per slice.
    pub fn gantt(&self) -> Vec<ProcessId> {
        self.trace.iter().map(|slice| slice.pid).collect()
    }

    pub fn busy_time(&self, pid: ProcessId) -> Ticks {
        self.trace
            .iter()
            .filter(|slice| slice.pid == pid)
            .map(Slice::len)
            .sum()
    }
}

pub fn simulate(policy: Policy, workload: &Workload) -> Result<Schedule, DispatchError> {
    match policy {
        Policy::Fcfs => Sim::<FcfsScheduler>::new(workload).run(),
        Policy::Srt => Sim::<SrtScheduler>::new(workload).run(),
        Policy::RoundRobin => Sim::<RoundRobinScheduler>::new(workload).run(),
    }
}

/// Runs every policy in turn, each on freshly reset process state.
pub fn simulate_all(workload: &Workload) -> Result<Vec<Schedule>, DispatchError> {
    Policy::ALL
        .iter()
        .map(|&policy| simulate(policy, workload))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_steps_until_done() {
        let workload: Workload = "0 2 2 0 3 0 1".parse().unwrap();
        let mut sim = Sim::<RoundRobinScheduler>::new(&workload);

        let mut steps = 0;
        while !sim.all_processes_completed() {
            sim.step().unwrap();
            steps += 1;
        }
        assert_eq!(steps, 3);
    }

    #[test]
    fn simulate_all_runs_in_fixed_order() {
        let workload: Workload = "0 1 1 0 1".parse().unwrap();
        let policies: Vec<_> = simulate_all(&workload)
            .unwrap()
            .iter()
            .map(|s| s.policy)
            .collect();
        assert_eq!(policies, Policy::ALL.to_vec());
    }

    #[test]
    fn empty_workload_finishes_at_zero() {
        let workload: Workload = "3 1 0".parse().unwrap();
        let schedule = simulate(Policy::Srt, &workload).unwrap();
        assert_eq!(schedule.final_time, 0);
        assert!(schedule.trace.is_empty());
    }
}
