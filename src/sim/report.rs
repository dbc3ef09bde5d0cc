use std::fmt;

use average::{Estimate, Mean};

use super::driver::Schedule;
use crate::{
    core::{Process, ProcessId, Ticks},
    scheduler::Policy,
};

/// How per-process waiting time is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitingTime {
    /// `start_time - arrival_time`, where `start_time` is the most recent
    /// dispatch. For preemptive policies this ignores waits between earlier
    /// slices.
    #[default]
    LastDispatch,
    /// `turnaround - cpu_burst`: every tick spent off the CPU after arrival.
    Cumulative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessMetrics {
    pub id: ProcessId,
    pub finish_time: Ticks,
    pub waiting_time: Ticks,
    pub turnaround_time: Ticks,
    pub response_time: Ticks,
    pub dispatches: u32,
}

impl ProcessMetrics {
    /// Panics if `process` never completed; metrics only exist for finished
    /// schedules.
    pub fn new(process: &Process, waiting: WaitingTime) -> Self {
        let finish_time = process.completion_time.unwrap_or_else(|| {
            panic!("Process {} has no completion time in a finished schedule", process.id)
        });
        let turnaround_time = finish_time - process.arrival_time;
        let waiting_time = match waiting {
            WaitingTime::LastDispatch => process
                .start_time
                .map_or(0, |start| start - process.arrival_time),
            WaitingTime::Cumulative => turnaround_time.saturating_sub(process.cpu_burst),
        };
        let response_time = process
            .first_start_time
            .map_or(0, |start| start - process.arrival_time);

        Self {
            id: process.id,
            finish_time,
            waiting_time,
            turnaround_time,
            response_time,
            dispatches: process.dispatches,
        }
    }
}

/// `(elapsed - context_switch * (n - 1)) / elapsed`. `None` when no time
/// elapsed at all.
pub fn cpu_utilization(final_time: Ticks, context_switch_time: Ticks, n: usize) -> Option<f64> {
    if final_time == 0 {
        return None;
    }
    let switches = n.saturating_sub(1) as f64;
    let elapsed = final_time as f64;
    Some((elapsed - context_switch_time as f64 * switches) / elapsed)
}

#[derive(Debug, Clone)]
pub struct Report {
    pub policy: Policy,
    pub gantt: Vec<ProcessId>,
    pub processes: Vec<ProcessMetrics>,
    pub cpu_utilization: Option<f64>,
    pub average_waiting_time: f64,
    pub average_turnaround_time: f64,
    pub average_response_time: f64,
    pub average_dispatches: f64,
    show_averages: bool,
}

impl Report {
    pub fn new(schedule: &Schedule, context_switch_time: Ticks, waiting: WaitingTime) -> Self {
        let processes: Vec<_> = schedule
            .processes
            .iter()
            .map(|p| ProcessMetrics::new(p, waiting))
            .collect();

        Self {
            policy: schedule.policy,
            gantt: schedule.gantt(),
            cpu_utilization: cpu_utilization(
                schedule.final_time,
                context_switch_time,
                processes.len(),
            ),
            average_waiting_time: avg(processes.iter().map(|m| m.waiting_time)),
            average_turnaround_time: avg(processes.iter().map(|m| m.turnaround_time)),
            average_response_time: avg(processes.iter().map(|m| m.response_time)),
            average_dispatches: avg(processes.iter().map(|m| Ticks::from(m.dispatches))),
            processes,
            show_averages: false,
        }
    }

    pub fn with_averages(mut self, show: bool) -> Self {
        self.show_averages = show;
        self
    }
}

fn avg(iter: impl Iterator<Item = Ticks>) -> f64 {
    iter.map(|t| t as f64).collect::<Mean>().estimate()
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Scheduling:", self.policy)?;

        write!(f, "Gantt Chart:")?;
        for pid in &self.gantt {
            write!(f, " {pid}")?;
        }
        writeln!(f)?;

        for m in &self.processes {
            writeln!(
                f,
                "Process {}: Finish Time = {}, Waiting Time = {}, Turnaround Time = {}",
                m.id, m.finish_time, m.waiting_time, m.turnaround_time
            )?;
        }

        match self.cpu_utilization {
            Some(u) => writeln!(f, "CPU Utilization: {u:.6}")?,
            None => writeln!(f, "CPU Utilization: undefined")?,
        }

        if self.show_averages {
            writeln!(f, "Average Waiting Time: {:.2}", self.average_waiting_time)?;
            writeln!(
                f,
                "Average Turnaround Time: {:.2}",
                self.average_turnaround_time
            )?;
            writeln!(f, "Average Response Time: {:.2}", self.average_response_time)?;
            writeln!(f, "Average Dispatches: {:.2}", self.average_dispatches)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Workload, simulate};

    #[test]
    fn utilization_guards_zero_elapsed() {
        assert_eq!(cpu_utilization(0, 5, 3), None);
        assert_eq!(cpu_utilization(10, 0, 3), Some(1.0));
        assert_eq!(cpu_utilization(4, 9, 1), Some(1.0));
        assert_eq!(cpu_utilization(8, 2, 3), Some(0.5));
    }

    #[test]
    fn waiting_modes_differ_after_preemption() {
        // p0 runs [0,2) and [4,6); p1 runs [2,4)
        let workload: Workload = "1 2 2 0 4 1 2".parse().unwrap();
        let schedule = simulate(Policy::RoundRobin, &workload).unwrap();

        let last = Report::new(&schedule, 1, WaitingTime::LastDispatch);
        let total = Report::new(&schedule, 1, WaitingTime::Cumulative);
        assert_eq!(last.processes[0].waiting_time, 4);
        assert_eq!(total.processes[0].waiting_time, 2);
        assert_eq!(last.processes[0].response_time, 0);
        assert_eq!(last.processes[1].waiting_time, 1);
        assert_eq!(total.processes[1].waiting_time, 1);
    }

    #[test]
    fn renders_report_lines() {
        let workload: Workload = "1 2 2 0 4 1 2".parse().unwrap();
        let schedule = simulate(Policy::Fcfs, &workload).unwrap();
        let text = Report::new(&schedule, 1, WaitingTime::default()).to_string();

        assert_eq!(
            text,
            "FCFS Scheduling:\n\
             Gantt Chart: 0 1\n\
             Process 0: Finish Time = 4, Waiting Time = 0, Turnaround Time = 4\n\
             Process 1: Finish Time = 6, Waiting Time = 3, Turnaround Time = 5\n\
             CPU Utilization: 0.833333\n"
        );
    }

    #[test]
    fn averages_are_opt_in() {
        let workload: Workload = "0 5 2 0 2 0 4".parse().unwrap();
        let schedule = simulate(Policy::Fcfs, &workload).unwrap();
        let report = Report::new(&schedule, 0, WaitingTime::default());

        assert!(!report.to_string().contains("Average"));
        assert_eq!(report.average_waiting_time, 1.0);
        assert_eq!(report.average_turnaround_time, 4.0);

        let text = report.with_averages(true).to_string();
        assert!(text.contains("Average Waiting Time: 1.00\n"));
        assert!(text.contains("Average Turnaround Time: 4.00\n"));
        assert!(text.contains("Average Dispatches: 1.00\n"));
    }

    #[test]
    fn dispatch_counts_include_preemptions() {
        let workload: Workload = "1 2 2 0 4 1 2".parse().unwrap();
        let schedule = simulate(Policy::RoundRobin, &workload).unwrap();
        let report = Report::new(&schedule, 1, WaitingTime::default());

        let counts: Vec<_> = report.processes.iter().map(|m| m.dispatches).collect();
        assert_eq!(counts, vec![2, 1]);
        assert_eq!(report.average_dispatches, 1.5);
    }

    #[test]
    #[should_panic(expected = "no completion time")]
    fn unfinished_process_has_no_metrics() {
        let schedule = Schedule {
            policy: Policy::Fcfs,
            final_time: 0,
            trace: Vec::new(),
            processes: vec![Process::new(0, 3, 2)],
        };
        Report::new(&schedule, 0, WaitingTime::default());
    }
}
