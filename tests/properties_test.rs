use proptest::prelude::*;
use sched_model::{
    Policy, Report, WaitingTime, Workload, simulate,
    sim::{ProcessSpec, cpu_utilization},
};

fn workload_strategy() -> impl Strategy<Value = Workload> {
    (
        0u64..4,
        1u64..6,
        prop::collection::vec((0u64..30, 1u64..15), 1..12),
    )
        .prop_map(|(context_switch, quantum, pairs)| {
            let processes = pairs
                .into_iter()
                .map(|(arrival_time, cpu_burst)| ProcessSpec {
                    arrival_time,
                    cpu_burst,
                })
                .collect();
            Workload::new(context_switch, quantum, processes).unwrap()
        })
}

proptest! {
    #[test]
    fn every_process_completes_with_its_full_burst(workload in workload_strategy()) {
        for policy in Policy::ALL {
            let schedule = simulate(policy, &workload).unwrap();
            for (pid, spec) in workload.processes.iter().enumerate() {
                let process = &schedule.processes[pid];
                prop_assert_eq!(process.remaining_time, 0);
                prop_assert!(process.completion_time.unwrap() >= spec.arrival_time);
                prop_assert_eq!(schedule.busy_time(pid), spec.cpu_burst);
            }
        }
    }

    #[test]
    fn fcfs_trace_is_input_order(workload in workload_strategy()) {
        let schedule = simulate(Policy::Fcfs, &workload).unwrap();
        let expected: Vec<_> = (0..workload.len()).collect();
        prop_assert_eq!(schedule.gantt(), expected);
    }

    #[test]
    fn preemptive_trace_counts_quanta(workload in workload_strategy()) {
        let quantum = workload.time_quantum.get();
        let expected: usize = workload
            .processes
            .iter()
            .map(|p| p.cpu_burst.div_ceil(quantum) as usize)
            .sum();
        for policy in [Policy::Srt, Policy::RoundRobin] {
            let schedule = simulate(policy, &workload).unwrap();
            prop_assert_eq!(schedule.trace.len(), expected);
        }
    }

    #[test]
    fn round_robin_first_dispatches_follow_id_order(workload in workload_strategy()) {
        let schedule = simulate(Policy::RoundRobin, &workload).unwrap();
        let mut seen = Vec::new();
        for pid in schedule.gantt() {
            if !seen.contains(&pid) {
                seen.push(pid);
            }
        }
        let expected: Vec<_> = (0..workload.len()).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn utilization_is_one_without_context_switches(workload in workload_strategy()) {
        let workload = Workload { context_switch_time: 0, ..workload };
        for policy in Policy::ALL {
            let schedule = simulate(policy, &workload).unwrap();
            let report = Report::new(&schedule, 0, WaitingTime::LastDispatch);
            prop_assert_eq!(report.cpu_utilization, Some(1.0));
        }
    }

    #[test]
    fn utilization_never_exceeds_one(workload in workload_strategy()) {
        for policy in Policy::ALL {
            let schedule = simulate(policy, &workload).unwrap();
            let u = cpu_utilization(schedule.final_time, workload.context_switch_time, workload.len());
            prop_assert!(u.unwrap() <= 1.0);
        }
    }

    #[test]
    fn utilization_positive_when_switch_cost_fits(workload in workload_strategy()) {
        let switch_cost = workload.context_switch_time * workload.len().saturating_sub(1) as u64;
        for policy in Policy::ALL {
            let schedule = simulate(policy, &workload).unwrap();
            let u = cpu_utilization(schedule.final_time, workload.context_switch_time, workload.len());
            if switch_cost < schedule.final_time {
                prop_assert!(u.unwrap() > 0.0);
            } else {
                prop_assert!(u.unwrap() <= 0.0);
            }
        }
    }

    #[test]
    fn fcfs_waiting_modes_agree(workload in workload_strategy()) {
        let schedule = simulate(Policy::Fcfs, &workload).unwrap();
        let last = Report::new(&schedule, 0, WaitingTime::LastDispatch);
        let total = Report::new(&schedule, 0, WaitingTime::Cumulative);
        prop_assert_eq!(last.processes, total.processes);
    }

    #[test]
    fn reruns_are_identical(workload in workload_strategy()) {
        for policy in Policy::ALL {
            let a = simulate(policy, &workload).unwrap();
            let b = simulate(policy, &workload).unwrap();
            prop_assert_eq!(&a.trace, &b.trace);
            prop_assert_eq!(a.final_time, b.final_time);
            let ra = Report::new(&a, workload.context_switch_time, WaitingTime::LastDispatch);
            let rb = Report::new(&b, workload.context_switch_time, WaitingTime::LastDispatch);
            prop_assert_eq!(ra.processes, rb.processes);
        }
    }
}
