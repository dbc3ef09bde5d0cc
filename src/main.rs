use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Builder;
use log::info;
use sched_model::{Policy, Report, WaitingTime, Workload, sim::GeneratorConfig, simulate};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
enum PolicyArg {
    /// First-come-first-served, input order
    Fcfs,
    /// Quantum-bounded earliest-ready-first
    Srt,
    /// Round Robin
    Rr,
    /// Run all policies in turn
    All,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
enum WaitingArg {
    /// Arrival to most recent dispatch
    LastDispatch,
    /// Turnaround minus burst
    Cumulative,
}

/// Simulate FCFS, SRT and Round Robin over a fixed set of processes
#[derive(Parser, Debug)]
#[command(name = "sched_model")]
#[command(about = "Uniprocessor CPU scheduling simulator", long_about = None)]
struct Args {
    /// Input file: context switch time, quantum, process count, then
    /// (arrival, burst) pairs. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Policy to simulate
    #[arg(short, long, value_enum, default_value_t = PolicyArg::All)]
    policy: PolicyArg,

    /// Waiting time formula
    #[arg(short, long, value_enum, default_value_t = WaitingArg::LastDispatch)]
    waiting: WaitingArg,

    /// Also print average waiting, turnaround and response times
    #[arg(short, long, default_value_t = false)]
    averages: bool,

    /// Re-number processes by arrival time before simulating
    #[arg(long, default_value_t = false)]
    arrival_order: bool,

    /// Generate a random workload spanning this many ticks instead of reading input
    #[arg(long, value_name = "TICKS", conflicts_with = "input")]
    random: Option<u64>,

    /// Seed for --random
    #[arg(long, default_value_t = 0, requires = "random")]
    seed: u64,

    /// Time quantum for --random
    #[arg(short, long, default_value_t = 3, requires = "random")]
    quantum: u64,

    /// Context switch time for --random
    #[arg(short, long, default_value_t = 1, requires = "random")]
    context_switch: u64,
}

fn main() -> Result<()> {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let args = Args::parse();

    let mut workload = match args.random {
        Some(ticks) => Workload::bernoulli(&GeneratorConfig {
            ticks,
            seed: args.seed,
            time_quantum: args.quantum,
            context_switch_time: args.context_switch,
            ..GeneratorConfig::default()
        })
        .context("failed to generate workload")?,
        None => read_workload(args.input.as_ref())?,
    };
    if args.arrival_order {
        workload = workload.into_arrival_order();
    }
    info!(
        "{} processes, quantum={}, context switch={}",
        workload.len(),
        workload.time_quantum,
        workload.context_switch_time
    );

    let policies: &[Policy] = match args.policy {
        PolicyArg::Fcfs => &[Policy::Fcfs],
        PolicyArg::Srt => &[Policy::Srt],
        PolicyArg::Rr => &[Policy::RoundRobin],
        PolicyArg::All => &Policy::ALL,
    };
    let waiting = match args.waiting {
        WaitingArg::LastDispatch => WaitingTime::LastDispatch,
        WaitingArg::Cumulative => WaitingTime::Cumulative,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for &policy in policies {
        let schedule = simulate(policy, &workload)
            .with_context(|| format!("{policy} simulation did not complete"))?;
        let report = Report::new(&schedule, workload.context_switch_time, waiting)
            .with_averages(args.averages);
        write!(out, "{report}")?;
    }

    Ok(())
}

fn read_workload(path: Option<&PathBuf>) -> Result<Workload> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };

    text.parse().context("malformed workload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn generator_options_need_random() {
        assert!(Args::try_parse_from(["sched_model", "-q", "5", "input.txt"]).is_err());
        assert!(Args::try_parse_from(["sched_model", "--seed", "7"]).is_err());
        assert!(Args::try_parse_from(["sched_model", "-c", "2", "input.txt"]).is_err());
    }

    #[test]
    fn generator_options_accepted_with_random() {
        let args =
            Args::try_parse_from(["sched_model", "--random", "40", "-q", "5", "--seed", "7"])
                .unwrap();
        assert_eq!(args.random, Some(40));
        assert_eq!(args.quantum, 5);
        assert_eq!(args.seed, 7);
    }

    #[test]
    fn file_input_alone_uses_defaults() {
        let args = Args::try_parse_from(["sched_model", "input.txt"]).unwrap();
        assert_eq!(args.input, Some(PathBuf::from("input.txt")));
        assert_eq!(args.policy, PolicyArg::All);
    }
}
