//! CLI adapter around `scheduler-core` (`spec.md` §6.3): loads an instance,
//! solves or scores it, and prints the §6.2 solution format.

mod bruteforce;
mod display;
mod error;
mod generate;
mod instance;
mod solution;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use error::CliError;
use instance::Instance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SolverName {
    Ours,
    Bruteforce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Setting {
    Offline,
    Online,
}

/// Single-machine preemptive scheduler with tardiness and drop penalties.
#[derive(Debug, Parser)]
#[command(name = "scheduler", version, about)]
struct Args {
    /// Path to the instance JSON file (`spec.md` §6.1). Required unless
    /// `--generate` is given.
    instance: Option<PathBuf>,

    /// Which solver to run.
    #[arg(long, value_enum, default_value = "ours")]
    name: SolverName,

    /// Offline (branch-and-bound) or online (greedy) scheduling.
    #[arg(long, value_enum, default_value = "offline")]
    setting: Setting,

    /// Score a pre-computed solution file (`spec.md` §6.2 format) against
    /// the instance instead of solving for one.
    #[arg(long)]
    solution: Option<PathBuf>,

    /// Write the solution output here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Generate a deterministic random instance instead of reading
    /// `instance`, formatted as `<num_jobs>:<total_slots>[:<seed>]`.
    #[arg(long, value_name = "NUM_JOBS:TOTAL_SLOTS[:SEED]")]
    generate: Option<String>,
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let instance = load_instance(&args)?;

    let schedule = if let Some(solution_path) = &args.solution {
        solution::load_and_score(solution_path, instance)?
    } else {
        solve(&args, instance)?
    };

    display::print_summary(&schedule);
    solution::emit(&schedule, args.output.as_deref())?;
    Ok(())
}

fn load_instance(args: &Args) -> Result<Instance, CliError> {
    if let Some(spec) = &args.generate {
        return Ok(parse_generate_spec(spec)?);
    }
    let path = args
        .instance
        .as_ref()
        .ok_or_else(|| CliError::from(scheduler_core::SchedulerError::InvalidInstance(
            "an instance path is required unless --generate is given".into(),
        )))?;
    instance::load_instance(path)
}

fn parse_generate_spec(spec: &str) -> Result<Instance, CliError> {
    let invalid = || {
        CliError::from(scheduler_core::SchedulerError::InvalidInstance(format!(
            "--generate expects NUM_JOBS:TOTAL_SLOTS[:SEED], got {spec:?}"
        )))
    };
    let mut parts = spec.split(':');
    let num_jobs: usize = parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
    let total_slots: u64 = parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
    let seed: u64 = match parts.next() {
        Some(s) => s.parse().map_err(|_| invalid())?,
        None => 0,
    };
    Ok(generate::generate_random_instance(num_jobs, total_slots, seed)?)
}

fn solve(args: &Args, instance: Instance) -> Result<scheduler_core::Schedule, CliError> {
    use scheduler_core::{OfflineSolver, OnlineConfig, OnlineSolver};

    match (args.name, args.setting) {
        (SolverName::Ours, Setting::Offline) => {
            let solver = OfflineSolver::new(Default::default());
            let result = solver.solve(instance.jobs, instance.total_slots)?;
            if !result.proved_optimal {
                tracing::warn!("search budget exhausted before optimality was proven");
            }
            Ok(result.schedule)
        }
        (SolverName::Ours, Setting::Online) => {
            let solver = OnlineSolver::new(OnlineConfig::default());
            Ok(solver.solve(instance.jobs, instance.total_slots)?)
        }
        (SolverName::Bruteforce, _) => Ok(bruteforce::solve(instance.jobs, instance.total_slots)?),
    }
}
