mod artifacts;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub fn run_from_env() -> i32 {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    match run(Cli::parse()) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        CliCommand::Peaks(args) => commands::run_peaks_command(args),
        CliCommand::Simulate(args) => commands::run_simulate_command(args),
        CliCommand::Refine(args) => commands::run_refine_command(args),
    }
}

#[derive(Parser)]
#[command(name = "pxrd-rs", about = "Powder XRD simulation and Le Bail intensity refinement")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Enumerate the theoretical peaks of a lattice
    Peaks(commands::PeaksArgs),
    /// Simulate a spectrum from an enumerated peak set
    Simulate(commands::SimulateArgs),
    /// Refine peak intensities against an experimental spectrum
    Refine(commands::RefineArgs),
}
