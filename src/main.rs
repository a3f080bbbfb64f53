//! Meshwork - Mesh-Current Network Solver
//!
//! Solves a network description and prints loop currents and the current,
//! voltage and power of every element.
//!
//! # Usage
//!
//! ```bash
//! meshwork network.mesh --matrix --format rectangular
//! RUST_LOG=trace meshwork network.mesh
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use meshwork_core::{
    components::Frequency,
    dsl,
    error::Result,
    report::{print_report, PhasorFormat, ReportOptions},
    Network, Simulator, SolverConfig,
};

/// Mesh-current AC/DC network solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the network description file
    #[arg(value_name = "NETWORK_FILE")]
    network_file: PathBuf,

    /// Print the impedance matrix and voltage vector
    #[arg(long)]
    matrix: bool,

    /// Phasor output style
    #[arg(long, value_enum, default_value_t = PhasorFormat::Polar)]
    format: PhasorFormat,

    /// Reject networks whose loops share no branch with each other
    #[arg(long)]
    strict: bool,

    /// Frequency in Hz, overriding the file's .freq directive
    #[arg(long, value_name = "HZ")]
    frequency: Option<f64>,

    /// Log solver details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    // Parse the description file
    let ast = dsl::parse_file(&args.network_file)?;

    // Build the network
    let frequency = args
        .frequency
        .map(|f| Frequency::Hertz(f).validate("--frequency"))
        .transpose()?;
    let network = Network::from_ast(ast, frequency)?;

    // Solve
    let config = SolverConfig::new().with_require_connected(args.strict);
    let mut simulator = Simulator::with_config(network, config);
    simulator.run()?;

    let options = ReportOptions {
        format: args.format,
        show_matrix: args.matrix,
    };
    print_report(simulator.network(), &options)?;

    Ok(())
}
