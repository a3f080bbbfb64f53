//! Text report of a solved network for the CLI frontend.
//!
//! Writes loop currents, per-element quantities and, optionally, the
//! assembled mesh system to any writer (stdout in the binary).

use std::io::{self, Write};

use num_complex::Complex64;

use crate::circuit::Network;
use crate::error::{MeshworkError, Result};

/// How phasors are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PhasorFormat {
    /// `a + jb`
    Rectangular,
    /// `|z| ∠ θ°`
    #[default]
    Polar,
}

/// What to include in a report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub format: PhasorFormat,
    /// Print the impedance matrix and voltage vector
    pub show_matrix: bool,
}

/// Format a phasor.
pub fn format_phasor(z: Complex64, format: PhasorFormat) -> String {
    match format {
        PhasorFormat::Rectangular => {
            let sign = if z.im.is_sign_negative() { '-' } else { '+' };
            format!("{:.4} {} j{:.4}", z.re, sign, z.im.abs())
        }
        PhasorFormat::Polar => {
            let (magnitude, angle) = z.to_polar();
            format!("{:.4} ∠ {:.2}°", magnitude, angle.to_degrees())
        }
    }
}

fn output_error(e: io::Error) -> MeshworkError {
    MeshworkError::OutputError {
        message: e.to_string(),
    }
}

/// Write the report of a solved network.
pub fn write_report<W: Write>(out: &mut W, network: &Network, options: &ReportOptions) -> Result<()> {
    write_sections(out, network, options).map_err(output_error)
}

/// Print the report to stdout.
pub fn print_report(network: &Network, options: &ReportOptions) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, network, options)?;
    out.flush().map_err(output_error)
}

fn write_sections<W: Write>(out: &mut W, network: &Network, options: &ReportOptions) -> io::Result<()> {
    let fmt = |z: Complex64| format_phasor(z, options.format);

    if options.show_matrix {
        if let Some(analysis) = network.analysis() {
            let matrix = analysis.impedance_matrix();
            writeln!(out, "Impedance matrix ({0}x{0}):", matrix.size)?;
            for i in 0..matrix.size {
                let row: Vec<String> = matrix.row(i).iter().map(|z| fmt(*z)).collect();
                writeln!(out, "  [ {} ]", row.join(", "))?;
            }
            writeln!(out, "Voltage vector:")?;
            for v in analysis.voltage_vector() {
                writeln!(out, "  {}", fmt(*v))?;
            }
            writeln!(out)?;
        }
    }

    writeln!(out, "Loop currents:")?;
    for (lp, current) in network.loops().iter().zip(network.loop_currents()) {
        writeln!(out, "  {:<8} {}", lp.name, fmt(*current))?;
    }

    if !network.loads().is_empty() {
        writeln!(out)?;
        writeln!(out, "Loads:")?;
        for load in network.loads() {
            writeln!(out, "  {} (Z = {})", load.name, fmt(load.impedance()))?;
            writeln!(out, "    I = {}", fmt(load.current()))?;
            writeln!(out, "    V = {}", fmt(load.voltage()))?;
            writeln!(
                out,
                "    S = {}  (P = {:.4} W, Q = {:.4} var)",
                fmt(load.power()),
                load.active_power(),
                load.reactive_power()
            )?;
        }
    }

    if !network.sources().is_empty() {
        writeln!(out)?;
        writeln!(out, "Sources:")?;
        for source in network.sources() {
            writeln!(out, "  {} ({:?})", source.name, source.kind())?;
            writeln!(out, "    I = {}", fmt(source.current()))?;
            writeln!(out, "    V = {}", fmt(source.voltage()))?;
            writeln!(
                out,
                "    S = {}  (P = {:.4} W, Q = {:.4} var)",
                fmt(source.power()),
                source.active_power(),
                source.reactive_power()
            )?;
        }
    }

    Ok(())
}
