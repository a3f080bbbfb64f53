//! # Meshwork Core
//!
//! Steady-state AC/DC network analysis using the mesh-current method.
//!
//! This library provides:
//! - A custom DSL for describing networks as branch elements and loops
//! - Mesh-current (loop) analysis with phasor arithmetic
//! - Supermesh handling for current sources shared by two loops
//! - Back-assignment of branch currents, voltages and power to every element
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Parser for the network description language
//! - [`circuit`] - Network arena, loops and topology validation
//! - [`components`] - Loads, sources and phasor inputs
//! - [`solver`] - Mesh matrix assembly, solving and distribution
//! - [`report`] - Text output of a solved network (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! meshwork network.mesh --format polar --matrix
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use meshwork_core::{dsl, Network, Simulator};
//!
//! # fn main() -> meshwork_core::Result<()> {
//! let ast = dsl::parse("V1 DC 10\nR1 5\n.loop M1 V1 R1\n")?;
//! let mut sim = Simulator::new(Network::from_ast(ast, None)?);
//! let currents = sim.run()?;
//! assert_eq!(currents.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmMeshSim } from 'meshwork_core';
//!
//! const sim = new WasmMeshSim(networkDsl);
//! sim.solve();
//! const currents = sim.loop_currents();
//! ```
//!
//! ## Solution Method
//!
//! Each loop carries one unknown circulating current. For every solve:
//!
//! 1. Find which loops own each load and source
//! 2. Assemble the impedance matrix Z and voltage vector v, adding one
//!    terminal-voltage unknown and one constraint row per current source
//! 3. Solve Zx = v by LU decomposition with partial pivoting
//! 4. Write branch currents back; a branch shared by two loops carries the
//!    difference of their loop currents

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod solver;

#[cfg(feature = "cli")]
pub mod report;

// Re-export main types for convenience
pub use circuit::{Loop, Network};
pub use error::{MeshworkError, Result};
pub use solver::{Simulator, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmMeshSim;
