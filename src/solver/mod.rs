//! Mesh-current solver.
//!
//! This module provides the numerical engine for network analysis.
//!
//! ## Mesh-current analysis
//!
//! Each loop carries an unknown circulating current. Kirchhoff's voltage law
//! around every loop gives a system Zx = v where:
//! - x contains the loop currents and the terminal voltages of current sources
//! - Z is the impedance matrix
//! - v is the vector of loop driving voltages and fixed source currents
//!
//! The matrix structure is:
//! ```text
//! [ Zm  B ] [ i ]   [ e ]
//! [ C   0 ] [ u ] = [ j ]
//! ```
//!
//! where:
//! - Zm holds loop self-impedances on the diagonal and the negated impedance
//!   of shared branches off it
//! - B enters each current source's terminal voltage into its loops' KVL rows
//! - C constrains the loop currents around each current source
//! - i is the vector of loop currents
//! - u is the vector of current source terminal voltages
//! - e is the net voltage-source value of each loop
//! - j is the fixed current of each current source

mod analysis;
mod matrix;
mod shared;
mod simulator;

pub use analysis::{AuxUnknown, MeshAnalysis};
pub use matrix::MeshMatrix;
pub use shared::SharedBranchSet;
pub use simulator::{Simulator, SolverConfig};

/// Default relative pivot threshold for the LU factorisation.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-12;
