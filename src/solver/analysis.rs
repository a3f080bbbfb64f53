//! Mesh equation assembly for a whole network.

use log::{debug, trace};
use num_complex::Complex64;

use super::matrix::MeshMatrix;
use super::shared::SharedBranchSet;
use crate::circuit::{Membership, Network, SourceId};
use crate::error::Result;

/// The auxiliary unknown owned by one current source.
///
/// The row is recorded when the system is assembled and is the only place
/// the terminal voltage is read back from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxUnknown {
    pub source: SourceId,
    pub row: usize,
    pub loops: Membership,
}

/// Assembled (and possibly solved) mesh system of a network.
///
/// Unknowns 0..N are the loop currents, N..M the terminal voltages of the
/// current sources in ascending source id order.
#[derive(Debug, Clone)]
pub struct MeshAnalysis {
    matrix: MeshMatrix,
    loop_count: usize,
    auxiliary: Vec<AuxUnknown>,
    solved: bool,
}

impl MeshAnalysis {
    /// Build the impedance matrix and voltage vector.
    pub fn assemble(network: &Network, shared: &SharedBranchSet) -> Self {
        let loops = network.loops();
        let loads = network.loads();
        let sources = network.sources();
        let n = loops.len();

        let current_sources = shared.current_sources(network);
        let size = n + current_sources.len();
        let mut matrix = MeshMatrix::new(size);

        // KVL block
        for (i, lp) in loops.iter().enumerate() {
            let z_self = lp.self_impedance(loads, sources);
            matrix.set(i, i, z_self);
            matrix.add_source(i, lp.net_voltage(sources));
            trace!("Z[{},{}] = {}", i, i, z_self);
        }

        for id in shared.shared_loads() {
            if let Membership::Shared(a, b) = shared.load(id) {
                let z = loads[id.0].impedance();
                matrix.stamp_mutual(a.0, b.0, z);
                trace!("{} shared by {} and {}: Z = {}", id, a, b, z);
            }
        }

        // A shared branch is oriented along the lower-index loop, so the
        // higher-index loop sees a shared voltage source reversed.
        for id in shared.shared_sources() {
            let source = &sources[id.0];
            if !source.kind().is_voltage_fixed() {
                continue;
            }
            if let Membership::Shared(a, b) = shared.source(id) {
                matrix.stamp_mutual(a.0, b.0, source.internal_impedance());
                // net_voltage counted it forward in loop b as well
                matrix.add_source(b.0, -2.0 * source.value());
                trace!("{} shared by {} and {}: V = {}", id, a, b, source.value());
            }
        }

        // Current-source block
        let mut auxiliary = Vec::with_capacity(current_sources.len());
        for (k, (source, loops)) in current_sources.into_iter().enumerate() {
            let row = n + k;
            let current = sources[source.0].value();
            match loops {
                Membership::Single(a) => matrix.stamp_current_source(row, a.0, None, current),
                Membership::Shared(a, b) => matrix.stamp_current_source(row, a.0, Some(b.0), current),
                Membership::Unused => continue,
            }
            auxiliary.push(AuxUnknown { source, row, loops });
        }

        debug!(
            "Assembled {}x{} mesh system ({} loops, {} auxiliary unknowns)",
            size,
            size,
            n,
            auxiliary.len()
        );
        for aux in &auxiliary {
            debug!("  row {}: terminal voltage of {} ({:?})", aux.row, aux.source, aux.loops);
        }

        Self {
            matrix,
            loop_count: n,
            auxiliary,
            solved: false,
        }
    }

    /// Factor and solve the assembled system.
    pub fn solve(&mut self, pivot_tolerance: f64) -> Result<()> {
        self.solved = false;
        self.matrix.factor(pivot_tolerance)?;
        self.matrix.solve()?;
        self.solved = true;
        Ok(())
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Number of unknowns M.
    pub fn size(&self) -> usize {
        self.matrix.size
    }

    pub fn loop_count(&self) -> usize {
        self.loop_count
    }

    /// Solved loop currents (components 0..N of the solution).
    pub fn loop_currents(&self) -> &[Complex64] {
        &self.matrix.x[..self.loop_count]
    }

    pub fn loop_current(&self, index: usize) -> Option<Complex64> {
        self.loop_currents().get(index).copied()
    }

    /// Full solution vector including auxiliary unknowns.
    pub fn solution(&self) -> &[Complex64] {
        &self.matrix.x
    }

    pub fn impedance_matrix(&self) -> &MeshMatrix {
        &self.matrix
    }

    pub fn voltage_vector(&self) -> &[Complex64] {
        &self.matrix.z
    }

    pub fn auxiliary(&self) -> &[AuxUnknown] {
        &self.auxiliary
    }
}
