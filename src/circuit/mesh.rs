//! A single loop (mesh) of the network.

use num_complex::Complex64;

use super::types::{LoadId, SourceId};
use crate::components::{Load, Source};

/// A closed, non-overlapping current path.
///
/// A loop holds handles into its network's element arenas, never the
/// elements themselves, so the same branch can belong to two loops.
#[derive(Debug, Clone, Default)]
pub struct Loop {
    pub name: String,
    sources: Vec<SourceId>,
    loads: Vec<LoadId>,
}

impl Loop {
    /// Create a loop from its sources and loads.
    pub fn new(sources: Vec<SourceId>, loads: Vec<LoadId>) -> Self {
        Self {
            name: String::new(),
            sources,
            loads,
        }
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn sources(&self) -> &[SourceId] {
        &self.sources
    }

    pub fn loads(&self) -> &[LoadId] {
        &self.loads
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.loads.is_empty()
    }

    pub fn contains_load(&self, id: LoadId) -> bool {
        self.loads.contains(&id)
    }

    pub fn contains_source(&self, id: SourceId) -> bool {
        self.sources.contains(&id)
    }

    /// Net driving voltage: the sum of the values of all voltage sources.
    ///
    /// Current sources contribute nothing here; they enter the system as
    /// constraints on the loop currents.
    pub fn net_voltage(&self, sources: &[Source]) -> Complex64 {
        self.sources
            .iter()
            .map(|id| &sources[id.0])
            .filter(|s| s.kind().is_voltage_fixed())
            .map(|s| s.value())
            .sum()
    }

    /// Self-impedance: every load plus the internal impedance of every
    /// voltage source in the loop.
    pub fn self_impedance(&self, loads: &[Load], sources: &[Source]) -> Complex64 {
        let load_total: Complex64 = self.loads.iter().map(|id| loads[id.0].impedance()).sum();
        let source_total: Complex64 = self
            .sources
            .iter()
            .map(|id| &sources[id.0])
            .filter(|s| s.kind().is_voltage_fixed())
            .map(|s| s.internal_impedance())
            .sum();
        load_total + source_total
    }

    /// Sum of the impedances of the loads this loop shares with `other`.
    pub fn shared_impedance(&self, other: &Loop, loads: &[Load]) -> Complex64 {
        self.loads
            .iter()
            .filter(|id| other.contains_load(**id))
            .map(|id| loads[id.0].impedance())
            .sum()
    }
}
