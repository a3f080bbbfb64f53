//! Which loops own each branch element.

use log::trace;

use crate::circuit::{LoadId, LoopId, Membership, Network, SourceId};
use crate::error::{MeshworkError, Result};

/// Loop membership of every load and source of a network.
///
/// Built fresh for each solve; a branch belongs to at most two loops.
#[derive(Debug, Clone)]
pub struct SharedBranchSet {
    loads: Vec<Membership>,
    sources: Vec<Membership>,
}

impl SharedBranchSet {
    /// Compute memberships, failing on a branch in more than two loops,
    /// a branch listed twice in one loop, or a handle outside the network.
    pub fn compute(network: &Network) -> Result<Self> {
        let mut loads = vec![Membership::Unused; network.loads().len()];
        let mut sources = vec![Membership::Unused; network.sources().len()];

        for (index, lp) in network.loops().iter().enumerate() {
            let id = LoopId(index);
            for load in lp.loads() {
                let slot = loads.get_mut(load.0).ok_or_else(|| {
                    MeshworkError::topology(format!("loop {} references missing load {}", id, load))
                })?;
                *slot = record(*slot, id, &load.to_string())?;
            }
            for source in lp.sources() {
                let slot = sources.get_mut(source.0).ok_or_else(|| {
                    MeshworkError::topology(format!("loop {} references missing source {}", id, source))
                })?;
                *slot = record(*slot, id, &source.to_string())?;
            }
        }

        Ok(Self { loads, sources })
    }

    pub fn load(&self, id: LoadId) -> Membership {
        self.loads.get(id.0).copied().unwrap_or_default()
    }

    pub fn source(&self, id: SourceId) -> Membership {
        self.sources.get(id.0).copied().unwrap_or_default()
    }

    /// Loads that sit on a branch between two loops.
    pub fn shared_loads(&self) -> impl Iterator<Item = LoadId> + '_ {
        self.loads
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_shared())
            .map(|(i, _)| LoadId(i))
    }

    /// Sources that sit on a branch between two loops.
    pub fn shared_sources(&self) -> impl Iterator<Item = SourceId> + '_ {
        self.sources
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_shared())
            .map(|(i, _)| SourceId(i))
    }

    /// Memberships of all loads, then all sources.
    pub fn memberships(&self) -> impl Iterator<Item = Membership> + '_ {
        self.loads.iter().chain(self.sources.iter()).copied()
    }

    /// Current sources referenced by at least one loop, in ascending id order.
    ///
    /// This order fixes the rows of the auxiliary unknowns.
    pub fn current_sources(&self, network: &Network) -> Vec<(SourceId, Membership)> {
        network
            .sources()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.kind().is_current_fixed())
            .map(|(i, _)| (SourceId(i), self.source(SourceId(i))))
            .filter(|(_, m)| *m != Membership::Unused)
            .collect()
    }
}

fn record(current: Membership, id: LoopId, element: &str) -> Result<Membership> {
    let listed_twice = match current {
        Membership::Single(a) => a == id,
        Membership::Shared(_, b) => b == id,
        Membership::Unused => false,
    };
    if listed_twice {
        return Err(MeshworkError::topology(format!(
            "{} is listed more than once in loop {}",
            element, id
        )));
    }
    let next = current.with(id).ok_or_else(|| {
        MeshworkError::topology(format!("{} is part of more than two loops", element))
    })?;
    trace!("{} -> {:?}", element, next);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Loop;
    use crate::components::{Load, Source};

    #[test]
    fn test_shared_and_single_loads() {
        let mut network = Network::new();
        let r1 = network.add_load(Load::resistor(1.0).unwrap());
        let r2 = network.add_load(Load::resistor(2.0).unwrap());
        let r3 = network.add_load(Load::resistor(3.0).unwrap());
        network.add_loop(Loop::new(vec![], vec![r1, r2])).unwrap();
        network.add_loop(Loop::new(vec![], vec![r2, r3])).unwrap();

        let shared = SharedBranchSet::compute(&network).unwrap();
        assert_eq!(shared.load(r1), Membership::Single(LoopId(0)));
        assert_eq!(shared.load(r2), Membership::Shared(LoopId(0), LoopId(1)));
        assert_eq!(shared.shared_loads().collect::<Vec<_>>(), vec![r2]);
    }

    #[test]
    fn test_listed_twice_in_one_loop() {
        let mut network = Network::new();
        let r1 = network.add_load(Load::resistor(1.0).unwrap());
        let err = network.add_loop(Loop::new(vec![], vec![r1, r1])).unwrap_err();
        assert!(matches!(err, MeshworkError::Topology { .. }));
    }

    #[test]
    fn test_source_in_three_loops() {
        let mut network = Network::new();
        let v = network.add_source(Source::dc_voltage(5.0).unwrap());
        let r = network.add_load(Load::resistor(1.0).unwrap());
        network.add_loop(Loop::new(vec![v], vec![r])).unwrap();
        network.add_loop(Loop::new(vec![v], vec![])).unwrap();

        let err = network.add_loop(Loop::new(vec![v], vec![])).unwrap_err();
        assert!(matches!(err, MeshworkError::Topology { ref message } if message.contains("S0")));
        assert_eq!(network.loops().len(), 2);

        let shared = SharedBranchSet::compute(&network).unwrap();
        assert_eq!(shared.source(v), Membership::Shared(LoopId(0), LoopId(1)));
        assert_eq!(shared.shared_sources().collect::<Vec<_>>(), vec![v]);
    }

    #[test]
    fn test_current_sources_in_id_order() {
        let mut network = Network::new();
        let i_unused = network.add_source(Source::dc_current(9.0).unwrap());
        let i_a = network.add_source(Source::dc_current(1.0).unwrap());
        let v = network.add_source(Source::dc_voltage(5.0).unwrap());
        let i_b = network.add_source(Source::dc_current(2.0).unwrap());
        network.add_loop(Loop::new(vec![i_b, v, i_a], vec![])).unwrap();
        network.add_loop(Loop::new(vec![i_b], vec![])).unwrap();

        let shared = SharedBranchSet::compute(&network).unwrap();
        let order = shared.current_sources(&network);
        assert_eq!(
            order,
            vec![
                (i_a, Membership::Single(LoopId(0))),
                (i_b, Membership::Shared(LoopId(0), LoopId(1))),
            ]
        );
        assert_eq!(shared.source(i_unused), Membership::Unused);
    }
}
