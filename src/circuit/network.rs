//! Network arena: loads, sources and the loops that reference them.

use std::collections::HashMap;

use log::debug;
use num_complex::Complex64;

use super::mesh::Loop;
use super::types::{LoadId, LoopId, SourceId};
use crate::components::{Element, Frequency, Load, Source};
use crate::dsl::NetworkAst;
use crate::error::{MeshworkError, Result};
use crate::solver::{MeshAnalysis, SharedBranchSet, SolverConfig};

/// A name in a description, resolved to its arena slot.
#[derive(Debug, Clone, Copy)]
enum ElementRef {
    Load(LoadId),
    Source(SourceId),
}

/// A complete network ready for solving.
///
/// Loads and sources live in arenas owned by the network and are addressed
/// by stable ids. Loops hold id lists, so a branch shared by two loops is
/// one element referenced twice. Loop order defines the order of the mesh
/// current unknowns.
#[derive(Debug, Default)]
pub struct Network {
    loads: Vec<Load>,
    sources: Vec<Source>,
    loops: Vec<Loop>,
    /// Derived state of the last successful solve
    analysis: Option<MeshAnalysis>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a network from a parsed description.
    ///
    /// `frequency` overrides the description's `.freq`/`.omega` directive.
    pub fn from_ast(ast: NetworkAst, frequency: Option<Frequency>) -> Result<Self> {
        let frequency = frequency.or(ast.frequency);
        let mut network = Network::new();
        let mut names: HashMap<String, ElementRef> = HashMap::new();

        for def in &ast.elements {
            if names.contains_key(&def.name) {
                return Err(MeshworkError::DuplicateElement {
                    name: def.name.clone(),
                });
            }
            let slot = match Element::from_def(def, frequency)? {
                Element::Load(load) => ElementRef::Load(network.add_load(load)),
                Element::Source(source) => ElementRef::Source(network.add_source(source)),
            };
            names.insert(def.name.clone(), slot);
        }

        for def in ast.loops {
            if network.find_loop(&def.name).is_some() {
                return Err(MeshworkError::DuplicateLoop { name: def.name });
            }

            let mut sources = Vec::new();
            let mut loads = Vec::new();
            for element in &def.elements {
                match names.get(element) {
                    Some(ElementRef::Load(id)) => loads.push(*id),
                    Some(ElementRef::Source(id)) => sources.push(*id),
                    None => {
                        return Err(MeshworkError::UndefinedElement {
                            name: element.clone(),
                            loop_name: def.name.clone(),
                        })
                    }
                }
            }
            network.add_loop(Loop::new(sources, loads).with_name(def.name))?;
        }

        debug!(
            "Built network: {} loads, {} sources, {} loops",
            network.loads.len(),
            network.sources.len(),
            network.loops.len()
        );

        Ok(network)
    }

    /// Add a load to the arena.
    pub fn add_load(&mut self, load: Load) -> LoadId {
        self.loads.push(load);
        LoadId(self.loads.len() - 1)
    }

    /// Add a source to the arena.
    pub fn add_source(&mut self, source: Source) -> SourceId {
        self.sources.push(source);
        SourceId(self.sources.len() - 1)
    }

    /// Add a loop. Its membership is fixed from here on.
    ///
    /// Fails with a topology error if the loop references an element not in
    /// the network, lists an element twice, or would make an element part of
    /// a third loop. The network is unchanged on failure.
    pub fn add_loop(&mut self, lp: Loop) -> Result<LoopId> {
        self.loops.push(lp);
        if let Err(e) = SharedBranchSet::compute(self) {
            self.loops.pop();
            return Err(e);
        }
        self.analysis = None;
        Ok(LoopId(self.loops.len() - 1))
    }

    /// Swap in a new load, returning the old one.
    ///
    /// Loops keep referencing the same id; the next solve picks up the new
    /// impedance.
    pub fn replace_load(&mut self, id: LoadId, load: Load) -> Result<Load> {
        let slot = self.loads.get_mut(id.0).ok_or(MeshworkError::ElementNotFound {
            what: "load",
            index: id.0,
        })?;
        self.analysis = None;
        Ok(std::mem::replace(slot, load))
    }

    /// Assemble and solve the mesh equations.
    ///
    /// On success the terminal voltages of current sources are written back
    /// and the loop currents are returned; loads and voltage sources are left
    /// for the [`Simulator`](crate::solver::Simulator) to update. On failure
    /// nothing in the network changes.
    pub fn solve(&mut self, config: &SolverConfig) -> Result<&[Complex64]> {
        let shared = SharedBranchSet::compute(self)?;
        self.solve_with(&shared, config)?;
        Ok(self.loop_currents())
    }

    pub(crate) fn solve_with(&mut self, shared: &SharedBranchSet, config: &SolverConfig) -> Result<()> {
        let mut analysis = MeshAnalysis::assemble(self, shared);
        analysis.solve(config.pivot_tolerance)?;

        for aux in analysis.auxiliary() {
            let voltage = analysis.solution()[aux.row];
            self.sources[aux.source.0].set_voltage(voltage)?;
        }

        self.analysis = Some(analysis);
        Ok(())
    }

    /// Mutable element arenas, for writing solved quantities back.
    pub(crate) fn elements_mut(&mut self) -> (&mut [Load], &mut [Source]) {
        (&mut self.loads, &mut self.sources)
    }

    /// Derived state of the last successful solve, if any.
    pub fn analysis(&self) -> Option<&MeshAnalysis> {
        self.analysis.as_ref()
    }

    /// Loop currents of the last successful solve (empty before any solve).
    pub fn loop_currents(&self) -> &[Complex64] {
        self.analysis.as_ref().map(|a| a.loop_currents()).unwrap_or(&[])
    }

    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    pub fn load(&self, id: LoadId) -> Option<&Load> {
        self.loads.get(id.0)
    }

    pub fn source(&self, id: SourceId) -> Option<&Source> {
        self.sources.get(id.0)
    }

    pub fn loop_at(&self, id: LoopId) -> Option<&Loop> {
        self.loops.get(id.0)
    }

    /// Find a load by name.
    pub fn find_load(&self, name: &str) -> Option<LoadId> {
        self.loads.iter().position(|l| l.name == name).map(LoadId)
    }

    /// Find a source by name.
    pub fn find_source(&self, name: &str) -> Option<SourceId> {
        self.sources.iter().position(|s| s.name == name).map(SourceId)
    }

    /// Find a loop by name.
    pub fn find_loop(&self, name: &str) -> Option<LoopId> {
        self.loops.iter().position(|l| l.name == name).map(LoopId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;

    #[test]
    fn test_from_ast_resolves_names() {
        let input = "V1 DC 10\nR1 2\nR2 3\n.loop A V1 R1 R2\n.loop B R2\n";
        let network = Network::from_ast(dsl::parse(input).unwrap(), None).unwrap();

        assert_eq!(network.loads().len(), 2);
        assert_eq!(network.sources().len(), 1);
        assert_eq!(network.find_loop("B"), Some(LoopId(1)));

        let r2 = network.find_load("R2").unwrap();
        let a = network.loop_at(LoopId(0)).unwrap();
        assert!(a.contains_load(r2));
        assert!(a.contains_source(network.find_source("V1").unwrap()));
    }

    #[test]
    fn test_undefined_element() {
        let err = Network::from_ast(dsl::parse("R1 2\n.loop A R1 R9\n").unwrap(), None).unwrap_err();
        assert!(matches!(err, MeshworkError::UndefinedElement { ref name, .. } if name == "R9"));
    }

    #[test]
    fn test_duplicate_names() {
        let err = Network::from_ast(dsl::parse("R1 2\nR1 3\n").unwrap(), None).unwrap_err();
        assert!(matches!(err, MeshworkError::DuplicateElement { .. }));

        let err = Network::from_ast(dsl::parse("R1 2\n.loop A R1\n.loop A R1\n").unwrap(), None)
            .unwrap_err();
        assert!(matches!(err, MeshworkError::DuplicateLoop { .. }));
    }

    #[test]
    fn test_frequency_override() {
        let input = ".freq 50\nL1 1\n.loop A L1\n";
        let network =
            Network::from_ast(dsl::parse(input).unwrap(), Some(Frequency::Angular(10.0))).unwrap();
        assert!((network.loads()[0].impedance().im - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_add_loop_rejects_third_owner() {
        let mut network = Network::new();
        let r = network.add_load(Load::resistor(1.0).unwrap());
        network.add_loop(Loop::new(vec![], vec![r])).unwrap();
        network.add_loop(Loop::new(vec![], vec![r])).unwrap();

        let err = network.add_loop(Loop::new(vec![], vec![r])).unwrap_err();
        assert!(matches!(err, MeshworkError::Topology { .. }));
        assert_eq!(network.loops().len(), 2);
    }

    #[test]
    fn test_add_loop_rejects_dangling_handle() {
        let mut network = Network::new();
        let err = network.add_loop(Loop::new(vec![SourceId(0)], vec![])).unwrap_err();
        assert!(matches!(err, MeshworkError::Topology { .. }));
        assert!(network.loops().is_empty());
    }

    #[test]
    fn test_replace_load() {
        let mut network = Network::new();
        let r = network.add_load(Load::resistor(1.0).unwrap());
        let old = network.replace_load(r, Load::resistor(5.0).unwrap()).unwrap();
        assert!((old.impedance().re - 1.0).abs() < 1e-12);
        assert!((network.loads()[0].impedance().re - 5.0).abs() < 1e-12);

        assert!(network.replace_load(LoadId(4), Load::resistor(1.0).unwrap()).is_err());
    }
}
