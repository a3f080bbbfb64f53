//! Main solver interface.

use log::info;
use num_complex::Complex64;

use crate::circuit::{validate_network, LoadId, Membership, Network, SourceId};
use crate::error::Result;

use super::shared::SharedBranchSet;
use super::DEFAULT_PIVOT_TOLERANCE;

/// Configuration for the solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Relative LU pivot threshold; smaller pivots mark the system singular.
    pub pivot_tolerance: f64,
    /// Reject networks whose loops are not linked by shared branches.
    pub require_connected: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            require_connected: false,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative pivot tolerance.
    ///
    /// A pivot is treated as zero when its modulus is below this fraction
    /// of the largest matrix entry.
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Require every loop to be linked to the others through shared branches.
    pub fn with_require_connected(mut self, require: bool) -> Self {
        self.require_connected = require;
        self
    }
}

/// Solves a network and distributes the result onto its elements.
pub struct Simulator {
    /// The network being solved
    network: Network,
    config: SolverConfig,
}

impl Simulator {
    /// Create a new simulator for the given network with default configuration.
    pub fn new(network: Network) -> Self {
        Self::with_config(network, SolverConfig::default())
    }

    /// Create a new simulator for the given network with custom configuration.
    pub fn with_config(network: Network, config: SolverConfig) -> Self {
        Self { network, config }
    }

    /// Solve the network and back-assign currents.
    ///
    /// Every load receives its branch current: the loop current of its only
    /// loop, or for a branch shared by two loops the lower-index loop's
    /// current minus the other's. Voltage sources are treated the same way.
    /// Current sources keep their fixed current and receive the solved
    /// terminal voltage. On error no element is modified.
    pub fn run(&mut self) -> Result<&[Complex64]> {
        if self.network.loops().is_empty() {
            info!("Network has no loops; nothing to solve");
            return Ok(&[]);
        }

        let shared = SharedBranchSet::compute(&self.network)?;
        validate_network(&self.network, &shared, &self.config)?;
        self.network.solve_with(&shared, &self.config)?;
        distribute(&mut self.network, &shared)?;

        info!(
            "Solved {} loops ({} unknowns)",
            self.network.loops().len(),
            self.network.analysis().map_or(0, |a| a.size())
        );

        Ok(self.network.loop_currents())
    }

    /// Get a reference to the network.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Get a mutable reference to the network, e.g. to replace a load
    /// before solving again.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

/// Branch current seen from the lower-index loop.
fn branch_current(membership: Membership, currents: &[Complex64]) -> Option<Complex64> {
    match membership {
        Membership::Unused => None,
        Membership::Single(a) => Some(currents[a.0]),
        Membership::Shared(a, b) => Some(currents[a.0] - currents[b.0]),
    }
}

fn distribute(network: &mut Network, shared: &SharedBranchSet) -> Result<()> {
    let currents = network.loop_currents().to_vec();
    let (loads, sources) = network.elements_mut();

    for (index, load) in loads.iter_mut().enumerate() {
        if let Some(current) = branch_current(shared.load(LoadId(index)), &currents) {
            load.set_current(current);
        }
    }

    for (index, source) in sources.iter_mut().enumerate() {
        if !source.kind().is_voltage_fixed() {
            continue;
        }
        if let Some(current) = branch_current(shared.source(SourceId(index)), &currents) {
            source.set_current(current)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Loop;
    use crate::components::{Frequency, Load, Representation, Source};
    use crate::error::MeshworkError;
    use approx::assert_abs_diff_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    /// V1 -- R1 -- [Rc] -- R2, with Rc shared by the two loops.
    fn two_loops(rc: f64) -> (Network, LoadId, LoadId, LoadId) {
        let mut network = Network::new();
        let v = network.add_source(Source::dc_voltage(10.0).unwrap());
        let r1 = network.add_load(Load::resistor(2.0).unwrap());
        let shared = network.add_load(Load::resistor(rc).unwrap());
        let r2 = network.add_load(Load::resistor(6.0).unwrap());
        network.add_loop(Loop::new(vec![v], vec![r1, shared])).unwrap();
        network.add_loop(Loop::new(vec![], vec![shared, r2])).unwrap();
        (network, r1, shared, r2)
    }

    #[test]
    fn test_single_loop_ohms_law() {
        let mut network = Network::new();
        let v = network.add_source(
            Source::ac_voltage(Representation::polar_degrees(100.0, 30.0), Frequency::Hertz(60.0))
                .unwrap(),
        );
        let z = network.add_load(Load::from_impedance(c(3.0, 4.0)).unwrap());
        network.add_loop(Loop::new(vec![v], vec![z])).unwrap();

        let mut sim = Simulator::new(network);
        let currents = sim.run().unwrap().to_vec();

        let source_value = sim.network().source(v).unwrap().value();
        let expected = source_value / c(3.0, 4.0);
        assert_eq!(currents.len(), 1);
        assert_abs_diff_eq!(currents[0], expected, epsilon = 1e-12);
        assert_abs_diff_eq!(currents[0].norm(), 20.0, epsilon = 1e-12);

        let load = sim.network().load(z).unwrap();
        assert_abs_diff_eq!(load.voltage(), source_value, epsilon = 1e-12);
        assert_abs_diff_eq!(sim.network().source(v).unwrap().current(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_shared_load_gets_difference_current() {
        let (network, _, rc, _) = two_loops(4.0);
        let mut sim = Simulator::new(network);
        let currents = sim.run().unwrap().to_vec();

        // [6 -4; -4 10] x = [10; 0]
        assert_abs_diff_eq!(currents[0], c(100.0 / 44.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(currents[1], c(40.0 / 44.0, 0.0), epsilon = 1e-12);

        // Shared branches are oriented along the lower-index loop.
        let load = sim.network().load(rc).unwrap();
        assert_abs_diff_eq!(load.current(), currents[0] - currents[1], epsilon = 1e-12);
        assert_abs_diff_eq!(load.current(), c(60.0 / 44.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(load.voltage(), c(240.0 / 44.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(load.voltage(), load.current() * 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distributed_currents_satisfy_kvl() {
        let (network, r1, rc, r2) = two_loops(4.0);
        let mut sim = Simulator::new(network);
        sim.run().unwrap();
        let net = sim.network();
        let v = |id| net.load(id).unwrap().voltage();

        // Loop 0 traverses the shared branch along its current, loop 1 against it.
        assert_abs_diff_eq!(v(rc), c(240.0 / 44.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(v(r1) + v(rc) - c(10.0, 0.0), c(0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(v(r2) - v(rc), c(0.0, 0.0), epsilon = 1e-12);

        let analysis = net.analysis().unwrap();
        for r in analysis.impedance_matrix().residual() {
            assert_abs_diff_eq!(r, c(0.0, 0.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_shared_current_source_constrains_difference() {
        let mut network = Network::new();
        let v = network.add_source(Source::dc_voltage(10.0).unwrap());
        let i = network.add_source(Source::dc_current(1.0).unwrap());
        let r1 = network.add_load(Load::resistor(2.0).unwrap());
        let r2 = network.add_load(Load::resistor(3.0).unwrap());
        network.add_loop(Loop::new(vec![v, i], vec![r1])).unwrap();
        network.add_loop(Loop::new(vec![i], vec![r2])).unwrap();

        let mut sim = Simulator::new(network);
        let currents = sim.run().unwrap().to_vec();

        assert_abs_diff_eq!(currents[0], c(2.6, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(currents[1], c(1.6, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(currents[0] - currents[1], c(1.0, 0.0), epsilon = 1e-12);

        let source = sim.network().source(i).unwrap();
        assert_abs_diff_eq!(source.voltage(), c(-4.8, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(source.current(), c(1.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(sim.network().load(r2).unwrap().current(), c(1.6, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_shared_current_source_with_complex_loads() {
        let mut network = Network::new();
        let v = network.add_source(
            Source::ac_voltage(Representation::polar_degrees(50.0, -20.0), Frequency::Hertz(50.0))
                .unwrap(),
        );
        let i = network.add_source(
            Source::ac_current(Representation::polar_degrees(2.0, 45.0), Frequency::Hertz(50.0))
                .unwrap(),
        );
        let z1 = network.add_load(Load::from_impedance(c(4.0, 3.0)).unwrap());
        let zc = network.add_load(Load::from_impedance(c(1.0, -2.0)).unwrap());
        let z2 = network.add_load(Load::from_impedance(c(0.0, 7.0)).unwrap());
        network.add_loop(Loop::new(vec![v], vec![z1, zc])).unwrap();
        network.add_loop(Loop::new(vec![i], vec![zc, z2])).unwrap();
        network.add_loop(Loop::new(vec![i], vec![z2])).unwrap();

        let mut sim = Simulator::new(network);
        let currents = sim.run().unwrap().to_vec();
        let fixed = sim.network().source(i).unwrap().value();
        assert_abs_diff_eq!(currents[1] - currents[2], fixed, epsilon = 1e-12);
    }

    #[test]
    fn test_single_loop_current_source() {
        let mut network = Network::new();
        let i = network.add_source(Source::dc_current(2.0).unwrap());
        let r = network.add_load(Load::resistor(5.0).unwrap());
        network.add_loop(Loop::new(vec![i], vec![r])).unwrap();

        let mut sim = Simulator::new(network);
        let currents = sim.run().unwrap().to_vec();

        assert_abs_diff_eq!(currents[0], c(2.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(sim.network().source(i).unwrap().voltage(), c(10.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(sim.network().load(r).unwrap().voltage(), c(10.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(sim.network().source(i).unwrap().power(), c(20.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_shared_voltage_source_balances_power() {
        let mut network = Network::new();
        let v = network.add_source(Source::dc_voltage(12.0).unwrap());
        let r1 = network.add_load(Load::resistor(3.0).unwrap());
        let r2 = network.add_load(Load::resistor(4.0).unwrap());
        network.add_loop(Loop::new(vec![v], vec![r1])).unwrap();
        network.add_loop(Loop::new(vec![v], vec![r2])).unwrap();

        let mut sim = Simulator::new(network);
        let currents = sim.run().unwrap().to_vec();

        // Loop 1 runs through the source against its orientation.
        assert_abs_diff_eq!(currents[0], c(4.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(currents[1], c(-3.0, 0.0), epsilon = 1e-12);

        let net = sim.network();
        let source = net.source(v).unwrap();
        assert_abs_diff_eq!(source.current(), c(7.0, 0.0), epsilon = 1e-12);

        let load_power: Complex64 = net.loads().iter().map(|l| l.power()).sum();
        assert_abs_diff_eq!(source.power(), load_power, epsilon = 1e-9);
        assert_abs_diff_eq!(load_power, c(84.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_shared_voltage_source_internal_impedance_is_mutual() {
        let mut network = Network::new();
        let v = network.add_source(
            Source::dc_voltage(12.0)
                .unwrap()
                .with_internal_impedance(c(1.0, 0.0))
                .unwrap(),
        );
        let r1 = network.add_load(Load::resistor(3.0).unwrap());
        let r2 = network.add_load(Load::resistor(4.0).unwrap());
        network.add_loop(Loop::new(vec![v], vec![r1])).unwrap();
        network.add_loop(Loop::new(vec![v], vec![r2])).unwrap();

        let mut sim = Simulator::new(network);
        let currents = sim.run().unwrap().to_vec();

        let analysis = sim.network().analysis().unwrap();
        let m = analysis.impedance_matrix();
        assert_abs_diff_eq!(m.get(0, 1), c(-1.0, 0.0));
        assert_abs_diff_eq!(m.get(1, 0), c(-1.0, 0.0));
        assert_abs_diff_eq!(analysis.voltage_vector()[1], c(-12.0, 0.0));

        // [4 -1; -1 5] x = [12; -12]
        assert_abs_diff_eq!(currents[0], c(48.0 / 19.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(currents[1], c(-36.0 / 19.0, 0.0), epsilon = 1e-12);
        let source = sim.network().source(v).unwrap();
        assert_abs_diff_eq!(source.current(), c(84.0 / 19.0, 0.0), epsilon = 1e-12);

        // Terminal voltage across R1 is V minus the internal drop.
        let r1_voltage = sim.network().load(r1).unwrap().voltage();
        assert_abs_diff_eq!(r1_voltage, c(12.0, 0.0) - source.current(), epsilon = 1e-12);
    }

    #[test]
    fn test_solve_is_deterministic() {
        let (network, _, rc, _) = two_loops(4.0);
        let mut sim = Simulator::new(network);
        let first = sim.run().unwrap().to_vec();
        let first_load = sim.network().load(rc).unwrap().current();
        let second = sim.run().unwrap().to_vec();

        assert_eq!(first, second);
        assert_eq!(first_load, sim.network().load(rc).unwrap().current());
    }

    #[test]
    fn test_replacing_load_only_affects_its_loop_group() {
        let mut network = Network::new();
        let v1 = network.add_source(Source::dc_voltage(10.0).unwrap());
        let v2 = network.add_source(Source::dc_voltage(6.0).unwrap());
        let r1 = network.add_load(Load::resistor(5.0).unwrap());
        let r2 = network.add_load(Load::resistor(3.0).unwrap());
        network.add_loop(Loop::new(vec![v1], vec![r1])).unwrap();
        network.add_loop(Loop::new(vec![v2], vec![r2])).unwrap();

        let mut sim = Simulator::new(network);
        let before = sim.run().unwrap().to_vec();

        sim.network_mut()
            .replace_load(r2, Load::resistor(2.0).unwrap())
            .unwrap();
        let after = sim.run().unwrap().to_vec();

        assert_abs_diff_eq!(before[0], after[0], epsilon = 1e-15);
        assert_abs_diff_eq!(after[0], c(2.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(after[1], c(3.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(sim.network().load(r1).unwrap().current(), c(2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_loops() {
        let mut sim = Simulator::new(Network::new());
        assert!(sim.run().unwrap().is_empty());
        assert!(sim.network().analysis().is_none());
    }

    #[test]
    fn test_singular_system_leaves_state_untouched() {
        let mut network = Network::new();
        let i = network.add_source(Source::dc_current(2.0).unwrap());
        let r = network.add_load(Load::resistor(5.0).unwrap());
        network.add_loop(Loop::new(vec![i], vec![r])).unwrap();

        let mut sim = Simulator::new(network);
        sim.run().unwrap();

        // A loop with nothing in it has no defined current.
        sim.network_mut().add_loop(Loop::default()).unwrap();
        let err = sim.run().unwrap_err();
        assert!(matches!(err, MeshworkError::SingularSystem));

        let net = sim.network();
        assert!(net.analysis().is_none());
        assert!(net.loop_currents().is_empty());
        assert_abs_diff_eq!(net.source(i).unwrap().voltage(), c(10.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(net.load(r).unwrap().current(), c(2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_disconnected_loops_rejected_when_strict() {
        let mut network = Network::new();
        let v = network.add_source(Source::dc_voltage(1.0).unwrap());
        let r1 = network.add_load(Load::resistor(1.0).unwrap());
        let r2 = network.add_load(Load::resistor(1.0).unwrap());
        network.add_loop(Loop::new(vec![v], vec![r1])).unwrap();
        network.add_loop(Loop::new(vec![], vec![r2])).unwrap();

        let config = SolverConfig::new().with_require_connected(true);
        let mut sim = Simulator::with_config(network, config);
        let err = sim.run().unwrap_err();
        assert!(matches!(err, MeshworkError::Topology { .. }));
        assert_eq!(sim.network().load(r1).unwrap().current(), c(0.0, 0.0));
        assert_eq!(sim.network().source(v).unwrap().current(), c(0.0, 0.0));
        assert!(sim.network().source(SourceId(0)).is_some());
    }

    #[test]
    fn test_pivot_tolerance_is_configurable() {
        let mut network = Network::new();
        let v = network.add_source(Source::dc_voltage(1.0).unwrap());
        let big = network.add_load(Load::resistor(1.0e6).unwrap());
        let tiny = network.add_load(Load::resistor(1.0e-3).unwrap());
        network.add_loop(Loop::new(vec![v], vec![big])).unwrap();
        network.add_loop(Loop::new(vec![], vec![tiny])).unwrap();

        let mut sim = Simulator::with_config(network, SolverConfig::new().with_pivot_tolerance(1e-6));
        assert!(matches!(sim.run(), Err(MeshworkError::SingularSystem)));

        let mut sim = Simulator::new(sim.into_network());
        assert!(sim.run().is_ok());
        assert_eq!(sim.config().pivot_tolerance, DEFAULT_PIVOT_TOLERANCE);
    }
}
