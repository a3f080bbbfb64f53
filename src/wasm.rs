//! WASM bindings for Meshwork Core.
//!
//! This module provides JavaScript-friendly bindings for solving networks
//! in a web browser. Complex results are returned as flat arrays of
//! interleaved real and imaginary parts.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmMeshSim } from 'meshwork_core';
//!
//! await init();
//!
//! const networkDsl = `
//!   V1 DC 10
//!   R1 2
//!   R2 4
//!   R3 6
//!   .loop M1 V1 R1 R2
//!   .loop M2 R2 R3
//! `;
//!
//! const sim = new WasmMeshSim(networkDsl);
//! sim.solve();
//!
//! const currents = sim.loop_currents(); // [re0, im0, re1, im1]
//! const shared = sim.load_current("R2");
//! ```

use num_complex::Complex64;
use wasm_bindgen::prelude::*;

use crate::circuit::Network;
use crate::dsl;
use crate::error::MeshworkError;
use crate::solver::{Simulator, SolverConfig};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: MeshworkError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn interleave(values: &[Complex64]) -> Vec<f64> {
    values.iter().flat_map(|z| [z.re, z.im]).collect()
}

/// WASM-compatible mesh network solver.
///
/// This struct wraps the native `Simulator` and exposes its results to
/// JavaScript.
#[wasm_bindgen]
pub struct WasmMeshSim {
    simulator: Simulator,
}

#[wasm_bindgen]
impl WasmMeshSim {
    /// Create a new solver from a network DSL string.
    ///
    /// # Arguments
    /// * `network_dsl` - The network description in Meshwork DSL format
    ///
    /// # Returns
    /// A new `WasmMeshSim` instance or an error if the description is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(network_dsl: &str) -> Result<WasmMeshSim, JsValue> {
        Self::with_config(network_dsl, false)
    }

    /// Create a new solver, optionally rejecting networks whose loops are
    /// not linked by shared branches.
    #[wasm_bindgen]
    pub fn with_config(network_dsl: &str, require_connected: bool) -> Result<WasmMeshSim, JsValue> {
        let ast = dsl::parse(network_dsl).map_err(to_js)?;
        let network = Network::from_ast(ast, None).map_err(to_js)?;

        let config = SolverConfig::new().with_require_connected(require_connected);
        let simulator = Simulator::with_config(network, config);

        Ok(WasmMeshSim { simulator })
    }

    /// Solve the network.
    ///
    /// On error the previous results are kept.
    #[wasm_bindgen]
    pub fn solve(&mut self) -> Result<(), JsValue> {
        self.simulator.run().map(|_| ()).map_err(to_js)
    }

    /// Number of loops in the network.
    #[wasm_bindgen(getter)]
    pub fn loop_count(&self) -> usize {
        self.simulator.network().loops().len()
    }

    /// Solved loop currents as `[re0, im0, re1, im1, ...]`.
    ///
    /// Empty until the first successful solve.
    #[wasm_bindgen]
    pub fn loop_currents(&self) -> Vec<f64> {
        interleave(self.simulator.network().loop_currents())
    }

    /// Branch current of a named load as `[re, im]`.
    #[wasm_bindgen]
    pub fn load_current(&self, name: &str) -> Option<Vec<f64>> {
        let network = self.simulator.network();
        let load = network.load(network.find_load(name)?)?;
        Some(interleave(&[load.current()]))
    }

    /// Voltage across a named load as `[re, im]`.
    #[wasm_bindgen]
    pub fn load_voltage(&self, name: &str) -> Option<Vec<f64>> {
        let network = self.simulator.network();
        let load = network.load(network.find_load(name)?)?;
        Some(interleave(&[load.voltage()]))
    }

    /// Terminal voltage of a named source as `[re, im]`.
    #[wasm_bindgen]
    pub fn source_voltage(&self, name: &str) -> Option<Vec<f64>> {
        let network = self.simulator.network();
        let source = network.source(network.find_source(name)?)?;
        Some(interleave(&[source.voltage()]))
    }

    /// Assembled impedance matrix, row-major with interleaved parts.
    #[wasm_bindgen]
    pub fn impedance_matrix(&self) -> Vec<f64> {
        self.simulator
            .network()
            .analysis()
            .map(|a| interleave(&a.impedance_matrix().a))
            .unwrap_or_default()
    }

    /// Assembled voltage vector with interleaved parts.
    #[wasm_bindgen]
    pub fn voltage_vector(&self) -> Vec<f64> {
        self.simulator
            .network()
            .analysis()
            .map(|a| interleave(a.voltage_vector()))
            .unwrap_or_default()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
