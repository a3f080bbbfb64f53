//! Passive branch elements: resistors, inductors, capacitors and fixed impedances.

use num_complex::Complex64;

use super::phasor::{Frequency, Representation};
use crate::error::{MeshworkError, Result};

/// What a load was built from. The solver only looks at the impedance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadKind {
    /// Resistance in ohms.
    Resistor(f64),
    /// Inductance in henries at an angular frequency.
    Inductor { inductance: f64, omega: f64 },
    /// Capacitance in farads at an angular frequency.
    Capacitor { capacitance: f64, omega: f64 },
    /// Impedance given directly.
    Impedance,
}

/// A passive two-terminal branch element with a fixed complex impedance.
///
/// The solver assigns the branch current; voltage and power follow from it:
///   V = Z * I
///   S = V * conj(I)
#[derive(Debug, Clone)]
pub struct Load {
    pub name: String,
    pub kind: LoadKind,
    impedance: Complex64,
    current: Complex64,
    voltage: Complex64,
    power: Complex64,
}

impl Load {
    fn build(kind: LoadKind, impedance: Complex64) -> Self {
        Self {
            name: String::new(),
            kind,
            impedance,
            current: Complex64::new(0.0, 0.0),
            voltage: Complex64::new(0.0, 0.0),
            power: Complex64::new(0.0, 0.0),
        }
    }

    /// Create a load from an impedance in any representation.
    pub fn new(impedance: Representation) -> Result<Self> {
        let z = impedance.to_finite_complex("load impedance")?;
        Ok(Self::build(LoadKind::Impedance, z))
    }

    /// Create a load from a complex impedance.
    pub fn from_impedance(impedance: Complex64) -> Result<Self> {
        Self::new(Representation::Rectangular {
            re: impedance.re,
            im: impedance.im,
        })
    }

    /// Create a resistor. Z = R
    pub fn resistor(resistance: f64) -> Result<Self> {
        check_value("resistor", "resistance", resistance)?;
        Ok(Self::build(
            LoadKind::Resistor(resistance),
            Complex64::new(resistance, 0.0),
        ))
    }

    /// Create an inductor. Z = jωL
    ///
    /// At zero frequency the inductor is a short (Z = 0).
    pub fn inductor(inductance: f64, frequency: Frequency) -> Result<Self> {
        check_value("inductor", "inductance", inductance)?;
        let omega = frequency.validate("inductor")?.angular();
        Ok(Self::build(
            LoadKind::Inductor { inductance, omega },
            Complex64::new(0.0, omega * inductance),
        ))
    }

    /// Create a capacitor. Z = -j / (ωC)
    pub fn capacitor(capacitance: f64, frequency: Frequency) -> Result<Self> {
        check_value("capacitor", "capacitance", capacitance)?;
        let omega = frequency.validate("capacitor")?.angular();
        if omega == 0.0 {
            return Err(MeshworkError::invalid_construction(
                "capacitor",
                "impedance is undefined at zero angular frequency",
            ));
        }
        if capacitance == 0.0 {
            return Err(MeshworkError::invalid_construction(
                "capacitor",
                "impedance is undefined for zero capacitance",
            ));
        }
        Ok(Self::build(
            LoadKind::Capacitor { capacitance, omega },
            Complex64::new(0.0, -1.0 / (omega * capacitance)),
        ))
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Assign the branch current and recompute voltage and power.
    pub fn set_current(&mut self, current: Complex64) {
        self.current = current;
        self.voltage = self.impedance * current;
        self.power = self.voltage * current.conj();
    }

    pub fn impedance(&self) -> Complex64 {
        self.impedance
    }

    pub fn current(&self) -> Complex64 {
        self.current
    }

    pub fn voltage(&self) -> Complex64 {
        self.voltage
    }

    /// Complex power S = V * conj(I).
    pub fn power(&self) -> Complex64 {
        self.power
    }

    /// Active power in watts.
    pub fn active_power(&self) -> f64 {
        self.power.re
    }

    /// Reactive power in var.
    pub fn reactive_power(&self) -> f64 {
        self.power.im
    }

    /// Impedance angle in radians.
    pub fn phase(&self) -> f64 {
        self.impedance.arg()
    }
}

fn check_value(element: &str, quantity: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(MeshworkError::invalid_construction(
            element,
            format!("{} must be finite and non-negative, got {}", quantity, value),
        ));
    }
    Ok(())
}
