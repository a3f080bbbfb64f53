//! Voltage and current sources.

use num_complex::Complex64;

use super::phasor::{Frequency, Representation};
use crate::error::{MeshworkError, Result};

/// The four source variants.
///
/// A voltage source fixes its terminal voltage and has its current solved
/// for; a current source fixes its current and has its terminal voltage
/// solved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    AcVoltage,
    DcVoltage,
    AcCurrent,
    DcCurrent,
}

impl SourceKind {
    /// True for sources whose voltage is fixed at construction.
    pub fn is_voltage_fixed(&self) -> bool {
        matches!(self, Self::AcVoltage | Self::DcVoltage)
    }

    /// True for sources whose current is fixed at construction.
    pub fn is_current_fixed(&self) -> bool {
        matches!(self, Self::AcCurrent | Self::DcCurrent)
    }

    pub fn is_ac(&self) -> bool {
        matches!(self, Self::AcVoltage | Self::AcCurrent)
    }
}

/// An active branch element.
#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    kind: SourceKind,
    /// Fixed voltage (voltage sources) or fixed current (current sources)
    value: Complex64,
    /// Operating frequency, AC sources only
    frequency: Option<Frequency>,
    /// Series impedance of the source
    internal_impedance: Complex64,
    voltage: Complex64,
    current: Complex64,
    power: Complex64,
}

impl Source {
    fn build(kind: SourceKind, value: Complex64, frequency: Option<Frequency>) -> Self {
        let zero = Complex64::new(0.0, 0.0);
        let (voltage, current) = if kind.is_voltage_fixed() {
            (value, zero)
        } else {
            (zero, value)
        };
        Self {
            name: String::new(),
            kind,
            value,
            frequency,
            internal_impedance: zero,
            voltage,
            current,
            power: zero,
        }
    }

    /// Create a DC voltage source.
    pub fn dc_voltage(voltage: f64) -> Result<Self> {
        let value = Representation::real(voltage).to_finite_complex("DC voltage source")?;
        Ok(Self::build(SourceKind::DcVoltage, value, None))
    }

    /// Create a DC current source.
    pub fn dc_current(current: f64) -> Result<Self> {
        let value = Representation::real(current).to_finite_complex("DC current source")?;
        Ok(Self::build(SourceKind::DcCurrent, value, None))
    }

    /// Create an AC voltage source from its phasor and frequency.
    pub fn ac_voltage(phasor: Representation, frequency: Frequency) -> Result<Self> {
        let value = phasor.to_finite_complex("AC voltage source")?;
        let frequency = frequency.validate("AC voltage source")?;
        Ok(Self::build(SourceKind::AcVoltage, value, Some(frequency)))
    }

    /// Create an AC current source from its phasor and frequency.
    pub fn ac_current(phasor: Representation, frequency: Frequency) -> Result<Self> {
        let value = phasor.to_finite_complex("AC current source")?;
        let frequency = frequency.validate("AC current source")?;
        Ok(Self::build(SourceKind::AcCurrent, value, Some(frequency)))
    }

    /// Set the series impedance of the source.
    ///
    /// Only voltage sources contribute it to their loops; an ideal current
    /// source's series impedance does not affect the loop currents.
    pub fn with_internal_impedance(mut self, impedance: Complex64) -> Result<Self> {
        if !impedance.re.is_finite() || !impedance.im.is_finite() {
            return Err(MeshworkError::invalid_construction(
                "source",
                "internal impedance is not finite",
            ));
        }
        self.internal_impedance = impedance;
        Ok(self)
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Assign the solved current of a voltage source.
    pub fn set_current(&mut self, current: Complex64) -> Result<()> {
        if !self.kind.is_voltage_fixed() {
            return Err(MeshworkError::invalid_construction(
                self.label(),
                "current of a current source is fixed",
            ));
        }
        self.current = current;
        self.update_power();
        Ok(())
    }

    /// Assign the solved terminal voltage of a current source.
    pub fn set_voltage(&mut self, voltage: Complex64) -> Result<()> {
        if !self.kind.is_current_fixed() {
            return Err(MeshworkError::invalid_construction(
                self.label(),
                "voltage of a voltage source is fixed",
            ));
        }
        self.voltage = voltage;
        self.update_power();
        Ok(())
    }

    fn update_power(&mut self) {
        self.power = self.voltage * self.current.conj();
    }

    fn label(&self) -> String {
        if self.name.is_empty() {
            format!("{:?} source", self.kind)
        } else {
            format!("source '{}'", self.name)
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// The fixed quantity: voltage for voltage sources, current for current sources.
    pub fn value(&self) -> Complex64 {
        self.value
    }

    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    pub fn internal_impedance(&self) -> Complex64 {
        self.internal_impedance
    }

    pub fn voltage(&self) -> Complex64 {
        self.voltage
    }

    pub fn current(&self) -> Complex64 {
        self.current
    }

    /// Complex power S = V * conj(I).
    pub fn power(&self) -> Complex64 {
        self.power
    }

    pub fn active_power(&self) -> f64 {
        self.power.re
    }

    pub fn reactive_power(&self) -> f64 {
        self.power.im
    }

    /// Angle of the complex power in radians.
    pub fn phase(&self) -> f64 {
        self.power.arg()
    }
}
