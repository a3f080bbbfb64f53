//! Branch elements for mesh analysis.
//!
//! This module provides the elements a loop is made of:
//! - Loads: Resistor, Inductor, Capacitor, fixed Impedance
//! - Sources: AC/DC Voltage Source, AC/DC Current Source
//!
//! Elements are resolved to fixed complex values at construction; the
//! solver only reads impedances and source values and writes back the
//! solved currents and voltages.

mod load;
mod phasor;
mod sources;

pub use load::{Load, LoadKind};
pub use phasor::{Frequency, Representation};
pub use sources::{Source, SourceKind};

use num_complex::Complex64;

use crate::dsl::{ElementDef, ElementType, SourceType};
use crate::error::{MeshworkError, Result};

/// A branch element built from a description.
#[derive(Debug, Clone)]
pub enum Element {
    Load(Load),
    Source(Source),
}

impl Element {
    /// Create an element from a description definition.
    ///
    /// `frequency` is the network-wide default used by reactive loads and AC
    /// sources that do not carry their own `freq=`/`omega=` parameter.
    pub fn from_def(def: &ElementDef, frequency: Option<Frequency>) -> Result<Self> {
        let in_context = |e: MeshworkError| match e {
            MeshworkError::InvalidConstruction { message, .. } => {
                MeshworkError::invalid_element(&def.name, def.line, message)
            }
            other => other,
        };
        let first = def
            .value(0)
            .ok_or_else(|| MeshworkError::invalid_element(&def.name, def.line, "missing value"))?;

        let element = match def.element_type {
            ElementType::Resistor => Element::Load(Load::resistor(first).map_err(in_context)?),

            ElementType::Inductor => {
                let f = element_frequency(def, frequency)?;
                Element::Load(Load::inductor(first, f).map_err(in_context)?)
            }

            ElementType::Capacitor => {
                let f = element_frequency(def, frequency)?;
                Element::Load(Load::capacitor(first, f).map_err(in_context)?)
            }

            ElementType::Impedance => {
                let second = def.value(1).unwrap_or(0.0);
                let repr = if def.polar {
                    Representation::PolarDegrees {
                        magnitude: first,
                        angle: second,
                    }
                } else {
                    Representation::Rectangular {
                        re: first,
                        im: second,
                    }
                };
                Element::Load(Load::new(repr).map_err(in_context)?)
            }

            ElementType::VoltageSource | ElementType::CurrentSource => {
                let is_voltage = def.element_type == ElementType::VoltageSource;
                let source = match def.source_type.unwrap_or(SourceType::Dc) {
                    SourceType::Dc if is_voltage => Source::dc_voltage(first),
                    SourceType::Dc => Source::dc_current(first),
                    SourceType::Ac => {
                        let phasor = Representation::polar_degrees(first, def.value(1).unwrap_or(0.0));
                        let f = element_frequency(def, frequency)?;
                        if is_voltage {
                            Source::ac_voltage(phasor, f)
                        } else {
                            Source::ac_current(phasor, f)
                        }
                    }
                }
                .map_err(in_context)?;

                let rs = def.params.get("rs").copied().unwrap_or(0.0);
                let xs = def.params.get("xs").copied().unwrap_or(0.0);
                let source = source
                    .with_internal_impedance(Complex64::new(rs, xs))
                    .map_err(in_context)?;
                Element::Source(source)
            }
        };

        Ok(element.with_name(&def.name))
    }

    fn with_name(self, name: &str) -> Self {
        match self {
            Element::Load(l) => Element::Load(l.with_name(name)),
            Element::Source(s) => Element::Source(s.with_name(name)),
        }
    }

    /// Get the element name.
    pub fn name(&self) -> &str {
        match self {
            Element::Load(l) => &l.name,
            Element::Source(s) => &s.name,
        }
    }
}

/// Resolve the frequency of a reactive load or AC source.
fn element_frequency(def: &ElementDef, default: Option<Frequency>) -> Result<Frequency> {
    if let Some(&f) = def.params.get("freq") {
        return Ok(Frequency::Hertz(f));
    }
    if let Some(&w) = def.params.get("omega") {
        return Ok(Frequency::Angular(w));
    }
    default.ok_or_else(|| {
        MeshworkError::invalid_element(
            &def.name,
            def.line,
            "no frequency given (use freq=, omega= or a .freq directive)",
        )
    })
}
