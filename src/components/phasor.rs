//! Phasor and frequency inputs for branch-element construction.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::{MeshworkError, Result};

/// How a complex quantity is given when constructing an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Representation {
    /// Real and imaginary part.
    Rectangular { re: f64, im: f64 },
    /// Magnitude and phase angle in degrees.
    PolarDegrees { magnitude: f64, angle: f64 },
    /// Magnitude and phase angle in radians.
    PolarRadians { magnitude: f64, angle: f64 },
}

impl Representation {
    /// Shorthand for a purely real quantity.
    pub fn real(value: f64) -> Self {
        Self::Rectangular { re: value, im: 0.0 }
    }

    /// Shorthand for a magnitude at a phase in degrees.
    pub fn polar_degrees(magnitude: f64, angle: f64) -> Self {
        Self::PolarDegrees { magnitude, angle }
    }

    /// Convert to a complex phasor.
    ///
    /// A negative polar magnitude is the same phasor as its absolute value
    /// rotated by half a turn.
    pub fn to_complex(&self) -> Complex64 {
        match *self {
            Self::Rectangular { re, im } => Complex64::new(re, im),
            Self::PolarDegrees { magnitude, angle } => polar(magnitude, angle.to_radians()),
            Self::PolarRadians { magnitude, angle } => polar(magnitude, angle),
        }
    }

    /// Convert to a complex phasor, rejecting NaN and infinite parts.
    pub fn to_finite_complex(&self, element: &str) -> Result<Complex64> {
        let value = self.to_complex();
        if value.re.is_finite() && value.im.is_finite() {
            Ok(value)
        } else {
            Err(MeshworkError::invalid_construction(
                element,
                format!("value {:?} is not finite", self),
            ))
        }
    }
}

fn polar(magnitude: f64, angle: f64) -> Complex64 {
    if magnitude < 0.0 {
        Complex64::from_polar(-magnitude, angle + PI)
    } else {
        Complex64::from_polar(magnitude, angle)
    }
}

/// Operating frequency of a reactive element or an AC source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frequency {
    /// Ordinary frequency in Hz.
    Hertz(f64),
    /// Angular frequency in rad/s.
    Angular(f64),
}

impl Frequency {
    /// Frequency in Hz.
    pub fn hertz(&self) -> f64 {
        match *self {
            Self::Hertz(f) => f,
            Self::Angular(w) => w / (2.0 * PI),
        }
    }

    /// Angular frequency in rad/s.
    pub fn angular(&self) -> f64 {
        match *self {
            Self::Hertz(f) => 2.0 * PI * f,
            Self::Angular(w) => w,
        }
    }

    /// Reject negative and non-finite frequencies.
    pub fn validate(&self, element: &str) -> Result<Self> {
        let w = self.angular();
        if !w.is_finite() || w < 0.0 {
            return Err(MeshworkError::invalid_construction(
                element,
                format!("frequency must be finite and non-negative, got {:?}", self),
            ));
        }
        Ok(*self)
    }
}
