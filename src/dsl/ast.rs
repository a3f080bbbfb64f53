//! Abstract Syntax Tree types for the network description language.

use std::collections::HashMap;

use crate::components::Frequency;

/// Complete AST representation of a parsed network.
#[derive(Debug, Clone)]
pub struct NetworkAst {
    /// All element definitions, in file order
    pub elements: Vec<ElementDef>,
    /// All loop definitions, in file order (defines unknown order)
    pub loops: Vec<LoopDef>,
    /// Network-wide frequency from `.freq` or `.omega`
    pub frequency: Option<Frequency>,
}

impl NetworkAst {
    /// Create a new empty network AST.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            loops: Vec::new(),
            frequency: None,
        }
    }
}

impl Default for NetworkAst {
    fn default() -> Self {
        Self::new()
    }
}

/// An element definition from the description.
#[derive(Debug, Clone)]
pub struct ElementDef {
    /// Element type (R, L, C, Z, V, I)
    pub element_type: ElementType,
    /// Unique element name
    pub name: String,
    /// Positional numeric values
    pub values: Vec<f64>,
    /// DC/AC keyword for sources
    pub source_type: Option<SourceType>,
    /// Values are magnitude and angle (degrees) instead of real and imaginary
    pub polar: bool,
    /// Additional `key=value` parameters
    pub params: HashMap<String, f64>,
    /// Source line number for error reporting
    pub line: usize,
}

impl ElementDef {
    /// Positional value at `index`, if given.
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}

/// Element types supported by the description language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// Resistor
    Resistor,
    /// Inductor
    Inductor,
    /// Capacitor
    Capacitor,
    /// Fixed impedance
    Impedance,
    /// Voltage source
    VoltageSource,
    /// Current source
    CurrentSource,
}

impl ElementType {
    /// Parse an element type from its name prefix.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix.to_ascii_uppercase() {
            'R' => Some(Self::Resistor),
            'L' => Some(Self::Inductor),
            'C' => Some(Self::Capacitor),
            'Z' => Some(Self::Impedance),
            'V' => Some(Self::VoltageSource),
            'I' => Some(Self::CurrentSource),
            _ => None,
        }
    }

    /// Whether this element is a source (and takes a DC/AC keyword).
    pub fn is_source(&self) -> bool {
        matches!(self, Self::VoltageSource | Self::CurrentSource)
    }
}

/// Source waveform keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// Constant value
    Dc,
    /// Sinusoid given as amplitude and phase
    Ac,
}

impl SourceType {
    /// Parse a source type keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "DC" => Some(Self::Dc),
            "AC" => Some(Self::Ac),
            _ => None,
        }
    }
}

/// A `.loop` (or `.mesh`) definition.
#[derive(Debug, Clone)]
pub struct LoopDef {
    /// Loop name
    pub name: String,
    /// Names of the member elements, in order
    pub elements: Vec<String>,
    /// Source line number
    pub line: usize,
}
