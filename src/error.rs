//! Error types for the Meshwork network solver.
//!
//! This module provides a unified error type [`MeshworkError`] that covers
//! all error conditions that can occur while parsing a network description,
//! constructing branch elements, validating loop topology, and solving.

use thiserror::Error;

/// Result type alias using [`MeshworkError`].
pub type Result<T> = std::result::Result<T, MeshworkError>;

/// Unified error type for all Meshwork operations.
#[derive(Error, Debug)]
pub enum MeshworkError {
    // ============ Description Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Invalid element definition
    #[error("Invalid element '{name}' at line {line}: {message}")]
    InvalidElement {
        name: String,
        line: usize,
        message: String,
    },

    /// Unknown element type
    #[error("Unknown element type '{element_type}' at line {line}")]
    UnknownElementType { element_type: String, line: usize },

    /// Duplicate element name
    #[error("Duplicate element name '{name}'")]
    DuplicateElement { name: String },

    /// Duplicate loop name
    #[error("Duplicate loop name '{name}'")]
    DuplicateLoop { name: String },

    /// A loop references an element that was never defined
    #[error("Loop '{loop_name}' references undefined element '{name}'")]
    UndefinedElement { name: String, loop_name: String },

    // ============ Construction Errors ============
    /// A load or source was given a value that leaves it undefined
    #[error("Invalid {element}: {message}")]
    InvalidConstruction { element: String, message: String },

    // ============ Topology Errors ============
    /// Invalid loop topology
    #[error("Invalid network topology: {message}")]
    Topology { message: String },

    // ============ Simulation Errors ============
    /// The assembled system has no unique solution
    #[error("Singular system - the network is ill-posed (check for unsourced zero-impedance loops)")]
    SingularSystem,

    /// A handle does not refer to an element of the network
    #[error("No {what} with index {index} in network")]
    ElementNotFound { what: &'static str, index: usize },

    // ============ I/O Errors ============
    /// Error reading a network description file
    #[error("Failed to read network file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a report
    #[error("Output error: {message}")]
    OutputError { message: String },
}

impl MeshworkError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid element error
    pub fn invalid_element(name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidElement {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid construction error
    pub fn invalid_construction(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConstruction {
            element: element.into(),
            message: message.into(),
        }
    }

    /// Create a topology error
    pub fn topology(message: impl Into<String>) -> Self {
        Self::Topology {
            message: message.into(),
        }
    }
}
