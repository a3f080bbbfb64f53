//! Description language parser for mesh networks.
//!
//! This module provides a SPICE-inspired text format for describing a
//! network as a set of branch elements and the loops that contain them.
//! The format is line-oriented and human-editable.
//!
//! # Grammar Overview
//!
//! ```text
//! network     = { line }
//! line        = comment | directive | element | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = ".freq" value | ".omega" value | (".loop" | ".mesh") name { name }
//! element     = name [source_type | "POLAR"] value+ { param }
//! source_type = "DC" | "AC"
//! param       = identifier '=' value
//!
//! value       = number [unit_suffix]
//! number      = ['-'|'+'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! name        = (letter | '_') { letter | digit | '_' }
//! ```
//!
//! # Element Types
//!
//! The first letter of the name selects the type.
//!
//! | Type | Description | Syntax |
//! |------|-------------|--------|
//! | R | Resistor | `R<name> <ohms>` |
//! | L | Inductor | `L<name> <henries>` |
//! | C | Capacitor | `C<name> <farads>` |
//! | Z | Impedance | `Z<name> <re> [im]` or `Z<name> POLAR <mag> <deg>` |
//! | V | Voltage Source | `V<name> DC <value>` or `V<name> AC <amplitude> [phase_deg]` |
//! | I | Current Source | `I<name> DC <value>` or `I<name> AC <amplitude> [phase_deg]` |
//!
//! Sources accept `rs=` and `xs=` (internal resistance and reactance) and
//! `freq=` (Hz) or `omega=` (rad/s). Reactive loads accept the same
//! frequency parameters and otherwise use the `.freq` directive.
//!
//! # Example
//!
//! ```text
//! # Two loops sharing an inductor
//! .freq 60
//!
//! V1 AC 100 0
//! R1 10
//! L1 20m
//! C1 100u
//!
//! .loop M1 V1 R1 L1
//! .loop M2 L1 C1
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a network description string into an AST.
pub fn parse(input: &str) -> Result<NetworkAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a network description file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<NetworkAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::MeshworkError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
