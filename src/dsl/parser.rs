//! Parser for the network description language.

use std::collections::HashMap;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::components::Frequency;
use crate::error::{MeshworkError, Result};

/// Parser for network descriptions.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire network description.
    pub fn parse(&mut self) -> Result<NetworkAst> {
        let mut ast = NetworkAst::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let element = self.parse_element()?;
                    ast.elements.push(element);
                }
                _ => {
                    return Err(MeshworkError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(MeshworkError::parse(
                        self.current.line,
                        format!("unexpected trailing token: {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(MeshworkError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn expect_number(&mut self) -> Result<f64> {
        let tok = self.expect(TokenKind::Number)?;
        parse_value(&tok.text)
            .ok_or_else(|| MeshworkError::parse(tok.line, format!("invalid number: {}", tok.text)))
    }

    fn at_line_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn parse_directive(&mut self, ast: &mut NetworkAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".freq" | ".frequency" => {
                ast.frequency = Some(Frequency::Hertz(self.expect_number()?));
            }
            ".omega" => {
                ast.frequency = Some(Frequency::Angular(self.expect_number()?));
            }
            ".loop" | ".mesh" => {
                let name = self.expect(TokenKind::Identifier)?.text;
                let mut elements = Vec::new();
                while !self.at_line_end() {
                    elements.push(self.expect(TokenKind::Identifier)?.text);
                }
                ast.loops.push(LoopDef {
                    name,
                    elements,
                    line,
                });
            }
            _ => {
                return Err(MeshworkError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    fn parse_element(&mut self) -> Result<ElementDef> {
        let name = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let first_char = name.chars().next().unwrap_or('?');
        let element_type = ElementType::from_prefix(first_char).ok_or_else(|| {
            MeshworkError::UnknownElementType {
                element_type: name.clone(),
                line,
            }
        })?;

        let mut values = Vec::new();
        let mut source_type = None;
        let mut polar = false;
        let mut params = HashMap::new();

        while !self.at_line_end() {
            match self.current.kind {
                TokenKind::Number => values.push(self.expect_number()?),
                TokenKind::Identifier => {
                    let word = self.current.text.clone();
                    self.advance()?;

                    // Check for param=value syntax
                    if self.current.kind == TokenKind::Equals {
                        self.advance()?;
                        let value = self.expect_number()?;
                        params.insert(word.to_lowercase(), value);
                        continue;
                    }

                    if let Some(st) = SourceType::from_keyword(&word).filter(|_| element_type.is_source()) {
                        source_type = Some(st);
                    } else if word.eq_ignore_ascii_case("POLAR") && element_type == ElementType::Impedance {
                        polar = true;
                    } else {
                        return Err(MeshworkError::invalid_element(
                            &name,
                            line,
                            format!("unexpected word '{}'", word),
                        ));
                    }
                }
                _ => {
                    return Err(MeshworkError::parse(
                        line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }
        }

        if values.is_empty() {
            return Err(MeshworkError::invalid_element(&name, line, "missing value"));
        }

        Ok(ElementDef {
            element_type,
            name,
            values,
            source_type,
            polar,
            params,
            line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_resistor() {
        let ast = super::super::parse("R1 10k").unwrap();
        assert_eq!(ast.elements.len(), 1);
        assert_eq!(ast.elements[0].element_type, ElementType::Resistor);
        assert_eq!(ast.elements[0].name, "R1");
        assert_relative_eq!(ast.elements[0].values[0], 10_000.0);
    }

    #[test]
    fn test_parse_ac_source_with_params() {
        let ast = super::super::parse("V1 AC 100 -30 freq=60 rs=0.5").unwrap();
        let v = &ast.elements[0];
        assert_eq!(v.element_type, ElementType::VoltageSource);
        assert_eq!(v.source_type, Some(SourceType::Ac));
        assert_eq!(v.values, vec![100.0, -30.0]);
        assert_relative_eq!(v.params["freq"], 60.0);
        assert_relative_eq!(v.params["rs"], 0.5);
    }

    #[test]
    fn test_parse_polar_impedance() {
        let ast = super::super::parse("Z2 POLAR 5 53.13").unwrap();
        assert!(ast.elements[0].polar);
        assert_eq!(ast.elements[0].values, vec![5.0, 53.13]);
    }

    #[test]
    fn test_parse_loops_and_frequency() {
        let input = ".freq 50\nR1 1\nR2 2\n.loop M1 R1 R2\n.mesh M2 R2\n";
        let ast = super::super::parse(input).unwrap();
        assert_relative_eq!(ast.frequency.unwrap().hertz(), 50.0);
        assert_eq!(ast.loops.len(), 2);
        assert_eq!(ast.loops[0].name, "M1");
        assert_eq!(ast.loops[0].elements, vec!["R1", "R2"]);
        assert_eq!(ast.loops[1].elements, vec!["R2"]);
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "# A comment\nR1 1k ; inline comment style\n";
        let ast = super::super::parse(input).unwrap();
        assert_eq!(ast.elements.len(), 1);
    }

    #[test]
    fn test_unknown_element_type() {
        let err = super::super::parse("Q1 10").unwrap_err();
        assert!(matches!(err, MeshworkError::UnknownElementType { line: 1, .. }));
    }

    #[test]
    fn test_unknown_directive() {
        let err = super::super::parse(".model X").unwrap_err();
        assert!(matches!(err, MeshworkError::ParseError { .. }));
    }

    #[test]
    fn test_missing_value() {
        let err = super::super::parse("R1\n").unwrap_err();
        assert!(matches!(err, MeshworkError::InvalidElement { .. }));
    }
}
