//! dsl::parser
//!
//! Recursive-descent parser over the token stream.
//!
//! # Grammar
//!
//! ```text
//! expr    := call | literal
//! call    := "(" SYMBOL literal* ")"
//! literal := STRING | NUMBER | EMOJI | SYMBOL
//! ```
//!
//! Calls never nest. Positions in errors are token indices, not character
//! offsets.

use super::ast::{Literal, Node, Number};
use super::error::DslError;
use super::token::{tokenize, Token};

/// Parse input text into a single expression.
///
/// # Example
///
/// ```
/// use gitmem::dsl::ast::{Literal, Node};
/// use gitmem::dsl::parser::parse;
///
/// let node = parse(r#"(view "HEAD")"#).unwrap();
/// assert_eq!(
///     node,
///     Node::Call {
///         operation: "view".into(),
///         arguments: vec![Literal::String("HEAD".into())],
///     }
/// );
/// ```
pub fn parse(input: &str) -> Result<Node, DslError> {
    let tokens = tokenize(input);
    Parser::new(&tokens).parse()
}

/// Cursor over a token slice.
pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse exactly one expression, rejecting anything left over.
    pub fn parse(mut self) -> Result<Node, DslError> {
        let node = self.parse_expr()?;
        if self.pos < self.tokens.len() {
            return Err(self.error("Unexpected tokens after expression"));
        }
        Ok(node)
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> DslError {
        DslError::parse(message, Some(self.pos))
    }

    fn parse_expr(&mut self) -> Result<Node, DslError> {
        match self.peek() {
            None => Err(self.error("Unexpected end of input")),
            Some(Token::LeftParen) => self.parse_call(),
            Some(Token::RightParen) => Err(self.error("Unexpected token: )")),
            Some(_) => self.parse_literal().map(Node::Literal),
        }
    }

    fn parse_call(&mut self) -> Result<Node, DslError> {
        self.bump(); // (

        let operation = match self.peek() {
            Some(Token::Symbol(name)) => {
                self.bump();
                name.clone()
            }
            _ => return Err(self.error("Expected operation name after (")),
        };

        let mut arguments = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error("Missing closing paren")),
                Some(Token::RightParen) => {
                    self.bump();
                    break;
                }
                Some(Token::LeftParen) => {
                    return Err(self.error("Nested expressions are not supported"));
                }
                Some(_) => arguments.push(self.parse_literal()?),
            }
        }

        Ok(Node::Call {
            operation,
            arguments,
        })
    }

    fn parse_literal(&mut self) -> Result<Literal, DslError> {
        let at = self.pos;
        let literal = match self.bump() {
            Some(Token::String(s)) => Literal::String(s.clone()),
            Some(Token::Number(text)) => {
                let number = parse_number(text).ok_or_else(|| {
                    DslError::parse(format!("Invalid number literal: {}", text), Some(at))
                })?;
                Literal::Number(number)
            }
            Some(Token::Emoji(s)) => Literal::Emoji(s.clone()),
            Some(Token::Symbol(s)) => Literal::Symbol(s.clone()),
            Some(other) => {
                return Err(DslError::parse(
                    format!("Unexpected token: {}", other.describe()),
                    Some(at),
                ))
            }
            None => return Err(DslError::parse("Unexpected end of input", Some(at))),
        };
        Ok(literal)
    }
}

/// Convert numeric token text: floats when it contains `.`, integers otherwise.
fn parse_number(text: &str) -> Option<Number> {
    if text.contains('.') {
        text.parse::<f64>().ok().map(Number::Float)
    } else {
        text.parse::<i64>().ok().map(Number::Int)
    }
}
