//! dsl::ast
//!
//! Syntax tree for the command language.
//!
//! The grammar has exactly one level of nesting: a call applies an
//! operation name to a flat list of literals. A bare literal is also a
//! complete parse, but only a [`Node::Call`] can be validated into a command.

use serde::Serialize;

/// A numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// The value as an unsigned integer, if it is integral and in range.
    ///
    /// `3.0` converts to `3`; `3.5`, `-1` and non-finite values do not convert.
    pub fn as_u32(self) -> Option<u32> {
        match self {
            Number::Int(i) => u32::try_from(i).ok(),
            Number::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 {
                    Some(f as u32)
                } else {
                    None
                }
            }
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

/// A primitive value appearing as an argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    /// A double-quoted string.
    String(String),
    /// An integer or float.
    Number(Number),
    /// One of the symbol glyphs.
    Emoji(String),
    /// A bare word.
    Symbol(String),
}

impl Literal {
    /// The string payload, only for quoted strings.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric payload, only for numbers.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Literal::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Any textual payload: strings, glyphs and bare words.
    pub fn text(&self) -> Option<&str> {
        match self {
            Literal::String(s) | Literal::Emoji(s) | Literal::Symbol(s) => Some(s),
            Literal::Number(_) => None,
        }
    }
}

impl From<Number> for serde_json::Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Int(i) => serde_json::Value::from(i),
            Number::Float(f) => serde_json::Value::from(f),
        }
    }
}

impl From<&Literal> for serde_json::Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Number(n) => (*n).into(),
            Literal::String(s) | Literal::Emoji(s) | Literal::Symbol(s) => {
                serde_json::Value::from(s.as_str())
            }
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Emoji(s) | Literal::Symbol(s) => f.write_str(s),
        }
    }
}

/// A parsed expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Literal(Literal),
    Call {
        operation: String,
        arguments: Vec<Literal>,
    },
}

impl std::fmt::Display for Node {
    /// Renders the node back to source form.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Literal(lit) => write!(f, "{}", lit),
            Node::Call {
                operation,
                arguments,
            } => {
                write!(f, "({}", operation)?;
                for arg in arguments {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
