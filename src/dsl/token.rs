//! dsl::token
//!
//! Tokenizer for the command language.
//!
//! The tokenizer never fails. Anything it cannot make sense of (an
//! unterminated string, malformed number text) is passed along for the
//! parser to reject, so there is exactly one place that reports syntax
//! errors.

use crate::core::types::Symbol;

/// Kinds of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// A double-quoted string, escapes already decoded.
    String(String),
    /// Raw numeric text; converted to a value by the parser.
    Number(String),
    /// A bare word.
    Symbol(String),
    /// One of the four symbol glyphs.
    Emoji(String),
}

impl Token {
    /// Short description used in parser diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::LeftParen => "(".to_string(),
            Token::RightParen => ")".to_string(),
            Token::String(s) => format!("\"{}\"", s),
            Token::Number(n) => n.clone(),
            Token::Symbol(s) | Token::Emoji(s) => s.clone(),
        }
    }
}

/// Split input text into tokens.
///
/// Scanning is by `char`, so multi-byte glyphs are never split.
///
/// # Example
///
/// ```
/// use gitmem::dsl::token::{tokenize, Token};
///
/// let tokens = tokenize(r#"(list 💡)"#);
/// assert_eq!(
///     tokens,
///     vec![
///         Token::LeftParen,
///         Token::Symbol("list".into()),
///         Token::Emoji("💡".into()),
///         Token::RightParen,
///     ]
/// );
/// ```
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut chars = input.trim().chars().peekable();
    let mut tokens = Vec::new();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        match c {
            '(' => {
                chars.next();
                tokens.push(Token::LeftParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RightParen);
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                while let Some(ch) = chars.next() {
                    match ch {
                        '"' => break,
                        '\\' => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some('r') => value.push('\r'),
                            Some(other) => value.push(other),
                            None => {}
                        },
                        other => value.push(other),
                    }
                }
                tokens.push(Token::String(value));
            }
            c if starts_number(c, &chars) => {
                let mut text = String::new();
                text.push(c);
                chars.next();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_digit() || ch == '.' {
                        text.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(text));
            }
            c if Symbol::is_glyph_char(c) => {
                chars.next();
                tokens.push(Token::Emoji(c.to_string()));
            }
            _ => {
                let mut word = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() || matches!(ch, '(' | ')' | '"') {
                        break;
                    }
                    word.push(ch);
                    chars.next();
                }
                tokens.push(Token::Symbol(word));
            }
        }
    }

    tokens
}

/// A number starts at a digit, or at `-` directly followed by a digit.
fn starts_number(c: char, chars: &std::iter::Peekable<std::str::Chars<'_>>) -> bool {
    if c.is_ascii_digit() {
        return true;
    }
    if c != '-' {
        return false;
    }
    let mut lookahead = chars.clone();
    lookahead.next();
    matches!(lookahead.peek(), Some(d) if d.is_ascii_digit())
}
