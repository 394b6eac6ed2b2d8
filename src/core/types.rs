//! core::types
//!
//! Strong types and constant tables for core domain concepts.
//!
//! # Types
//!
//! - [`Symbol`] - One of the four memory category glyphs
//! - [`Slug`] - Validated memory identifier (`^[a-z0-9-]+$`)
//! - [`Depth`] - Lookback depth drawn from the Fibonacci set
//! - [`Oid`] - Git object identifier (SHA)
//! - [`UtcTimestamp`] - RFC3339 timestamp
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so validated parameters always satisfy the
//! constraints of their operation.
//!
//! # Examples
//!
//! ```
//! use gitmem::core::types::{Depth, Slug, Symbol};
//!
//! let slug = Slug::new("auth-flow-2").unwrap();
//! let depth = Depth::new(8).unwrap();
//! let symbol = Symbol::from_glyph("💡").unwrap();
//!
//! assert_eq!(slug.as_str(), "auth-flow-2");
//! assert_eq!(depth.get(), 8);
//! assert_eq!(symbol, Symbol::Insight);
//!
//! assert!(Slug::new("Not A Slug").is_err());
//! assert!(Depth::new(4).is_err());
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four legal symbol glyphs, in declaration order.
pub const SYMBOLS: [&str; 4] = ["💡", "🔄", "🎯", "🌀"];

/// The legal lookback depths for `search` and `history`.
pub const FIBONACCI_DEPTHS: [u32; 8] = [1, 2, 3, 5, 8, 13, 21, 34];

/// Slug shape: lowercase ASCII letters, digits and hyphens, anchored.
pub const SLUG_PATTERN: &str = "^[a-z0-9-]+$";

/// Content is rejected once it reaches this many whitespace-delimited tokens.
pub const CONTENT_TOKEN_LIMIT: usize = 200;

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(SLUG_PATTERN).unwrap());

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("invalid slug: {0}")]
    InvalidSlug(String),

    #[error("invalid depth: {0}")]
    InvalidDepth(String),

    #[error("invalid object id: {0}")]
    InvalidOid(String),
}

/// Count whitespace-delimited tokens in a string.
///
/// Equivalent to splitting on runs of Unicode whitespace and counting the
/// non-empty pieces.
///
/// ```
/// use gitmem::core::types::token_count;
///
/// assert_eq!(token_count("  one two\tthree\n"), 3);
/// assert_eq!(token_count(""), 0);
/// ```
pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A memory category glyph.
///
/// Each symbol also has an ASCII kind name, used for the directory that
/// holds memories of that category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Symbol {
    /// 💡
    Insight,
    /// 🔄
    Pattern,
    /// 🎯
    Goal,
    /// 🌀
    Exploration,
}

impl Symbol {
    /// All symbols, in the same order as [`SYMBOLS`].
    pub const ALL: [Symbol; 4] = [
        Symbol::Insight,
        Symbol::Pattern,
        Symbol::Goal,
        Symbol::Exploration,
    ];

    /// The emoji glyph for this symbol.
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Insight => SYMBOLS[0],
            Symbol::Pattern => SYMBOLS[1],
            Symbol::Goal => SYMBOLS[2],
            Symbol::Exploration => SYMBOLS[3],
        }
    }

    /// The ASCII kind name for this symbol.
    pub fn kind(self) -> &'static str {
        match self {
            Symbol::Insight => "insight",
            Symbol::Pattern => "pattern",
            Symbol::Goal => "goal",
            Symbol::Exploration => "exploration",
        }
    }

    /// Look up a symbol by its glyph.
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.glyph() == glyph)
    }

    /// Look up a symbol by its ASCII kind name.
    pub fn from_kind(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.kind() == kind)
    }

    /// Whether a single character is one of the symbol glyphs.
    ///
    /// Used by the tokenizer; every glyph is a single code point.
    pub fn is_glyph_char(c: char) -> bool {
        SYMBOLS.iter().any(|g| g.chars().eq(std::iter::once(c)))
    }
}

impl TryFrom<String> for Symbol {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_glyph(&s).ok_or(TypeError::InvalidSymbol(s))
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.glyph().to_string()
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

/// A validated memory slug.
///
/// Slugs must match [`SLUG_PATTERN`]: one or more lowercase ASCII letters,
/// digits or hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Create a new validated slug.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSlug` if the value does not match the slug pattern.
    pub fn new(slug: impl Into<String>) -> Result<Self, TypeError> {
        let slug = slug.into();
        if Self::is_valid(&slug) {
            Ok(Self(slug))
        } else {
            Err(TypeError::InvalidSlug(slug))
        }
    }

    /// Check a candidate against the slug pattern without allocating.
    pub fn is_valid(candidate: &str) -> bool {
        SLUG_RE.is_match(candidate)
    }

    /// Get the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A lookback depth, guaranteed to be one of [`FIBONACCI_DEPTHS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Depth(u32);

impl Depth {
    /// Depth used when a command does not give one.
    pub const DEFAULT: Depth = Depth(2);

    /// Create a validated depth.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidDepth` if `value` is not a Fibonacci depth.
    pub fn new(value: u32) -> Result<Self, TypeError> {
        if FIBONACCI_DEPTHS.contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeError::InvalidDepth(format!(
                "{} is not one of {:?}",
                value, FIBONACCI_DEPTHS
            )))
        }
    }

    /// Get the numeric depth.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Depth {
    type Error = TypeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Depth> for u32 {
    fn from(depth: Depth) -> Self {
        depth.0
    }
}

impl std::fmt::Display for Depth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use gitmem::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a valid hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A UTC timestamp, displayed as RFC3339.
///
/// ```
/// use gitmem::core::types::UtcTimestamp;
///
/// let now = UtcTimestamp::now();
/// let parsed = UtcTimestamp::parse(&now.to_string()).unwrap();
/// assert_eq!(now, parsed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    /// Parse an RFC3339 timestamp, normalizing to UTC.
    pub fn parse(text: &str) -> Option<Self> {
        chrono::DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|dt| Self(dt.with_timezone(&chrono::Utc)))
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
