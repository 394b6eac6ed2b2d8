//! core::memory::schema
//!
//! On-disk format of a memory document.
//!
//! A memory is a Markdown file with a small front matter block:
//!
//! ```text
//! ---
//! symbol: 💡
//! slug: my-insight
//! created: 2026-10-19T10:00:00+00:00
//! updated: 2026-10-19T10:00:00+00:00
//! ---
//!
//! What I learned today
//! ```
//!
//! The header is YAML, read and written through serde. Parsing is strict:
//! every key is required, unknown keys are rejected and each value must
//! validate as its type. The body follows one blank line and is kept
//! byte for byte; the file always ends with one extra newline, which
//! parsing removes again.
//!
//! # Example
//!
//! ```
//! use gitmem::core::memory::schema::MemoryDocument;
//! use gitmem::core::types::{Slug, Symbol};
//!
//! let doc = MemoryDocument::new(Symbol::Goal, Slug::new("ship-v1").unwrap(), "Release it");
//! let parsed = MemoryDocument::parse(&doc.render().unwrap()).unwrap();
//! assert_eq!(parsed, doc);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{Slug, Symbol, UtcTimestamp};

const FENCE: &str = "---";

/// Errors from parsing a memory document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("document has no front matter")]
    MissingFrontMatter,

    #[error("front matter is not closed")]
    UnclosedFrontMatter,

    #[error("invalid front matter: {0}")]
    FrontMatter(String),
}

/// The YAML header of a memory file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FrontMatter {
    symbol: Symbol,
    slug: Slug,
    created: UtcTimestamp,
    updated: UtcTimestamp,
}

/// A parsed memory document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDocument {
    pub symbol: Symbol,
    pub slug: Slug,
    pub created: UtcTimestamp,
    pub updated: UtcTimestamp,
    pub content: String,
}

impl MemoryDocument {
    /// A new document stamped with the current time.
    pub fn new(symbol: Symbol, slug: Slug, content: impl Into<String>) -> Self {
        let now = UtcTimestamp::now();
        Self {
            symbol,
            slug,
            created: now.clone(),
            updated: now,
            content: content.into(),
        }
    }

    /// Replace the body and bump `updated`, keeping `created`.
    pub fn revise(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.updated = UtcTimestamp::now();
    }

    fn front_matter(&self) -> FrontMatter {
        FrontMatter {
            symbol: self.symbol,
            slug: self.slug.clone(),
            created: self.created.clone(),
            updated: self.updated.clone(),
        }
    }

    /// Render to the on-disk text form.
    ///
    /// # Errors
    ///
    /// [`SchemaError::FrontMatter`] if the header cannot be serialized.
    pub fn render(&self) -> Result<String, SchemaError> {
        let header = serde_yaml::to_string(&self.front_matter())
            .map_err(|e| SchemaError::FrontMatter(e.to_string()))?;
        Ok(format!("{FENCE}\n{header}{FENCE}\n\n{}\n", self.content))
    }

    /// Parse the on-disk text form.
    ///
    /// # Errors
    ///
    /// [`SchemaError::MissingFrontMatter`] when the text does not open with
    /// a `---` line, [`SchemaError::UnclosedFrontMatter`] when no closing
    /// fence follows, [`SchemaError::FrontMatter`] for a header serde rejects.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let text = text.replace("\r\n", "\n");
        let (header, body) = split_front_matter(&text)?;

        let front: FrontMatter =
            serde_yaml::from_str(header).map_err(|e| SchemaError::FrontMatter(e.to_string()))?;

        let body = body.strip_prefix('\n').unwrap_or(body);
        let body = body.strip_suffix('\n').unwrap_or(body);

        Ok(Self {
            symbol: front.symbol,
            slug: front.slug,
            created: front.created,
            updated: front.updated,
            content: body.to_string(),
        })
    }
}

/// Split `---\n<header>---\n<body>` into header and body.
fn split_front_matter(text: &str) -> Result<(&str, &str), SchemaError> {
    let rest = text
        .strip_prefix(FENCE)
        .and_then(|r| r.strip_prefix('\n'))
        .ok_or(SchemaError::MissingFrontMatter)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches('\n') == FENCE {
            return Ok((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(SchemaError::UnclosedFrontMatter)
}
