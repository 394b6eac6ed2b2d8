//! core::memory::store
//!
//! Memory documents on disk.
//!
//! # Architecture
//!
//! Memories are plain files at `memories/<kind>/<slug>.md` in the working
//! tree. The store only touches the filesystem: staging and committing are
//! the executor's job, through the `git` module. A slug is unique across
//! all kinds, so a bare slug is always enough to find a memory.
//!
//! # Example
//!
//! ```ignore
//! use gitmem::core::memory::{MemoryDocument, MemoryStore};
//!
//! let store = MemoryStore::new(&paths);
//! let entry = store.create(&MemoryDocument::new(symbol, slug, "text"))?;
//! for entry in store.list(None)? {
//!     println!("{} {}", entry.symbol, entry.rel_path);
//! }
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::schema::{MemoryDocument, SchemaError};
use crate::core::paths::{GitmemPaths, MEMORY_DIR, MEMORY_EXT};
use crate::core::types::{Slug, Symbol, UtcTimestamp};

/// Errors from memory storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A memory with this slug exists already (in any kind).
    #[error("memory '{slug}' already exists at {path}")]
    AlreadyExists { slug: String, path: String },

    /// Reading or writing a memory file failed.
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A memory file exists but its front matter is malformed.
    #[error("malformed memory '{path}': {source}")]
    Malformed { path: String, source: SchemaError },
}

/// A memory located on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryEntry {
    pub symbol: Symbol,
    pub slug: Slug,
    /// Path relative to the work tree, `/`-separated.
    #[serde(rename = "path")]
    pub rel_path: String,
    #[serde(skip)]
    pub path: PathBuf,
}

/// Filesystem view of the `memories/` tree.
pub struct MemoryStore<'a> {
    paths: &'a GitmemPaths,
}

impl<'a> MemoryStore<'a> {
    pub fn new(paths: &'a GitmemPaths) -> Self {
        Self { paths }
    }

    fn entry(&self, symbol: Symbol, slug: Slug) -> MemoryEntry {
        let path = self.paths.memory_path(symbol, &slug);
        let rel_path = format!(
            "{}/{}/{}.{}",
            MEMORY_DIR,
            symbol.kind(),
            slug,
            MEMORY_EXT
        );
        MemoryEntry {
            symbol,
            slug,
            rel_path,
            path,
        }
    }

    /// Find a memory by slug in any kind directory.
    pub fn find(&self, slug: &Slug) -> Option<MemoryEntry> {
        Symbol::ALL
            .into_iter()
            .map(|symbol| self.entry(symbol, slug.clone()))
            .find(|entry| entry.path.is_file())
    }

    /// Resolve a user reference to a memory.
    ///
    /// Tried in order:
    /// 1. a work-tree path of the form `memories/<kind>/<slug>.md`
    /// 2. a slug, with or without the `.md` suffix
    ///
    /// Returns `None` when neither matches an existing file.
    pub fn resolve(&self, reference: &str) -> Option<MemoryEntry> {
        let reference = reference.trim();

        if let Some(entry) = self
            .paths
            .memory_file(reference)
            .and_then(|path| self.entry_for_path(&path))
        {
            return Some(entry);
        }

        let stem = reference
            .strip_suffix(&format!(".{MEMORY_EXT}"))
            .unwrap_or(reference);
        Slug::new(stem).ok().and_then(|slug| self.find(&slug))
    }

    /// Map an absolute path back to the memory it names, if it is one.
    fn entry_for_path(&self, path: &Path) -> Option<MemoryEntry> {
        let rel = path.strip_prefix(self.paths.memories_dir()).ok()?;
        let mut parts = rel.iter();
        let kind = parts.next()?.to_str()?;
        let file = Path::new(parts.next()?);
        if parts.next().is_some() || file.extension()? != MEMORY_EXT {
            return None;
        }
        let symbol = Symbol::from_kind(kind)?;
        let slug = Slug::new(file.file_stem()?.to_str()?).ok()?;
        let entry = self.entry(symbol, slug);
        entry.path.is_file().then_some(entry)
    }

    /// Write a brand-new memory.
    ///
    /// # Errors
    ///
    /// [`StoreError::AlreadyExists`] if the slug is taken in any kind.
    pub fn create(&self, doc: &MemoryDocument) -> Result<MemoryEntry, StoreError> {
        if let Some(existing) = self.find(&doc.slug) {
            return Err(StoreError::AlreadyExists {
                slug: doc.slug.to_string(),
                path: existing.rel_path,
            });
        }
        let entry = self.entry(doc.symbol, doc.slug.clone());
        write_atomic(&entry.path, &render(&entry, doc)?)?;
        tracing::debug!(path = %entry.rel_path, "wrote new memory");
        Ok(entry)
    }

    /// Raw text of a memory file.
    pub fn read(&self, entry: &MemoryEntry) -> Result<String, StoreError> {
        fs::read_to_string(&entry.path).map_err(|e| StoreError::Io {
            path: entry.path.clone(),
            source: e,
        })
    }

    /// Load a memory as a document.
    ///
    /// A file with no front matter is adopted as bare content: symbol and
    /// slug come from its location and both timestamps are set to now.
    pub fn load(&self, entry: &MemoryEntry) -> Result<MemoryDocument, StoreError> {
        let text = self.read(entry)?;
        match MemoryDocument::parse(&text) {
            Ok(doc) => Ok(doc),
            Err(SchemaError::MissingFrontMatter) => {
                let now = UtcTimestamp::now();
                Ok(MemoryDocument {
                    symbol: entry.symbol,
                    slug: entry.slug.clone(),
                    created: now.clone(),
                    updated: now,
                    content: text,
                })
            }
            Err(source) => Err(StoreError::Malformed {
                path: entry.rel_path.clone(),
                source,
            }),
        }
    }

    /// Replace the body of an existing memory, bumping `updated`.
    pub fn update(&self, entry: &MemoryEntry, content: &str) -> Result<MemoryDocument, StoreError> {
        let mut doc = self.load(entry)?;
        doc.revise(content);
        write_atomic(&entry.path, &render(entry, &doc)?)?;
        tracing::debug!(path = %entry.rel_path, "rewrote memory");
        Ok(doc)
    }

    /// Put back raw text captured by [`MemoryStore::read`].
    pub fn restore(&self, entry: &MemoryEntry, text: &str) -> Result<(), StoreError> {
        write_atomic(&entry.path, text)
    }

    /// Remove a memory file that was never committed.
    pub fn discard(&self, entry: &MemoryEntry) -> Result<(), StoreError> {
        fs::remove_file(&entry.path).map_err(|e| StoreError::Io {
            path: entry.path.clone(),
            source: e,
        })
    }

    /// List memories of one kind, or of all kinds, sorted by kind then slug.
    ///
    /// Files whose name is not `<slug>.md` are skipped.
    pub fn list(&self, symbol: Option<Symbol>) -> Result<Vec<MemoryEntry>, StoreError> {
        let symbols = match symbol {
            Some(symbol) => vec![symbol],
            None => Symbol::ALL.to_vec(),
        };

        let mut entries = Vec::new();
        for symbol in symbols {
            let dir = self.paths.symbol_dir(symbol);
            if !dir.is_dir() {
                continue;
            }
            let read_dir = fs::read_dir(&dir).map_err(|e| StoreError::Io {
                path: dir.clone(),
                source: e,
            })?;

            let mut slugs: Vec<Slug> = Vec::new();
            for item in read_dir {
                let item = item.map_err(|e| StoreError::Io {
                    path: dir.clone(),
                    source: e,
                })?;
                let path = item.path();
                if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(MEMORY_EXT)
                {
                    continue;
                }
                if let Some(slug) = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|s| Slug::new(s).ok())
                {
                    slugs.push(slug);
                }
            }
            slugs.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            entries.extend(slugs.into_iter().map(|slug| self.entry(symbol, slug)));
        }
        Ok(entries)
    }
}

fn render(entry: &MemoryEntry, doc: &MemoryDocument) -> Result<String, StoreError> {
    doc.render().map_err(|source| StoreError::Malformed {
        path: entry.rel_path.clone(),
        source,
    })
}

/// Write via a sibling temp file and rename, creating parent directories.
fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let temp_path = path.with_extension("md.tmp");
    let mut file = fs::File::create(&temp_path).map_err(io_err)?;
    file.write_all(contents.as_bytes()).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    fs::rename(&temp_path, path).map_err(io_err)
}
