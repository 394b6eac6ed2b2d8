//! dsl::operation
//!
//! The closed set of operations and their validated parameters.

use serde::Serialize;

use crate::core::types::{Depth, Slug, Symbol};

/// Path `history` inspects when none is given.
pub const DEFAULT_HISTORY_PATH: &str = "memories/";

/// Revision `diff` starts from when none is given.
pub const DEFAULT_DIFF_FROM: &str = "HEAD~1";

/// Revision `diff` ends at when none is given.
pub const DEFAULT_DIFF_TO: &str = "HEAD";

/// An operation name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Delete,
    Diff,
    History,
    List,
    Search,
    Update,
    View,
}

impl Operation {
    /// Every operation, sorted by name.
    pub const ALL: [Operation; 8] = [
        Operation::Create,
        Operation::Delete,
        Operation::Diff,
        Operation::History,
        Operation::List,
        Operation::Search,
        Operation::Update,
        Operation::View,
    ];

    /// The operation's name in the command language.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Delete => "delete",
            Operation::Diff => "diff",
            Operation::History => "history",
            Operation::List => "list",
            Operation::Search => "search",
            Operation::Update => "update",
            Operation::View => "view",
        }
    }

    /// Look up an operation by name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// Sorted list of every operation name.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|op| op.as_str()).collect()
    }

    /// A literal example of a correct invocation.
    pub fn suggestion(self) -> &'static str {
        match self {
            Operation::Search => r#"(search "authentication" 3)"#,
            Operation::Create => r#"(create 💡 "my-insight" "What I learned today")"#,
            Operation::View => r#"(view "my-insight")"#,
            Operation::Update => r#"(update "my-insight" "Revised understanding")"#,
            Operation::Delete => r#"(delete "my-insight")"#,
            Operation::History => r#"(history "memories/" 5)"#,
            Operation::Diff => r#"(diff "HEAD~1" "HEAD")"#,
            Operation::List => "(list 💡)",
        }
    }

    /// Whether the operation writes to the repository.
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            Operation::Create | Operation::Update | Operation::Delete
        )
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized parameters of a validated command.
///
/// Every value here already satisfies its operation's constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "params", rename_all = "lowercase")]
pub enum Params {
    Search {
        query: String,
        depth: Depth,
    },
    Create {
        symbol: Symbol,
        slug: Slug,
        content: String,
    },
    View {
        #[serde(rename = "ref")]
        reference: String,
    },
    Update {
        #[serde(rename = "ref")]
        reference: String,
        content: String,
    },
    Delete {
        #[serde(rename = "ref")]
        reference: String,
    },
    History {
        path: String,
        depth: Depth,
    },
    Diff {
        from: String,
        to: String,
    },
    List {
        #[serde(skip_serializing_if = "Option::is_none")]
        symbol: Option<Symbol>,
    },
}

impl Params {
    /// The operation these parameters belong to.
    pub fn operation(&self) -> Operation {
        match self {
            Params::Search { .. } => Operation::Search,
            Params::Create { .. } => Operation::Create,
            Params::View { .. } => Operation::View,
            Params::Update { .. } => Operation::Update,
            Params::Delete { .. } => Operation::Delete,
            Params::History { .. } => Operation::History,
            Params::Diff { .. } => Operation::Diff,
            Params::List { .. } => Operation::List,
        }
    }
}
