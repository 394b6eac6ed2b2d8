//! Property-based tests for the command language and memory documents.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;
use regex::Regex;

use gitmem::core::memory::MemoryDocument;
use gitmem::core::types::{Slug, Symbol, FIBONACCI_DEPTHS, SLUG_PATTERN, SYMBOLS};
use gitmem::dsl::{process, DslError, Params};

/// Text that can sit between double quotes without escaping.
fn quotable() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._,:/-]{1,40}"
}

fn valid_slug() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,30}"
}

fn glyph() -> impl Strategy<Value = &'static str> {
    prop::sample::select(SYMBOLS.to_vec())
}

fn words(count: usize) -> String {
    vec!["w"; count].join(" ")
}

proptest! {
    /// A search without a depth always gets the default of 2.
    #[test]
    fn search_depth_defaults_to_two(query in quotable()) {
        match process(&format!("(search \"{}\")", query)).unwrap() {
            Params::Search { query: q, depth } => {
                prop_assert_eq!(q, query);
                prop_assert_eq!(depth.get(), 2);
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    /// Every Fibonacci depth is accepted by search and history.
    #[test]
    fn fibonacci_depths_accepted(
        query in quotable(),
        depth in prop::sample::select(FIBONACCI_DEPTHS.to_vec()),
    ) {
        let search = process(&format!("(search \"{}\" {})", query, depth)).unwrap();
        prop_assert!(matches!(search, Params::Search { depth: d, .. } if d.get() == depth), "search depth mismatch");

        let history = process(&format!("(history \"memories/\" {})", depth)).unwrap();
        prop_assert!(matches!(history, Params::History { depth: d, .. } if d.get() == depth), "history depth mismatch");
    }

    /// Any other integer is an invalid argument that reports the value.
    #[test]
    fn other_depths_rejected(depth in 0i64..1000) {
        prop_assume!(!FIBONACCI_DEPTHS.iter().any(|&d| i64::from(d) == depth));

        let err = process(&format!("(search \"auth\" {})", depth)).unwrap_err();
        match err {
            DslError::InvalidArgument { value, .. } => {
                prop_assert_eq!(value, Some(serde_json::Value::from(depth)));
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    /// The slug check agrees with the published pattern.
    #[test]
    fn slug_acceptance_matches_pattern(slug in "[a-zA-Z0-9_ -]{1,20}") {
        let pattern = Regex::new(SLUG_PATTERN).unwrap();
        let result = process(&format!("(create 💡 \"{}\" \"body\")", slug));
        if pattern.is_match(&slug) {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result.unwrap_err().kind(), "constraint-violation");
        }
    }

    /// Content below the token limit passes, at or above it fails.
    #[test]
    fn content_token_boundary(count in 0usize..400) {
        let result = process(&format!("(update \"notes\" \"{}\")", words(count)));
        if count < 200 {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result.unwrap_err().kind(), "constraint-violation");
        }
    }

    /// Processing the same text twice gives the same answer.
    #[test]
    fn processing_is_deterministic(input in "[()a-z0-9 \"💡🔄-]{0,30}") {
        prop_assert_eq!(process(&input), process(&input));
    }

    /// A valid create carries its inputs through unchanged.
    #[test]
    fn create_preserves_inputs(
        glyph in glyph(),
        slug in valid_slug(),
        content in quotable(),
    ) {
        let params = process(&format!("(create {} \"{}\" \"{}\")", glyph, slug, content)).unwrap();
        match params {
            Params::Create { symbol, slug: s, content: c } => {
                prop_assert_eq!(symbol.glyph(), glyph);
                prop_assert_eq!(s.as_str(), slug.as_str());
                prop_assert_eq!(c, content);
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    /// A rendered memory parses back to the same header and body.
    #[test]
    fn document_survives_disk_form(
        glyph in glyph(),
        slug in valid_slug(),
        content in "[a-zA-Z0-9 .,\n-]{0,80}",
    ) {
        let symbol = Symbol::from_glyph(glyph).unwrap();
        let doc = MemoryDocument::new(symbol, Slug::new(&slug).unwrap(), content.clone());

        let parsed = MemoryDocument::parse(&doc.render().unwrap()).unwrap();
        prop_assert_eq!(parsed.symbol, symbol);
        prop_assert_eq!(parsed.slug.as_str(), slug.as_str());
        prop_assert_eq!(&parsed.content, &content);
        prop_assert_eq!(parsed, doc);
    }
}
