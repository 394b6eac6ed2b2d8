//! End-to-end checks of the command pipeline in check mode.
//!
//! Every case runs the full text -> response path without touching a
//! repository and compares the JSON envelope a caller would receive.

use gitmem::engine::{run, Context};
use serde_json::{json, Value};

fn check(input: &str) -> Value {
    let ctx = Context {
        check: true,
        ..Context::default()
    };
    serde_json::to_value(run(&ctx, input)).unwrap()
}

mod accepted {
    use super::*;

    #[test]
    fn search_defaults_depth() {
        assert_eq!(
            check(r#"(search "auth")"#),
            json!({"success": true, "op": "search", "params": {"query": "auth", "depth": 2}})
        );
    }

    #[test]
    fn create_normalizes_symbol() {
        assert_eq!(
            check(r#"(create 🔄 "retry-policy" "Back off exponentially")"#),
            json!({
                "success": true,
                "op": "create",
                "params": {"symbol": "🔄", "slug": "retry-policy", "content": "Back off exponentially"}
            })
        );
    }

    #[test]
    fn view_update_delete_use_ref() {
        assert_eq!(
            check(r#"(view "memories/pattern/retry-policy.md")"#)["params"],
            json!({"ref": "memories/pattern/retry-policy.md"})
        );
        assert_eq!(
            check(r#"(update "retry-policy" "Cap retries at five")"#)["params"],
            json!({"ref": "retry-policy", "content": "Cap retries at five"})
        );
        assert_eq!(
            check(r#"(delete "retry-policy")"#)["params"],
            json!({"ref": "retry-policy"})
        );
    }

    #[test]
    fn history_and_diff_defaults() {
        assert_eq!(
            check("(history)")["params"],
            json!({"path": "memories/", "depth": 2})
        );
        assert_eq!(
            check(r#"(history "memories/insight/" 13)"#)["params"],
            json!({"path": "memories/insight/", "depth": 13})
        );
        assert_eq!(
            check("(diff)")["params"],
            json!({"from": "HEAD~1", "to": "HEAD"})
        );
        assert_eq!(
            check(r#"(diff "main")"#)["params"],
            json!({"from": "main", "to": "HEAD"})
        );
    }

    #[test]
    fn list_with_and_without_symbol() {
        assert_eq!(
            check("(list)"),
            json!({"success": true, "op": "list", "params": {}})
        );
        assert_eq!(
            check("(list 🌀)"),
            json!({"success": true, "op": "list", "params": {"symbol": "🌀"}})
        );
    }

    #[test]
    fn extra_arguments_are_ignored() {
        assert_eq!(
            check(r#"(view "a" "b" "c")"#)["params"],
            json!({"ref": "a"})
        );
    }

    #[test]
    fn whitespace_is_insignificant() {
        assert_eq!(
            check("  ( search\n\t\"auth\"   3 )  "),
            check(r#"(search "auth" 3)"#)
        );
    }
}

mod rejected {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(
            check(""),
            json!({"success": false, "error": "parse-error", "message": "Unexpected end of input", "position": 0})
        );
    }

    #[test]
    fn unclosed_call() {
        assert_eq!(
            check(r#"(search "test""#),
            json!({"success": false, "error": "parse-error", "message": "Missing closing paren", "position": 3})
        );
    }

    #[test]
    fn trailing_tokens() {
        assert_eq!(
            check(r#"(search "test") extra"#),
            json!({"success": false, "error": "parse-error", "message": "Unexpected tokens after expression", "position": 4})
        );
    }

    #[test]
    fn bare_literal_is_not_a_command() {
        assert_eq!(
            check(r#""just text""#),
            json!({"success": false, "error": "parse-error", "message": "Expected operation"})
        );
    }

    #[test]
    fn unknown_operation() {
        assert_eq!(
            check(r#"(unknown "arg")"#),
            json!({
                "success": false,
                "error": "unknown-operation",
                "operation": "unknown",
                "expected": ["create", "delete", "diff", "history", "list", "search", "update", "view"]
            })
        );
    }

    #[test]
    fn unknown_symbol() {
        assert_eq!(
            check("(list 💀)"),
            json!({
                "success": false,
                "error": "constraint-violation",
                "field": ":symbol",
                "value": "💀",
                "expected": "one of 💡 🔄 🎯 🌀",
                "suggestion": "(list 💡)"
            })
        );
    }

    #[test]
    fn bad_slug() {
        assert_eq!(
            check(r#"(create 💡 "Bad_Slug" "x")"#),
            json!({
                "success": false,
                "error": "constraint-violation",
                "field": ":slug",
                "value": "Bad_Slug",
                "expected": "lowercase letters, digits and hyphens (^[a-z0-9-]+$)",
                "suggestion": "(create 💡 \"my-insight\" \"What I learned today\")"
            })
        );
    }

    #[test]
    fn oversized_content() {
        let content = vec!["word"; 200].join(" ");
        let response = check(&format!(r#"(update "notes" "{}")"#, content));
        assert_eq!(
            response,
            json!({
                "success": false,
                "error": "constraint-violation",
                "field": ":content",
                "value": "200 tokens",
                "expected": "fewer than 200 tokens",
                "suggestion": "(update \"my-insight\" \"Revised understanding\")"
            })
        );
    }

    #[test]
    fn non_fibonacci_depth() {
        assert_eq!(
            check(r#"(search "auth" 4)"#),
            json!({
                "success": false,
                "error": "invalid-argument",
                "message": "search depth must be one of 1, 2, 3, 5, 8, 13, 21, 34",
                "value": 4,
                "suggestion": "(search \"authentication\" 3)"
            })
        );
    }

    #[test]
    fn missing_arguments() {
        let response = check("(create 💡)");
        assert_eq!(response["error"], "invalid-argument");
        assert_eq!(
            response["message"],
            "create requires a symbol, a slug and content"
        );

        let response = check("(search)");
        assert_eq!(response["error"], "invalid-argument");
        assert_eq!(response["suggestion"], "(search \"authentication\" 3)");
    }

    #[test]
    fn wrong_argument_type() {
        let response = check(r#"(history 5)"#);
        assert_eq!(response["error"], "invalid-argument");
        assert_eq!(response["message"], "history path must be a string");
        assert_eq!(response["suggestion"], "(history \"memories/\" 5)");
    }
}

#[test]
fn check_mode_never_opens_a_repository() {
    let ctx = Context {
        check: true,
        cwd: Some("/definitely/not/a/repo".into()),
        ..Context::default()
    };
    let response = run(&ctx, r#"(delete "anything")"#);
    assert!(response.success);
}

#[test]
fn same_input_same_answer() {
    for input in [
        r#"(search "auth")"#,
        "(list 💀)",
        r#"(create 💡 "ok" "fine")"#,
        "(",
    ] {
        assert_eq!(check(input), check(input));
    }
}
