//! dsl::validate
//!
//! Per-operation argument checkers.
//!
//! Each checker walks its arguments in a fixed order and stops at the first
//! failed check. Successful checks produce [`Params`] whose values already
//! satisfy every constraint, so the executor never re-validates.

use serde_json::Value;

use super::ast::{Literal, Node};
use super::error::DslError;
use super::operation::{
    Operation, Params, DEFAULT_DIFF_FROM, DEFAULT_DIFF_TO, DEFAULT_HISTORY_PATH,
};
use crate::core::types::{
    token_count, Depth, Slug, Symbol, CONTENT_TOKEN_LIMIT, FIBONACCI_DEPTHS, SLUG_PATTERN, SYMBOLS,
};

/// Validate a parsed expression into command parameters.
///
/// # Example
///
/// ```
/// use gitmem::dsl::{parser::parse, validate::validate, Params};
///
/// let node = parse(r#"(search "auth")"#).unwrap();
/// match validate(&node).unwrap() {
///     Params::Search { query, depth } => {
///         assert_eq!(query, "auth");
///         assert_eq!(depth.get(), 2);
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub fn validate(node: &Node) -> Result<Params, DslError> {
    let (name, args) = match node {
        Node::Call {
            operation,
            arguments,
        } => (operation, arguments.as_slice()),
        Node::Literal(_) => return Err(DslError::parse("Expected operation", None)),
    };

    let op = Operation::from_name(name).ok_or_else(|| DslError::UnknownOperation {
        operation: name.clone(),
        expected: Operation::names(),
    })?;

    match op {
        Operation::Search => check_search(args),
        Operation::Create => check_create(args),
        Operation::View => check_view(args),
        Operation::Update => check_update(args),
        Operation::Delete => check_delete(args),
        Operation::History => check_history(args),
        Operation::Diff => check_diff(args),
        Operation::List => check_list(args),
    }
}

fn check_search(args: &[Literal]) -> Result<Params, DslError> {
    let hint = Operation::Search.suggestion();

    let query = args
        .first()
        .and_then(Literal::as_string)
        .ok_or_else(|| DslError::invalid("search requires a query string", hint))?;
    if query.is_empty() {
        return Err(DslError::invalid("search query cannot be empty", hint));
    }
    let depth = optional_depth("search", args.get(1), hint)?;

    Ok(Params::Search {
        query: query.to_string(),
        depth,
    })
}

fn check_create(args: &[Literal]) -> Result<Params, DslError> {
    let hint = Operation::Create.suggestion();

    if args.len() < 3 {
        return Err(DslError::invalid(
            "create requires a symbol, a slug and content",
            hint,
        ));
    }
    let symbol = symbol_arg(&args[0], hint)?;

    let slug = args[1]
        .as_string()
        .ok_or_else(|| DslError::invalid("create slug must be a string", hint))?;
    let slug = Slug::new(slug).map_err(|_| {
        DslError::constraint(
            ":slug",
            slug,
            format!("lowercase letters, digits and hyphens ({})", SLUG_PATTERN),
            hint,
        )
    })?;

    let content = args[2]
        .as_string()
        .ok_or_else(|| DslError::invalid("create content must be a string", hint))?;
    check_content(content, hint)?;

    Ok(Params::Create {
        symbol,
        slug,
        content: content.to_string(),
    })
}

fn check_view(args: &[Literal]) -> Result<Params, DslError> {
    let reference = required_string(args, 0, "view requires a ref string", Operation::View)?;
    Ok(Params::View {
        reference: reference.to_string(),
    })
}

fn check_update(args: &[Literal]) -> Result<Params, DslError> {
    let hint = Operation::Update.suggestion();

    if args.len() < 2 {
        return Err(DslError::invalid("update requires a ref and content", hint));
    }
    let reference = required_string(args, 0, "update ref must be a string", Operation::Update)?;
    let content = required_string(
        args,
        1,
        "update content must be a string",
        Operation::Update,
    )?;
    check_content(content, hint)?;

    Ok(Params::Update {
        reference: reference.to_string(),
        content: content.to_string(),
    })
}

fn check_delete(args: &[Literal]) -> Result<Params, DslError> {
    let reference = required_string(args, 0, "delete requires a ref string", Operation::Delete)?;
    Ok(Params::Delete {
        reference: reference.to_string(),
    })
}

fn check_history(args: &[Literal]) -> Result<Params, DslError> {
    let hint = Operation::History.suggestion();

    let path = optional_string(args.first(), "history path must be a string", hint)?
        .unwrap_or(DEFAULT_HISTORY_PATH);
    let depth = optional_depth("history", args.get(1), hint)?;

    Ok(Params::History {
        path: path.to_string(),
        depth,
    })
}

fn check_diff(args: &[Literal]) -> Result<Params, DslError> {
    let hint = Operation::Diff.suggestion();

    let from = optional_string(args.first(), "diff from must be a string", hint)?
        .unwrap_or(DEFAULT_DIFF_FROM);
    let to =
        optional_string(args.get(1), "diff to must be a string", hint)?.unwrap_or(DEFAULT_DIFF_TO);

    Ok(Params::Diff {
        from: from.to_string(),
        to: to.to_string(),
    })
}

fn check_list(args: &[Literal]) -> Result<Params, DslError> {
    let symbol = args
        .first()
        .map(|arg| symbol_arg(arg, Operation::List.suggestion()))
        .transpose()?;
    Ok(Params::List { symbol })
}

fn required_string<'a>(
    args: &'a [Literal],
    index: usize,
    message: &str,
    op: Operation,
) -> Result<&'a str, DslError> {
    args.get(index)
        .and_then(Literal::as_string)
        .ok_or_else(|| DslError::invalid(message, op.suggestion()))
}

/// An absent argument is fine; a present one must be a string.
fn optional_string<'a>(
    arg: Option<&'a Literal>,
    message: &str,
    hint: &'static str,
) -> Result<Option<&'a str>, DslError> {
    match arg {
        None => Ok(None),
        Some(lit) => lit
            .as_string()
            .map(Some)
            .ok_or_else(|| DslError::invalid(message, hint)),
    }
}

/// An absent depth defaults; a present one must be a Fibonacci depth.
fn optional_depth(
    op_name: &str,
    arg: Option<&Literal>,
    hint: &'static str,
) -> Result<Depth, DslError> {
    let Some(arg) = arg else {
        return Ok(Depth::DEFAULT);
    };
    let number = arg
        .as_number()
        .ok_or_else(|| DslError::invalid(format!("{} depth must be a number", op_name), hint))?;

    number
        .as_u32()
        .and_then(|n| Depth::new(n).ok())
        .ok_or_else(|| {
            DslError::invalid_value(
                format!(
                    "{} depth must be one of {}",
                    op_name,
                    FIBONACCI_DEPTHS
                        .iter()
                        .map(u32::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                number,
                hint,
            )
        })
}

fn symbol_arg(arg: &Literal, hint: &'static str) -> Result<Symbol, DslError> {
    arg.text().and_then(Symbol::from_glyph).ok_or_else(|| {
        DslError::constraint(
            ":symbol",
            Value::from(arg),
            format!("one of {}", SYMBOLS.join(" ")),
            hint,
        )
    })
}

fn check_content(content: &str, hint: &'static str) -> Result<(), DslError> {
    let count = token_count(content);
    if count >= CONTENT_TOKEN_LIMIT {
        return Err(DslError::constraint(
            ":content",
            format!("{} tokens", count),
            format!("fewer than {} tokens", CONTENT_TOKEN_LIMIT),
            hint,
        ));
    }
    Ok(())
}
