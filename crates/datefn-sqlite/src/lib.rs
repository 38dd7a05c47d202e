//! SQLite bindings for the datefn scalar functions.
//!
//! [`register_functions`] installs every function on a
//! [`rusqlite::Connection`]; from then on they are callable from SQL text,
//! once per row, with no shared state. All functions are registered
//! `SQLITE_DETERMINISTIC`: identical arguments always yield identical
//! results within a query.
//!
//! Core errors (`TooManyResults`, `InvalidRule`, `UnparseableDate`) become
//! [`rusqlite::Error::UserFunctionError`], which SQLite reports as a query
//! error; the NULL channel stays a plain SQL NULL.

use datefn_core::{DatefnError, ParseMode, functions};
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Error, Result};

/// Registers all datefn scalar functions on `conn`.
///
/// | Name | Arity |
/// |---|---|
/// | `parse`, `parse_fuzzy`, `parse_dayfirst`, `parse_fuzzy_dayfirst` | 1-2 |
/// | `easter` | 1 |
/// | `rrule`, `rrule_date` | 1-2 |
/// | `dates_between` | 2-3 |
///
/// ## Errors
///
/// Returns any error SQLite reports while registering.
pub fn register_functions(conn: &Connection) -> Result<()> {
    register_parse(conn, "parse", ParseMode { fuzzy: false, dayfirst: false })?;
    register_parse(conn, "parse_fuzzy", ParseMode { fuzzy: true, dayfirst: false })?;
    register_parse(conn, "parse_dayfirst", ParseMode { fuzzy: false, dayfirst: true })?;
    register_parse(conn, "parse_fuzzy_dayfirst", ParseMode { fuzzy: true, dayfirst: true })?;

    conn.create_scalar_function("easter", 1, flags(), |ctx| {
        Ok(functions::easter(year_text(ctx).as_deref()))
    })?;

    for n_arg in [1, 2] {
        conn.create_scalar_function("rrule", n_arg, flags(), |ctx| {
            rrule_value(ctx, false)
        })?;
        conn.create_scalar_function("rrule_date", n_arg, flags(), |ctx| {
            rrule_value(ctx, true)
        })?;
    }

    for n_arg in [2, 3] {
        conn.create_scalar_function("dates_between", n_arg, flags(), dates_between_value)?;
    }

    tracing::debug!("registered datefn scalar functions");
    Ok(())
}

fn register_parse(conn: &Connection, name: &str, mode: ParseMode) -> Result<()> {
    conn.create_scalar_function(name, 1, flags(), move |ctx| {
        let text = opt_text(ctx, 0)?;
        Ok(functions::parse(text.as_deref(), None, mode))
    })?;
    conn.create_scalar_function(name, 2, flags(), move |ctx| {
        let text = opt_text(ctx, 0)?;
        let default = opt_text(ctx, 1)?;
        Ok(functions::parse(text.as_deref(), default.as_deref(), mode))
    })
}

fn flags() -> FunctionFlags {
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC
}

fn opt_text(ctx: &Context<'_>, idx: usize) -> Result<Option<String>> {
    ctx.get::<Option<String>>(idx)
}

/// The easter year arrives as whatever the caller wrote; coerce integers
/// and text to a string and let the digit check decide.
fn year_text(ctx: &Context<'_>) -> Option<String> {
    match ctx.get_raw(0) {
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

fn rrule_value(ctx: &Context<'_>, date_only: bool) -> Result<Option<String>> {
    let rule = opt_text(ctx, 0)?;
    let dtstart = if ctx.len() > 1 { opt_text(ctx, 1)? } else { None };
    let result = if date_only {
        functions::rrule_date(rule.as_deref(), dtstart.as_deref())
    } else {
        functions::rrule(rule.as_deref(), dtstart.as_deref())
    };
    result.map_err(user_error)
}

fn dates_between_value(ctx: &Context<'_>) -> Result<String> {
    let start = opt_text(ctx, 0)?.unwrap_or_default();
    let end = opt_text(ctx, 1)?.unwrap_or_default();
    let inclusive = if ctx.len() > 2 {
        is_truthy(&ctx.get_raw(2))
    } else {
        true
    };
    functions::dates_between(&start, &end, inclusive).map_err(user_error)
}

/// SQL truthiness for the inclusive flag: NULL, 0, 0.0, and '' are falsy.
fn is_truthy(value: &ValueRef<'_>) -> bool {
    match value {
        ValueRef::Null => false,
        ValueRef::Integer(i) => *i != 0,
        ValueRef::Real(f) => *f != 0.0,
        ValueRef::Text(t) => !t.is_empty(),
        ValueRef::Blob(b) => !b.is_empty(),
    }
}

fn user_error(err: DatefnError) -> Error {
    Error::UserFunctionError(Box::new(err))
}
