//! String-level implementations of the SQL scalar functions.
//!
//! Host bindings (the SQLite adapter, tests) call these with the raw SQL
//! argument values and hand the returned text straight back to the engine.
//! `Option` is the NULL channel; `DatefnResult` errors must surface as
//! query errors.

use chrono::NaiveDateTime;

use crate::error::{DatefnError, DatefnResult};
use crate::parse::{ParseMode, parse_datetime};
use crate::{range, recur};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The `parse`, `parse_fuzzy`, `parse_dayfirst`, and `parse_fuzzy_dayfirst`
/// functions, distinguished by `mode`. The optional `default` timestamp
/// text fills in fields absent from `text`.
#[must_use]
pub fn parse(text: Option<&str>, default: Option<&str>, mode: ParseMode) -> Option<String> {
    let text = text?;
    if text.is_empty() {
        return None;
    }
    let default = match default {
        Some(d) if !d.is_empty() => Some(parse_datetime(d, ParseMode::default(), None)?),
        _ => None,
    };
    parse_datetime(text, mode, default).map(|dt| dt.format(DATETIME_FORMAT).to_string())
}

/// The `easter` function. The year must be a string of ASCII digits;
/// anything else is NULL, never an error.
#[must_use]
pub fn easter(year: Option<&str>) -> Option<String> {
    let year = year?;
    if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    crate::easter::easter(year).map(|d| d.format(DATE_FORMAT).to_string())
}

/// The `rrule` function: occurrences as a JSON array of ISO timestamps.
///
/// ## Errors
///
/// Propagates [`recur::expand`] errors, plus
/// [`DatefnError::UnparseableDate`] for a bad `dtstart` argument.
pub fn rrule(rule: Option<&str>, dtstart: Option<&str>) -> DatefnResult<Option<String>> {
    expand_to_json(rule, dtstart, |dt| dt.format(DATETIME_FORMAT).to_string())
}

/// The `rrule_date` function: occurrences as a JSON array of ISO dates.
///
/// ## Errors
///
/// Same as [`rrule`].
pub fn rrule_date(rule: Option<&str>, dtstart: Option<&str>) -> DatefnResult<Option<String>> {
    expand_to_json(rule, dtstart, |dt| dt.date().format(DATE_FORMAT).to_string())
}

/// The `dates_between` function: a JSON array of ISO dates from `start` up
/// to (and, when `inclusive`, including) `end`.
///
/// ## Errors
///
/// Propagates [`range::dates_between`] errors.
pub fn dates_between(start: &str, end: &str, inclusive: bool) -> DatefnResult<String> {
    let days = range::dates_between(start, end, inclusive)?;
    let items: Vec<String> = days.iter().map(|d| d.format(DATE_FORMAT).to_string()).collect();
    Ok(serde_json::to_string(&items)?)
}

fn expand_to_json(
    rule: Option<&str>,
    dtstart: Option<&str>,
    render: impl Fn(&NaiveDateTime) -> String,
) -> DatefnResult<Option<String>> {
    let Some(rule) = rule.filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let dtstart = match dtstart.filter(|s| !s.is_empty()) {
        Some(s) => Some(
            parse_datetime(s, ParseMode::default(), None).ok_or_else(|| {
                DatefnError::UnparseableDate {
                    input: s.to_string(),
                }
            })?,
        ),
        None => None,
    };
    let occurrences = recur::expand(rule, dtstart)?;
    let items: Vec<String> = occurrences.iter().map(render).collect();
    Ok(Some(serde_json::to_string(&items)?))
}
