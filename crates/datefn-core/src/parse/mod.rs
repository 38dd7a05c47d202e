//! Free-text date/time parsing.
//!
//! Turns strings like `1st october 2009`, `1/2/2020`, or `2020-01-01T10:30:00`
//! into wall-clock timestamps. Two mode flags adjust interpretation: `fuzzy`
//! tolerates non-date words surrounding the date, and `dayfirst` resolves
//! ambiguous numeric dates as day-before-month. Fields absent from the input
//! are filled from a caller-supplied default timestamp (or today at midnight).
//!
//! Failure is always `None`, never an error: the parser feeds the SQL NULL
//! channel, where "could not parse" and "no value" coincide.

mod lexer;
mod parser;

use chrono::NaiveDateTime;

/// Mode flags for [`parse_datetime`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseMode {
    /// Skip unrecognized words instead of failing on them.
    pub fuzzy: bool,
    /// Resolve ambiguous numeric dates as day-before-month.
    pub dayfirst: bool,
}

/// Parses free-form date/time text into a wall-clock timestamp.
///
/// Returns `None` for empty input, for input containing no recognizable
/// date or time component, and for component values that do not form a
/// valid calendar date or time of day.
#[must_use]
pub fn parse_datetime(
    input: &str,
    mode: ParseMode,
    default: Option<NaiveDateTime>,
) -> Option<NaiveDateTime> {
    let result = parser::assemble(&lexer::tokenize(input), mode, default);
    tracing::trace!(input, ?mode, ?result, "parsed date text");
    result
}
