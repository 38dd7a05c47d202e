//! Date/time parsing and recurrence helpers for SQL scalar functions.
//!
//! Everything here is pure, synchronous computation over in-memory values:
//! - free-text date parsing with fuzzy and day-first modes ([`parse`])
//! - Gregorian Easter computation ([`easter`])
//! - bounded iCalendar RRULE expansion ([`recur`])
//! - bounded calendar-date range enumeration ([`range`])
//! - the string-in/string-out scalar layer shared by host bindings
//!   ([`functions`])
//!
//! Two failure channels run through the crate: parsing returns `Option`
//! ("no valid value" maps to SQL NULL), while the bounded enumerations
//! return a typed [`error::DatefnError`] that a host must surface as a
//! query error rather than NULL.

pub mod easter;
pub mod error;
pub mod functions;
pub mod parse;
pub mod range;
pub mod recur;

pub use error::{DatefnError, DatefnResult};
pub use parse::ParseMode;

/// Maximum number of items any single enumerated result may contain.
///
/// Recurrence rules without COUNT/UNTIL describe unbounded sequences; the
/// cap substitutes for a cancellation signal by stopping consumption of the
/// lazy sequence and failing loudly instead of truncating.
pub const MAX_RESULTS: usize = 10_000;
