//! Bounded enumeration of calendar dates between two parsed endpoints.

use chrono::NaiveDate;

use crate::MAX_RESULTS;
use crate::error::{DatefnError, DatefnResult};
use crate::parse::{ParseMode, parse_datetime};

/// Enumerates every calendar date from `start_text` up to `end_text`,
/// advancing one day at a time. The end date is included when `inclusive`.
/// A start that is not strictly before the end yields an empty list.
///
/// ## Errors
///
/// [`DatefnError::UnparseableDate`] when either endpoint does not parse;
/// [`DatefnError::TooManyResults`] when the range spans more than
/// [`crate::MAX_RESULTS`] dates.
#[tracing::instrument]
pub fn dates_between(
    start_text: &str,
    end_text: &str,
    inclusive: bool,
) -> DatefnResult<Vec<NaiveDate>> {
    let start = parse_endpoint(start_text)?;
    let end = parse_endpoint(end_text)?;

    if start >= end {
        return Ok(Vec::new());
    }

    let too_many = || DatefnError::TooManyResults {
        limit: MAX_RESULTS,
        input: format!("{start_text} to {end_text}"),
    };

    let mut days = Vec::new();
    let mut current = start;
    while current < end {
        if days.len() >= MAX_RESULTS {
            return Err(too_many());
        }
        days.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    if inclusive {
        if days.len() >= MAX_RESULTS {
            return Err(too_many());
        }
        days.push(end);
    }

    Ok(days)
}

fn parse_endpoint(text: &str) -> DatefnResult<NaiveDate> {
    parse_datetime(text, ParseMode::default(), None)
        .map(|dt| dt.date())
        .ok_or_else(|| DatefnError::UnparseableDate {
            input: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn inclusive_range_includes_the_end() {
        let days = dates_between("1 january 2020", "5 jan 2020", true).expect("valid range");
        assert_eq!(
            days,
            vec![
                date(2020, 1, 1),
                date(2020, 1, 2),
                date(2020, 1, 3),
                date(2020, 1, 4),
                date(2020, 1, 5),
            ]
        );
    }

    #[test]
    fn exclusive_range_stops_before_the_end() {
        let days = dates_between("1 january 2020", "5 jan 2020", false).expect("valid range");
        assert_eq!(days.len(), 4);
        assert_eq!(days.last(), Some(&date(2020, 1, 4)));
    }

    #[test]
    fn start_not_strictly_before_end_is_empty() {
        assert!(
            dates_between("5 jan 2020", "5 jan 2020", true)
                .expect("equal endpoints")
                .is_empty()
        );
        assert!(
            dates_between("6 jan 2020", "5 jan 2020", true)
                .expect("reversed endpoints")
                .is_empty()
        );
    }

    #[test]
    fn time_of_day_is_discarded() {
        let days = dates_between("2020-01-01T23:59:00", "2020-01-02T00:01:00", false)
            .expect("valid range");
        assert_eq!(days, vec![date(2020, 1, 1)]);
    }

    #[test]
    fn over_the_cap_is_an_error() {
        let err = dates_between("1 jan 1900", "1 jan 2000", true).expect_err("century of days");
        match err {
            DatefnError::TooManyResults { limit, input } => {
                assert_eq!(limit, MAX_RESULTS);
                assert!(input.contains("1 jan 1900"), "{input}");
                assert!(input.contains("1 jan 2000"), "{input}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparseable_endpoint_is_an_error() {
        let err = dates_between("junk", "5 jan 2020", true).expect_err("bad start");
        assert!(matches!(err, DatefnError::UnparseableDate { .. }), "{err}");
    }
}
