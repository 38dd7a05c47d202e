//! Bounded recurrence-rule expansion using the `rrule` crate.
//!
//! Rules arrive as iCalendar RRULE text, optionally carrying a DTSTART line;
//! when they don't, the anchor comes from the caller or falls back to the
//! current UTC time (the only place this module reads the ambient clock).
//! Expansion is capped at [`crate::MAX_RESULTS`]: the lazy occurrence
//! sequence is consumed one past the cap so an unbounded rule fails loudly
//! instead of hanging or being silently truncated.

use chrono::{NaiveDateTime, Utc};
use rrule::{RRule, RRuleSet, Tz, Unvalidated};

use crate::MAX_RESULTS;
use crate::error::{DatefnError, DatefnResult};

/// One past the cap, so truncation is detectable without materializing an
/// unbounded sequence.
const PROBE_LIMIT: u16 = MAX_RESULTS as u16 + 1;

/// Expands a recurrence rule into its occurrence timestamps.
///
/// Occurrences are reported as wall-clock naive datetimes, matching the
/// text-serialized form SQL callers see.
///
/// ## Errors
///
/// [`DatefnError::InvalidRule`] when the rule text does not parse or
/// validate; [`DatefnError::TooManyResults`] when the rule describes more
/// than [`crate::MAX_RESULTS`] occurrences.
#[tracing::instrument(skip(dtstart))]
pub fn expand(
    rule_text: &str,
    dtstart: Option<NaiveDateTime>,
) -> DatefnResult<Vec<NaiveDateTime>> {
    let rrule_set = build_rule_set(rule_text, dtstart)?;

    let result = rrule_set.all(PROBE_LIMIT);
    if result.dates.len() > MAX_RESULTS {
        tracing::debug!(limit = MAX_RESULTS, "recurrence expansion hit the cap");
        return Err(DatefnError::TooManyResults {
            limit: MAX_RESULTS,
            input: rule_text.to_string(),
        });
    }

    tracing::trace!(count = result.dates.len(), "expanded recurrence rule");
    Ok(result
        .dates
        .into_iter()
        .map(|dt| dt.naive_local())
        .collect())
}

fn build_rule_set(rule_text: &str, dtstart: Option<NaiveDateTime>) -> DatefnResult<RRuleSet> {
    let invalid = |err: &dyn std::fmt::Display| DatefnError::InvalidRule {
        input: rule_text.to_string(),
        message: err.to_string(),
    };

    if has_dtstart(rule_text) {
        return normalize(rule_text)
            .parse::<RRuleSet>()
            .map_err(|err| invalid(&err));
    }

    let anchor = dtstart
        .unwrap_or_else(|| Utc::now().naive_utc())
        .and_utc()
        .with_timezone(&Tz::UTC);
    let rule = strip_rrule_prefix(rule_text.trim())
        .parse::<RRule<Unvalidated>>()
        .map_err(|err| invalid(&err))?;
    rule.build(anchor).map_err(|err| invalid(&err))
}

fn has_dtstart(rule_text: &str) -> bool {
    rule_text.to_ascii_uppercase().contains("DTSTART")
}

fn strip_rrule_prefix(line: &str) -> &str {
    if line.len() >= 6 && line[..6].eq_ignore_ascii_case("RRULE:") {
        &line[6..]
    } else {
        line
    }
}

/// Rewrites the rule text into the strict grammar the `rrule` crate expects:
/// bare rule lines gain an `RRULE:` prefix and date-only DTSTART values
/// become UTC midnight, keeping expansion independent of the machine zone.
fn normalize(rule_text: &str) -> String {
    const PROPERTIES: [&str; 5] = ["DTSTART", "RRULE", "EXRULE", "RDATE", "EXDATE"];

    rule_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let upper = line.to_ascii_uppercase();
            if upper.starts_with("DTSTART") {
                normalize_dtstart(line)
            } else if PROPERTIES.iter().any(|p| upper.starts_with(p)) {
                line.to_string()
            } else {
                format!("RRULE:{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_dtstart(line: &str) -> String {
    let Some((name, value)) = line.split_once(':') else {
        return line.to_string();
    };
    let value = value.trim();
    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        // Drop a VALUE=DATE parameter when promoting to a full timestamp.
        let name = if name.to_ascii_uppercase().contains("VALUE=DATE") {
            "DTSTART"
        } else {
            name
        };
        format!("{name}:{value}T000000Z")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .expect("valid date")
            .and_hms_opt(0, 0, 0)
            .expect("valid time")
    }

    #[test]
    fn expands_with_embedded_dtstart() {
        let dates = expand("DTSTART:20200101\nFREQ=DAILY;INTERVAL=10;COUNT=5", None)
            .expect("valid rule");
        assert_eq!(
            dates,
            vec![
                dt(2020, 1, 1),
                dt(2020, 1, 11),
                dt(2020, 1, 21),
                dt(2020, 1, 31),
                dt(2020, 2, 10),
            ]
        );
    }

    #[test]
    fn expands_with_external_dtstart() {
        let dates = expand("FREQ=DAILY;INTERVAL=10;COUNT=5", Some(dt(2020, 1, 1)))
            .expect("valid rule");
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[0], dt(2020, 1, 1));
        assert_eq!(dates[4], dt(2020, 2, 10));
    }

    #[test]
    fn unbounded_rule_fails_instead_of_hanging() {
        let err = expand("FREQ=DAILY;INTERVAL=10", Some(dt(2020, 1, 1)))
            .expect_err("unbounded rule must fail");
        match err {
            DatefnError::TooManyResults { limit, input } => {
                assert_eq!(limit, MAX_RESULTS);
                assert_eq!(input, "FREQ=DAILY;INTERVAL=10");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn exactly_at_the_cap_succeeds() {
        let dates = expand("FREQ=DAILY;COUNT=10000", Some(dt(2020, 1, 1)))
            .expect("rule at the cap is allowed");
        assert_eq!(dates.len(), MAX_RESULTS);
    }

    #[test]
    fn invalid_rule_is_an_error() {
        let err = expand("FREQ=NEVERLY", Some(dt(2020, 1, 1))).expect_err("bad frequency");
        assert!(matches!(err, DatefnError::InvalidRule { .. }), "{err}");
    }

    #[test]
    fn normalizes_bare_rule_lines_and_date_only_dtstart() {
        assert_eq!(
            normalize("DTSTART:20200101\nFREQ=DAILY;COUNT=5"),
            "DTSTART:20200101T000000Z\nRRULE:FREQ=DAILY;COUNT=5"
        );
        assert_eq!(
            normalize("DTSTART;VALUE=DATE:20200101\nRRULE:FREQ=DAILY;COUNT=5"),
            "DTSTART:20200101T000000Z\nRRULE:FREQ=DAILY;COUNT=5"
        );
    }
}
