//! Assembly of lexed tokens into a calendar date and time of day.
//!
//! A single pass over the tokens collects up to three date numbers (tagged
//! with what they must be, when the token shape says so) plus an optional
//! time of day; resolution then assigns year/month/day, consulting the
//! day-first flag only for genuinely ambiguous numeric dates.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use super::ParseMode;
use super::lexer::Token;

/// What a numeric token must be, when its shape already says so.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hint {
    Year,
    Month,
    Day,
}

#[derive(Debug, Clone, Copy)]
struct DateNumber {
    value: i64,
    /// Digit count of the source token; distinguishes "03" from "2003".
    width: usize,
    hint: Option<Hint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

#[derive(Debug, Default)]
struct Accum {
    ymd: Vec<DateNumber>,
    time: Option<(u32, u32, u32)>,
    meridiem: Option<Meridiem>,
}

enum Scan {
    Consumed(usize),
    Unrecognized,
}

pub(super) fn assemble(
    tokens: &[Token],
    mode: ParseMode,
    default: Option<NaiveDateTime>,
) -> Option<NaiveDateTime> {
    let mut acc = Accum::default();

    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Number(text) => match scan_number(text, tokens, i, &mut acc) {
                Scan::Consumed(next) => i = next,
                Scan::Unrecognized if mode.fuzzy => i += 1,
                Scan::Unrecognized => return None,
            },
            Token::Word(word) => {
                if !scan_word(&word.to_ascii_lowercase(), &mut acc) && !mode.fuzzy {
                    return None;
                }
                i += 1;
            }
            Token::Sep(_) => i += 1,
        }
    }

    finish(&acc, mode, default)
}

fn scan_number(text: &str, tokens: &[Token], i: usize, acc: &mut Accum) -> Scan {
    let Ok(value) = text.parse::<i64>() else {
        return Scan::Unrecognized;
    };

    // Compact YYYYMMDD, only in date-leading position.
    if text.len() == 8 && acc.ymd.is_empty() {
        if let (Ok(year), Ok(month), Ok(day)) = (
            text[..4].parse::<i64>(),
            text[4..6].parse::<i64>(),
            text[6..8].parse::<i64>(),
        ) {
            acc.ymd.push(DateNumber { value: year, width: 4, hint: Some(Hint::Year) });
            acc.ymd.push(DateNumber { value: month, width: 2, hint: Some(Hint::Month) });
            acc.ymd.push(DateNumber { value: day, width: 2, hint: Some(Hint::Day) });
            return Scan::Consumed(i + 1);
        }
        return Scan::Unrecognized;
    }

    // HH:MM and HH:MM:SS.
    if matches!(tokens.get(i + 1), Some(Token::Sep(':'))) {
        if acc.time.is_some() {
            return Scan::Unrecognized;
        }
        let Some(Token::Number(minute_text)) = tokens.get(i + 2) else {
            return Scan::Unrecognized;
        };
        let Ok(hour) = u32::try_from(value) else {
            return Scan::Unrecognized;
        };
        let Ok(minute) = minute_text.parse::<u32>() else {
            return Scan::Unrecognized;
        };
        if hour > 23 || minute > 59 {
            return Scan::Unrecognized;
        }

        let mut second = 0;
        let mut next = i + 3;
        if matches!(tokens.get(i + 3), Some(Token::Sep(':'))) {
            if let Some(Token::Number(second_text)) = tokens.get(i + 4) {
                match second_text.parse::<u32>() {
                    Ok(s) if s <= 59 => second = s,
                    _ => return Scan::Unrecognized,
                }
                next = i + 5;
            }
        }

        acc.time = Some((hour, minute, second));
        return Scan::Consumed(next);
    }

    // A following word can settle what the number is.
    if let Some(Token::Word(word)) = tokens.get(i + 1) {
        let word = word.to_ascii_lowercase();
        if matches!(word.as_str(), "st" | "nd" | "rd" | "th") {
            acc.ymd.push(DateNumber { value, width: text.len(), hint: Some(Hint::Day) });
            return Scan::Consumed(i + 2);
        }
        if word == "am" || word == "pm" {
            if acc.time.is_some() || !(1..=12).contains(&value) {
                return Scan::Unrecognized;
            }
            acc.time = u32::try_from(value).ok().map(|h| (h, 0, 0));
            acc.meridiem = Some(if word == "am" { Meridiem::Am } else { Meridiem::Pm });
            return Scan::Consumed(i + 2);
        }
    }

    let hint = if text.len() == 4 || value > 31 {
        Some(Hint::Year)
    } else {
        None
    };
    acc.ymd.push(DateNumber { value, width: text.len(), hint });
    Scan::Consumed(i + 1)
}

/// Returns whether the word was recognized; strict mode fails on `false`.
fn scan_word(word: &str, acc: &mut Accum) -> bool {
    if let Some(month) = month_from_name(word) {
        acc.ymd.push(DateNumber {
            value: i64::from(month),
            width: 0,
            hint: Some(Hint::Month),
        });
        return true;
    }
    if word == "am" || word == "pm" {
        if acc.time.is_none() || acc.meridiem.is_some() {
            return false;
        }
        acc.meridiem = Some(if word == "am" { Meridiem::Am } else { Meridiem::Pm });
        return true;
    }
    is_weekday(word) || is_jump_word(word)
}

fn finish(acc: &Accum, mode: ParseMode, default: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    if acc.ymd.is_empty() && acc.time.is_none() {
        return None;
    }
    if acc.ymd.len() > 3 {
        return None;
    }

    let today = Utc::now().date_naive();
    let default = default.unwrap_or_else(|| today.and_time(NaiveTime::MIN));

    let resolved = resolve_ymd(&acc.ymd, mode.dayfirst, today.year())?;

    let year = resolved.year.unwrap_or_else(|| default.year());
    let month = resolved.month.unwrap_or_else(|| default.month());
    let day = resolved
        .day
        .unwrap_or_else(|| default.day().min(days_in_month(year, month)));

    let (hour, minute, second) = match acc.time {
        Some((h, m, s)) => (apply_meridiem(h, acc.meridiem)?, m, s),
        None => (default.hour(), default.minute(), default.second()),
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(NaiveDateTime::new(date, time))
}

#[derive(Debug, Default)]
struct ResolvedDate {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
}

fn resolve_ymd(nums: &[DateNumber], dayfirst: bool, current_year: i32) -> Option<ResolvedDate> {
    let month_hints = nums
        .iter()
        .filter(|n| n.hint == Some(Hint::Month))
        .count();
    if month_hints > 1 {
        return None;
    }

    match *nums {
        [] => Some(ResolvedDate::default()),
        [single] => resolve_single(single, current_year),
        [a, b] => resolve_pair(a, b, dayfirst, current_year),
        [a, b, c] => resolve_triple(a, b, c, dayfirst, current_year),
        _ => None,
    }
}

fn resolve_single(n: DateNumber, current_year: i32) -> Option<ResolvedDate> {
    let mut resolved = ResolvedDate::default();
    match n.hint {
        Some(Hint::Year) => resolved.year = Some(fix_year(n, current_year)?),
        Some(Hint::Month) => resolved.month = Some(small(n)?),
        Some(Hint::Day) | None => resolved.day = Some(small(n)?),
    }
    Some(resolved)
}

fn resolve_pair(
    a: DateNumber,
    b: DateNumber,
    dayfirst: bool,
    current_year: i32,
) -> Option<ResolvedDate> {
    let mut resolved = ResolvedDate::default();

    if a.hint == Some(Hint::Month) || b.hint == Some(Hint::Month) {
        let (month_n, other) = if a.hint == Some(Hint::Month) { (a, b) } else { (b, a) };
        resolved.month = Some(small(month_n)?);
        if other.hint == Some(Hint::Year) {
            resolved.year = Some(fix_year(other, current_year)?);
        } else {
            resolved.day = Some(small(other)?);
        }
        return Some(resolved);
    }

    if a.hint == Some(Hint::Year) || b.hint == Some(Hint::Year) {
        let (year_n, other) = if a.hint == Some(Hint::Year) { (a, b) } else { (b, a) };
        resolved.year = Some(fix_year(year_n, current_year)?);
        if other.hint == Some(Hint::Day) || other.value > 12 {
            resolved.day = Some(small(other)?);
        } else {
            resolved.month = Some(small(other)?);
        }
        return Some(resolved);
    }

    // Two plain numbers: an unambiguous day (>12) wins, otherwise the
    // day-first flag decides the order.
    let (day_n, month_n) = if a.hint == Some(Hint::Day) {
        (a, b)
    } else if b.hint == Some(Hint::Day) {
        (b, a)
    } else if a.value > 12 {
        (a, b)
    } else if b.value > 12 {
        (b, a)
    } else if dayfirst {
        (a, b)
    } else {
        (b, a)
    };
    resolved.day = Some(small(day_n)?);
    resolved.month = Some(small(month_n)?);
    Some(resolved)
}

fn resolve_triple(
    a: DateNumber,
    b: DateNumber,
    c: DateNumber,
    dayfirst: bool,
    current_year: i32,
) -> Option<ResolvedDate> {
    let mut resolved = ResolvedDate::default();
    let nums = [a, b, c];

    if let Some(mi) = nums.iter().position(|n| n.hint == Some(Hint::Month)) {
        resolved.month = Some(small(nums[mi])?);
        let mut others = nums.iter().enumerate().filter(|(idx, _)| *idx != mi);
        let (_, &o1) = others.next()?;
        let (_, &o2) = others.next()?;
        let (year_n, day_n) = if o1.hint == Some(Hint::Year) {
            (o1, o2)
        } else if o2.hint == Some(Hint::Year) || o1.hint == Some(Hint::Day) {
            (o2, o1)
        } else if o2.hint == Some(Hint::Day) {
            (o1, o2)
        } else {
            // Neither is marked; the year trails by convention.
            (o2, o1)
        };
        resolved.year = Some(fix_year(year_n, current_year)?);
        resolved.day = Some(small(day_n)?);
        return Some(resolved);
    }

    // All numeric. A leading four-digit year forces y/m/d.
    if a.hint == Some(Hint::Year) {
        resolved.year = Some(fix_year(a, current_year)?);
        resolved.month = Some(small(b)?);
        resolved.day = Some(small(c)?);
        return Some(resolved);
    }

    let (year_n, d1, d2) = if b.hint == Some(Hint::Year) {
        (b, a, c)
    } else {
        (c, a, b)
    };
    resolved.year = Some(fix_year(year_n, current_year)?);
    let (day_n, month_n) = if d1.hint == Some(Hint::Day) {
        (d1, d2)
    } else if d2.hint == Some(Hint::Day) {
        (d2, d1)
    } else if d1.value > 12 {
        (d1, d2)
    } else if d2.value > 12 {
        (d2, d1)
    } else if dayfirst {
        (d1, d2)
    } else {
        (d2, d1)
    };
    resolved.day = Some(small(day_n)?);
    resolved.month = Some(small(month_n)?);
    Some(resolved)
}

fn small(n: DateNumber) -> Option<u32> {
    u32::try_from(n.value).ok()
}

/// Two-digit years land in the century nearest to the current year.
fn fix_year(n: DateNumber, current_year: i32) -> Option<i32> {
    let value = i32::try_from(n.value).ok()?;
    if n.width > 2 || value >= 100 {
        return Some(value);
    }
    let mut year = value + (current_year / 100) * 100;
    if year >= current_year + 50 {
        year -= 100;
    } else if year < current_year - 50 {
        year += 100;
    }
    Some(year)
}

fn apply_meridiem(hour: u32, meridiem: Option<Meridiem>) -> Option<u32> {
    let Some(meridiem) = meridiem else {
        return Some(hour);
    };
    if !(1..=12).contains(&hour) {
        return None;
    }
    Some(match meridiem {
        Meridiem::Am if hour == 12 => 0,
        Meridiem::Am => hour,
        Meridiem::Pm if hour == 12 => 12,
        Meridiem::Pm => hour + 12,
    })
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(28, |d| d.day())
}

fn month_from_name(word: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];
    if word.len() < 3 {
        return None;
    }
    if word == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|m| *m == word || (word.len() == 3 && m.starts_with(word)))
        .and_then(|idx| u32::try_from(idx + 1).ok())
}

fn is_weekday(word: &str) -> bool {
    matches!(
        word,
        "monday"
            | "mon"
            | "tuesday"
            | "tue"
            | "tues"
            | "wednesday"
            | "wed"
            | "thursday"
            | "thu"
            | "thur"
            | "thurs"
            | "friday"
            | "fri"
            | "saturday"
            | "sat"
            | "sunday"
            | "sun"
    )
}

fn is_jump_word(word: &str) -> bool {
    matches!(
        word,
        "at" | "on" | "and" | "ad" | "m" | "t" | "of" | "st" | "nd" | "rd" | "th" | "the"
    )
}
