//! Gregorian Easter computation (Butcher/Meeus computus).

use chrono::NaiveDate;

/// Returns the date of Western (Gregorian) Easter Sunday for `year`.
///
/// `None` when the year is non-positive or the computed date cannot be
/// represented.
#[must_use]
pub fn easter(year: i32) -> Option<NaiveDate> {
    if year < 1 {
        return None;
    }

    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn known_easter_dates() {
        assert_eq!(easter(2000), Some(date(2000, 4, 23)));
        assert_eq!(easter(2020), Some(date(2020, 4, 12)));
        assert_eq!(easter(2021), Some(date(2021, 4, 4)));
        assert_eq!(easter(2024), Some(date(2024, 3, 31)));
        assert_eq!(easter(2026), Some(date(2026, 4, 5)));
    }

    #[test]
    fn rejects_non_positive_years() {
        assert_eq!(easter(0), None);
        assert_eq!(easter(-44), None);
    }
}
