//! Week number checks for billboard images.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static WEEK_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)week\W{0,3}\d+").expect("week pattern is valid"));

/// Finds the first "week <digits>" token in OCR text and returns its number.
pub fn extract_week_number(raw_text: &str) -> Option<u32> {
    let token = WEEK_TOKEN.find(raw_text)?;
    let digits: String = token
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Maps Monday..Friday to 0..4; weekends have no menu.
pub fn weekday_index(date: NaiveDate) -> Option<usize> {
    let index = date.weekday().num_days_from_monday() as usize;
    (index < 5).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_week_number() {
        assert_eq!(extract_week_number("Week 37 menu"), Some(37));
        assert_eq!(extract_week_number("CANTEEN MENU\nWEEK 5\nMonday"), Some(5));
        assert_eq!(extract_week_number("week: 42"), Some(42));
        assert_eq!(extract_week_number("week37"), Some(37));
    }

    #[test]
    fn test_extract_week_number_not_found() {
        assert_eq!(extract_week_number("Canteen menu"), None);
        assert_eq!(extract_week_number("week of the dumpling"), None);
        assert_eq!(extract_week_number(""), None);
    }

    #[test]
    fn test_first_week_token_wins() {
        assert_eq!(extract_week_number("Week 12 ... next week 13"), Some(12));
    }

    #[test]
    fn test_iso_week() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        assert_eq!(iso_week(date), 38);
        // ISO week 1 of 2027 starts on 2027-01-04; Jan 1st belongs to week 53 of 2026.
        let date = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        assert_eq!(iso_week(date), 53);
    }

    #[test]
    fn test_weekday_index() {
        let monday = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        assert_eq!(weekday_index(monday), Some(0));
        let friday = NaiveDate::from_ymd_opt(2026, 9, 18).unwrap();
        assert_eq!(weekday_index(friday), Some(4));
        let saturday = NaiveDate::from_ymd_opt(2026, 9, 19).unwrap();
        assert_eq!(weekday_index(saturday), None);
    }
}
