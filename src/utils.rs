use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

pub const MONTH_CODES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2024-05-03
    "%Y/%m/%d", // 2024/05/03
    "%m/%d/%Y", // 05/03/2024 (month first wins when ambiguous)
    "%d/%m/%Y", // 23/05/2024
    "%d-%m-%Y", // 23-05-2024
    "%d-%b-%Y", // 23-May-2024
    "%d %b %Y", // 23 May 2024
    "%b %d, %Y", // May 23, 2024
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Three-letter code for a 1-based month number.
pub fn month_code(month: u32) -> Option<&'static str> {
    let idx = month.checked_sub(1)? as usize;
    MONTH_CODES.get(idx).copied()
}

/// First month code (in calendar order) that occurs anywhere in `text`,
/// compared case-insensitively. Returns the 1-based month number.
pub fn find_month_code(text: &str) -> Option<u32> {
    let upper = text.to_uppercase();
    MONTH_CODES
        .iter()
        .position(|code| upper.contains(code))
        .map(|idx| idx as u32 + 1)
}

/// Most frequent value. Ties go to the smallest value; empty input has no mode.
pub fn mode<T: Ord>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().map_or(true, |(_, best_count)| count > *best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Parses a date or date-time cell into a calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// Parses an abbreviated-month period such as "Apr-2025" into its month
/// number. The year must be four digits.
pub fn parse_month_year(s: &str) -> Option<u32> {
    let (month, year) = s.trim().split_once('-')?;
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let date = NaiveDate::parse_from_str(&format!("01-{}-{}", month, year), "%d-%b-%Y").ok()?;
    Some(date.month())
}

/// Parses an amount string, handling rupee/dollar symbols, thousands
/// separators and accounting-style negatives: "(100.00)" is -100.
pub fn parse_amount(s: &str) -> Option<f64> {
    let s = s.trim();

    let (is_negative, s) = if s.starts_with('(') && s.ends_with(')') && s.len() >= 2 {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };

    let cleaned: String = s
        .replace("Rs.", "")
        .replace("INR", "")
        .replace(['₹', '$', ',', ' '], "");

    if cleaned.is_empty() {
        return None;
    }

    let value = cleaned.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if is_negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_code() {
        assert_eq!(month_code(1), Some("JAN"));
        assert_eq!(month_code(12), Some("DEC"));
        assert_eq!(month_code(0), None);
        assert_eq!(month_code(13), None);
    }

    #[test]
    fn test_find_month_code() {
        assert_eq!(find_month_code("Sales_MAR_2024.csv"), Some(3));
        assert_eq!(find_month_code("gst_report_august.xlsx"), Some(8));
        assert_eq!(find_month_code("tax_report_2024.csv"), None);

        // Earliest month in the calendar wins, not the earliest position.
        assert_eq!(find_month_code("NOV_to_FEB.csv"), Some(2));

        // Plain substring match, even inside another word.
        assert_eq!(find_month_code("marketplace_export.csv"), Some(3));
    }

    #[test]
    fn test_mode_prefers_smallest_on_tie() {
        assert_eq!(mode(vec![5, 7, 7, 5, 3]), Some(5));
        assert_eq!(mode(vec![9, 9, 2]), Some(9));
        assert_eq!(mode(vec!["Apr-2025", "Mar-2025"]), Some("Apr-2025"));
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let may_23 = NaiveDate::from_ymd_opt(2024, 5, 23).unwrap();
        assert_eq!(parse_date("2024-05-23"), Some(may_23));
        assert_eq!(parse_date("23/05/2024"), Some(may_23));
        assert_eq!(parse_date("05/23/2024"), Some(may_23));
        assert_eq!(parse_date("23-05-2024"), Some(may_23));
        assert_eq!(parse_date("23-May-2024"), Some(may_23));
        assert_eq!(parse_date("May 23, 2024"), Some(may_23));
        assert_eq!(parse_date("2024-05-23 18:04:11"), Some(may_23));
        assert_eq!(parse_date("2024-05-23T18:04:11"), Some(may_23));
        assert_eq!(parse_date("2024-05-23T18:04:11+05:30"), Some(may_23));

        // Ambiguous slash dates are read month first.
        assert_eq!(
            parse_date("03/05/2024"),
            Some(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
        );

        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_month_year() {
        assert_eq!(parse_month_year("Apr-2025"), Some(4));
        assert_eq!(parse_month_year("dec-2024"), Some(12));
        assert_eq!(parse_month_year("Apr-25"), None);
        assert_eq!(parse_month_year("2025-04"), None);
        assert_eq!(parse_month_year("Foo-2025"), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.50"), Some(1234.5));
        assert_eq!(parse_amount("₹ 2,000"), Some(2000.0));
        assert_eq!(parse_amount("Rs. 99.90"), Some(99.9));
        assert_eq!(parse_amount("(150.00)"), Some(-150.0));
        assert_eq!(parse_amount("-42"), Some(-42.0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }
}
