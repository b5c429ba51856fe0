use chrono::{Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Fallback period when a sheet carries no parseable month anywhere.
pub const SENTINEL_MONTH: &str = "01/1970";
/// Fallback date for the same situation in day-resolution fields.
pub const SENTINEL_US_DATE: &str = "01/01/1970";

static US_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}(\s+\d{1,2}:\d{2}:\d{2})?$").unwrap()
});
static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap());
static MONTH_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)FOR\s+THE\s+(?:MONTH(?:\s+OF)?|QUARTER\s+ENDING)[:\s]*([A-Za-z]+)\s*,?\s*(\d{4})").unwrap()
});
static BARE_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)\s*,?\s*(\d{4})$").unwrap());
static MM_YYYY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{4})$").unwrap());

/// Month-name lookup, case-insensitive, 3-letter abbreviations accepted
/// ("SEPT" included because the templates use it).
pub fn month_number(word: &str) -> Option<u32> {
    match word.to_ascii_uppercase().as_str() {
        "JANUARY" | "JAN" => Some(1),
        "FEBRUARY" | "FEB" => Some(2),
        "MARCH" | "MAR" => Some(3),
        "APRIL" | "APR" => Some(4),
        "MAY" => Some(5),
        "JUNE" | "JUN" => Some(6),
        "JULY" | "JUL" => Some(7),
        "AUGUST" | "AUG" => Some(8),
        "SEPTEMBER" | "SEP" | "SEPT" => Some(9),
        "OCTOBER" | "OCT" => Some(10),
        "NOVEMBER" | "NOV" => Some(11),
        "DECEMBER" | "DEC" => Some(12),
        _ => None,
    }
}

/// Excel serial day → calendar date. Day 25569 is 1970-01-01.
fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    let days = serial.trunc() as i64 - 25569;
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(Duration::days(days))
}

/// True when a cell can open or continue a detail table: an Excel serial
/// number, a US-style date (optionally with a time), or an ISO date.
pub fn is_date_token(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    if s.parse::<f64>().is_ok() {
        return true; // Excel serial
    }
    US_DATE_RE.is_match(s) || ISO_DATE_RE.is_match(s)
}

fn parse_loose_date(s: &str) -> Option<NaiveDate> {
    for fmt in ["%m/%d/%Y", "%m/%d/%y", "%Y-%m-%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%m/%d/%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Normalize a date cell to `MM/DD/YYYY`, accepting Excel serials and the
/// usual free-text spellings. Unparseable input yields the sentinel date.
pub fn us_date(raw: &str) -> String {
    let s = raw.trim();
    if let Ok(serial) = s.parse::<f64>() {
        if let Some(d) = excel_serial_date(serial) {
            return d.format("%m/%d/%Y").to_string();
        }
    }
    match parse_loose_date(s) {
        Some(d) => d.format("%m/%d/%Y").to_string(),
        None => SENTINEL_US_DATE.to_string(),
    }
}

/// Normalize a reporting-period cell to `MM/YYYY`.
///
/// Accepted spellings, in precedence order:
///  1. Excel serial number
///  2. "FOR THE MONTH OF <Month>, <Year>" / "FOR THE QUARTER ENDING <Month>, <Year>"
///  3. bare "<Month> <Year>" (full name or abbreviation)
///  4. "MM/YYYY" (month clamped into 1..=12)
///  5. any full date the loose parser understands
/// Anything else yields the sentinel "01/1970".
pub fn month_token(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return SENTINEL_MONTH.to_string();
    }

    if let Ok(serial) = s.parse::<f64>() {
        if let Some(d) = excel_serial_date(serial) {
            return d.format("%m/%Y").to_string();
        }
    }

    if let Some(caps) = MONTH_PHRASE_RE.captures(s) {
        if let Some(mm) = month_number(&caps[1]) {
            return format!("{:02}/{}", mm, &caps[2]);
        }
    }

    if let Some(caps) = BARE_MONTH_RE.captures(s) {
        if let Some(mm) = month_number(&caps[1]) {
            return format!("{:02}/{}", mm, &caps[2]);
        }
    }

    if let Some(caps) = MM_YYYY_RE.captures(s) {
        let mm: u32 = caps[1].parse().unwrap_or(1);
        return format!("{:02}/{}", mm.clamp(1, 12), &caps[2]);
    }

    match parse_loose_date(s) {
        Some(d) => d.format("%m/%Y").to_string(),
        None => SENTINEL_MONTH.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excel_serial_round_trips() {
        // 45535 == 2024-08-31
        assert_eq!(us_date("45535"), "08/31/2024");
        assert_eq!(month_token("45535"), "08/2024");
    }

    #[test]
    fn month_phrases() {
        assert_eq!(month_token("FOR THE MONTH OF AUGUST, 2024"), "08/2024");
        assert_eq!(month_token("For the Month: AUG 2024"), "08/2024");
        assert_eq!(month_token("FOR THE QUARTER ENDING MARCH, 2025"), "03/2025");
    }

    #[test]
    fn all_month_spellings_produce_padded_tokens() {
        let names = [
            ("JANUARY", "JAN", 1),
            ("FEBRUARY", "FEB", 2),
            ("MARCH", "MAR", 3),
            ("APRIL", "APR", 4),
            ("MAY", "MAY", 5),
            ("JUNE", "JUN", 6),
            ("JULY", "JUL", 7),
            ("AUGUST", "AUG", 8),
            ("SEPTEMBER", "SEP", 9),
            ("OCTOBER", "OCT", 10),
            ("NOVEMBER", "NOV", 11),
            ("DECEMBER", "DEC", 12),
        ];
        for (full, abbr, mm) in names {
            let want = format!("{:02}/2024", mm);
            assert_eq!(month_token(&format!("{} 2024", full)), want);
            assert_eq!(month_token(&format!("{} 2024", abbr)), want);
            assert_eq!(month_token(&format!("{} 2024", full.to_lowercase())), want);
            assert_eq!(month_token(&format!("{}, 2024", full)), want);
        }
        assert_eq!(month_token("Sept 2024"), "09/2024");
        assert_eq!(month_token("AUGUST, 2024"), "08/2024");
    }

    #[test]
    fn numeric_and_date_forms() {
        assert_eq!(month_token("8/2024"), "08/2024");
        assert_eq!(month_token("2024-08-15"), "08/2024");
        assert_eq!(month_token("8/15/2024"), "08/2024");
    }

    #[test]
    fn sentinels_on_garbage() {
        assert_eq!(month_token("no period here"), SENTINEL_MONTH);
        assert_eq!(us_date("whenever"), SENTINEL_US_DATE);
    }

    #[test]
    fn date_token_detection() {
        assert!(is_date_token("45535"));
        assert!(is_date_token("8/31/2025"));
        assert!(is_date_token("8/31/2025 10:15:00"));
        assert!(is_date_token("2025-08-31"));
        assert!(!is_date_token("END OF REPORT"));
        assert!(!is_date_token(""));
    }
}
