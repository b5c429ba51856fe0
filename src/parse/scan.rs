use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::normalize::{is_date_token, is_tin_like};

/// Where the scanner is relative to the detail table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    NotStarted,
    InTable,
    Done,
}

/// Finds the detail table inside a ledger sheet and walks it row by row.
///
/// The table starts at the first row whose date column holds a date token and
/// whose id column is TIN-like; it ends at the "END OF REPORT" footer. Rows
/// in between that lose the date column are skipped, not terminal.
#[derive(Debug)]
pub struct TableScanner {
    state: ScanState,
}

impl TableScanner {
    pub fn new() -> Self {
        TableScanner {
            state: ScanState::NotStarted,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Advance over one row. Returns true when the row is a candidate detail
    /// row (the caller still applies its own noise checks).
    pub fn observe(&mut self, date_cell: &str, id_cell: &str, row_text: &str) -> bool {
        match self.state {
            ScanState::Done => false,
            ScanState::NotStarted => {
                if is_date_token(date_cell) && is_tin_like(id_cell) {
                    debug!(date = date_cell, "detail table starts");
                    self.state = ScanState::InTable;
                    true
                } else {
                    false
                }
            }
            ScanState::InTable => {
                if is_date_token(date_cell) {
                    true
                } else if row_text.to_uppercase().contains("END OF REPORT") {
                    debug!("detail table ends at footer");
                    self.state = ScanState::Done;
                    false
                } else {
                    // stray subtotal or blank line inside the table
                    false
                }
            }
        }
    }
}

impl Default for TableScanner {
    fn default() -> Self {
        Self::new()
    }
}

static COLUMN_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*[1-8]\s*\)").unwrap());
pub(crate) static TOTAL_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bTOTAL\b").unwrap());

/// Junk filter for the withholding-schedule tables (Formats 3–6): separator
/// lines, repeated column headers, "(1)".."(8)" index markers.
pub fn is_junk_row(cells: &[&str]) -> bool {
    let glue = cells
        .iter()
        .map(|c| c.trim())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_uppercase();

    if glue.is_empty() {
        return true;
    }
    if glue.contains("----------------") {
        return true;
    }
    if COLUMN_MARKER_RE.is_match(&glue) {
        return true;
    }
    if glue.contains("SEQ") && glue.contains("TAXPAYER") {
        return true;
    }
    if glue.contains("IDENTIFICATION") || glue.contains("REGISTERED NAME") {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_starts_without_date_and_tin() {
        let mut s = TableScanner::new();
        assert!(!s.observe("SOME LABEL", "", "SOME LABEL"));
        assert!(!s.observe("8/31/2025", "not a tin", "8/31/2025"));
        assert!(!s.observe("", "987654321", ""));
        assert_eq!(s.state(), ScanState::NotStarted);
    }

    #[test]
    fn starts_on_date_plus_tin_row() {
        let mut s = TableScanner::new();
        assert!(s.observe("8/31/2025", "987-654-321", "8/31/2025"));
        assert_eq!(s.state(), ScanState::InTable);
    }

    #[test]
    fn skips_non_date_rows_until_footer() {
        let mut s = TableScanner::new();
        assert!(s.observe("45535", "987654321", ""));
        assert!(!s.observe("SUBTOTAL", "", "SUBTOTAL"));
        assert_eq!(s.state(), ScanState::InTable);
        assert!(s.observe("9/1/2025", "123456789", ""));
        assert!(!s.observe("*** end of report ***", "", "*** END OF REPORT ***"));
        assert_eq!(s.state(), ScanState::Done);
        // terminal: further rows are ignored
        assert!(!s.observe("9/2/2025", "123456789", ""));
    }

    #[test]
    fn junk_rows() {
        assert!(is_junk_row(&["", "", ""]));
        assert!(is_junk_row(&["--------------------------------"]));
        assert!(is_junk_row(&["(1)", "(2)", "(3)"]));
        assert!(is_junk_row(&["SEQ NO", "TAXPAYER IDENTIFICATION NUMBER"]));
        assert!(is_junk_row(&["", "REGISTERED NAME"]));
        assert!(!is_junk_row(&["1", "004-412-382-0000", "ACME CORP"]));
    }
}
