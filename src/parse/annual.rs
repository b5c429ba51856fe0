use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::grid::{CellGrid, RowView};
use crate::normalize::date::month_number;
use crate::normalize::{has_digit, round2, us_date, SENTINEL_US_DATE};
use crate::parse::header::extract_payee_name;
use crate::parse::sawt::{accept_row, extract_owner_tin};
use crate::parse::scan::is_junk_row;
use crate::parse::{PayeeName, SawtControl, SawtDetail, SawtDoc, SawtHeader};

/// Candidate column slots for (ATC, amount, rate, withheld). The annual
/// templates drift: depending on the export, the schedule block starts at
/// column E, F or G. This precedence order matches observed files; do not
/// reorder it without validating against real samples.
const SLOTS: [[&str; 4]; 3] = [
    ["E", "F", "G", "H"],
    ["F", "G", "H", "I"],
    ["G", "H", "I", "J"],
];

static MONTH_DAY_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([A-Za-z]+)\s+(\d{1,2}),?\s*(\d{4})").unwrap());

/// The annual report is dated "AS OF"/"FOR THE YEAR ENDED" a specific day.
/// Sentinel 01/01/1970 when no such cell parses.
fn extract_as_of_date(grid: &CellGrid) -> String {
    for row in grid.rows() {
        for cell in row.iter() {
            let up = cell.to_uppercase();
            if !up.contains("AS OF") && !up.contains("FOR THE YEAR") {
                continue;
            }
            // "AS OF: DECEMBER 31, 2024"
            if let Some(caps) = MONTH_DAY_YEAR_RE.captures(cell) {
                if let Some(mm) = month_number(&caps[1]) {
                    if let Ok(dd) = caps[2].parse::<u32>() {
                        return format!("{:02}/{:02}/{}", mm, dd, &caps[3]);
                    }
                }
            }
            // "FOR THE YEAR ENDED 12/31/2024"
            let after = cell
                .rfind(':')
                .map(|i| &cell[i + 1..])
                .unwrap_or(cell);
            let tail = after
                .split_whitespace()
                .skip_while(|w| w.chars().all(|c| c.is_ascii_alphabetic()))
                .collect::<Vec<_>>()
                .join(" ");
            let parsed = us_date(&tail);
            if parsed != SENTINEL_US_DATE {
                return parsed;
            }
        }
    }
    warn!("no as-of date found; falling back to sentinel");
    SENTINEL_US_DATE.to_string()
}

/// A cell that can only be an amount: digits plus money punctuation. ATC
/// codes like "WC010" also survive parse_decimal, so a plain nonzero-parse
/// test would match the wrong slot.
fn is_amountish(s: &str) -> bool {
    let t = s.trim();
    has_digit(t) && t.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '(' | ')' | '-' | ' '))
}

/// Try the three candidate slots in order, accepting the first that shows a
/// non-empty ATC cell or a numeric amount cell.
fn pick_slot(row: &RowView<'_>) -> Option<[&'static str; 4]> {
    for slot in SLOTS {
        let atc = row.get(slot[0]).trim();
        if !atc.is_empty() || is_amountish(row.get(slot[1])) {
            return Some(slot);
        }
    }
    None
}

/// Format 6: annual withholding summary (1604E family). Same identification
/// columns as the quarterly schedules but a floating amount block, resolved
/// per row via the slot fallback. Rows are not aggregated.
pub fn parse_annual(grid: &CellGrid) -> SawtDoc {
    let as_of = extract_as_of_date(grid);
    let (tin, branch) = extract_owner_tin(grid);
    let payee = PayeeName::Company(extract_payee_name(grid));

    let mut details: Vec<SawtDetail> = Vec::new();
    for row in grid.rows() {
        let seq_raw = row.get("A");
        let tin_raw = row.get("B");
        let corp_raw = row.get("C");

        let all: Vec<&str> = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"]
            .iter()
            .map(|c| row.get(c))
            .collect();
        if is_junk_row(&all) {
            continue;
        }

        let Some(slot) = pick_slot(&row) else {
            continue;
        };
        let atc_raw = row.get(slot[0]);
        let amt_raw = row.get(slot[1]);
        let rate_raw = row.get(slot[2]);
        let wh_raw = row.get(slot[3]);

        // no nature-of-payment column in the annual layout
        if !has_digit(tin_raw) {
            continue;
        }
        if let Some(r) = accept_row(seq_raw, tin_raw, corp_raw, atc_raw, "", amt_raw, rate_raw, wh_raw)
        {
            details.push(SawtDetail {
                seq: (details.len() + 1) as u32,
                tin: r.tin,
                corp: r.corp,
                atc: r.atc,
                rate: r.rate,
                amount: r.amount,
                withheld: r.withheld,
            });
        }
    }
    debug!(rows = details.len(), "annual withholding rows");

    let control = SawtControl {
        amount_total: round2(details.iter().map(|d| d.amount).sum()),
        withheld_total: round2(details.iter().map(|d| d.withheld).sum()),
    };
    SawtDoc {
        header: SawtHeader {
            tin,
            branch,
            payee,
            period: as_of,
        },
        details,
        control,
    }
}
