use tracing::debug;

use crate::grid::{CellGrid, RowView};
use crate::normalize::{
    branch_suffix, canonical_tin, has_digit, parse_decimal, round2, sanitize_name,
};
use crate::parse::group::Aggregator;
use crate::parse::header::{
    extract_global_month_token, extract_individual_name, extract_payee_name,
};
use crate::parse::scan::{is_junk_row, TOTAL_WORD_RE};
use crate::parse::{PayeeName, SawtControl, SawtDetail, SawtDoc, SawtHeader};

/// One surviving row of a withholding schedule before any grouping.
pub(crate) struct SawtRow {
    pub tin: String,
    pub corp: String,
    pub atc: String,
    pub rate: f64,
    pub amount: f64,
    pub withheld: f64,
}

/// Read one table row at the standard column slots: B=TIN, C=name, E=ATC,
/// F=nature of payment, G=amount, H=rate, I=withheld. Returns None for junk,
/// header repeats, and total rows.
fn read_row(row: &RowView<'_>) -> Option<SawtRow> {
    let seq_raw = row.get("A");
    let tin_raw = row.get("B");
    let corp_raw = row.get("C");
    let atc_raw = row.get("E");
    let nature = row.get("F");
    let amt_raw = row.get("G");
    let rate_raw = row.get("H");
    let wh_raw = row.get("I");

    if is_junk_row(&[seq_raw, tin_raw, corp_raw, atc_raw, amt_raw, rate_raw, wh_raw]) {
        return None;
    }
    accept_row(seq_raw, tin_raw, corp_raw, atc_raw, nature, amt_raw, rate_raw, wh_raw)
}

/// Shared acceptance rules once the candidate cells are known.
pub(crate) fn accept_row(
    seq_raw: &str,
    tin_raw: &str,
    corp_raw: &str,
    atc_raw: &str,
    nature: &str,
    amt_raw: &str,
    rate_raw: &str,
    wh_raw: &str,
) -> Option<SawtRow> {
    // a real row carries a TIN or at least one number
    let has_tin = has_digit(tin_raw);
    let has_numbers = has_digit(amt_raw) || has_digit(wh_raw) || has_digit(rate_raw);
    if !has_tin && !has_numbers {
        return None;
    }

    let tin = canonical_tin(tin_raw);
    let corp = sanitize_name(corp_raw);
    let atc = atc_raw.trim().to_uppercase();
    let rate = parse_decimal(rate_raw);
    let amount = parse_decimal(amt_raw);
    let withheld = parse_decimal(wh_raw);

    // total/subtotal rows: the word TOTAL anywhere in the text cells, an
    // all-zero TIN, or an anonymous row whose only number is a withheld sum
    let glue = format!("{} {} {} {}", corp_raw, nature, atc_raw, seq_raw);
    let has_total_word = TOTAL_WORD_RE.is_match(&glue);
    if tin == "000000000"
        || has_total_word
        || (atc.is_empty() && corp.is_empty() && amount == 0.0 && withheld > 0.0)
    {
        return None;
    }

    Some(SawtRow {
        tin,
        corp,
        atc,
        rate,
        amount,
        withheld,
    })
}

fn control_for(details: &[SawtDetail]) -> SawtControl {
    SawtControl {
        amount_total: round2(details.iter().map(|d| d.amount).sum()),
        withheld_total: round2(details.iter().map(|d| d.withheld).sum()),
    }
}

/// Owner TIN for the withholding formats: the first cell anywhere that opens
/// with "TIN". Returns (9-digit base, branch code).
pub(crate) fn extract_owner_tin(grid: &CellGrid) -> (String, String) {
    for row in grid.rows() {
        for cell in row.iter() {
            if cell.trim_start().to_uppercase().starts_with("TIN") {
                let base = canonical_tin(cell);
                let branch = branch_suffix(cell).unwrap_or_else(|| "0000".to_string());
                return (base, branch);
            }
        }
    }
    ("000000000".to_string(), "0000".to_string())
}

/// Format 3: quarterly corporate withholding (1702Q). Rows roll up by
/// (TIN, name, ATC, rate).
pub fn parse_quarterly_corporate(grid: &CellGrid) -> SawtDoc {
    let month = extract_global_month_token(grid);
    let (tin, branch) = extract_owner_tin(grid);
    let payee = PayeeName::Company(extract_payee_name(grid));

    let mut agg = Aggregator::new();
    for row in grid.rows() {
        if let Some(r) = read_row(&row) {
            agg.add(&r.tin, &r.corp, &r.atc, r.rate, r.amount, r.withheld);
        }
    }
    let details = agg.into_details();
    debug!(groups = details.len(), "quarterly corporate groups");

    let control = control_for(&details);
    SawtDoc {
        header: SawtHeader {
            tin,
            branch,
            payee,
            period: month,
        },
        details,
        control,
    }
}

/// Format 4: quarterly individual withholding (1701Q). Same table shape as
/// Format 3 but the payee is an individual name split LAST/FIRST/MIDDLE.
pub fn parse_quarterly_individual(grid: &CellGrid) -> SawtDoc {
    let month = extract_global_month_token(grid);
    let (tin, branch) = extract_owner_tin(grid);
    let (last, first, middle) = extract_individual_name(grid);

    let mut agg = Aggregator::new();
    for row in grid.rows() {
        if let Some(r) = read_row(&row) {
            agg.add(&r.tin, &r.corp, &r.atc, r.rate, r.amount, r.withheld);
        }
    }
    let details = agg.into_details();
    debug!(groups = details.len(), "quarterly individual groups");

    let control = control_for(&details);
    SawtDoc {
        header: SawtHeader {
            tin,
            branch,
            payee: PayeeName::Individual {
                last,
                first,
                middle,
            },
            period: month,
        },
        details,
        control,
    }
}

/// Format 5: expanded withholding (1601E). Same table shape as Format 3 but
/// rows are emitted one-to-one in sheet order, never rolled up.
pub fn parse_expanded(grid: &CellGrid) -> SawtDoc {
    let month = extract_global_month_token(grid);
    let (tin, branch) = extract_owner_tin(grid);
    let payee = PayeeName::Company(extract_payee_name(grid));

    let mut details = Vec::new();
    for row in grid.rows() {
        if let Some(r) = read_row(&row) {
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
    debug!(rows = details.len(), "expanded withholding rows");

    let control = control_for(&details);
    SawtDoc {
        header: SawtHeader {
            tin,
            branch,
            payee,
            period: month,
        },
        details,
        control,
    }
}
