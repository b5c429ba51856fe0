use tracing::debug;

use crate::grid::CellGrid;
use crate::normalize::{
    canonical_tin, has_digit, parse_decimal, round2, sanitize_address, sanitize_name, us_date,
    SENTINEL_US_DATE,
};
use crate::parse::header::{label_rest, looks_like_header_label, split_address};
use crate::parse::scan::{ScanState, TableScanner};
use crate::parse::{
    PurchaseDetail, PurchaseDoc, PurchaseHeader, SalesDetail, SalesDoc, SalesHeader,
};

fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Owner identity block shared by the two ledger formats: labeled fields in
/// column A of the preamble rows.
struct OwnerBlock {
    tin: Option<String>,
    registered_name: Option<String>,
    trade_name: Option<String>,
    addr1: Option<String>,
    addr2: Option<String>,
}

/// Walk the early rows for "TIN", "OWNER'S NAME", "OWNER'S TRADE NAME" and
/// "OWNER'S ADDRESS" labels. A second address line is taken from the next row
/// only when that row is not itself another header label.
fn scan_owner_block(grid: &CellGrid) -> OwnerBlock {
    let mut block = OwnerBlock {
        tin: None,
        registered_name: None,
        trade_name: None,
        addr1: None,
        addr2: None,
    };

    for idx in 1..=grid.row_count() {
        let cell_a = grid.cell(idx, "A").trim().to_string();
        if cell_a.is_empty() {
            continue;
        }

        if cell_a.starts_with("TIN") {
            block.tin = Some(canonical_tin(&cell_a));
        } else if let Some(rest) = label_rest(&cell_a, "OWNER'S TRADE NAME") {
            block.trade_name = Some(rest.trim().to_string());
        } else if let Some(rest) = label_rest(&cell_a, "OWNER'S NAME") {
            block.registered_name = Some(rest.trim().to_string());
        } else if let Some(rest) = label_rest(&cell_a, "OWNER'S ADDRESS") {
            block.addr1 = Some(rest.trim().to_string());
            let next_a = grid.cell(idx + 1, "A").trim();
            if !next_a.is_empty() && !looks_like_header_label(next_a) {
                block.addr2 = Some(next_a.to_string());
            }
        }
    }
    block
}

/// Format 1: sales ledger. Detail table runs A=date, B=customer TIN,
/// C/D=name, E=address, F..J=amounts.
pub fn parse_sales(grid: &CellGrid) -> SalesDoc {
    let owner = scan_owner_block(grid);
    let owner_tin = owner.tin.clone().unwrap_or_else(|| "000000000".to_string());

    let mut details: Vec<SalesDetail> = Vec::new();
    let mut first_period_end: Option<String> = None;
    let mut scanner = TableScanner::new();

    for row in grid.rows() {
        let a = row.get("A").trim();
        let b = row.get("B").trim();
        let c = row.get("C").trim();
        let d = row.get("D").trim();
        let e = row.get("E").trim();
        let f = row.get("F");
        let g = row.get("G");
        let h = row.get("H");
        let i = row.get("I");
        let j = row.get("J");

        if !scanner.observe(a, b, a) {
            if scanner.state() == ScanState::Done {
                break;
            }
            continue;
        }

        // noise: no amounts and no identifying text
        let has_any_amount = has_digit(g) || has_digit(h) || has_digit(i) || has_digit(j);
        if !has_any_amount && c.is_empty() && d.is_empty() && e.is_empty() {
            continue;
        }

        let period_end = first_period_end
            .get_or_insert_with(|| us_date(a))
            .clone();

        let name = if !c.is_empty() { c } else { d };
        let (addr1, addr2) = split_address(e);

        details.push(SalesDetail {
            tin: digits_only(b),
            name: name.to_string(),
            addr1,
            addr2,
            gross_sales: parse_decimal(f),
            exempt: parse_decimal(g),
            zero_rated: parse_decimal(h),
            taxable: parse_decimal(i),
            output_tax: parse_decimal(j),
            owner_tin: owner_tin.clone(),
            period_end,
        });
    }
    debug!(rows = details.len(), "sales detail rows extracted");

    let registered_name = owner
        .registered_name
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "REGISTERED NAME".to_string());
    let trade_name = owner
        .trade_name
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| {
            if registered_name != "REGISTERED NAME" {
                registered_name.clone()
            } else {
                "TRADE NAME".to_string()
            }
        });

    let header = SalesHeader {
        tin: owner_tin,
        registered_name,
        trade_name,
        addr1: owner.addr1.unwrap_or_default(),
        addr2: owner.addr2.unwrap_or_default(),
        exempt_total: round2(details.iter().map(|d| d.exempt).sum()),
        zero_rated_total: round2(details.iter().map(|d| d.zero_rated).sum()),
        taxable_total: round2(details.iter().map(|d| d.taxable).sum()),
        gross_total: round2(details.iter().map(|d| d.gross_sales).sum()),
        output_tax_total: round2(details.iter().map(|d| d.output_tax).sum()),
        period_end: first_period_end.unwrap_or_else(|| SENTINEL_US_DATE.to_string()),
    };

    SalesDoc { header, details }
}

/// Format 2: purchases ledger. Same preamble as Format 1 but names and
/// addresses go through the sanitizers, and the amount block spans F..N.
pub fn parse_purchases(grid: &CellGrid) -> PurchaseDoc {
    let owner = scan_owner_block(grid);
    let owner_tin = owner.tin.clone().unwrap_or_else(|| "000000000".to_string());

    let mut details: Vec<PurchaseDetail> = Vec::new();
    let mut first_period_end: Option<String> = None;
    let mut scanner = TableScanner::new();

    for row in grid.rows() {
        let a = row.get("A").trim();
        let b = row.get("B").trim();
        let c = row.get("C").trim();
        let d = row.get("D").trim();
        let e = row.get("E");

        if !scanner.observe(a, b, a) {
            if scanner.state() == ScanState::Done {
                break;
            }
            continue;
        }

        let period_end = first_period_end
            .get_or_insert_with(|| us_date(a))
            .clone();

        let name = if !c.is_empty() {
            sanitize_name(c)
        } else {
            sanitize_name(d)
        };
        let (addr1, addr2) = split_address(e);

        details.push(PurchaseDetail {
            tin: digits_only(b),
            name,
            addr1: sanitize_address(&addr1),
            addr2: sanitize_address(&addr2),
            gross: parse_decimal(row.get("F")),
            exempt: parse_decimal(row.get("G")),
            zero_rated: parse_decimal(row.get("H")),
            taxable: parse_decimal(row.get("I")),
            services: parse_decimal(row.get("J")),
            capital_goods: parse_decimal(row.get("K")),
            other_goods: parse_decimal(row.get("L")),
            input_tax: parse_decimal(row.get("M")),
            gross_taxable: parse_decimal(row.get("N")),
            owner_tin: owner_tin.clone(),
            period_end,
        });
    }
    debug!(rows = details.len(), "purchase detail rows extracted");

    // The header totals keep the legacy slot mapping: services lands in the
    // "taxable" slot, input tax is emitted twice. Relabeling them would break
    // the downstream validator.
    let header = PurchaseHeader {
        tin: owner_tin,
        registered_name: owner
            .registered_name
            .map(|s| sanitize_name(&s))
            .unwrap_or_default(),
        addr1: owner
            .addr1
            .map(|s| sanitize_address(&s))
            .unwrap_or_default(),
        addr2: String::new(),
        exempt_total: round2(details.iter().map(|d| d.exempt).sum()),
        zero_rated_total: round2(details.iter().map(|d| d.zero_rated).sum()),
        services_total: round2(details.iter().map(|d| d.services).sum()),
        capital_goods_total: round2(details.iter().map(|d| d.capital_goods).sum()),
        other_goods_total: round2(details.iter().map(|d| d.other_goods).sum()),
        input_tax_total: round2(details.iter().map(|d| d.input_tax).sum()),
        gross_taxable_total: round2(details.iter().map(|d| d.gross_taxable).sum()),
        period_end: first_period_end.unwrap_or_else(|| SENTINEL_US_DATE.to_string()),
    };

    PurchaseDoc { header, details }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::grid_of;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,datgen::parse=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn sales_fixture() -> CellGrid {
        grid_of(&[
            &["RECONCILIATION OF LISTING FOR ENFORCEMENT"],
            &["TIN : 123456789-000"],
            &["OWNER'S NAME: ACME CORP"],
            &["OWNER'S TRADE NAME : ACME TRADING"],
            &["OWNER'S ADDRESS: 1 MAIN ST"],
            &["BRGY SOMEWHERE QC"],
            &["TAXABLE MONTH"],
            &[
                "8/31/2025", "987654321", "JOHN DOE", "", "QC, METRO MANILA", "105.00",
                "100.00", "0.00", "0.00", "5.00",
            ],
            &["SUBTOTAL", "", "", "", "", "", "", "", "", ""],
            &[
                "8/31/2025", "111222333", "", "JANE ROE", "MAKATI MAKATI", "50.00", "0.00",
                "0.00", "50.00", "6.00",
            ],
            &["*** END OF REPORT ***"],
            &["8/31/2025", "999999999", "GHOST", "", "", "1.00", "1.00", "0", "0", "0"],
        ])
    }

    #[test]
    fn sales_end_to_end_parse() {
        init_test_logging();
        let doc = parse_sales(&sales_fixture());

        assert_eq!(doc.header.tin, "123456789");
        assert_eq!(doc.header.registered_name, "ACME CORP");
        assert_eq!(doc.header.trade_name, "ACME TRADING");
        assert_eq!(doc.header.addr1, "1 MAIN ST");
        assert_eq!(doc.header.addr2, "BRGY SOMEWHERE QC");
        assert_eq!(doc.header.period_end, "08/31/2025");

        // footer stops the scan before the GHOST row
        assert_eq!(doc.details.len(), 2);
        assert_eq!(doc.details[0].tin, "987654321");
        assert_eq!(doc.details[0].name, "JOHN DOE");
        assert_eq!(doc.details[0].addr1, "QC");
        assert_eq!(doc.details[0].addr2, "METRO MANILA");
        assert_eq!(doc.details[1].name, "JANE ROE");

        assert_eq!(doc.header.exempt_total, 100.0);
        assert_eq!(doc.header.taxable_total, 50.0);
        assert_eq!(doc.header.output_tax_total, 11.0);
        assert_eq!(doc.header.gross_total, 155.0);
    }

    #[test]
    fn sales_header_defaults_when_labels_missing() {
        let g = grid_of(&[&[
            "8/31/2025", "987654321", "X", "", "", "1", "1", "0", "0", "0",
        ]]);
        let doc = parse_sales(&g);
        assert_eq!(doc.header.tin, "000000000");
        assert_eq!(doc.header.registered_name, "REGISTERED NAME");
        assert_eq!(doc.header.trade_name, "TRADE NAME");
    }

    #[test]
    fn purchases_sanitize_names_and_keep_legacy_total_mapping() {
        let g = grid_of(&[
            &["TIN : 123-456-789"],
            &["OWNER'S NAME: PEÑA & SONS"],
            &["OWNER'S ADDRESS: 5 OAK ST"],
            &[
                "8/31/2025",
                "987654321",
                "SUPPLIER, INC.",
                "",
                "PASIG, NCR",
                "100.00", // F gross
                "10.00",  // G exempt
                "20.00",  // H zero rated
                "30.00",  // I taxable
                "40.00",  // J services
                "50.00",  // K capital goods
                "60.00",  // L other goods
                "70.00",  // M input tax
                "80.00",  // N gross taxable
            ],
        ]);
        let doc = parse_purchases(&g);

        assert_eq!(doc.header.registered_name, "PENA AND SONS");
        assert_eq!(doc.details[0].name, "SUPPLIER INC.");
        assert_eq!(doc.details[0].addr1, "PASIG");
        assert_eq!(doc.details[0].services, 40.0);
        assert_eq!(doc.header.services_total, 40.0);
        assert_eq!(doc.header.input_tax_total, 70.0);
        assert_eq!(doc.header.gross_taxable_total, 80.0);
    }
}
