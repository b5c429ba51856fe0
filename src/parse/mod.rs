pub mod annual;
pub mod group;
pub mod header;
pub mod ledger;
pub mod sawt;
pub mod scan;

use serde::Serialize;

/// Sales ledger (Format 1) header fields plus the roll-up totals the header
/// line carries. `gross_total` is computed for the JSON dump but the legacy
/// header line never emits it.
#[derive(Debug, Clone, Serialize)]
pub struct SalesHeader {
    pub tin: String,
    pub registered_name: String,
    pub trade_name: String,
    pub addr1: String,
    pub addr2: String,
    pub exempt_total: f64,
    pub zero_rated_total: f64,
    pub taxable_total: f64,
    pub gross_total: f64,
    pub output_tax_total: f64,
    pub period_end: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesDetail {
    pub tin: String,
    pub name: String,
    pub addr1: String,
    pub addr2: String,
    pub gross_sales: f64,
    pub exempt: f64,
    pub zero_rated: f64,
    pub taxable: f64,
    pub output_tax: f64,
    pub owner_tin: String,
    pub period_end: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesDoc {
    pub header: SalesHeader,
    pub details: Vec<SalesDetail>,
}

/// Purchases ledger (Format 2). Header totals c11–c18 intentionally mirror
/// the legacy column-to-sum mapping, labels notwithstanding.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseHeader {
    pub tin: String,
    pub registered_name: String,
    pub addr1: String,
    pub addr2: String,
    pub exempt_total: f64,
    pub zero_rated_total: f64,
    pub services_total: f64,
    pub capital_goods_total: f64,
    pub other_goods_total: f64,
    pub input_tax_total: f64,
    pub gross_taxable_total: f64,
    pub period_end: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseDetail {
    pub tin: String,
    pub name: String,
    pub addr1: String,
    pub addr2: String,
    pub gross: f64,
    pub exempt: f64,
    pub zero_rated: f64,
    pub taxable: f64,
    pub services: f64,
    pub capital_goods: f64,
    pub other_goods: f64,
    pub input_tax: f64,
    pub gross_taxable: f64,
    pub owner_tin: String,
    pub period_end: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseDoc {
    pub header: PurchaseHeader,
    pub details: Vec<PurchaseDetail>,
}

/// How the withholding formats name the payee: corporate formats carry one
/// registered name, individual formats split it LAST/FIRST/MIDDLE.
#[derive(Debug, Clone, Serialize)]
pub enum PayeeName {
    Company(String),
    Individual {
        last: String,
        first: String,
        middle: String,
    },
}

/// Withholding-schedule (SAWT family, Formats 3–6) header.
#[derive(Debug, Clone, Serialize)]
pub struct SawtHeader {
    pub tin: String,
    /// Branch code from the TIN suffix, "0000" when absent.
    pub branch: String,
    pub payee: PayeeName,
    /// "MM/YYYY" for the quarterly/monthly formats, "MM/DD/YYYY" for annual.
    pub period: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SawtDetail {
    pub seq: u32,
    pub tin: String,
    pub corp: String,
    pub atc: String,
    pub rate: f64,
    pub amount: f64,
    pub withheld: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SawtControl {
    pub amount_total: f64,
    pub withheld_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SawtDoc {
    pub header: SawtHeader,
    pub details: Vec<SawtDetail>,
    pub control: SawtControl,
}

/// Parser output / builder input for any format.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum ParsedDocument {
    Sales(SalesDoc),
    Purchases(PurchaseDoc),
    Sawt(SawtDoc),
}

impl ParsedDocument {
    /// No usable detail rows means the template did not match; the caller
    /// reports that instead of emitting an empty file.
    pub fn is_empty(&self) -> bool {
        match self {
            ParsedDocument::Sales(d) => d.details.is_empty(),
            ParsedDocument::Purchases(d) => d.details.is_empty(),
            ParsedDocument::Sawt(d) => d.details.is_empty(),
        }
    }

    /// Owner TIN, always the 9-digit base.
    pub fn tin(&self) -> &str {
        match self {
            ParsedDocument::Sales(d) => &d.header.tin,
            ParsedDocument::Purchases(d) => &d.header.tin,
            ParsedDocument::Sawt(d) => &d.header.tin,
        }
    }

    /// The reporting period as rendered in the output grammar.
    pub fn period(&self) -> &str {
        match self {
            ParsedDocument::Sales(d) => &d.header.period_end,
            ParsedDocument::Purchases(d) => &d.header.period_end,
            ParsedDocument::Sawt(d) => &d.header.period,
        }
    }
}
