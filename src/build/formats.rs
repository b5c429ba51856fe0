use crate::build::record::{join_lines, Record};
use crate::parse::{PayeeName, PurchaseDoc, SalesDoc, SawtDoc};

/// Fixed tokens of one output format. The filing validator matches these
/// byte-for-byte, so they live in one table instead of being scattered
/// through the builders.
#[derive(Debug)]
pub struct FormatSpec {
    pub id: u8,
    /// Code embedded in the output file name.
    pub file_code: &'static str,
    /// Form token spliced into the SAWT record prefixes (H<form>, D<form>,
    /// C<form>). Empty for the ledger formats, which use H/D literals.
    pub form: &'static str,
    /// Trailing schedule code on the header line.
    pub schedule_code: &'static str,
    /// Annual formats render the period as MM/DD/YYYY in the file name.
    pub annual: bool,
}

pub const FORMATS: [FormatSpec; 6] = [
    FormatSpec { id: 1, file_code: "S", form: "", schedule_code: "051", annual: false },
    FormatSpec { id: 2, file_code: "P", form: "", schedule_code: "000", annual: false },
    FormatSpec { id: 3, file_code: "F3", form: "1702Q", schedule_code: "043", annual: false },
    FormatSpec { id: 4, file_code: "F4", form: "1701Q", schedule_code: "041", annual: false },
    FormatSpec { id: 5, file_code: "F5", form: "1601E", schedule_code: "047", annual: false },
    FormatSpec { id: 6, file_code: "F6", form: "1604E", schedule_code: "048", annual: true },
];

pub fn spec_for(id: u8) -> Option<&'static FormatSpec> {
    FORMATS.iter().find(|s| s.id == id)
}

/// Format 1. Free text quoted, amounts and fixed codes bare; detail columns
/// 5-7 are empty AND unquoted while the matching header columns are quoted
/// empties. The validator distinguishes the two.
pub fn build_sales(doc: &SalesDoc) -> String {
    let h = &doc.header;
    let mut lines = Vec::with_capacity(doc.details.len() + 1);

    lines.push(
        Record::new()
            .bare("H")
            .bare("S")
            .quoted(&h.tin)
            .quoted(&h.registered_name)
            .quoted("")
            .quoted("")
            .quoted("")
            .quoted(&h.trade_name)
            .quoted(&h.addr1)
            .quoted(&h.addr2)
            .money(h.exempt_total)
            .money(h.zero_rated_total)
            .money(h.taxable_total)
            .money(h.output_tax_total)
            .bare("051")
            .bare(h.period_end.clone())
            .bare("12")
            .render(),
    );

    for d in &doc.details {
        lines.push(
            Record::new()
                .bare("D")
                .bare("S")
                .quoted(&d.tin)
                .quoted(&d.name)
                .bare("")
                .bare("")
                .bare("")
                .quoted(&d.addr1)
                .quoted(&d.addr2)
                .money(d.exempt)
                .money(d.zero_rated)
                .money(d.taxable)
                .money(d.output_tax)
                .bare(d.owner_tin.clone())
                .bare(d.period_end.clone())
                .render(),
        );
    }
    join_lines(&lines)
}

/// Format 2. Every one of the 21 columns is quoted, including the H/P record
/// markers and the money values. Header totals keep the legacy slot mapping
/// (services in c13, input tax in both c16 and c17, literal 0.00 in c18).
pub fn build_purchases(doc: &PurchaseDoc) -> String {
    let h = &doc.header;
    let mut lines = Vec::with_capacity(doc.details.len() + 1);

    lines.push(
        Record::new()
            .quoted("H")
            .quoted("P")
            .quoted(&h.tin)
            .quoted(&h.registered_name)
            .quoted("")
            .quoted("")
            .quoted("")
            .quoted("")
            .quoted(&h.addr1)
            .quoted(&h.addr2)
            .quoted_money(h.exempt_total)
            .quoted_money(h.zero_rated_total)
            .quoted_money(h.services_total)
            .quoted_money(h.capital_goods_total)
            .quoted_money(h.other_goods_total)
            .quoted_money(h.input_tax_total)
            .quoted_money(h.input_tax_total)
            .quoted_money(0.0)
            .quoted("000")
            .quoted(&h.period_end)
            .quoted("12")
            .render(),
    );

    for d in &doc.details {
        lines.push(
            Record::new()
                .quoted("D")
                .quoted("P")
                .quoted(&d.tin)
                .quoted(&d.name)
                .quoted("")
                .quoted("")
                .quoted("")
                .quoted(&d.addr1)
                .quoted(&d.addr2)
                .quoted_money(d.exempt)
                .quoted_money(d.zero_rated)
                .quoted_money(d.services)
                .quoted_money(d.capital_goods)
                .quoted_money(d.other_goods)
                .quoted_money(d.input_tax)
                .quoted(&d.owner_tin)
                .quoted(&d.period_end)
                .quoted("")
                .quoted("")
                .quoted("")
                .quoted("")
                .render(),
        );
    }
    join_lines(&lines)
}

/// Formats 3-6: the SAWT record family. Header and control lines carry the
/// owner branch code; detail TINs are always the 9-digit base with a literal
/// 0000 branch column.
pub fn build_sawt(doc: &SawtDoc, spec: &FormatSpec) -> String {
    let h = &doc.header;
    let mut lines = Vec::with_capacity(doc.details.len() + 2);

    let mut header = Record::new()
        .bare("HSAWT")
        .bare(format!("H{}", spec.form))
        .bare(h.tin.clone())
        .bare(h.branch.clone());
    header = match &h.payee {
        PayeeName::Company(name) => header
            .quoted(name)
            .quoted("")
            .quoted("")
            .quoted(""),
        PayeeName::Individual { last, first, middle } => header
            .quoted("")
            .quoted(last)
            .quoted(first)
            .quoted(middle),
    };
    lines.push(
        header
            .bare(h.period.clone())
            .bare(spec.schedule_code)
            .render(),
    );

    for d in &doc.details {
        lines.push(
            Record::new()
                .bare("DSAWT")
                .bare(format!("D{}", spec.form))
                .bare(d.seq.to_string())
                .bare(d.tin.clone())
                .bare("0000")
                .quoted(&d.corp)
                .quoted("")
                .quoted("")
                .quoted("")
                .quoted("")
                .bare(h.period.clone())
                .quoted("")
                .bare(d.atc.clone())
                .money(d.rate)
                .money(d.amount)
                .money(d.withheld)
                .render(),
        );
    }

    lines.push(
        Record::new()
            .bare("CSAWT")
            .bare(format!("C{}", spec.form))
            .bare(h.tin.clone())
            .bare(h.branch.clone())
            .bare(h.period.clone())
            .money(doc.control.amount_total)
            .money(doc.control.withheld_total)
            .render(),
    );
    join_lines(&lines)
}
