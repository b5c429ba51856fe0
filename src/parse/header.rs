use once_cell::sync::Lazy;
use regex::Regex;

use crate::grid::CellGrid;
use crate::normalize::{month_token, sanitize_name, SENTINEL_MONTH};

/// Labels that mark a row as part of the report preamble rather than data or
/// an address continuation.
const HEADER_KEYWORDS: &[&str] = &[
    "RECONCILIATION OF LISTING FOR ENFORCEMENT",
    "TIN",
    "OWNER'S NAME",
    "OWNER'S TRADE NAME",
    "OWNER'S ADDRESS",
    "TAXABLE",
    "TAXPAYER",
    "IDENTIFICATION",
    "NUMBER",
    "REGISTERED NAME",
    "ADDRESS",
    "MONTH",
    "END OF REPORT",
];

static COLUMN_INDEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(\d+\)$").unwrap());
static LABEL_COLON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.*?:").unwrap());
static NAME_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(LAST|FIRST|MIDDLE)\s*NAME\s*:?\s*(.+)\s*$").unwrap()
});

/// Does this cell look like yet another header label (so the row below an
/// address is NOT a second address line)?
pub fn looks_like_header_label(text: &str) -> bool {
    let s = text.trim().to_uppercase();
    if HEADER_KEYWORDS.iter().any(|kw| s.starts_with(kw)) {
        return true;
    }
    COLUMN_INDEX_RE.is_match(&s)
}

/// Strip a known label prefix (plus any trailing " :" decoration) off a cell,
/// returning the value portion. `None` when the cell does not carry the label.
pub fn label_rest<'a>(cell: &'a str, label: &str) -> Option<&'a str> {
    let rest = cell.strip_prefix(label)?;
    Some(rest.trim_start_matches([' ', ':']))
}

/// Find the document-wide reporting period: the first cell anywhere in the
/// sheet that reads "FOR THE MONTH …" or "FOR THE QUARTER …", normalized to
/// "MM/YYYY". Sentinel when no such cell exists.
pub fn extract_global_month_token(grid: &CellGrid) -> String {
    for row in grid.rows() {
        for cell in row.iter() {
            let up = cell.to_uppercase();
            if up.contains("FOR THE MONTH") || up.contains("FOR THE QUARTER") {
                return month_token(cell);
            }
        }
    }
    SENTINEL_MONTH.to_string()
}

/// Company payee name from a "PAYEE'S NAME: …" style cell, searched across
/// the whole sheet. Empty when absent.
pub fn extract_payee_name(grid: &CellGrid) -> String {
    for row in grid.rows() {
        for cell in row.iter() {
            let up = cell.to_uppercase();
            if up.contains("PAYEE") && up.contains("NAME") {
                let after = LABEL_COLON_RE.replace(cell, "");
                return sanitize_name(after.trim());
            }
        }
    }
    String::new()
}

/// Individual payee name split into (last, first, middle).
///
/// Dedicated "LAST NAME:" / "FIRST NAME:" / "MIDDLE NAME:" labels win; a
/// combined "PAYEE'S NAME: …" cell is reduced to letters and spaces and split
/// positionally LAST FIRST MIDDLE…, matching how the legacy sheets fill it.
pub fn extract_individual_name(grid: &CellGrid) -> (String, String, String) {
    let mut last = String::new();
    let mut first = String::new();
    let mut middle = String::new();

    for row in grid.rows() {
        for cell in row.iter() {
            if let Some(caps) = NAME_LABEL_RE.captures(cell) {
                let value = sanitize_name(&caps[2]);
                match caps[1].to_ascii_uppercase().as_str() {
                    "LAST" => last = value,
                    "FIRST" => first = value,
                    _ => middle = value,
                }
            }
        }
    }
    if !last.is_empty() || !first.is_empty() || !middle.is_empty() {
        return (last, first, middle);
    }

    for row in grid.rows() {
        for cell in row.iter() {
            let up = cell.to_uppercase();
            if up.contains("PAYEE") && up.contains("NAME") {
                let after = LABEL_COLON_RE.replace(cell, "");
                let letters: String = sanitize_name(after.trim())
                    .chars()
                    .map(|c| if c.is_ascii_alphabetic() || c == ' ' { c } else { ' ' })
                    .collect();
                let mut parts = letters.split_whitespace();
                let last = parts.next().unwrap_or("").to_string();
                let first = parts.next().unwrap_or("").to_string();
                let middle = parts.collect::<Vec<_>>().join(" ");
                return (last, first, middle);
            }
        }
    }

    (last, first, middle)
}

static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// "X Y X Y" → Some("X Y"): the cell is the same fragment written twice.
fn doubled_half(e: &str) -> Option<String> {
    let words: Vec<&str> = e.split_whitespace().collect();
    if words.len() < 2 || words.len() % 2 != 0 {
        return None;
    }
    let mid = words.len() / 2;
    if words[..mid] == words[mid..] {
        Some(words[..mid].join(" "))
    } else {
        None
    }
}

/// Split one address cell into the two address columns the output wants.
///
/// Tries, in order: a comma split, a duplicated-text split ("X X" → X/X), a
/// run-of-spaces split, a word-count halving for long values; short values
/// are duplicated into both columns.
pub fn split_address(e: &str) -> (String, String) {
    let e = e.trim();
    if e.is_empty() {
        return (String::new(), String::new());
    }

    let comma_parts: Vec<&str> = e.split(',').map(str::trim).collect();
    if comma_parts.len() >= 2 {
        return (comma_parts[0].to_string(), comma_parts[1..].join(", "));
    }

    if let Some(half) = doubled_half(e) {
        return (half.clone(), half);
    }

    let ws_parts: Vec<&str> = MULTI_SPACE_RE.split(e).collect();
    if ws_parts.len() >= 2 {
        return (
            ws_parts[0].trim().to_string(),
            ws_parts[1..].join(" ").trim().to_string(),
        );
    }

    let words: Vec<&str> = e.split_whitespace().collect();
    if words.len() >= 4 {
        let mid = words.len() / 2;
        return (words[..mid].join(" "), words[mid..].join(" "));
    }

    (e.to_string(), e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::grid_of;

    #[test]
    fn header_label_detection() {
        assert!(looks_like_header_label("TIN : 123"));
        assert!(looks_like_header_label("owner's address: x"));
        assert!(looks_like_header_label("(3)"));
        assert!(!looks_like_header_label("BLK 4 LOT 5 SOMEWHERE"));
    }

    #[test]
    fn label_stripping() {
        assert_eq!(label_rest("OWNER'S NAME: ACME CORP", "OWNER'S NAME"), Some("ACME CORP"));
        assert_eq!(
            label_rest("OWNER'S TRADE NAME : ACME", "OWNER'S TRADE NAME"),
            Some("ACME")
        );
        assert_eq!(label_rest("SOMETHING ELSE", "OWNER'S NAME"), None);
    }

    #[test]
    fn global_month_token_found_anywhere() {
        let g = grid_of(&[
            &["", "x"],
            &["", "FOR THE MONTH OF AUGUST, 2024"],
        ]);
        assert_eq!(extract_global_month_token(&g), "08/2024");

        let empty = grid_of(&[&["nothing here"]]);
        assert_eq!(extract_global_month_token(&empty), "01/1970");
    }

    #[test]
    fn payee_company_name() {
        let g = grid_of(&[&["PAYEE'S NAME: ACME, INC."]]);
        assert_eq!(extract_payee_name(&g), "ACME INC.");
    }

    #[test]
    fn individual_name_from_labels() {
        let g = grid_of(&[
            &["LAST NAME: DELA CRUZ"],
            &["FIRST NAME: JUAN"],
            &["MIDDLE NAME: SANTOS"],
        ]);
        assert_eq!(
            extract_individual_name(&g),
            ("DELA CRUZ".into(), "JUAN".into(), "SANTOS".into())
        );
    }

    #[test]
    fn individual_name_from_combined_cell() {
        let g = grid_of(&[&["PAYEE'S NAME: CRUZ JUAN SANTOS JR"]]);
        assert_eq!(
            extract_individual_name(&g),
            ("CRUZ".into(), "JUAN".into(), "SANTOS JR".into())
        );
    }

    #[test]
    fn address_splitting() {
        assert_eq!(
            split_address("123 Main St, Quezon City, NCR"),
            ("123 Main St".into(), "Quezon City, NCR".into())
        );
        assert_eq!(split_address("MAKATI MAKATI"), ("MAKATI".into(), "MAKATI".into()));
        assert_eq!(
            split_address("UNIT 4B   TOWER TWO"),
            ("UNIT 4B".into(), "TOWER TWO".into())
        );
        assert_eq!(
            split_address("ONE TWO THREE FOUR"),
            ("ONE TWO".into(), "THREE FOUR".into())
        );
        assert_eq!(split_address("SHORT"), ("SHORT".into(), "SHORT".into()));
        assert_eq!(split_address(""), (String::new(), String::new()));
    }
}
