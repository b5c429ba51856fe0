/// Reduce any TIN spelling to the canonical 9-digit base.
///
/// Hyphens, spaces and branch suffixes are dropped; 9+ digits keep the first
/// nine, fewer are left-padded with zeros. "123-456-789-0000" → "123456789".
pub fn canonical_tin(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 9 {
        digits[..9].to_string()
    } else {
        format!("{:0>9}", digits)
    }
}

/// Extract the branch/sub-office code from a hyphenated TIN, if present.
///
/// "123-456-789-0001" → Some("0001"). Only the trailing hyphen-separated
/// all-digit segment beyond the 9-digit base counts.
pub fn branch_suffix(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let (head, tail) = trimmed.rsplit_once('-')?;
    let tail = tail.trim();
    if tail.is_empty() || !tail.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let head_digits = head.chars().filter(|c| c.is_ascii_digit()).count();
    if head_digits >= 9 {
        Some(tail.to_string())
    } else {
        None
    }
}

/// A cell "looks like a TIN" when removing hyphens/spaces leaves only digits,
/// at least nine of them. Used to spot the first real table row.
pub fn is_tin_like(s: &str) -> bool {
    let stripped: String = s.chars().filter(|c| *c != '-' && *c != ' ').collect();
    stripped.len() >= 9 && stripped.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_is_always_nine_digits() {
        for raw in ["123456789-000", "12-34", "", "987654321", "TIN: 004-123-456-0000"] {
            let tin = canonical_tin(raw);
            assert_eq!(tin.len(), 9);
            assert!(tin.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn long_tins_truncate_short_tins_pad() {
        assert_eq!(canonical_tin("123-456-789-0000"), "123456789");
        assert_eq!(canonical_tin("1234"), "000001234");
    }

    #[test]
    fn branch_suffix_extraction() {
        assert_eq!(branch_suffix("123-456-789-0001").as_deref(), Some("0001"));
        assert_eq!(branch_suffix("123-456-789-0000").as_deref(), Some("0000"));
        assert_eq!(branch_suffix("123456789"), None);
        assert_eq!(branch_suffix("12-0000"), None); // base too short
    }

    #[test]
    fn tin_like_detection() {
        assert!(is_tin_like("123-456-789"));
        assert!(is_tin_like("123456789000"));
        assert!(!is_tin_like("12345678")); // too short
        assert!(!is_tin_like("ACME CORP"));
        assert!(!is_tin_like(""));
    }
}
