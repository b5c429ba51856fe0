use unicode_normalization::UnicodeNormalization;

/// Clean a free-text cell down to the ASCII subset the filing system accepts.
///
///  - NFC normalize, then map the known troublemakers (Ñ/ñ, `&`, quote marks)
///  - transliterate leftover non-ASCII via NFKD, dropping combining marks
///  - strip control characters
///  - collapse whitespace runs and trim
///
/// Names disallow commas; addresses keep them, hence `remove_commas`.
pub fn clean_text(raw: &str, remove_commas: bool) -> String {
    let composed: String = raw.trim().nfc().collect();

    let mut mapped = String::with_capacity(composed.len() + 8);
    for ch in composed.chars() {
        match ch {
            'Ñ' => mapped.push('N'),
            'ñ' => mapped.push('n'),
            '&' => mapped.push_str(" AND "),
            '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' | '\'' => {}
            _ => mapped.push(ch),
        }
    }

    // NFKD splits accented letters into base + combining mark; keeping only
    // printable ASCII afterwards is the transliteration step.
    let mut ascii = String::with_capacity(mapped.len());
    for ch in mapped.nfkd() {
        if ch.is_ascii() && !ch.is_ascii_control() {
            ascii.push(ch);
        }
    }

    if remove_commas {
        ascii.retain(|c| c != ',');
    }

    ascii.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Registered/trade names: commas and quotes are disallowed outright.
pub fn sanitize_name(raw: &str) -> String {
    clean_text(raw, true)
}

/// Addresses may keep commas but still get the ASCII treatment.
pub fn sanitize_address(raw: &str) -> String {
    clean_text(raw, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_enye_and_ampersand() {
        assert_eq!(sanitize_name("PEÑA & SONS"), "PENA AND SONS");
        assert_eq!(sanitize_name("niño"), "nino");
    }

    #[test]
    fn drops_quote_marks() {
        assert_eq!(sanitize_name("D'ANGELO \u{201C}TRADING\u{201D}"), "DANGELO TRADING");
    }

    #[test]
    fn transliterates_accents() {
        assert_eq!(sanitize_name("José Müller"), "Jose Muller");
    }

    #[test]
    fn names_lose_commas_addresses_keep_them() {
        assert_eq!(sanitize_name("ACME, INC."), "ACME INC.");
        assert_eq!(sanitize_address("123 Main St, Quezon City"), "123 Main St, Quezon City");
    }

    #[test]
    fn collapses_whitespace_and_strips_controls() {
        assert_eq!(sanitize_address("  A  B\tC \u{0007} "), "A B C");
    }
}
