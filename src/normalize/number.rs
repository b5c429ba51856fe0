/// Parse a human-maintained money cell into an `f64`.
///
/// Accepts:
///  - comma thousands separators ("1,234,567.89")
///  - parenthesized negatives ("(1,500.00)")
///  - stray currency symbols or unit text (stripped)
///
/// Empty or garbage input ("", "-", ".", "N/A") degrades to `0.0` rather than
/// failing, so one bad cell never aborts a whole conversion.
pub fn parse_decimal(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() || s == "-" || s == "." {
        return 0.0;
    }

    let paren_negative = s.starts_with('(') && s.ends_with(')');
    let s = if paren_negative {
        s.trim_matches(|c| c == '(' || c == ')' || c == ' ')
    } else {
        s
    };

    // Keep digits, decimal point, minus; commas are thousands separators.
    let mut cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    cleaned.retain(|c| c != ',');

    if cleaned.is_empty() || cleaned == "-" || cleaned == "." {
        return 0.0;
    }

    let value: f64 = cleaned.parse().unwrap_or(0.0);
    if paren_negative {
        -value
    } else {
        value
    }
}

/// Render a money value the way the filing system expects: exactly two
/// decimals, `.` separator, no thousands grouping. Negative zero (a
/// parenthesized "(0.00)" cell) renders unsigned.
pub fn money(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.2}", value)
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// True if the cell carries any digit at all.
pub fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}
