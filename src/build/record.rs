use crate::normalize::money;

/// One output line under construction. Fields are pushed left to right and
/// rendered comma-joined; the grammar never allows a trailing comma.
#[derive(Debug, Default)]
pub struct Record {
    fields: Vec<String>,
}

/// Trim, double any embedded quotes, wrap in quotes.
pub fn quote(v: &str) -> String {
    format!("\"{}\"", v.trim().replace('"', "\"\""))
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw field, emitted as-is.
    pub fn bare(mut self, v: impl Into<String>) -> Self {
        self.fields.push(v.into());
        self
    }

    pub fn quoted(mut self, v: &str) -> Self {
        self.fields.push(quote(v));
        self
    }

    /// Two-decimal money, bare.
    pub fn money(mut self, v: f64) -> Self {
        self.fields.push(money(v));
        self
    }

    /// Two-decimal money inside quotes (Format 2 quotes everything).
    pub fn quoted_money(mut self, v: f64) -> Self {
        self.fields.push(quote(&money(v)));
        self
    }

    pub fn render(self) -> String {
        self.fields.join(",")
    }
}

/// CRLF line endings with a trailing CRLF after the last line.
pub fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}
