use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::debug;

use super::CellGrid;

/// Read the active (first) worksheet of an `.xlsx`/`.xls` file into a
/// CellGrid. Numeric cells keep their raw value as a plain decimal string, so
/// Excel date serials arrive intact for the date normalizer to interpret.
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<CellGrid> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook {} has no sheets", path.display()))?
        .with_context(|| format!("failed to read first sheet of {}", path.display()))?;

    let mut rows = Vec::with_capacity(range.height());
    for row in range.rows() {
        rows.push(row.iter().map(cell_to_string).collect());
    }
    debug!(rows = rows.len(), path = %path.display(), "loaded worksheet");

    Ok(CellGrid::from_rows(rows))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        // Keep the serial; the date normalizer knows what to do with it.
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if serial.fract() == 0.0 {
                format!("{}", serial as i64)
            } else {
                serial.to_string()
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Bool(b) => b.to_string(),
        Data::Error(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_render_without_trailing_zero_noise() {
        assert_eq!(cell_to_string(&Data::Float(45535.0)), "45535");
        assert_eq!(cell_to_string(&Data::Float(100.5)), "100.5");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
