pub mod load;

pub use load::load_grid;

/// A spreadsheet seen as rows of lettered columns, exactly as the upload
/// collaborator hands it over. Rows are 1-based, columns "A", "B", … "AA".
/// Missing cells read as the empty string; the grid is never mutated.
#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    rows: Vec<Vec<String>>,
}

/// Map a column label to a 0-based index: A=0 … Z=25, AA=26.
pub fn col_index(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    let mut idx: usize = 0;
    for ch in label.chars() {
        let c = ch.to_ascii_uppercase();
        if !c.is_ascii_uppercase() {
            return None;
        }
        idx = idx * 26 + (c as usize - 'A' as usize + 1);
    }
    Some(idx - 1)
}

impl CellGrid {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        CellGrid { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell at 1-based row and lettered column; empty string when absent.
    pub fn cell(&self, row: usize, col: &str) -> &str {
        let Some(idx) = col_index(col) else {
            return "";
        };
        self.rows
            .get(row.wrapping_sub(1))
            .and_then(|r| r.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(|cells| RowView { cells })
    }
}

/// Borrowed view over one grid row.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    cells: &'a [String],
}

impl<'a> RowView<'a> {
    pub fn get(&self, col: &str) -> &'a str {
        col_index(col)
            .and_then(|idx| self.cells.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// All cells left to right, for whole-row text searches.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> {
        self.cells.iter().map(String::as_str)
    }
}

/// Build a grid from string literals; test helper used across the crate.
#[cfg(test)]
pub fn grid_of(rows: &[&[&str]]) -> CellGrid {
    CellGrid::from_rows(
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}
