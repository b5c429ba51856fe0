use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;
use tracing::info;

use crate::build::{build_purchases, build_sales, build_sawt, FormatSpec, FORMATS};
use crate::grid::CellGrid;
use crate::parse::{annual, ledger, sawt, ParsedDocument};

/// The six supported report layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Sales,
    Purchases,
    QuarterlyCorporate,
    QuarterlyIndividual,
    Expanded,
    Annual,
}

impl Format {
    pub fn from_id(id: u8) -> Result<Self, ConvertError> {
        match id {
            1 => Ok(Format::Sales),
            2 => Ok(Format::Purchases),
            3 => Ok(Format::QuarterlyCorporate),
            4 => Ok(Format::QuarterlyIndividual),
            5 => Ok(Format::Expanded),
            6 => Ok(Format::Annual),
            other => Err(ConvertError::UnknownFormat(other)),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Format::Sales => 1,
            Format::Purchases => 2,
            Format::QuarterlyCorporate => 3,
            Format::QuarterlyIndividual => 4,
            Format::Expanded => 5,
            Format::Annual => 6,
        }
    }

    fn spec(self) -> &'static FormatSpec {
        &FORMATS[self.id() as usize - 1]
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unknown format {0}; expected 1-6")]
    UnknownFormat(u8),
    #[error("parsed data is empty for format {0}; check the template mapping")]
    EmptyParse(u8),
}

/// Result of one conversion: the generated file name, the exact bytes to
/// write, and the parsed document for diagnostics.
#[derive(Debug)]
pub struct Conversion {
    pub file_name: String,
    pub content: String,
    pub document: ParsedDocument,
}

/// Route the grid through the format's parser and builder.
pub fn convert(grid: &CellGrid, format: Format) -> Result<Conversion, ConvertError> {
    let document = match format {
        Format::Sales => ParsedDocument::Sales(ledger::parse_sales(grid)),
        Format::Purchases => ParsedDocument::Purchases(ledger::parse_purchases(grid)),
        Format::QuarterlyCorporate => ParsedDocument::Sawt(sawt::parse_quarterly_corporate(grid)),
        Format::QuarterlyIndividual => ParsedDocument::Sawt(sawt::parse_quarterly_individual(grid)),
        Format::Expanded => ParsedDocument::Sawt(sawt::parse_expanded(grid)),
        Format::Annual => ParsedDocument::Sawt(annual::parse_annual(grid)),
    };
    if document.is_empty() {
        return Err(ConvertError::EmptyParse(format.id()));
    }

    let spec = format.spec();
    let content = match &document {
        ParsedDocument::Sales(d) => build_sales(d),
        ParsedDocument::Purchases(d) => build_purchases(d),
        ParsedDocument::Sawt(d) => build_sawt(d, spec),
    };
    let file_name = file_name(spec, document.tin(), document.period());
    info!(%file_name, format = format.id(), "conversion complete");

    Ok(Conversion {
        file_name,
        content,
        document,
    })
}

/// `<tin><code><period>.DAT`. The period layout is MMYYYY, except the annual
/// format which keeps the day (MMDDYYYY). An unresolvable period falls back
/// to January 1970 rather than failing the conversion.
fn file_name(spec: &FormatSpec, tin: &str, period: &str) -> String {
    let parts: Vec<&str> = period.split('/').collect();
    let (mm, dd, yyyy) = match parts.as_slice() {
        [mm, dd, yyyy] => (*mm, *dd, *yyyy),
        [mm, yyyy] => (*mm, "01", *yyyy),
        _ => ("01", "01", "1970"),
    };
    if spec.annual {
        format!("{}{}{}{}{}.DAT", tin, spec.file_code, mm, dd, yyyy)
    } else {
        format!("{}{}{}{}.DAT", tin, spec.file_code, mm, yyyy)
    }
}

/// Write the conversion into `dir`, creating it if needed.
pub fn write_output(conversion: &Conversion, dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    let path = dir.join(&conversion.file_name);
    fs::write(&path, &conversion.content)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::grid_of;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn sales_grid() -> CellGrid {
        grid_of(&[
            &["TIN : 123456789-000"],
            &["OWNER'S NAME: ACME CORP"],
            &[
                "8/31/2025", "987654321", "JOHN DOE", "", "QC, METRO MANILA", "105.00",
                "100.00", "0.00", "0.00", "5.00",
            ],
        ])
    }

    #[test]
    fn sales_end_to_end() {
        init_test_logging();
        let conv = convert(&sales_grid(), Format::Sales).unwrap();

        assert_eq!(conv.file_name, "123456789S082025.DAT");
        let lines: Vec<&str> = conv.content.split("\r\n").collect();
        assert!(lines[0].starts_with("H,S,\"123456789\",\"ACME CORP\","));
        assert!(lines[1].starts_with("D,S,\"987654321\",\"JOHN DOE\","));
        assert!(conv.content.ends_with("\r\n"));
    }

    #[test]
    fn unknown_format_id() {
        assert!(matches!(
            Format::from_id(9),
            Err(ConvertError::UnknownFormat(9))
        ));
    }

    #[test]
    fn empty_parse_is_an_error() {
        let g = grid_of(&[&["nothing useful here"]]);
        assert!(matches!(
            convert(&g, Format::Sales),
            Err(ConvertError::EmptyParse(1))
        ));
    }

    #[test]
    fn file_names_per_format() {
        let f3 = &FORMATS[2];
        assert_eq!(file_name(f3, "004412382", "08/2024"), "004412382F3082024.DAT");
        let f6 = &FORMATS[5];
        assert_eq!(
            file_name(f6, "004412382", "12/31/2024"),
            "004412382F612312024.DAT"
        );
        assert_eq!(file_name(f3, "004412382", "garbage"), "004412382F3011970.DAT");
    }

    #[test]
    fn write_output_creates_the_dat_file() {
        let conv = convert(&sales_grid(), Format::Sales).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_output(&conv, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "123456789S082025.DAT");
        assert_eq!(std::fs::read_to_string(path).unwrap(), conv.content);
    }
}
