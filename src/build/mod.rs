pub mod formats;
pub mod record;

pub use formats::{build_purchases, build_sales, build_sawt, spec_for, FormatSpec, FORMATS};
pub use record::{join_lines, quote, Record};
