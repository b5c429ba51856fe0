pub mod date;
pub mod number;
pub mod text;
pub mod tin;

pub use date::{is_date_token, month_token, us_date, SENTINEL_MONTH, SENTINEL_US_DATE};
pub use number::{has_digit, money, parse_decimal, round2};
pub use text::{clean_text, sanitize_address, sanitize_name};
pub use tin::{branch_suffix, canonical_tin, is_tin_like};
