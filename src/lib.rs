//! Reads reservation report exports: locates the header row, normalizes
//! column names and values, and reads or computes the report totals.

pub mod backend;

pub use backend::cell::{Cell, Number};
pub use backend::error::ParseError;
pub use backend::headers::{CanonicalHeader, HeaderKey};
pub use backend::report::{ParseResult, Record, parse};
pub use backend::summary::{Summary, calculate_stats};
