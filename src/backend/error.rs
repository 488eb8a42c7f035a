use thiserror::Error;

/// Failures that stop a report from being parsed at all.
///
/// Everything else (short rows, odd values, unknown summary keys) is
/// absorbed by the parser and never surfaces as an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("the CSV file is empty")]
    EmptyInput,
    #[error("no valid header row found (expected a line containing ID and Cliente)")]
    HeaderNotFound,
}
