use std::num::ParseIntError;
use thiserror::Error;

/// Failure while reading or writing a dump.
///
/// `line` is the 1-based line of the offending record; for the `|`-packed
/// accounts file it is the record number instead.
#[derive(Error, Debug)]
pub enum DumpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{file}:{line}: expected {expected} fields, found {found}")]
    FieldCount {
        file: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{file}:{line}: invalid {field} '{value}'")]
    InvalidNumber {
        file: String,
        line: u64,
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{file}:{line}: unknown payment status '{value}'")]
    InvalidStatus {
        file: String,
        line: u64,
        value: String,
    },

    #[error("History page size must be at least 1")]
    InvalidPageSize,
}
