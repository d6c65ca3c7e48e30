use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid page size {size}; allowed sizes are {allowed:?}")]
    InvalidPageSize { size: usize, allowed: Vec<usize> },

    #[error("Invalid status filter: {0} (expected all, active or inactive)")]
    InvalidStatus(String),

    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: String, to: String },
}
