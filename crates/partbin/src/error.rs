//! Error types for row rendering and report configuration.

use thiserror::Error;

/// Errors raised while building a [`ColumnMap`](crate::partition::ColumnMap).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColumnMapError {
    #[error("duplicate column: {0}")]
    Duplicate(String),

    #[error("empty column name at position {0}")]
    Empty(usize),
}

/// Errors raised by [`SitePartition::to_row`](crate::partition::SitePartition).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

pub type RowResult<T> = Result<T, RowError>;
