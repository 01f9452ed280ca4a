//! Partition bins for bin-packing and load-balancing drivers.
//!
//! This crate provides the container a placement driver fills. It does NOT
//! decide which partition goes where; it keeps each bin's size consistent
//! with its contents and ranks bins by that size so the driver can.
//!
//! # Components
//!
//! - **`bin`**: `Bin` container (add, resync, describe, rows, ordering)
//! - **`partition`**: `Partition` contract, `ColumnMap`/`Row`, `SitePartition`
//! - **`config`**: Report layout loaded from TOML
//! - **`error`**: Column and row errors

pub mod bin;
pub mod config;
pub mod error;
pub mod partition;

pub use bin::{Bin, DescribeMode};
pub use config::{ReportConfig, ReportSection};
pub use error::{ColumnMapError, RowError, RowResult};
pub use partition::{ColumnMap, Partition, Row, SitePartition};
