//! Report configuration (`partbin.toml`).
//!
//! Selects the row layout handed to [`Bin::to_rows`](crate::Bin::to_rows)
//! and the default [`DescribeMode`] a driver renders bins with.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bin::DescribeMode;
use crate::error::ColumnMapError;
use crate::partition::ColumnMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
    #[serde(default)]
    pub mode: DescribeMode,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            mode: DescribeMode::default(),
        }
    }
}

fn default_columns() -> Vec<String> {
    ["id", "sites", "op_optimized"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl ReportConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: ReportConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validated column layout for row rendering.
    pub fn column_map(&self) -> Result<ColumnMap, ColumnMapError> {
        ColumnMap::new(self.report.columns.iter().cloned())
    }

    pub fn mode(&self) -> DescribeMode {
        self.report.mode
    }
}
