//! The partition bin.
//!
//! A `Bin` is an append-only, ordered collection of partitions with a cached
//! aggregate size. Allocators rank bins by that size (`Ord` on `Bin`) when
//! deciding where the next partition goes.
//!
//! The cached size is kept equal to the sum of member costs by [`Bin::add`].
//! If partition costs change after insertion (through [`Bin::iter_mut`] or
//! shared interior mutability), [`Bin::resync_size`] is the reconciliation
//! point; nothing resyncs implicitly.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::partition::{ColumnMap, Partition, Row};

/// Rendering mode for [`Bin::describe`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescribeMode {
    /// Size followed by every partition's own description.
    #[default]
    Detail,
    /// Size, partition count and site count only.
    FillLevel,
}

impl FromStr for DescribeMode {
    type Err = std::convert::Infallible;

    /// `"fill_level"` selects [`DescribeMode::FillLevel`]; anything else is detail.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "fill_level" => DescribeMode::FillLevel,
            _ => DescribeMode::Detail,
        })
    }
}

/// An ordered accumulator of partitions ranked by total cost.
#[derive(Debug, Clone)]
pub struct Bin<P> {
    items: Vec<P>,
    size: f64,
}

impl<P: Partition> Bin<P> {
    /// Create an empty bin with size zero.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            size: 0.0,
        }
    }

    /// Append partitions in input order, growing the size by each cost.
    pub fn add<I>(&mut self, partitions: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
    {
        let before = self.items.len();
        for partition in partitions {
            self.size += partition.cost();
            self.items.push(partition);
        }
        let added = self.items.len() - before;
        if added > 0 {
            debug!(added, size = self.size, "added partitions to bin");
        }
        self
    }

    /// Recompute the size from the current partition costs.
    pub fn resync_size(&mut self) -> &mut Self {
        let previous = self.size;
        self.size = if self.items.is_empty() {
            0.0
        } else {
            // `sum` over floats starts from -0.0; keep an all-zero bin at +0.
            self.items.iter().map(Partition::cost).sum::<f64>() + 0.0
        };
        if previous != self.size {
            debug!(previous, size = self.size, "bin size resynced");
        }
        self
    }

    /// Cached total cost.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Number of partitions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True until the first partition is added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Partitions in insertion order.
    pub fn items(&self) -> &[P] {
        &self.items
    }

    /// Most recently added partition.
    pub fn last(&self) -> Option<&P> {
        self.items.last()
    }

    /// Sum of site counts over all partitions; zero for an empty bin.
    pub fn total_sites(&self) -> usize {
        if self.items.is_empty() {
            return 0;
        }
        self.items.iter().map(|p| p.sites().len()).sum()
    }

    /// Human-readable rendering in the given mode.
    pub fn describe(&self, mode: DescribeMode) -> String {
        match mode {
            DescribeMode::FillLevel => format!(
                "[size: {}, partition: {}, sites: {}]",
                self.size,
                self.items.len(),
                self.total_sites()
            ),
            DescribeMode::Detail => {
                if self.items.is_empty() {
                    return "[]".to_string();
                }
                let mut out = format!("[size: {}, partitions: ", self.size);
                for partition in &self.items {
                    out.push('(');
                    out.push_str(&partition.describe());
                    out.push_str("), ");
                }
                // Drop the trailing ", ".
                out.truncate(out.len() - 2);
                out.push(']');
                out
            }
        }
    }

    /// One row per partition, in insertion order. The first partition
    /// error is returned as-is.
    pub fn to_rows(&self, columns: &ColumnMap) -> Result<Vec<Row>, P::Error> {
        self.items.iter().map(|p| p.to_row(columns)).collect()
    }

    /// Partitions in insertion order; restartable.
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.items.iter()
    }

    /// Mutable access to the partitions. Cost changes made here are not
    /// reflected in [`Bin::size`] until [`Bin::resync_size`] runs.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, P> {
        self.items.iter_mut()
    }
}

impl<P: Partition> Default for Bin<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partition> fmt::Display for Bin<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(DescribeMode::Detail))
    }
}

impl<'a, P> IntoIterator for &'a Bin<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<P> IntoIterator for Bin<P> {
    type Item = P;
    type IntoIter = std::vec::IntoIter<P>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

// Bins rank by size alone; contents never break ties.
impl<P> PartialEq for Bin<P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<P> Eq for Bin<P> {}

impl<P> PartialOrd for Bin<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for Bin<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Adding +0.0 folds -0.0 into 0.0 so signed zeros rank equal.
        (self.size + 0.0).total_cmp(&(other.size + 0.0))
    }
}
