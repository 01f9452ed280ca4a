//! The partition contract a [`Bin`](crate::Bin) relies on.
//!
//! A bin never inspects its partitions beyond four capabilities:
//! - **cost**: the optimized operation cost summed into the bin size
//! - **sites**: the sites a partition covers, used only through their count
//! - **describe**: a human-readable rendering used in detail mode
//! - **to_row**: projection into a report row, driven by a [`ColumnMap`]
//!
//! [`SitePartition`] is the stock implementation used by report drivers.

use csv::WriterBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{ColumnMapError, RowError, RowResult};

/// A unit of work that can be placed into a bin.
pub trait Partition {
    /// Element type of [`Partition::sites`].
    type Site;
    /// Failure raised by [`Partition::to_row`]; passed through bins unchanged.
    type Error;

    /// Optimized operation cost.
    fn cost(&self) -> f64;

    fn sites(&self) -> &[Self::Site];

    fn describe(&self) -> String;

    /// Project this partition into one report row laid out by `columns`.
    fn to_row(&self, columns: &ColumnMap) -> Result<Row, Self::Error>;
}

impl<P: Partition + ?Sized> Partition for &P {
    type Site = P::Site;
    type Error = P::Error;

    fn cost(&self) -> f64 {
        (**self).cost()
    }

    fn sites(&self) -> &[Self::Site] {
        (**self).sites()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn to_row(&self, columns: &ColumnMap) -> Result<Row, Self::Error> {
        (**self).to_row(columns)
    }
}

impl<P: Partition + ?Sized> Partition for Box<P> {
    type Site = P::Site;
    type Error = P::Error;

    fn cost(&self) -> f64 {
        (**self).cost()
    }

    fn sites(&self) -> &[Self::Site] {
        (**self).sites()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn to_row(&self, columns: &ColumnMap) -> Result<Row, Self::Error> {
        (**self).to_row(columns)
    }
}

/// Ordered report header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: Vec<String>,
}

impl ColumnMap {
    /// Build a column map, rejecting empty and repeated names.
    pub fn new<I, S>(columns: I) -> Result<Self, ColumnMapError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = ColumnMap::default();
        for (idx, column) in columns.into_iter().enumerate() {
            let column = column.into();
            if column.trim().is_empty() {
                return Err(ColumnMapError::Empty(idx));
            }
            if map.columns.contains(&column) {
                return Err(ColumnMapError::Duplicate(column));
            }
            map.columns.push(column);
        }
        Ok(map)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.columns.iter()
    }
}

/// One report row, cells in [`ColumnMap`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Vec<String>);

impl Row {
    pub fn cells(&self) -> &[String] {
        &self.0
    }

    /// Render as one CSV record without the line terminator.
    pub fn to_csv_line(&self) -> csv::Result<String> {
        let mut wtr = WriterBuilder::new().from_writer(Vec::new());
        wtr.write_record(&self.0)?;
        let data = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
        let line = String::from_utf8_lossy(&data);
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl From<Vec<String>> for Row {
    fn from(cells: Vec<String>) -> Self {
        Row(cells)
    }
}

impl FromIterator<String> for Row {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Row(iter.into_iter().collect())
    }
}

/// A partition of operations spread over a set of sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitePartition {
    pub id: String,
    pub sites: Vec<String>,
    /// Operation count before optimization.
    pub op_raw: f64,
    /// Operation count after optimization; this is the partition's cost.
    pub op_optimized: f64,
}

impl SitePartition {
    pub fn new(id: impl Into<String>, sites: Vec<String>, op_raw: f64, op_optimized: f64) -> Self {
        Self {
            id: id.into(),
            sites,
            op_raw,
            op_optimized,
        }
    }

    /// Change the optimized cost in place. Bins holding this partition keep
    /// their cached size until they are resynced.
    pub fn set_op_optimized(&mut self, op_optimized: f64) {
        self.op_optimized = op_optimized;
    }

    fn cell(&self, column: &str) -> RowResult<String> {
        let value = match column {
            "id" => self.id.clone(),
            "sites" => self.sites.join(" "),
            "site_count" => self.sites.len().to_string(),
            "op_raw" => self.op_raw.to_string(),
            "op_optimized" => self.op_optimized.to_string(),
            other => return Err(RowError::UnknownColumn(other.to_string())),
        };
        Ok(value)
    }
}

impl Partition for SitePartition {
    type Site = String;
    type Error = RowError;

    fn cost(&self) -> f64 {
        self.op_optimized
    }

    fn sites(&self) -> &[String] {
        &self.sites
    }

    fn describe(&self) -> String {
        format!(
            "{}: {} ops, sites: {}",
            self.id,
            self.op_optimized,
            self.sites.join(" ")
        )
    }

    fn to_row(&self, columns: &ColumnMap) -> RowResult<Row> {
        columns.iter().map(|column| self.cell(column)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sites(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn column_map_keeps_header_order() {
        let columns = ColumnMap::new(["id", "sites", "op_optimized"]).unwrap();

        assert_eq!(columns.len(), 3);
        assert_eq!(columns.columns(), &["id", "sites", "op_optimized"]);
    }

    #[test]
    fn column_map_rejects_duplicates() {
        let err = ColumnMap::new(["id", "sites", "id"]).unwrap_err();
        assert_eq!(err, ColumnMapError::Duplicate("id".to_string()));
    }

    #[test]
    fn column_map_rejects_blank_names() {
        let err = ColumnMap::new(["id", "  "]).unwrap_err();
        assert_eq!(err, ColumnMapError::Empty(1));
    }

    #[test]
    fn site_partition_row_follows_column_order() {
        let p = SitePartition::new("p1", sites(&["a", "b"]), 10.0, 7.5);
        let columns = ColumnMap::new(["op_optimized", "id", "site_count", "sites"]).unwrap();

        let row = p.to_row(&columns).unwrap();
        assert_eq!(row.cells(), &["7.5", "p1", "2", "a b"]);
    }

    #[test]
    fn site_partition_row_rejects_unknown_column() {
        let p = SitePartition::new("p1", sites(&["a"]), 1.0, 1.0);
        let columns = ColumnMap::new(["id", "weight"]).unwrap();

        assert_eq!(
            p.to_row(&columns),
            Err(RowError::UnknownColumn("weight".to_string()))
        );
    }

    #[test]
    fn site_partition_describe() {
        let p = SitePartition::new("p7", sites(&["x", "y"]), 9.0, 4.0);
        assert_eq!(p.describe(), "p7: 4 ops, sites: x y");
    }

    #[test]
    fn csv_line_quotes_special_cells() {
        let row = Row::from(vec![
            "plain".to_string(),
            "a,b".to_string(),
            "say \"hi\"".to_string(),
        ]);
        assert_eq!(
            row.to_csv_line().unwrap(),
            "plain,\"a,b\",\"say \"\"hi\"\"\""
        );
    }

    #[test]
    fn csv_line_keeps_single_empty_cell() {
        let row = Row::from(vec![String::new()]);
        assert_eq!(row.to_csv_line().unwrap(), "\"\"");

        let row = Row::from(vec![String::new(), String::new()]);
        assert_eq!(row.to_csv_line().unwrap(), ",");
    }

    #[test]
    fn boxed_and_borrowed_partitions_delegate() {
        let p = SitePartition::new("p1", sites(&["a", "b", "c"]), 3.0, 2.0);
        let boxed: Box<SitePartition> = Box::new(p.clone());
        let borrowed = &p;

        assert_eq!(boxed.cost(), 2.0);
        assert_eq!(borrowed.sites().len(), 3);
        assert_eq!(boxed.describe(), p.describe());
    }
}
