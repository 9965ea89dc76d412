//! Indicator table helpers.
//!
//! An indicator table is a polars [`DataFrame`] with the six columns named by
//! the constants in this module. Sources build it from normalized
//! [`IndicatorRecord`]s; callers summarize and export it.

use polars::prelude::*;
use std::collections::HashSet;
use std::fmt;
use std::io::Write;

use crate::error::{IndicatorError, Result};
use crate::types::IndicatorRecord;

/// Country code column.
pub const COUNTRY_ID: &str = "country_id";
/// Country name column.
pub const COUNTRY_NAME: &str = "country_name";
/// Indicator code column.
pub const INDICATOR_ID: &str = "indicator_id";
/// Indicator name column.
pub const INDICATOR_NAME: &str = "indicator_name";
/// Year column (Int32, nullable).
pub const YEAR: &str = "year";
/// Value column (Float64, nullable).
pub const VALUE: &str = "value";

/// Number of country ids listed verbatim in a [`TableSummary`].
const SUMMARY_COUNTRY_LIMIT: usize = 10;

/// Builds an indicator table from records, preserving their order.
pub fn records_to_frame(records: &[IndicatorRecord]) -> Result<DataFrame> {
    let country_ids: Vec<Option<&str>> = records.iter().map(|r| r.country_id.as_deref()).collect();
    let country_names: Vec<Option<&str>> =
        records.iter().map(|r| r.country_name.as_deref()).collect();
    let indicator_ids: Vec<Option<&str>> =
        records.iter().map(|r| r.indicator_id.as_deref()).collect();
    let indicator_names: Vec<Option<&str>> =
        records.iter().map(|r| r.indicator_name.as_deref()).collect();
    let years: Vec<Option<i32>> = records.iter().map(|r| r.year).collect();
    let values: Vec<Option<f64>> = records.iter().map(|r| r.value).collect();

    DataFrame::new(vec![
        Column::new(COUNTRY_ID.into(), country_ids),
        Column::new(COUNTRY_NAME.into(), country_names),
        Column::new(INDICATOR_ID.into(), indicator_ids),
        Column::new(INDICATOR_NAME.into(), indicator_names),
        Column::new(YEAR.into(), years),
        Column::new(VALUE.into(), values),
    ])
    .map_err(|e| IndicatorError::Parse(e.to_string()))
}

/// An indicator table with the full schema and no rows.
pub fn empty_frame() -> Result<DataFrame> {
    records_to_frame(&[])
}

/// Drops exact duplicates (all six fields equal), keeping first occurrences.
#[must_use]
pub fn dedup_records(records: Vec<IndicatorRecord>) -> Vec<IndicatorRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut keep = Vec::with_capacity(records.len());
    for record in &records {
        keep.push(seen.insert(record.identity()));
    }
    drop(seen);

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect()
}

/// Writes the full table as CSV with a header row.
pub fn write_csv<W: Write>(table: &mut DataFrame, writer: W) -> Result<()> {
    CsvWriter::new(writer)
        .include_header(true)
        .finish(table)
        .map_err(|e| IndicatorError::Other(format!("CSV export failed: {e}")))
}

/// Overview of a result table for status displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSummary {
    /// Number of rows.
    pub rows: usize,
    /// Column names in table order.
    pub columns: Vec<String>,
    /// Distinct country ids in first-seen order.
    pub country_ids: Vec<String>,
}

impl TableSummary {
    /// Summarizes an indicator table.
    #[must_use]
    pub fn from_frame(table: &DataFrame) -> Self {
        let columns = table
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut country_ids = Vec::new();
        if let Some(ids) = table.column(COUNTRY_ID).ok().and_then(|c| c.str().ok()) {
            let mut seen = HashSet::new();
            for id in ids.into_iter().flatten() {
                if seen.insert(id) {
                    country_ids.push(id.to_string());
                }
            }
        }

        Self {
            rows: table.height(),
            columns,
            country_ids,
        }
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows: {}", self.rows)?;
        writeln!(f, "Columns: {}", self.columns.join(", "))?;
        let listed: Vec<&str> = self
            .country_ids
            .iter()
            .take(SUMMARY_COUNTRY_LIMIT)
            .map(String::as_str)
            .collect();
        write!(f, "Parameters: Countries: {}", listed.join(", "))?;
        if self.country_ids.len() > SUMMARY_COUNTRY_LIMIT {
            write!(f, " … ({} total)", self.country_ids.len())?;
        }
        Ok(())
    }
}
