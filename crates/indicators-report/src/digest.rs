//! Per-country statistical digest of an indicator table.

use indicators_core::table::{COUNTRY_NAME, VALUE};
use polars::prelude::{DataFrame, DataType};
use std::collections::BTreeMap;

/// Digest text for a table with nothing to summarize.
pub const NO_DATA: &str = "No data available.";

/// Summarize `table` as one line per country, in lexicographic order:
/// `"{country}: n={count} years, mean={mean:.2}, min={min:.2}, max={max:.2}"`.
///
/// Rows with a null value or null country are ignored. Returns [`NO_DATA`]
/// when the table is empty, lacks the `country_name`/`value` columns, or has
/// no non-null values.
#[must_use]
pub fn build_digest(table: &DataFrame) -> String {
    let Some(groups) = values_by_country(table) else {
        return NO_DATA.to_string();
    };

    let lines: Vec<String> = groups
        .iter()
        .map(|(country, values)| {
            let n = values.len();
            let mean = values.iter().sum::<f64>() / n as f64;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            format!("{country}: n={n} years, mean={mean:.2}, min={min:.2}, max={max:.2}")
        })
        .collect();

    if lines.is_empty() {
        NO_DATA.to_string()
    } else {
        lines.join("\n")
    }
}

fn values_by_country(table: &DataFrame) -> Option<BTreeMap<String, Vec<f64>>> {
    if table.height() == 0 {
        return None;
    }

    let countries = table.column(COUNTRY_NAME).ok()?.str().ok()?;
    let values = table.column(VALUE).ok()?.cast(&DataType::Float64).ok()?;
    let values = values.f64().ok()?;

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (country, value) in countries.into_iter().zip(values) {
        if let (Some(country), Some(value)) = (country, value) {
            if !value.is_nan() {
                groups.entry(country.to_string()).or_default().push(value);
            }
        }
    }
    Some(groups)
}
