//! Core data types for indicator time series.
//!
//! This module defines the fundamental data structures:
//!
//! - [`IndicatorRecord`] - One normalized (country, indicator, year, value) row
//! - [`IndicatorQuery`] - Caller-supplied query parameters
//! - [`QueryKey`] - Normalized cache key derived from a query

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::{IndicatorError, Result};

/// A single normalized indicator observation.
///
/// Every field is optional because the upstream payload may omit nested
/// objects or carry malformed values; those become `None` instead of errors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    /// ISO country (or aggregate) code, e.g. `US`.
    pub country_id: Option<String>,
    /// Human-readable country name.
    pub country_name: Option<String>,
    /// Indicator code, e.g. `NY.GDP.PCAP.CD`.
    pub indicator_id: Option<String>,
    /// Human-readable indicator name.
    pub indicator_name: Option<String>,
    /// Observation year.
    pub year: Option<i32>,
    /// Observed value.
    pub value: Option<f64>,
}

impl IndicatorRecord {
    /// Orders records by `(country_name, year)` ascending with missing values last.
    #[must_use]
    pub fn cmp_by_country_year(&self, other: &Self) -> Ordering {
        nulls_last(self.country_name.as_deref(), other.country_name.as_deref())
            .then_with(|| nulls_last(self.year, other.year))
    }

    /// Identity used for exact-duplicate detection across all six fields.
    pub(crate) fn identity(&self) -> RecordIdentity<'_> {
        (
            self.country_id.as_deref(),
            self.country_name.as_deref(),
            self.indicator_id.as_deref(),
            self.indicator_name.as_deref(),
            self.year,
            self.value.map(f64::to_bits),
        )
    }
}

pub(crate) type RecordIdentity<'a> = (
    Option<&'a str>,
    Option<&'a str>,
    Option<&'a str>,
    Option<&'a str>,
    Option<i32>,
    Option<u64>,
);

fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Parameters of an indicator query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorQuery {
    /// Country codes as supplied by the caller (any case, may contain blanks).
    pub countries: Vec<String>,
    /// Indicator id, e.g. `SP.POP.TOTL`.
    pub indicator: String,
    /// First year of the range (inclusive).
    pub start_year: i32,
    /// Last year of the range (inclusive).
    pub end_year: i32,
    /// Maximum records requested per page.
    pub per_page: u32,
}

impl IndicatorQuery {
    /// Default number of records requested per page.
    pub const DEFAULT_PER_PAGE: u32 = 20_000;

    /// Creates a query with the default page size.
    #[must_use]
    pub fn new<I, S>(countries: I, indicator: impl Into<String>, start_year: i32, end_year: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
            indicator: indicator.into(),
            start_year,
            end_year,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Country codes trimmed, uppercased and stripped of blanks, in input order.
    #[must_use]
    pub fn country_codes(&self) -> Vec<String> {
        self.countries
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase)
            .collect()
    }

    /// The indicator id without surrounding whitespace.
    #[must_use]
    pub fn indicator_id(&self) -> &str {
        self.indicator.trim()
    }

    /// Checks the query before any network access.
    pub fn validate(&self) -> Result<()> {
        if self.country_codes().is_empty() {
            return Err(IndicatorError::Validation(
                "At least one country must be selected.".to_string(),
            ));
        }
        if self.indicator_id().is_empty() {
            return Err(IndicatorError::Validation(
                "Indicator is required.".to_string(),
            ));
        }
        if self.start_year > self.end_year {
            return Err(IndicatorError::Validation(
                "Start year must be less than or equal to end year.".to_string(),
            ));
        }
        if self.per_page == 0 {
            return Err(IndicatorError::Validation(
                "Page size must be at least 1.".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the normalized cache key for this query.
    #[must_use]
    pub fn key(&self) -> QueryKey {
        QueryKey::from(self)
    }
}

/// Normalized cache key for an [`IndicatorQuery`].
///
/// Country codes are uppercased, trimmed, sorted and joined with `,`, so
/// queries that differ only in country order or casing share a key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey {
    countries: String,
    indicator: String,
    start_year: i32,
    end_year: i32,
    per_page: u32,
}

impl QueryKey {
    /// The sorted, comma-joined country codes.
    #[must_use]
    pub fn countries(&self) -> &str {
        &self.countries
    }

    /// The indicator id.
    #[must_use]
    pub fn indicator(&self) -> &str {
        &self.indicator
    }
}

impl From<&IndicatorQuery> for QueryKey {
    fn from(query: &IndicatorQuery) -> Self {
        let mut codes = query.country_codes();
        codes.sort_unstable();
        Self {
            countries: codes.join(","),
            indicator: query.indicator_id().to_string(),
            start_year: query.start_year,
            end_year: query.end_year,
            per_page: query.per_page,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}:{}|{}",
            self.countries, self.indicator, self.start_year, self.end_year, self.per_page
        )
    }
}
