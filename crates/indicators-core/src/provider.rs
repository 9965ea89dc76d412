//! Provider traits for fetching indicator data and generating text.
//!
//! This module defines the core provider traits:
//!
//! - [`Provider`] - Base trait for all providers
//! - [`IndicatorSource`] - Paginated indicator time series
//! - [`TextProvider`] - Text generation backends tried by a report chain

use async_trait::async_trait;
use polars::prelude::DataFrame;
use std::fmt::Debug;

use crate::{error::Result, types::IndicatorQuery};

/// Base trait for all providers.
pub trait Provider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "World Bank").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Source of indicator time series.
///
/// Implement this trait to expose a statistics API as an indicator table.
#[async_trait]
pub trait IndicatorSource: Provider {
    /// Fetches every page for `query` and returns the combined table.
    ///
    /// The returned DataFrame has the columns `country_id`, `country_name`,
    /// `indicator_id`, `indicator_name`, `year` and `value`, contains no
    /// exact-duplicate rows and is sorted by `(country_name, year)`.
    /// Zero matching records is not an error: the table is simply empty.
    async fn fetch_indicator(&self, query: &IndicatorQuery) -> Result<DataFrame>;
}

/// A text generation backend.
///
/// Each call is a single, non-retrying attempt.
#[async_trait]
pub trait TextProvider: Provider {
    /// Sends `prompt` and returns the generated text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
