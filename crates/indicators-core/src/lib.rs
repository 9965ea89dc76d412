#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/indicators/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for statistical indicator data.
//!
//! This crate provides the foundational abstractions shared by the rest of
//! the workspace:
//!
//! - [`Provider`](provider::Provider) - Base trait for all providers
//! - [`IndicatorSource`](provider::IndicatorSource) - Paginated indicator time series
//! - [`TextProvider`](provider::TextProvider) - Text generation backends
//! - [`QueryCache`](cache::QueryCache) - Caching abstraction keyed by [`QueryKey`]
//! - [`table`] - Building, summarizing and exporting indicator tables

/// Cache trait for storing fetched indicator tables.
pub mod cache;
/// Error types for indicator and report operations.
pub mod error;
/// Provider traits for indicator sources and text generation.
pub mod provider;
/// Indicator table helpers backed by polars.
pub mod table;
/// Core data types (records, queries, cache keys).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::QueryCache;
pub use error::{IndicatorError, Result};
pub use provider::{IndicatorSource, Provider, TextProvider};
pub use table::{TableSummary, dedup_records, empty_frame, records_to_frame, write_csv};
pub use types::{IndicatorQuery, IndicatorRecord, QueryKey};
