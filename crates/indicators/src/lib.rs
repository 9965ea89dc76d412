#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/indicators/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Statistical indicator queries with caching and report generation.
//!
//! This crate re-exports the core types, the cache implementations, the
//! World Bank source and the report generator, and provides an
//! [`IndicatorClient`] that validates queries and serves repeated queries
//! from an injected cache.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use indicators::{
//!     Credentials, IndicatorClient, IndicatorQuery, InMemoryCache, ProviderChain,
//!     ReportConfig, WorldBankProvider, generate_report,
//! };
//!
//! #[tokio::main]
//! async fn main() -> indicators::Result<()> {
//!     let client = IndicatorClient::new(Arc::new(WorldBankProvider::new()))
//!         .with_cache(Arc::new(InMemoryCache::new()));
//!
//!     let query = IndicatorQuery::new(["USA", "CAN"], "SP.POP.TOTL", 2015, 2020);
//!     let table = client.run_query(&query, true).await?;
//!
//!     let chain = ProviderChain::from_config(&ReportConfig::default(), &Credentials::from_env());
//!     println!("{}", generate_report(Some(&table), "Population, total", &chain).await);
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use indicators_core::*;

// Cache implementations
pub use indicators_cache::{InMemoryCache, NoopCache};

// Sources
pub use indicators_worldbank::{
    ApiKeyStatus, DEFAULT_COUNTRIES, KNOWN_INDICATORS, WorldBankProvider, api_key_status,
    indicator_label,
};

// Reports
pub use indicators_report::{
    Credentials, NO_TABLE_MESSAGE, NOTHING_TO_SUMMARIZE_MESSAGE, OllamaCloudProvider,
    OllamaLocalProvider, OpenAiProvider, ProviderChain, ReportConfig, build_digest, build_prompt,
    generate_report,
};

mod client;
pub use client::IndicatorClient;
