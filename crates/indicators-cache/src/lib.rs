#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/indicators/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Caching implementations for indicator query results.
//!
//! This crate provides implementations of the [`QueryCache`] trait from
//! `indicators-core`:
//!
//! - [`InMemoryCache`] - Unbounded in-memory cache owned by the caller
//! - [`NoopCache`] - No-op cache that doesn't store anything

/// In-memory cache implementation.
pub mod memory;
/// No-op cache implementation.
pub mod noop;

// Re-export the trait for convenience
pub use indicators_core::QueryCache;

// Re-export implementations
pub use memory::InMemoryCache;
pub use noop::NoopCache;
