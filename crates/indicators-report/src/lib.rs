#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/indicators/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Language-model reports for indicator tables.
//!
//! # Example
//!
//! ```rust,ignore
//! use indicators_report::{Credentials, ProviderChain, ReportConfig, generate_report};
//!
//! let chain = ProviderChain::from_config(&ReportConfig::default(), &Credentials::from_env());
//! let report = generate_report(Some(&table), "Population, total", &chain).await;
//! println!("{report}");
//! ```

use polars::prelude::DataFrame;
use tracing::debug;

mod chain;
mod config;
mod digest;
mod http;
mod ollama;
mod openai;
mod prompt;

pub use chain::ProviderChain;
pub use config::{Credentials, ENV_OLLAMA_API_KEY, ENV_OPENAI_API_KEY, ReportConfig};
pub use digest::{NO_DATA, build_digest};
pub use ollama::{OllamaCloudProvider, OllamaLocalProvider};
pub use openai::OpenAiProvider;
pub use prompt::build_prompt;

/// Returned when there is no table, or it has no rows.
pub const NO_TABLE_MESSAGE: &str = "No data available. Run a query first.";

/// Returned when the table has rows but nothing to summarize.
pub const NOTHING_TO_SUMMARIZE_MESSAGE: &str = "No data available to summarize.";

/// Build a digest and prompt for `table` and ask `chain` for a report.
///
/// Never fails: missing data and provider failures both come back as
/// guidance text. No provider is contacted unless the digest has content.
pub async fn generate_report(
    table: Option<&DataFrame>,
    indicator_name: &str,
    chain: &ProviderChain,
) -> String {
    let Some(table) = table.filter(|t| t.height() > 0) else {
        return NO_TABLE_MESSAGE.to_string();
    };

    let digest = build_digest(table);
    if digest.is_empty() || digest == NO_DATA {
        return NOTHING_TO_SUMMARIZE_MESSAGE.to_string();
    }
    debug!(lines = digest.lines().count(), "Built statistical digest");

    let prompt = build_prompt(&digest, indicator_name);
    chain.run(&prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use indicators_core::{IndicatorRecord, empty_frame, records_to_frame};
    use polars::prelude::Column;
    use serde_json::json;

    fn chain_for(server: &MockServer) -> ProviderChain {
        let config = ReportConfig {
            local_url: server.url("/api/generate"),
            ..ReportConfig::default()
        };
        ProviderChain::from_config(&config, &Credentials::default())
    }

    #[tokio::test]
    async fn test_missing_or_empty_table_skips_providers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200).json_body(json!({"response": "should not be used"}));
            })
            .await;
        let chain = chain_for(&server);

        assert_eq!(generate_report(None, "GDP", &chain).await, NO_TABLE_MESSAGE);

        let empty = empty_frame().unwrap();
        assert_eq!(
            generate_report(Some(&empty), "GDP", &chain).await,
            NO_TABLE_MESSAGE
        );

        // Rows exist but every value is null
        let all_null = records_to_frame(&[IndicatorRecord {
            country_name: Some("Alpha".into()),
            year: Some(2020),
            ..Default::default()
        }])
        .unwrap();
        assert_eq!(
            generate_report(Some(&all_null), "GDP", &chain).await,
            NOTHING_TO_SUMMARIZE_MESSAGE
        );

        // Rows exist but a required column is missing
        let no_value = DataFrame::new(vec![
            Column::new("country_name".into(), ["Alpha", "Beta"]),
            Column::new("year".into(), [2020i32, 2021]),
        ])
        .unwrap();
        let no_country = DataFrame::new(vec![
            Column::new("country_id".into(), ["AL", "BE"]),
            Column::new("value".into(), [1.0f64, 2.0]),
        ])
        .unwrap();
        for table in [&no_value, &no_country] {
            assert_eq!(
                generate_report(Some(table), "GDP", &chain).await,
                NOTHING_TO_SUMMARIZE_MESSAGE
            );
        }

        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_report_from_local_provider() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200)
                    .json_body(json!({"model": "gemma3:latest", "response": "Alpha grew.", "done": true}));
            })
            .await;

        let table = records_to_frame(&[IndicatorRecord {
            country_name: Some("Alpha".into()),
            year: Some(2020),
            value: Some(1.0),
            ..Default::default()
        }])
        .unwrap();

        let report = generate_report(Some(&table), "GDP", &chain_for(&server)).await;
        assert_eq!(report, "Alpha grew.");
        mock.assert_hits_async(1).await;
    }
}
