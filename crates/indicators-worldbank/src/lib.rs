#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/indicators/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! World Bank Indicators API source.
//!
//! This crate implements the `indicators-core` traits for the
//! [World Bank Indicators API](https://api.worldbank.org/v2).
//!
//! # Usage
//!
//! ```rust,ignore
//! use indicators_worldbank::WorldBankProvider;
//! use indicators_core::{IndicatorQuery, IndicatorSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = WorldBankProvider::new();
//!     let query = IndicatorQuery::new(["USA", "CAN"], "NY.GDP.PCAP.CD", 2010, 2024);
//!
//!     let table = provider.fetch_indicator(&query).await?;
//!     println!("{table}");
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use indicators_core::{
    IndicatorError, IndicatorQuery, IndicatorRecord, IndicatorSource, Provider, Result,
    dedup_records, empty_frame, records_to_frame,
};
use polars::prelude::DataFrame;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, instrument};

/// Base URL for the World Bank v2 API.
const WORLD_BANK_BASE_URL: &str = "https://api.worldbank.org/v2";

/// Per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on pages with records for one query.
const DEFAULT_MAX_PAGES: u32 = 1000;

/// Environment variable checked by [`api_key_status`].
pub const ENV_API_KEY: &str = "WORLD_BANK_API_KEY";

/// Indicators offered by default, as `(id, label)`.
pub const KNOWN_INDICATORS: &[(&str, &str)] = &[
    ("NY.GDP.PCAP.CD", "GDP per capita (current US$)"),
    ("NY.GDP.MKTP.CD", "GDP (current US$)"),
    ("SP.POP.TOTL", "Population, total"),
    ("NE.EXP.GNFS.ZS", "Exports of goods and services (% of GDP)"),
];

/// Countries selected by default (G7), as `(code, name)`.
pub const DEFAULT_COUNTRIES: &[(&str, &str)] = &[
    ("USA", "United States"),
    ("CAN", "Canada"),
    ("GBR", "United Kingdom"),
    ("FRA", "France"),
    ("DEU", "Germany"),
    ("ITA", "Italy"),
    ("JPN", "Japan"),
];

/// Returns the human-readable label of a known indicator, or the id itself.
#[must_use]
pub fn indicator_label(id: &str) -> &str {
    KNOWN_INDICATORS
        .iter()
        .find(|(known, _)| *known == id)
        .map_or(id, |(_, label)| *label)
}

/// Whether the optional World Bank API key is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyStatus {
    /// True when [`ENV_API_KEY`] holds a non-empty value.
    pub is_set: bool,
    /// Message suitable for a status line.
    pub message: String,
}

/// Reports whether [`ENV_API_KEY`] is set in the environment.
///
/// The API works without a key; this is informational only.
#[must_use]
pub fn api_key_status() -> ApiKeyStatus {
    api_key_status_from(std::env::var(ENV_API_KEY).ok().as_deref())
}

fn api_key_status_from(value: Option<&str>) -> ApiKeyStatus {
    match value {
        Some(v) if !v.is_empty() => ApiKeyStatus {
            is_set: true,
            message: format!("{ENV_API_KEY} is set."),
        },
        _ => ApiKeyStatus {
            is_set: false,
            message: format!(
                "Warning: {ENV_API_KEY} is not set. \
                 The World Bank API often works without a key; you can still run the query."
            ),
        },
    }
}

/// One decoded `[metadata, records]` response.
#[derive(Debug, Clone)]
pub struct Page {
    /// The metadata object (page, pages, per_page, total, ...).
    pub metadata: Value,
    /// The record list; `None` when the API sent `null`.
    pub records: Option<Vec<Value>>,
}

impl Page {
    /// Validates the `[metadata, records]` shape of a response body.
    pub fn from_payload(payload: Value) -> Result<Self> {
        let Value::Array(mut items) = payload else {
            return Err(IndicatorError::ResponseFormat(
                "API response is not a list.".to_string(),
            ));
        };

        if items.len() < 2 {
            let message = items
                .first()
                .and_then(api_message)
                .unwrap_or_else(|| "expected [metadata, records]".to_string());
            return Err(IndicatorError::ResponseFormat(message));
        }

        let records = match items.swap_remove(1) {
            Value::Null => None,
            Value::Array(records) => Some(records),
            other => {
                return Err(IndicatorError::ResponseFormat(format!(
                    "expected a list of records, got {}",
                    json_kind(&other)
                )));
            }
        };

        Ok(Self {
            metadata: items.swap_remove(0),
            records,
        })
    }

    /// Total number of pages reported by the API, if present.
    #[must_use]
    pub fn total_pages(&self) -> Option<u64> {
        self.metadata.get("pages").and_then(lenient_u64)
    }
}

/// World Bank Indicators API source.
///
/// Fetches pages strictly one after another; each request carries its own
/// timeout and no connection state is kept between queries.
#[derive(Debug, Clone)]
pub struct WorldBankProvider {
    client: Client,
    base_url: String,
    timeout: Duration,
    max_pages: u32,
}

impl Default for WorldBankProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldBankProvider {
    /// Create a new World Bank provider with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a new World Bank provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: WORLD_BANK_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Point the provider at another API root (mirrors, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of pages with records for one query.
    ///
    /// One extra page is requested past the cap; the query fails with
    /// [`IndicatorError::PageLimitExceeded`] only if that page still has records.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Build the request URL for one page of `query`.
    #[must_use]
    pub fn build_url(&self, query: &IndicatorQuery, page: u32) -> String {
        format!(
            "{}/country/{}/indicator/{}?date={}:{}&format=json&per_page={}&page={page}",
            self.base_url,
            query.country_codes().join(";"),
            query.indicator_id(),
            query.start_year,
            query.end_year,
            query.per_page,
        )
    }

    /// GET one page and check its shape.
    pub async fn fetch_page(&self, url: &str) -> Result<Page> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| IndicatorError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(IndicatorError::ResponseFormat(format!("HTTP {status}: {text}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| IndicatorError::Network(e.to_string()))?;

        let payload: Value = serde_json::from_str(&text)
            .map_err(|e| IndicatorError::ResponseFormat(format!("invalid JSON: {e}")))?;

        Page::from_payload(payload)
    }

    /// Fetch every page of `query` and combine them into one table.
    #[instrument(skip(self), fields(key = %query.key()))]
    pub async fn fetch_all_pages(&self, query: &IndicatorQuery) -> Result<DataFrame> {
        let per_page = query.per_page as usize;
        let mut pages = Vec::new();
        let mut page = 1;

        loop {
            let fetched = self.fetch_page(&self.build_url(query, page)).await?;
            let total_pages = fetched.total_pages();
            let records = match fetched.records {
                Some(records) if !records.is_empty() => records,
                _ => {
                    debug!(page, "No records on page, stopping");
                    break;
                }
            };

            // The page after the cap is only fetched to confirm the data ended
            if page > self.max_pages {
                return Err(IndicatorError::PageLimitExceeded {
                    max_pages: self.max_pages,
                });
            }

            let normalized = normalize_records(&records)?;
            let count = normalized.len();
            debug!(page, ?total_pages, count, "Fetched World Bank page");
            pages.push(normalized);

            if count < per_page {
                break;
            }
            page += 1;
        }

        combine_pages(pages)
    }
}

impl Provider for WorldBankProvider {
    fn name(&self) -> &str {
        "World Bank"
    }

    fn description(&self) -> &str {
        "World Bank Indicators API (v2) - country development indicators"
    }
}

#[async_trait]
impl IndicatorSource for WorldBankProvider {
    async fn fetch_indicator(&self, query: &IndicatorQuery) -> Result<DataFrame> {
        query.validate()?;
        self.fetch_all_pages(query).await
    }
}

/// Convert raw API records into rows sorted by `(country_name, year)`.
///
/// Missing nested objects and malformed dates or values become `None`;
/// only a record that is not a JSON object is an error.
pub fn normalize_records(records: &[Value]) -> Result<Vec<IndicatorRecord>> {
    let mut rows = records
        .iter()
        .enumerate()
        .map(|(i, record)| -> Result<IndicatorRecord> {
            let obj = record.as_object().ok_or_else(|| {
                IndicatorError::ResponseFormat(format!(
                    "record {i} is {}, expected an object",
                    json_kind(record)
                ))
            })?;

            Ok(IndicatorRecord {
                country_id: nested_text(obj, "country", "id"),
                country_name: nested_text(obj, "country", "value"),
                indicator_id: nested_text(obj, "indicator", "id"),
                indicator_name: nested_text(obj, "indicator", "value"),
                year: obj.get("date").and_then(coerce_year),
                value: obj.get("value").and_then(coerce_value),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    rows.sort_by(IndicatorRecord::cmp_by_country_year);
    Ok(rows)
}

/// Concatenate page rows, drop exact duplicates and build the final table.
pub fn combine_pages(pages: Vec<Vec<IndicatorRecord>>) -> Result<DataFrame> {
    if pages.is_empty() {
        return empty_frame();
    }

    let mut rows = dedup_records(pages.into_iter().flatten().collect());
    rows.sort_by(IndicatorRecord::cmp_by_country_year);
    records_to_frame(&rows)
}

fn nested_text(obj: &Map<String, Value>, outer: &str, inner: &str) -> Option<String> {
    match obj.get(outer)?.as_object()?.get(inner)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|y| i32::try_from(y).ok())
            .or_else(|| n.as_f64().and_then(integral_year)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_year))
        }
        _ => None,
    }
}

fn integral_year(y: f64) -> Option<i32> {
    (y.is_finite() && y.fract() == 0.0 && y.abs() <= f64::from(i32::MAX)).then_some(y as i32)
}

fn coerce_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn lenient_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Extract the text of a World Bank error body: `{"message":[{"key":..,"value":..}]}`.
fn api_message(meta: &Value) -> Option<String> {
    let messages = meta.get("message")?.as_array()?;
    let parts: Vec<String> = messages
        .iter()
        .map(|m| {
            let key = m.get("key").and_then(Value::as_str).unwrap_or_default();
            let value = m.get("value").and_then(Value::as_str).unwrap_or_default();
            match (key.is_empty(), value.is_empty()) {
                (false, false) => format!("{key}: {value}"),
                (false, true) => key.to_string(),
                _ => value.to_string(),
            }
        })
        .filter(|s| !s.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join("; "))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const PATH: &str = "/country/USA;CAN/indicator/SP.POP.TOTL";

    fn wb_record(code: &str, name: &str, year: &str, value: Option<f64>) -> Value {
        json!({
            "indicator": {"id": "SP.POP.TOTL", "value": "Population, total"},
            "country": {"id": code, "value": name},
            "countryiso3code": "",
            "date": year,
            "value": value,
            "unit": "",
            "obs_status": "",
            "decimal": 0
        })
    }

    fn wb_page(page: u32, pages: u32, records: Vec<Value>) -> Value {
        json!([
            {"page": page, "pages": pages, "per_page": "2", "total": 5, "sourceid": "2"},
            records
        ])
    }

    fn query() -> IndicatorQuery {
        IndicatorQuery::new(["usa", " can"], "SP.POP.TOTL", 2018, 2020).with_per_page(2)
    }

    #[test]
    fn test_build_url() {
        let provider = WorldBankProvider::new();
        let query = IndicatorQuery::new([" usa", "", "can "], " NY.GDP.PCAP.CD ", 2010, 2024);
        assert_eq!(
            provider.build_url(&query, 1),
            "https://api.worldbank.org/v2/country/USA;CAN/indicator/NY.GDP.PCAP.CD\
             ?date=2010:2024&format=json&per_page=20000&page=1"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = WorldBankProvider::new().with_base_url("http://localhost:8080/v2/");
        let url = provider.build_url(&query(), 3);
        assert!(url.starts_with("http://localhost:8080/v2/country/USA;CAN/"));
        assert!(url.ends_with("per_page=2&page=3"));
    }

    #[test]
    fn test_provider_metadata() {
        let provider = WorldBankProvider::default();
        assert_eq!(provider.name(), "World Bank");
        assert!(!provider.description().is_empty());
    }

    #[test]
    fn test_indicator_label() {
        assert_eq!(indicator_label("SP.POP.TOTL"), "Population, total");
        assert_eq!(indicator_label("EN.ATM.CO2E.KT"), "EN.ATM.CO2E.KT");
        assert_eq!(DEFAULT_COUNTRIES.len(), 7);
    }

    #[test]
    fn test_api_key_status_messages() {
        let set = api_key_status_from(Some("abc"));
        assert!(set.is_set);
        assert_eq!(set.message, "WORLD_BANK_API_KEY is set.");

        for missing in [None, Some("")] {
            let status = api_key_status_from(missing);
            assert!(!status.is_set);
            assert!(status.message.starts_with("Warning: WORLD_BANK_API_KEY is not set."));
        }
    }

    #[test]
    fn test_normalize_records_tolerates_missing_fields() {
        let records = vec![
            wb_record("US", "United States", "2020", Some(331.0)),
            json!({"date": "2019", "value": 5.0}),
            json!({"country": null, "indicator": {"id": "SP.POP.TOTL"}, "date": "MRV", "value": "n/a"}),
            wb_record("CA", "Canada", "2019", None),
        ];

        let rows = normalize_records(&records).unwrap();
        assert_eq!(rows.len(), 4);

        // Sorted by country name, missing names last
        assert_eq!(rows[0].country_name.as_deref(), Some("Canada"));
        assert_eq!(rows[0].value, None);
        assert_eq!(rows[1].country_id.as_deref(), Some("US"));
        assert_eq!(rows[1].year, Some(2020));
        assert_eq!(rows[1].indicator_name.as_deref(), Some("Population, total"));

        // Missing nested objects become None; the dated row sorts before the undated one
        assert_eq!(rows[2].country_name, None);
        assert_eq!(rows[2].year, Some(2019));
        assert_eq!(rows[2].value, Some(5.0));
        assert_eq!(rows[3].year, None);
        assert_eq!(rows[3].value, None);
        assert_eq!(rows[3].indicator_id.as_deref(), Some("SP.POP.TOTL"));
    }

    #[test]
    fn test_normalize_rejects_non_object_record() {
        let err = normalize_records(&[json!("oops")]).unwrap_err();
        assert!(matches!(err, IndicatorError::ResponseFormat(_)));
    }

    #[test]
    fn test_coerce_year() {
        assert_eq!(coerce_year(&json!("2021")), Some(2021));
        assert_eq!(coerce_year(&json!(" 1999 ")), Some(1999));
        assert_eq!(coerce_year(&json!(2005)), Some(2005));
        assert_eq!(coerce_year(&json!(2005.0)), Some(2005));
        assert_eq!(coerce_year(&json!("2020Q1")), None);
        assert_eq!(coerce_year(&json!(2020.5)), None);
        assert_eq!(coerce_year(&Value::Null), None);
    }

    #[test]
    fn test_page_shape_errors() {
        assert!(matches!(
            Page::from_payload(json!({"page": 1})),
            Err(IndicatorError::ResponseFormat(_))
        ));
        assert!(matches!(
            Page::from_payload(json!([{"page": 1}, "nope"])),
            Err(IndicatorError::ResponseFormat(_))
        ));

        let err = Page::from_payload(json!([{
            "message": [{"id": "120", "key": "Invalid value", "value": "The provided parameter value is not valid"}]
        }]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected response format: Invalid value: The provided parameter value is not valid"
        );

        let page = Page::from_payload(json!([{"page": 1, "pages": "4"}, null])).unwrap();
        assert!(page.records.is_none());
        assert_eq!(page.total_pages(), Some(4));
    }

    #[test]
    fn test_combine_pages_empty() {
        let df = combine_pages(Vec::new()).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 6);
    }

    #[tokio::test]
    async fn test_pagination_full_pages_then_short_page() {
        let server = MockServer::start_async().await;

        let page1 = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("page", "1");
                then.status(200).json_body(wb_page(
                    1,
                    3,
                    vec![
                        wb_record("US", "United States", "2020", Some(331.5)),
                        wb_record("CA", "Canada", "2020", Some(38.0)),
                    ],
                ));
            })
            .await;
        // Page 2 repeats a row from page 1
        let page2 = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("page", "2");
                then.status(200).json_body(wb_page(
                    2,
                    3,
                    vec![
                        wb_record("CA", "Canada", "2020", Some(38.0)),
                        wb_record("CA", "Canada", "2019", Some(37.6)),
                    ],
                ));
            })
            .await;
        let page3 = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(PATH)
                    .query_param("page", "3")
                    .query_param("date", "2018:2020")
                    .query_param("format", "json")
                    .query_param("per_page", "2");
                then.status(200).json_body(wb_page(
                    3,
                    3,
                    vec![wb_record("US", "United States", "2019", Some(328.2))],
                ));
            })
            .await;

        let provider = WorldBankProvider::new().with_base_url(server.base_url());
        let df = provider.fetch_indicator(&query()).await.unwrap();

        page1.assert_hits_async(1).await;
        page2.assert_hits_async(1).await;
        page3.assert_hits_async(1).await;

        assert_eq!(df.height(), 4);
        let names: Vec<_> = df
            .column("country_name")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        let years: Vec<_> = df.column("year").unwrap().i32().unwrap().into_iter().collect();
        assert_eq!(
            names,
            vec![
                Some("Canada"),
                Some("Canada"),
                Some("United States"),
                Some("United States")
            ]
        );
        assert_eq!(years, vec![Some(2019), Some(2020), Some(2019), Some(2020)]);
    }

    #[tokio::test]
    async fn test_short_first_page_is_single_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200).json_body(wb_page(
                    1,
                    1,
                    vec![wb_record("US", "United States", "2020", Some(1.0))],
                ));
            })
            .await;

        let provider = WorldBankProvider::new().with_base_url(server.base_url());
        let df = provider.fetch_all_pages(&query()).await.unwrap();

        mock.assert_hits_async(1).await;
        assert_eq!(df.height(), 1);
    }

    #[tokio::test]
    async fn test_null_records_yield_empty_table() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200)
                    .json_body(json!([{"page": 0, "pages": 0, "per_page": 2, "total": 0}, null]));
            })
            .await;

        let provider = WorldBankProvider::new().with_base_url(server.base_url());
        let df = provider.fetch_all_pages(&query()).await.unwrap();

        mock.assert_hits_async(1).await;
        assert_eq!(df.height(), 0);
    }

    #[tokio::test]
    async fn test_http_error_is_response_format_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(502).body("bad gateway");
            })
            .await;

        let provider = WorldBankProvider::new().with_base_url(server.base_url());
        let err = provider.fetch_all_pages(&query()).await.unwrap_err();

        match err {
            IndicatorError::ResponseFormat(msg) => assert!(msg.contains("502"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_response_format_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let provider = WorldBankProvider::new().with_base_url(server.base_url());
        let err = provider.fetch_all_pages(&query()).await.unwrap_err();
        assert!(matches!(err, IndicatorError::ResponseFormat(_)));
    }

    #[tokio::test]
    async fn test_page_cap_stops_endless_full_pages() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200).json_body(wb_page(
                    1,
                    1,
                    vec![
                        wb_record("US", "United States", "2020", Some(1.0)),
                        wb_record("CA", "Canada", "2020", Some(2.0)),
                    ],
                ));
            })
            .await;

        let provider = WorldBankProvider::new()
            .with_base_url(server.base_url())
            .with_max_pages(3);
        let err = provider.fetch_all_pages(&query()).await.unwrap_err();

        assert!(matches!(err, IndicatorError::PageLimitExceeded { max_pages: 3 }));
        mock.assert_hits_async(4).await;
    }

    #[tokio::test]
    async fn test_data_ending_exactly_at_page_cap_succeeds() {
        let server = MockServer::start_async().await;
        let page1 = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("page", "1");
                then.status(200).json_body(wb_page(
                    1,
                    2,
                    vec![
                        wb_record("US", "United States", "2020", Some(1.0)),
                        wb_record("CA", "Canada", "2020", Some(2.0)),
                    ],
                ));
            })
            .await;
        let page2 = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("page", "2");
                then.status(200).json_body(wb_page(
                    2,
                    2,
                    vec![
                        wb_record("US", "United States", "2019", Some(3.0)),
                        wb_record("CA", "Canada", "2019", Some(4.0)),
                    ],
                ));
            })
            .await;
        let page3 = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("page", "3");
                then.status(200)
                    .json_body(json!([{"page": 3, "pages": 2, "per_page": 2, "total": 4}, []]));
            })
            .await;

        let provider = WorldBankProvider::new()
            .with_base_url(server.base_url())
            .with_max_pages(2);
        let df = provider.fetch_all_pages(&query()).await.unwrap();

        assert_eq!(df.height(), 4);
        page1.assert_hits_async(1).await;
        page2.assert_hits_async(1).await;
        page3.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_empty_record_list_ends_pagination() {
        let server = MockServer::start_async().await;
        let page1 = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("page", "1");
                then.status(200).json_body(wb_page(
                    1,
                    2,
                    vec![
                        wb_record("US", "United States", "2020", Some(1.0)),
                        wb_record("CA", "Canada", "2020", Some(2.0)),
                    ],
                ));
            })
            .await;
        let page2 = server
            .mock_async(|when, then| {
                when.method(GET).path(PATH).query_param("page", "2");
                then.status(200)
                    .json_body(json!([{"page": 2, "pages": 1, "per_page": 2, "total": 2}, []]));
            })
            .await;

        let provider = WorldBankProvider::new().with_base_url(server.base_url());
        let df = provider.fetch_all_pages(&query()).await.unwrap();

        assert_eq!(df.height(), 2);
        page1.assert_hits_async(1).await;
        page2.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_invalid_query_makes_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200).json_body(wb_page(1, 1, vec![]));
            })
            .await;

        let provider = WorldBankProvider::new().with_base_url(server.base_url());
        let inverted = IndicatorQuery::new(["USA"], "SP.POP.TOTL", 2021, 2020);
        let err = provider.fetch_indicator(&inverted).await.unwrap_err();

        assert!(err.is_validation());
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        let provider = WorldBankProvider::new()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let err = provider.fetch_all_pages(&query()).await.unwrap_err();
        assert!(matches!(err, IndicatorError::Network(_)));
    }
}
