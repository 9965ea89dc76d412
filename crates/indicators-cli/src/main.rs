//! Command-line explorer for World Bank development indicators.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indicators::{
    Credentials, DEFAULT_COUNTRIES, IndicatorClient, IndicatorQuery,
    ProviderChain, ReportConfig, TableSummary, WorldBankProvider, api_key_status,
    generate_report, indicator_label, write_csv,
};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_INDICATOR: &str = "NY.GDP.PCAP.CD";

#[derive(Debug, Parser)]
#[command(name = "indicators")]
#[command(about = "Query World Bank indicators, export them and summarize them with an LLM", long_about = None)]
#[command(version)]
struct Cli {
    /// Country codes, comma separated (defaults to the G7)
    #[arg(short, long, value_delimiter = ',', env = "INDICATORS_COUNTRIES")]
    countries: Vec<String>,

    /// World Bank indicator id
    #[arg(short, long, default_value = DEFAULT_INDICATOR, env = "INDICATORS_INDICATOR")]
    indicator: String,

    /// First year of the range
    #[arg(long, default_value_t = 2010)]
    start: i32,

    /// Last year of the range
    #[arg(long, default_value_t = 2024)]
    end: i32,

    /// Records requested per page
    #[arg(long, default_value_t = IndicatorQuery::DEFAULT_PER_PAGE)]
    per_page: u32,

    /// Number of rows to preview
    #[arg(long, default_value_t = 50)]
    rows: usize,

    /// Write the full table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Generate a language-model report for the table
    #[arg(long)]
    report: bool,
}

impl Cli {
    fn query(&self) -> IndicatorQuery {
        let countries: Vec<String> = if self.countries.is_empty() {
            DEFAULT_COUNTRIES
                .iter()
                .map(|(code, _)| (*code).to_string())
                .collect()
        } else {
            self.countries.clone()
        };
        IndicatorQuery::new(countries, &self.indicator, self.start, self.end)
            .with_per_page(self.per_page)
    }
}

/// One query per run, so there is nothing for a cache to serve.
fn client() -> IndicatorClient {
    IndicatorClient::new(Arc::new(WorldBankProvider::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "indicators=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    debug!(?cli, "Parsed arguments");

    println!("{}", api_key_status().message);

    let query = cli.query();
    let mut table = client()
        .run_query(&query, false)
        .await
        .with_context(|| format!("failed to fetch indicator {}", query.indicator_id()))?;

    if table.height() == 0 {
        println!("No results found for the selected parameters.");
        return Ok(());
    }

    println!("{}", TableSummary::from_frame(&table));
    println!("{}", table.head(Some(cli.rows)));

    if let Some(path) = &cli.csv {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        write_csv(&mut table, BufWriter::new(file))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), rows = table.height(), "Wrote CSV");
    }

    if cli.report {
        let chain = ProviderChain::from_config(&ReportConfig::default(), &Credentials::from_env());
        debug!(providers = ?chain.provider_names(), "Generating report");
        let report = generate_report(Some(&table), indicator_label(query.indicator_id()), &chain).await;
        println!("\n{report}");
    }

    Ok(())
}
