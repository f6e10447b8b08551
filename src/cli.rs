use clap::Parser;

/// Explore daily bike-rental data: totals by day type and weather factors.
#[derive(Debug, Parser)]
#[command(name = "bike-dash", version, about)]
pub struct Cli {
    /// Dataset to open at startup (path or http(s) URL to .csv/.json/.parquet).
    /// Overrides BIKE_DASH_SOURCE.
    pub source: Option<String>,

    /// Timeout in seconds for remote datasets. Overrides BIKE_DASH_HTTP_TIMEOUT_SECS.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}
