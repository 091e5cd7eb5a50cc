//! CLI argument definitions for pricechart.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Resolve the window, fetch series from the backend, print them |
//! | `resolve` | Print the date range a period resolves to |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table, chart) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! PRICECHART_ID_TOKEN=... pricechart fetch AAPL,MSFT --period 3M --pretty
//! pricechart fetch TSLA --period custom --start-date 2024-01-02 --end-date 2024-02-01
//! pricechart resolve --period ytd
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Historical price series for authenticated users.
#[derive(Debug, Parser)]
#[command(
    name = "pricechart",
    author,
    version,
    about = "Fetch and normalize historical price series for charting"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Normalized series as a JSON object.
    Json,
    /// One row per observation.
    Table,
    /// Line-chart option ready for the rendering layer.
    Chart,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch closing-price series for one or more tickers.
    ///
    /// The bearer token is read from --token or PRICECHART_ID_TOKEN.
    ///
    /// # Examples
    ///
    ///   pricechart fetch AAPL
    ///   pricechart fetch aapl,msft googl --period 1Y
    Fetch(FetchArgs),

    /// Show the date range a period code resolves to today.
    Resolve(ResolveArgs),
}

/// Period selection shared by `fetch` and `resolve`.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Period code: 1D, 1W, 1M, 3M, 1Y, YTD, MTD or CUSTOM.
    #[arg(long, default_value = "1M")]
    pub period: String,

    /// First day (YYYY-MM-DD) for --period CUSTOM.
    #[arg(long)]
    pub start_date: Option<String>,

    /// Last day (YYYY-MM-DD) for --period CUSTOM.
    #[arg(long)]
    pub end_date: Option<String>,
}

/// Arguments for the `fetch` command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Tickers, space- or comma-separated (e.g., AAPL,MSFT GOOGL).
    #[arg(required = true, num_args = 1..)]
    pub tickers: Vec<String>,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Market data backend base URL. Defaults to PRICECHART_API_URL.
    #[arg(long)]
    pub api_url: Option<String>,

    /// Request timeout in milliseconds. Defaults to PRICECHART_TIMEOUT_MS or 10000.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Bearer token. Prefer PRICECHART_ID_TOKEN so it stays out of shell history.
    #[arg(long)]
    pub token: Option<String>,
}

/// Arguments for the `resolve` command.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub window: WindowArgs,
}
