//! # Pricechart Core
//!
//! Historical price charts for authenticated users, minus the UI.
//!
//! ## Overview
//!
//! - **Range Resolver** turns a period code (`1D` .. `MTD`, `CUSTOM`) into
//!   an inclusive calendar range
//! - **Query Gateway** relays one validated multi-ticker query to the Market
//!   Data Backend with the caller's bearer token attached
//! - **Series Normalizer** reshapes the backend's per-ticker records into
//!   chronologically ordered `(timestamp, close)` series
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`chart`] | Line-chart option for the rendering layer |
//! | [`domain`] | Tickers, period codes, date ranges, observation times |
//! | [`error`] | Validation, range and pipeline errors |
//! | [`gateway`] | Authenticated backend relay and error translation |
//! | [`http_client`] | HTTP transport seam |
//! | [`identity`] | Bearer tokens and the Identity Provider seam |
//! | [`pipeline`] | Resolve -> fetch -> normalize orchestration |
//! | [`range`] | Period code resolution |
//! | [`request`] | Inbound request validation and backend body |
//! | [`series`] | Raw and normalized series |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pricechart_core::{
//!     ChartPipeline, ChartRequest, GatewayConfig, PeriodCode, QueryGateway,
//!     StaticTokenProvider, TickerInput,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = ChartPipeline::new(QueryGateway::new(GatewayConfig::from_env()));
//!     let tokens = StaticTokenProvider::from_env("PRICECHART_ID_TOKEN");
//!
//!     let request = ChartRequest::named(TickerInput::Joined("AAPL,MSFT".into()), PeriodCode::OneMonth);
//!     let result = pipeline.run(request, &tokens).await?;
//!     println!("{}", serde_json::to_string(&result.series)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Security
//!
//! - Bearer tokens are redacted from `Debug`/`Display` and never logged
//! - A query without a token fails before any network call

pub mod chart;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod identity;
pub mod pipeline;
pub mod range;
pub mod request;
pub mod series;

pub use chart::{ChartAxis, ChartLegend, ChartOption, ChartTitle, ChartTooltip, LineSeries};

pub use domain::{
    format_iso_date, parse_iso_date, DateRange, ObservationTime, PeriodCode, TickerSymbol,
};

pub use error::{PipelineError, RangeError, ValidationError};

pub use gateway::{
    GatewayConfig, GatewayError, GatewayErrorKind, QueryGateway, API_URL_ENV,
    DEFAULT_ERROR_STATUS, TIMEOUT_ENV,
};

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
    DEFAULT_TIMEOUT_MS,
};

pub use identity::{
    AuthState, AuthStateReceiver, BearerToken, IdentitySession, StaticTokenProvider,
    TokenProvider,
};

pub use pipeline::{ChartPipeline, ChartResult};

pub use range::{resolve, resolve_at};

pub use request::{BackendRequest, ChartRequest, RangeSelection, StockQuery, TickerInput};

pub use series::{normalize, NormalizedSeries, RawSeriesPoint, RawSeriesResponse, SeriesPoint};
