//! Backend series payload and its chart-ready normal form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ObservationTime, TickerSymbol, ValidationError};

/// One backend observation. OHLC fields other than the close are ignored.
///
/// Field names are accepted lower-case or in the capitalized dataframe
/// export form (`Date`, `Close`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeriesPoint {
    #[serde(alias = "Date", alias = "Datetime", alias = "timestamp")]
    pub date: ObservationTime,
    #[serde(alias = "Close", default)]
    pub close: Option<f64>,
}

impl RawSeriesPoint {
    pub fn new(date: ObservationTime, close: f64) -> Self {
        Self {
            date,
            close: Some(close),
        }
    }
}

/// Per-ticker observations exactly as the backend returned them.
///
/// Keys are normalized while decoding; two keys that normalize to the same
/// ticker (`"aapl"` and `"AAPL"`) are rejected rather than merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<RawSeriesPoint>>",
    into = "BTreeMap<TickerSymbol, Vec<RawSeriesPoint>>"
)]
pub struct RawSeriesResponse(BTreeMap<TickerSymbol, Vec<RawSeriesPoint>>);

impl TryFrom<BTreeMap<String, Vec<RawSeriesPoint>>> for RawSeriesResponse {
    type Error = ValidationError;

    fn try_from(value: BTreeMap<String, Vec<RawSeriesPoint>>) -> Result<Self, Self::Error> {
        let mut series = BTreeMap::new();
        for (key, points) in value {
            let ticker = TickerSymbol::parse(&key)?;
            if series.contains_key(&ticker) {
                return Err(ValidationError::DuplicateSeries {
                    ticker: ticker.as_str().to_owned(),
                });
            }
            series.insert(ticker, points);
        }
        Ok(Self(series))
    }
}

impl From<RawSeriesResponse> for BTreeMap<TickerSymbol, Vec<RawSeriesPoint>> {
    fn from(value: RawSeriesResponse) -> Self {
        value.0
    }
}

impl RawSeriesResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: TickerSymbol, points: Vec<RawSeriesPoint>) {
        self.0.insert(ticker, points);
    }

    pub fn with_series(mut self, ticker: TickerSymbol, points: Vec<RawSeriesPoint>) -> Self {
        self.insert(ticker, points);
        self
    }

    pub fn get(&self, ticker: &TickerSymbol) -> Option<&[RawSeriesPoint]> {
        self.0.get(ticker).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One `(timestamp, close)` pair, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "(ObservationTime, f64)", from = "(ObservationTime, f64)")]
pub struct SeriesPoint {
    pub timestamp: ObservationTime,
    pub close: f64,
}

impl From<SeriesPoint> for (ObservationTime, f64) {
    fn from(value: SeriesPoint) -> Self {
        (value.timestamp, value.close)
    }
}

impl From<(ObservationTime, f64)> for SeriesPoint {
    fn from((timestamp, close): (ObservationTime, f64)) -> Self {
        Self { timestamp, close }
    }
}

/// Chart-ready series: one entry per ticker, points ascending by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedSeries(BTreeMap<TickerSymbol, Vec<SeriesPoint>>);

impl NormalizedSeries {
    pub fn get(&self, ticker: &TickerSymbol) -> Option<&[SeriesPoint]> {
        self.0.get(ticker).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TickerSymbol, &[SeriesPoint])> {
        self.0.iter().map(|(ticker, points)| (ticker, points.as_slice()))
    }

    pub fn tickers(&self) -> impl Iterator<Item = &TickerSymbol> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// An empty result means "nothing to draw", not a failure.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Requested tickers the backend did not return, in request order, deduplicated.
    pub fn missing_tickers(&self, requested: &[TickerSymbol]) -> Vec<TickerSymbol> {
        let mut missing: Vec<TickerSymbol> = Vec::new();
        for ticker in requested {
            if !self.0.contains_key(ticker) && !missing.contains(ticker) {
                missing.push(ticker.clone());
            }
        }
        missing
    }
}

impl From<NormalizedSeries> for RawSeriesResponse {
    fn from(value: NormalizedSeries) -> Self {
        Self(
            value
                .0
                .into_iter()
                .map(|(ticker, points)| {
                    let raw = points
                        .into_iter()
                        .map(|point| RawSeriesPoint::new(point.timestamp, point.close))
                        .collect();
                    (ticker, raw)
                })
                .collect(),
        )
    }
}

/// Reshape a backend payload into chart-ready series.
///
/// Points without a finite close are dropped. Each series is stably sorted by
/// timestamp, so chronologically ordered input keeps its order and unordered
/// input cannot produce a zig-zagging line. Tickers missing from `raw` stay
/// missing.
pub fn normalize(raw: RawSeriesResponse) -> NormalizedSeries {
    let series = raw
        .0
        .into_iter()
        .map(|(ticker, points)| {
            let received = points.len();
            let mut normalized: Vec<SeriesPoint> = points
                .into_iter()
                .filter_map(|point| match point.close {
                    Some(close) if close.is_finite() => Some(SeriesPoint {
                        timestamp: point.date,
                        close,
                    }),
                    _ => None,
                })
                .collect();

            if normalized.len() < received {
                debug!(
                    ticker = %ticker,
                    dropped = received - normalized.len(),
                    "dropped observations without a close price"
                );
            }

            normalized.sort_by_key(|point| point.timestamp);
            (ticker, normalized)
        })
        .collect();

    NormalizedSeries(series)
}
