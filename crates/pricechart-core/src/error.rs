use thiserror::Error;

use crate::GatewayError;

/// Input validation errors exposed by `pricechart-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter or digit: '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },
    #[error("request must include at least one ticker")]
    NoTickers,
    #[error("series for '{ticker}' appears more than once under different spellings")]
    DuplicateSeries { ticker: String },

    #[error("invalid period '{value}', expected one of 1D, 1W, 1M, 3M, 1Y, YTD, MTD, CUSTOM")]
    InvalidPeriod { value: String },

    #[error("observation time must be an ISO date, RFC3339 timestamp or epoch millis: '{value}'")]
    InvalidObservationTime { value: String },
}

/// Rejected date range input. Raised locally, before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("custom range requires a start date")]
    MissingStart,
    #[error("custom range requires an end date")]
    MissingEnd,
    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: String, end: String },
    #[error("date must be formatted YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("date arithmetic left the supported calendar range")]
    OutOfCalendar,
}

/// Top-level error for one resolve -> fetch -> normalize run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl PipelineError {
    /// Outcome status surfaced to the caller.
    pub const fn status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Range(_) => 400,
            Self::Gateway(error) => error.status(),
        }
    }
}
