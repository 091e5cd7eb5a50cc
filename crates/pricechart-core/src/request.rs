//! Inbound request validation.
//!
//! A [`ChartRequest`] is the loosely shaped body a caller sends. It is turned
//! once into a [`RangeSelection`] and then into a canonical [`StockQuery`];
//! nothing downstream looks at the raw form again.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::range::resolve_at;
use crate::{
    format_iso_date, parse_iso_date, DateRange, PeriodCode, PipelineError, RangeError,
    TickerSymbol, ValidationError,
};

/// Tickers as a caller may send them: `"AAPL, MSFT"` or `["AAPL", "MSFT"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TickerInput {
    Joined(String),
    List(Vec<String>),
}

impl TickerInput {
    /// Both forms skip blank entries, so `"AAPL, "` and `["AAPL", " "]` agree.
    pub fn parse(&self) -> Result<Vec<TickerSymbol>, ValidationError> {
        match self {
            Self::Joined(joined) => TickerSymbol::parse_list(joined),
            Self::List(items) => items
                .iter()
                .filter(|item| !item.trim().is_empty())
                .map(|item| TickerSymbol::parse(item))
                .collect(),
        }
    }
}

/// Raw inbound chart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub tickers: TickerInput,
    #[serde(default)]
    pub period: PeriodCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl ChartRequest {
    pub fn named(tickers: TickerInput, period: PeriodCode) -> Self {
        Self {
            tickers,
            period,
            start_date: None,
            end_date: None,
        }
    }

    pub fn custom(
        tickers: TickerInput,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            tickers,
            period: PeriodCode::Custom,
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }

    /// Decide which range form the caller asked for.
    ///
    /// Blank date fields count as missing, matching what an empty date input submits.
    pub fn selection(&self) -> Result<RangeSelection, RangeError> {
        if !self.period.is_custom() {
            return Ok(RangeSelection::NamedPeriod(self.period));
        }

        let start = optional_date(self.start_date.as_deref())?.ok_or(RangeError::MissingStart)?;
        let end = optional_date(self.end_date.as_deref())?.ok_or(RangeError::MissingEnd)?;
        Ok(RangeSelection::ExplicitRange(DateRange::new(start, end)?))
    }

    /// Validate tickers and range against `today`.
    pub fn into_query(self, today: Date) -> Result<StockQuery, PipelineError> {
        let selection = self.selection()?;
        let tickers = self.tickers.parse()?;
        StockQuery::new(tickers, selection, today)
    }
}

fn optional_date(value: Option<&str>) -> Result<Option<Date>, RangeError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_iso_date(raw).map(Some),
    }
}

/// How the caller chose the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSelection {
    NamedPeriod(PeriodCode),
    ExplicitRange(DateRange),
}

impl RangeSelection {
    pub fn resolve(&self, today: Date) -> Result<DateRange, RangeError> {
        match self {
            Self::NamedPeriod(code) => resolve_at(today, *code, None, None),
            Self::ExplicitRange(range) => {
                resolve_at(today, PeriodCode::Custom, Some(range.start()), Some(range.end()))
            }
        }
    }

    pub const fn period(&self) -> PeriodCode {
        match self {
            Self::NamedPeriod(code) => *code,
            Self::ExplicitRange(_) => PeriodCode::Custom,
        }
    }
}

/// Canonical, validated multi-ticker query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockQuery {
    tickers: Vec<TickerSymbol>,
    range: DateRange,
    selection: RangeSelection,
}

impl StockQuery {
    pub fn new(
        tickers: Vec<TickerSymbol>,
        selection: RangeSelection,
        today: Date,
    ) -> Result<Self, PipelineError> {
        if tickers.is_empty() {
            return Err(ValidationError::NoTickers.into());
        }
        let range = selection.resolve(today)?;

        Ok(Self {
            tickers,
            range,
            selection,
        })
    }

    /// Tickers in caller order, duplicates included.
    pub fn tickers(&self) -> &[TickerSymbol] {
        &self.tickers
    }

    pub const fn range(&self) -> DateRange {
        self.range
    }

    pub const fn selection(&self) -> RangeSelection {
        self.selection
    }

    pub fn has_duplicate_tickers(&self) -> bool {
        self.tickers
            .iter()
            .enumerate()
            .any(|(index, ticker)| self.tickers[..index].contains(ticker))
    }

    /// Body sent to the backend: `period` alone for named windows,
    /// `period: "CUSTOM"` plus both dates for an explicit range.
    pub fn backend_request(&self) -> BackendRequest {
        let (start_date, end_date) = match self.selection {
            RangeSelection::NamedPeriod(_) => (None, None),
            RangeSelection::ExplicitRange(range) => (
                Some(format_iso_date(range.start())),
                Some(format_iso_date(range.end())),
            ),
        };

        BackendRequest {
            tickers: self.tickers.iter().map(|t| t.as_str().to_owned()).collect(),
            period: Some(self.selection.period().as_str().to_owned()),
            start_date,
            end_date,
        }
    }
}

/// Outbound JSON body for the Market Data Backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendRequest {
    pub tickers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    const TODAY: Date = date!(2024 - 06 - 15);

    #[test]
    fn joined_and_list_forms_treat_blank_entries_alike() {
        let joined = TickerInput::Joined(String::from("AAPL, ")).parse();
        let list = TickerInput::List(vec![String::from("AAPL"), String::from(" ")]).parse();
        assert_eq!(joined, list);
        assert_eq!(list.expect("valid").len(), 1);

        let blank_list = ChartRequest::named(
            TickerInput::List(vec![String::new(), String::from("  ")]),
            PeriodCode::OneDay,
        );
        let err = blank_list.into_query(TODAY).expect_err("must fail");
        assert!(matches!(err, PipelineError::Validation(ValidationError::NoTickers)));
    }

    #[test]
    fn accepts_joined_and_list_tickers() {
        let joined: ChartRequest =
            serde_json::from_str(r#"{"tickers":"aapl, msft","period":"1W"}"#).expect("joined");
        let list: ChartRequest =
            serde_json::from_str(r#"{"tickers":["aapl","msft"],"period":"1W"}"#).expect("list");

        assert_eq!(joined.tickers.parse(), list.tickers.parse());
    }

    #[test]
    fn missing_period_defaults_to_one_month() {
        let request: ChartRequest = serde_json::from_str(r#"{"tickers":"AAPL"}"#).expect("parse");
        assert_eq!(request.period, PeriodCode::OneMonth);
    }

    #[test]
    fn named_period_body_carries_period_only() {
        let query = ChartRequest::named(TickerInput::Joined(String::from("aapl,MSFT")), PeriodCode::OneMonth)
            .into_query(TODAY)
            .expect("valid query");

        let body = serde_json::to_value(query.backend_request()).expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({"tickers": ["AAPL", "MSFT"], "period": "1M"})
        );
        assert_eq!(query.range().start(), date!(2024 - 05 - 15));
    }

    #[test]
    fn explicit_range_body_carries_dates() {
        let query = ChartRequest::custom(
            TickerInput::List(vec![String::from("tsla")]),
            "2024-03-01",
            "2024-03-10",
        )
        .into_query(TODAY)
        .expect("valid query");

        let body = query.backend_request();
        assert_eq!(body.period.as_deref(), Some("CUSTOM"));
        assert_eq!(body.start_date.as_deref(), Some("2024-03-01"));
        assert_eq!(body.end_date.as_deref(), Some("2024-03-10"));
    }

    #[test]
    fn blank_custom_dates_are_missing() {
        let request = ChartRequest::custom(TickerInput::Joined(String::from("AAPL")), "", "2024-03-10");
        assert_eq!(request.selection(), Err(RangeError::MissingStart));
    }

    #[test]
    fn inverted_custom_range_fails_before_tickers_are_checked() {
        let request = ChartRequest::custom(TickerInput::Joined(String::new()), "2024-03-10", "2024-03-01");
        let err = request.into_query(TODAY).expect_err("must fail");
        assert!(matches!(err, PipelineError::Range(RangeError::StartAfterEnd { .. })));
    }

    #[test]
    fn empty_ticker_list_is_rejected() {
        let request = ChartRequest::named(TickerInput::Joined(String::from(" , ")), PeriodCode::OneDay);
        let err = request.into_query(TODAY).expect_err("must fail");
        assert!(matches!(err, PipelineError::Validation(ValidationError::NoTickers)));
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let query = ChartRequest::named(TickerInput::Joined(String::from("AAPL,MSFT,aapl")), PeriodCode::OneDay)
            .into_query(TODAY)
            .expect("valid query");
        assert_eq!(query.tickers().len(), 3);
        assert!(query.has_duplicate_tickers());
    }
}
