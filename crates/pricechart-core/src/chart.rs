//! Line-chart option consumed by the rendering layer.
//!
//! The shape follows the option object of common JavaScript charting
//! libraries: a time x-axis, a scaled value y-axis and one smoothed line per
//! ticker whose data are `[timestamp, close]` pairs.

use serde::{Deserialize, Serialize};

use crate::{NormalizedSeries, SeriesPoint, TickerSymbol};

const DEFAULT_TITLE: &str = "Stock Prices";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTitle {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTooltip {
    pub trigger: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLegend {
    pub data: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartAxis {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_gap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Vec<SeriesPoint>,
    pub smooth: bool,
}

/// Complete multi-series chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
    pub title: ChartTitle,
    pub tooltip: ChartTooltip,
    pub legend: ChartLegend,
    pub x_axis: ChartAxis,
    pub y_axis: ChartAxis,
    pub series: Vec<LineSeries>,
}

impl ChartOption {
    /// Build the chart for `series` with lines in ticker order; `None` when there is nothing to draw.
    pub fn from_series(series: &NormalizedSeries) -> Option<Self> {
        Self::titled(DEFAULT_TITLE, series, &[])
    }

    /// Build the chart with lines in the order the tickers were requested.
    pub fn for_query(series: &NormalizedSeries, requested: &[TickerSymbol]) -> Option<Self> {
        Self::titled(DEFAULT_TITLE, series, requested)
    }

    /// Lines follow `order`; returned tickers not in `order` come after, alphabetically.
    pub fn titled(
        title: impl Into<String>,
        series: &NormalizedSeries,
        order: &[TickerSymbol],
    ) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let mut ordered: Vec<(&TickerSymbol, &[SeriesPoint])> = Vec::with_capacity(series.len());
        for ticker in order {
            if ordered.iter().any(|(seen, _)| *seen == ticker) {
                continue;
            }
            if let Some(points) = series.get(ticker) {
                ordered.push((ticker, points));
            }
        }
        for (ticker, points) in series.iter() {
            if !order.contains(ticker) {
                ordered.push((ticker, points));
            }
        }

        let lines: Vec<LineSeries> = ordered
            .into_iter()
            .map(|(ticker, points)| LineSeries {
                name: ticker.as_str().to_owned(),
                kind: String::from("line"),
                data: points.to_vec(),
                smooth: true,
            })
            .collect();

        Some(Self {
            title: ChartTitle { text: title.into() },
            tooltip: ChartTooltip {
                trigger: String::from("axis"),
            },
            legend: ChartLegend {
                data: lines.iter().map(|line| line.name.clone()).collect(),
            },
            x_axis: ChartAxis {
                kind: String::from("time"),
                boundary_gap: Some(false),
                scale: None,
            },
            y_axis: ChartAxis {
                kind: String::from("value"),
                boundary_gap: None,
                scale: Some(true),
            },
            series: lines,
        })
    }
}
