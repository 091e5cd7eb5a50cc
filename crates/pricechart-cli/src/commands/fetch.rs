use pricechart_core::{
    BearerToken, ChartOption, ChartPipeline, GatewayConfig, NormalizedSeries, QueryGateway,
    StaticTokenProvider, TickerSymbol,
};
use serde::Serialize;
use tracing::debug;

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::{chart_request, CommandResult};

pub const TOKEN_ENV: &str = "PRICECHART_ID_TOKEN";

#[derive(Debug, Serialize)]
struct FetchResponseData<'a> {
    period: &'static str,
    start_date: String,
    end_date: String,
    series: &'a NormalizedSeries,
}

pub async fn run(args: &FetchArgs) -> Result<CommandResult, CliError> {
    let request = chart_request(&args.tickers, &args.window)?;

    let mut config = GatewayConfig::from_env();
    if let Some(api_url) = &args.api_url {
        config.base_url = api_url.clone();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    debug!(endpoint = %config.endpoint(), timeout_ms = config.timeout_ms, "gateway configured");

    let tokens = match args.token.as_deref() {
        Some(raw) => StaticTokenProvider::new(BearerToken::new(raw)),
        None => StaticTokenProvider::from_env(TOKEN_ENV),
    };

    let pipeline = ChartPipeline::new(QueryGateway::new(config));
    let result = pipeline.run(request, &tokens).await?;

    let range = result.query.range();
    let data = serde_json::to_value(FetchResponseData {
        period: result.query.selection().period().as_str(),
        start_date: pricechart_core::format_iso_date(range.start()),
        end_date: pricechart_core::format_iso_date(range.end()),
        series: &result.series,
    })?;
    let chart = ChartOption::for_query(&result.series, result.query.tickers())
        .map(serde_json::to_value)
        .transpose()?;

    let mut command_result = CommandResult::ok(data)
        .with_request_id(result.request_id)
        .with_chart(chart)
        .with_table(vec!["ticker", "timestamp", "close"], table_rows(&result.series));

    if result.series.is_empty() {
        command_result = command_result.with_warning("backend returned no series; nothing to draw");
    }
    if !result.missing.is_empty() {
        let names: Vec<&str> = result.missing.iter().map(TickerSymbol::as_str).collect();
        command_result =
            command_result.with_warning(format!("no data returned for: {}", names.join(", ")));
    }

    Ok(command_result)
}

fn table_rows(series: &NormalizedSeries) -> Vec<Vec<String>> {
    series
        .iter()
        .flat_map(|(ticker, points)| {
            points.iter().map(move |point| {
                vec![
                    ticker.as_str().to_owned(),
                    point.timestamp.to_string(),
                    format!("{:.2}", point.close),
                ]
            })
        })
        .collect()
}
