//! End-to-end scenarios: request in, chart-ready series out.

mod support;

use pricechart_core::{
    normalize, BearerToken, ChartOption, ChartPipeline, ChartRequest, GatewayErrorKind,
    IdentitySession, ObservationTime, PeriodCode, PipelineError, RangeError, RawSeriesResponse,
    StaticTokenProvider, TickerInput, TickerSymbol,
};
use support::{gateway_for, RecordingHttpClient, SCENARIO_PAYLOAD};
use time::macros::date;
use time::Date;

const TODAY: Date = date!(2024 - 06 - 15);

fn signed_in() -> StaticTokenProvider {
    StaticTokenProvider::new(BearerToken::new("id-token"))
}

fn ticker(raw: &str) -> TickerSymbol {
    TickerSymbol::parse(raw).expect("valid ticker")
}

#[tokio::test]
async fn one_month_multi_ticker_scenario() {
    // Given: a backend holding one close per ticker
    let client = RecordingHttpClient::responding(200, SCENARIO_PAYLOAD);
    let pipeline = ChartPipeline::new(gateway_for(client.clone()));
    let request = ChartRequest::named(
        TickerInput::List(vec![String::from("aapl"), String::from("MSFT")]),
        PeriodCode::OneMonth,
    );

    // When: the user charts the trailing month
    let result = pipeline
        .run_at(TODAY, request, &signed_in())
        .await
        .expect("pipeline should succeed");

    // Then: the range is (today - 1 month, today) and one call carried the period
    assert_eq!(result.query.range().start(), date!(2024 - 05 - 15));
    assert_eq!(result.query.range().end(), TODAY);

    let body = client.only_body();
    assert_eq!(body.tickers, vec![String::from("AAPL"), String::from("MSFT")]);
    assert_eq!(body.period.as_deref(), Some("1M"));
    assert_eq!(body.start_date, None);

    // And: the series are the backend's closes keyed by ticker
    let json = serde_json::to_value(&result.series).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!({
            "AAPL": [["2024-01-01", 150.0]],
            "MSFT": [["2024-01-01", 300.0]]
        })
    );
    assert!(result.missing.is_empty());
}

#[tokio::test]
async fn backend_failure_scenario_surfaces_detail_and_status() {
    let client = RecordingHttpClient::responding(500, r#"{"detail":"rate limited"}"#);
    let pipeline = ChartPipeline::new(gateway_for(client));
    let request = ChartRequest::named(TickerInput::Joined(String::from("AAPL")), PeriodCode::OneWeek);

    let error = pipeline
        .run_at(TODAY, request, &signed_in())
        .await
        .expect_err("backend failure must surface");

    match &error {
        PipelineError::Gateway(gateway) => {
            assert_eq!(gateway.kind(), GatewayErrorKind::Upstream);
            assert_eq!(gateway.message(), "rate limited");
        }
        other => panic!("expected gateway error, got {other:?}"),
    }
    assert_eq!(error.status(), 500);
}

#[tokio::test]
async fn inverted_custom_range_fails_before_any_network_call() {
    let client = RecordingHttpClient::responding(200, SCENARIO_PAYLOAD);
    let pipeline = ChartPipeline::new(gateway_for(client.clone()));
    let request = ChartRequest::custom(
        TickerInput::Joined(String::from("AAPL")),
        "2024-03-10",
        "2024-03-01",
    );

    let error = pipeline
        .run_at(TODAY, request, &signed_in())
        .await
        .expect_err("inverted range must fail");

    assert!(matches!(
        error,
        PipelineError::Range(RangeError::StartAfterEnd { .. })
    ));
    assert_eq!(error.status(), 400);
    assert!(client.recorded_requests().is_empty());
}

#[tokio::test]
async fn range_errors_win_over_missing_token() {
    let client = RecordingHttpClient::responding(200, SCENARIO_PAYLOAD);
    let pipeline = ChartPipeline::new(gateway_for(client.clone()));
    let request = ChartRequest {
        tickers: TickerInput::Joined(String::from("AAPL")),
        period: PeriodCode::Custom,
        start_date: None,
        end_date: Some(String::from("2024-03-01")),
    };

    let error = pipeline
        .run_at(TODAY, request, &IdentitySession::signed_out())
        .await
        .expect_err("must fail");

    assert!(matches!(error, PipelineError::Range(RangeError::MissingStart)));
    assert!(client.recorded_requests().is_empty());
}

#[tokio::test]
async fn partial_results_are_accepted_and_reported() {
    let client = RecordingHttpClient::responding(
        200,
        r#"{"data":{"AAPL":[{"Date":"2024-06-14T00:00:00","Close":212.49}]}}"#,
    );
    let pipeline = ChartPipeline::new(gateway_for(client));
    let request = ChartRequest::named(TickerInput::Joined(String::from("AAPL,NOPE")), PeriodCode::OneDay);

    let result = pipeline
        .run_at(TODAY, request, &signed_in())
        .await
        .expect("partial result is not an error");

    assert_eq!(result.series.len(), 1);
    assert_eq!(result.missing, vec![ticker("NOPE")]);
}

#[tokio::test]
async fn empty_payload_is_nothing_to_draw() {
    let client = RecordingHttpClient::responding(200, r#"{"data":{}}"#);
    let pipeline = ChartPipeline::new(gateway_for(client));
    let request = ChartRequest::named(TickerInput::Joined(String::from("AAPL")), PeriodCode::YearToDate);

    let result = pipeline
        .run_at(TODAY, request, &signed_in())
        .await
        .expect("empty data is not an error");

    assert!(result.series.is_empty());
    assert!(ChartOption::from_series(&result.series).is_none());
}

#[tokio::test]
async fn overlapping_queries_produce_independent_results() {
    let first_client = RecordingHttpClient::responding(200, SCENARIO_PAYLOAD);
    let second_client = RecordingHttpClient::responding(200, r#"{"data":{}}"#);
    let first = ChartPipeline::new(gateway_for(first_client));
    let second = ChartPipeline::new(gateway_for(second_client));
    let tokens = signed_in();

    let (a, b) = tokio::join!(
        first.run_at(
            TODAY,
            ChartRequest::named(TickerInput::Joined(String::from("AAPL,MSFT")), PeriodCode::OneMonth),
            &tokens,
        ),
        second.run_at(
            TODAY,
            ChartRequest::named(TickerInput::Joined(String::from("AAPL")), PeriodCode::OneMonth),
            &tokens,
        ),
    );

    let a = a.expect("first query");
    let b = b.expect("second query");
    assert_ne!(a.request_id, b.request_id);
    assert_eq!(a.series.len(), 2);
    assert!(b.series.is_empty());
}

#[test]
fn normalize_is_idempotent_through_identity_mapping() {
    let raw: RawSeriesResponse = serde_json::from_str(
        r#"{
            "AAPL": [
                {"date": "2024-01-03", "close": 3.0},
                {"date": "2024-01-01", "close": 1.0},
                {"date": "2024-01-02", "close": null}
            ],
            "MSFT": [{"date": 1704067200000, "close": 300.0}]
        }"#,
    )
    .expect("decode");

    let once = normalize(raw);
    let twice = normalize(RawSeriesResponse::from(once.clone()));
    assert_eq!(once, twice);

    let msft = once.get(&ticker("MSFT")).expect("series");
    assert_eq!(
        msft[0].timestamp,
        ObservationTime::parse("2024-01-01T00:00:00Z").expect("timestamp")
    );
}

#[test]
fn normalize_of_empty_mapping_is_empty() {
    assert!(normalize(RawSeriesResponse::new()).is_empty());
}
