//! Resolve -> fetch -> normalize as one request/response boundary.

use time::{Date, OffsetDateTime};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{
    normalize, ChartRequest, NormalizedSeries, PipelineError, QueryGateway, StockQuery,
    TickerSymbol, TokenProvider,
};

/// Result of one completed chart query.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartResult {
    pub request_id: Uuid,
    pub query: StockQuery,
    pub series: NormalizedSeries,
    /// Requested tickers absent from the backend payload. Not an error.
    pub missing: Vec<TickerSymbol>,
}

/// Orchestrates a single chart query. Each run owns its query, token snapshot and result.
#[derive(Clone)]
pub struct ChartPipeline {
    gateway: QueryGateway,
}

impl ChartPipeline {
    pub fn new(gateway: QueryGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &QueryGateway {
        &self.gateway
    }

    pub async fn run(
        &self,
        request: ChartRequest,
        tokens: &dyn TokenProvider,
    ) -> Result<ChartResult, PipelineError> {
        self.run_at(OffsetDateTime::now_utc().date(), request, tokens)
            .await
    }

    /// Run with an explicit "today", the resolution instant for named periods.
    pub async fn run_at(
        &self,
        today: Date,
        request: ChartRequest,
        tokens: &dyn TokenProvider,
    ) -> Result<ChartResult, PipelineError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("chart_query", %request_id);

        async move {
            let query = request.into_query(today)?;
            debug!(
                period = %query.selection().period(),
                range = %query.range(),
                tickers = query.tickers().len(),
                "resolved stock query"
            );
            if query.has_duplicate_tickers() {
                debug!("query repeats tickers; the backend will be asked for each occurrence");
            }

            let raw = self.gateway.fetch_with(&query, tokens).await?;
            let series = normalize(raw);
            let missing = series.missing_tickers(query.tickers());
            if !missing.is_empty() {
                let names: Vec<&str> = missing.iter().map(TickerSymbol::as_str).collect();
                warn!(missing = ?names, "backend returned a partial result");
            }

            info!(
                series = series.len(),
                points = series.point_count(),
                "chart query completed"
            );

            Ok(ChartResult {
                request_id,
                query,
                series,
                missing,
            })
        }
        .instrument(span)
        .await
    }
}
