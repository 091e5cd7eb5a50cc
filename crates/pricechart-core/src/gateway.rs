//! Authenticated relay to the Market Data Backend.
//!
//! The gateway issues exactly one call per [`QueryGateway::fetch`]: no retry,
//! no cache, no fallback. A caller without a token never reaches the
//! transport.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::http_client::{
    HttpAuth, HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient, DEFAULT_TIMEOUT_MS,
};
use crate::{BearerToken, RawSeriesResponse, StockQuery, TokenProvider};

pub const API_URL_ENV: &str = "PRICECHART_API_URL";
pub const TIMEOUT_ENV: &str = "PRICECHART_TIMEOUT_MS";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_USER_AGENT: &str = concat!("pricechart/", env!("CARGO_PKG_VERSION"));
const STOCK_DATA_PATH: &str = "/api/stocks/data";

/// Status reported when the backend gave none.
pub const DEFAULT_ERROR_STATUS: u16 = 500;
const UNAUTHORIZED_STATUS: u16 = 401;

/// Backend location and transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: String::from(DEFAULT_USER_AGENT),
        }
    }

    /// Read `PRICECHART_API_URL` and `PRICECHART_TIMEOUT_MS`, falling back to defaults.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| String::from(DEFAULT_BASE_URL));
        let timeout_ms = std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self::new(base_url).with_timeout_ms(timeout_ms)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), STOCK_DATA_PATH)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Gateway failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// No token at call time; the backend was not contacted.
    Unauthenticated,
    /// Backend answered with a non-2xx status.
    Upstream,
    /// Network failure or timeout before a response arrived.
    Unreachable,
    /// 2xx response whose body is not a series payload, or an unencodable request.
    InvalidResponse,
}

/// Error surfaced by the gateway, carrying the backend's detail and status when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    kind: GatewayErrorKind,
    message: String,
    status: u16,
}

impl GatewayError {
    pub fn unauthenticated() -> Self {
        Self {
            kind: GatewayErrorKind::Unauthenticated,
            message: String::from("user not authenticated"),
            status: UNAUTHORIZED_STATUS,
        }
    }

    pub fn upstream(message: impl Into<String>, status: u16) -> Self {
        Self {
            kind: GatewayErrorKind::Upstream,
            message: message.into(),
            status,
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Unreachable,
            message: message.into(),
            status: DEFAULT_ERROR_STATUS,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::InvalidResponse,
            message: message.into(),
            status: DEFAULT_ERROR_STATUS,
        }
    }

    pub const fn kind(&self) -> GatewayErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status(&self) -> u16 {
        self.status
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            GatewayErrorKind::Unauthenticated => "gateway.unauthenticated",
            GatewayErrorKind::Upstream => "gateway.upstream",
            GatewayErrorKind::Unreachable => "gateway.unreachable",
            GatewayErrorKind::InvalidResponse => "gateway.invalid_response",
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (status {}, {})", self.message, self.status, self.code())
    }
}

impl std::error::Error for GatewayError {}

#[derive(Debug, Deserialize)]
struct SuccessBody {
    data: RawSeriesResponse,
}

#[derive(Debug, Deserialize)]
struct FailureBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Relays validated queries to the backend on behalf of an authenticated caller.
#[derive(Clone)]
pub struct QueryGateway {
    config: GatewayConfig,
    http_client: Arc<dyn HttpClient>,
}

impl QueryGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::new(&config.user_agent));
        Self::with_http_client(config, http_client)
    }

    pub fn with_http_client(config: GatewayConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Read the caller's token right before the call and fetch with it.
    pub async fn fetch_with(
        &self,
        query: &StockQuery,
        tokens: &dyn TokenProvider,
    ) -> Result<RawSeriesResponse, GatewayError> {
        let token = tokens.current_token();
        self.fetch(query, token.as_ref()).await
    }

    /// Send `query` to the backend with `token` as bearer credential.
    pub async fn fetch(
        &self,
        query: &StockQuery,
        token: Option<&BearerToken>,
    ) -> Result<RawSeriesResponse, GatewayError> {
        let Some(token) = token else {
            warn!("rejecting stock query without a bearer token");
            return Err(GatewayError::unauthenticated());
        };

        let body = serde_json::to_string(&query.backend_request()).map_err(|error| {
            GatewayError::invalid_response(format!("failed to encode backend request: {error}"))
        })?;
        let request = HttpRequest::post_json(self.config.endpoint(), body)
            .with_auth(&HttpAuth::Bearer(token.clone()))
            .with_timeout_ms(self.config.timeout_ms);

        debug!(
            endpoint = %request.url,
            tickers = query.tickers().len(),
            range = %query.range(),
            "dispatching stock query"
        );

        let response = self.http_client.execute(request).await.map_err(|error| {
            warn!(kind = ?error.kind(), "market data backend unreachable");
            GatewayError::unreachable(format!(
                "market data backend unreachable: {}",
                error.message()
            ))
        })?;

        if !response.is_success() {
            let error = translate_failure(&response);
            warn!(status = error.status(), "market data backend rejected query");
            return Err(error);
        }

        let decoded: SuccessBody = serde_json::from_str(&response.body).map_err(|error| {
            GatewayError::invalid_response(format!("malformed backend payload: {error}"))
        })?;

        Ok(decoded.data)
    }
}

fn translate_failure(response: &HttpResponse) -> GatewayError {
    let detail = serde_json::from_str::<FailureBody>(&response.body)
        .ok()
        .and_then(|body| failure_text(body.detail).or_else(|| failure_text(body.error)));

    let message = detail.unwrap_or_else(|| {
        format!(
            "market data backend returned status {}",
            response.status
        )
    });
    GatewayError::upstream(message, response.status)
}

/// Strings pass through; structured values (validation lists) are rendered as JSON.
fn failure_text(value: Option<serde_json::Value>) -> Option<String> {
    let text = match value? {
        serde_json::Value::Null => return None,
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    };
    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = GatewayConfig::new("https://api.example.test/");
        assert_eq!(config.endpoint(), "https://api.example.test/api/stocks/data");
    }

    #[test]
    fn failure_detail_is_passed_through() {
        let error = translate_failure(&HttpResponse::new(500, r#"{"detail":"rate limited"}"#));
        assert_eq!(error.kind(), GatewayErrorKind::Upstream);
        assert_eq!(error.message(), "rate limited");
        assert_eq!(error.status(), 500);
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let error = translate_failure(&HttpResponse::new(
            422,
            r#"{"detail":[{"loc":["body","tickers"],"msg":"field required"}]}"#,
        ));
        assert_eq!(error.status(), 422);
        assert!(error.message().contains("field required"));
    }

    #[test]
    fn missing_detail_falls_back_to_generic_message() {
        let error = translate_failure(&HttpResponse::new(503, "<html>bad gateway</html>"));
        assert_eq!(error.message(), "market data backend returned status 503");
        assert_eq!(error.status(), 503);
    }

    #[test]
    fn error_key_is_accepted_when_detail_is_absent() {
        let error = translate_failure(&HttpResponse::new(401, r#"{"error":"Unauthorized"}"#));
        assert_eq!(error.message(), "Unauthorized");
    }

    #[test]
    fn detail_wins_over_a_structured_error_field() {
        let error = translate_failure(&HttpResponse::new(
            500,
            r#"{"detail":"rate limited","error":{"type":"throttle"}}"#,
        ));
        assert_eq!(error.message(), "rate limited");
        assert_eq!(error.status(), 500);
    }

    #[test]
    fn structured_error_is_used_when_detail_is_absent() {
        let error = translate_failure(&HttpResponse::new(502, r#"{"error":{"type":"throttle"}}"#));
        assert_eq!(error.message(), r#"{"type":"throttle"}"#);
    }

    #[test]
    fn blank_detail_falls_through_to_error_key() {
        let error = translate_failure(&HttpResponse::new(
            400,
            r#"{"detail":"  ","error":"bad tickers"}"#,
        ));
        assert_eq!(error.message(), "bad tickers");
    }

    #[test]
    fn config_carries_user_agent_and_shared_timeout_default() {
        let config = GatewayConfig::new("https://api.example.test");
        assert!(config.user_agent.starts_with("pricechart/"));
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(
            HttpRequest::post_json(config.endpoint(), "{}").timeout_ms,
            config.timeout_ms
        );

        let custom = config.with_user_agent("dashboard/2.0");
        assert_eq!(custom.user_agent, "dashboard/2.0");
    }

    #[test]
    fn unauthenticated_maps_to_unauthorized_status() {
        let error = GatewayError::unauthenticated();
        assert_eq!(error.status(), 401);
        assert_eq!(error.code(), "gateway.unauthenticated");
    }
}
