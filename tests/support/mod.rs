//! Shared test doubles for the behavior suites.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use pricechart_core::{
    BackendRequest, GatewayConfig, HttpClient, HttpError, HttpRequest, HttpResponse, QueryGateway,
};

/// Transport double that records every request and replays a canned outcome.
#[derive(Debug)]
pub struct RecordingHttpClient {
    response: Result<HttpResponse, HttpError>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttpClient {
    pub fn responding(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(HttpResponse::new(status, body)),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: HttpError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn recorded_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    pub fn only_request(&self) -> HttpRequest {
        let requests = self.recorded_requests();
        assert_eq!(requests.len(), 1, "expected exactly one backend call");
        requests.into_iter().next().expect("one request")
    }

    pub fn only_body(&self) -> BackendRequest {
        serde_json::from_str(&self.only_request().body).expect("request body should be JSON")
    }
}

impl HttpClient for RecordingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        let response = self.response.clone();
        Box::pin(async move { response })
    }
}

pub fn gateway_for(client: Arc<RecordingHttpClient>) -> QueryGateway {
    QueryGateway::with_http_client(GatewayConfig::new("https://backend.example.test"), client)
}

pub const SCENARIO_PAYLOAD: &str = r#"{
    "data": {
        "AAPL": [{"date": "2024-01-01", "close": 150.0}],
        "MSFT": [{"date": "2024-01-01", "close": 300.0}]
    }
}"#;
