use crate::application::ports::{ApiGateway, RequestTransport};
use crate::domain::entities::QueuedRequest;
use crate::domain::value_objects::HttpMethod;
use crate::infrastructure::api::endpoints;
use crate::shared::config::ApiConfig;
use crate::shared::error::{ApiError, AppError};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const IDEMPOTENCY_HEADER: &str = "X-Idempotency-Key";

/// reqwest wrapper for the Verda backend. Owns the shared clients (one for
/// regular traffic, one with the short probe timeout) and the single
/// classification point for transport failures.
pub struct RestClient {
    http: Client,
    probe_http: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(e.to_string()))?;
        let probe_http = Client::builder()
            .timeout(Duration::from_secs(config.probe_timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            probe_http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Transport-level failures: timeouts, refused connections, DNS and
/// anything else that died before an HTTP status came back.
fn classify_error(err: &reqwest::Error) -> ApiError {
    if err.is_timeout() || err.is_connect() {
        ApiError::Network(err.to_string())
    } else if err.is_builder() || err.is_decode() {
        ApiError::Unknown(err.to_string())
    } else if err.is_request() {
        // Aborted mid-flight; the connection went away.
        ApiError::Network(err.to_string())
    } else {
        ApiError::Unknown(err.to_string())
    }
}

/// Status-level outcomes: 2xx passes, 4xx is a permanent rejection, 5xx a
/// server failure.
fn classify_status(status: StatusCode) -> Option<ApiError> {
    if status.is_success() {
        None
    } else if status.is_client_error() {
        Some(ApiError::Client(status.as_u16()))
    } else if status.is_server_error() {
        Some(ApiError::Server(status.as_u16()))
    } else {
        Some(ApiError::Unknown(format!("unexpected status {status}")))
    }
}

#[async_trait]
impl ApiGateway for RestClient {
    async fn send_json(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
        idempotency_key: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut request = self
            .http
            .request(Self::method(method), self.url(endpoint))
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(key) = idempotency_key {
            request = request.header(IDEMPOTENCY_HEADER, key);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| classify_error(&e))?;
        if let Some(err) = classify_status(response.status()) {
            return Err(err);
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Unknown(e.to_string()))?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Unknown(e.to_string()))
    }

    async fn probe(&self) -> bool {
        match self
            .probe_http
            .get(self.url(endpoints::HEALTH))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl RequestTransport for RestClient {
    async fn dispatch(&self, request: &QueuedRequest) -> Result<(), ApiError> {
        let mut builder = self
            .http
            .request(Self::method(request.method), self.url(&request.endpoint))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(IDEMPOTENCY_HEADER, request.id.as_str());

        if let Some(headers) = &request.headers {
            for (name, value) in headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        if request.method.has_body() {
            if let Some(data) = &request.data {
                builder = builder.json(data);
            }
        }

        debug!(
            "Replaying {} {} {}",
            request.kind, request.method, request.endpoint
        );

        let response = builder.send().await.map_err(|e| classify_error(&e))?;
        match classify_status(response.status()) {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}
