//! HTTP transport backed by reqwest.
//!
//! [`RestTransport`] is the production implementation of the cache core's
//! [`HttpTransport`] seam. It owns the base URL, auth headers, and request
//! timeout; everything it returns is converted into the cloneable
//! [`ApiError`] taxonomy at this boundary so reqwest types never leak into
//! the cache or the façades.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use campus_cache::HttpTransport;
use campus_core::{ApiError, ApiResult, HttpMethod, QueryParams};

use crate::config::{ClientConfig, ConfigError};

/// The standard error envelope the backend returns on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Clone)]
pub struct RestTransport {
    client: reqwest::Client,
    base_url: String,
    auth_headers: HeaderMap,
}

impl RestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_headers: build_auth_headers(config)?,
        })
    }

    async fn parse_response(&self, response: reqwest::Response) -> ApiResult<Value> {
        let status = response.status();
        if status.is_success() {
            if status.as_u16() == 204 {
                return Ok(Value::Null);
            }
            return response
                .json::<Value>()
                .await
                .map_err(|e| ApiError::decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(decode_error_body(status.as_u16(), &body))
    }
}

#[async_trait]
impl HttpTransport for RestTransport {
    async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: Option<&QueryParams>,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%method, %url, "sending request");

        let mut request = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        }
        .headers(self.auth_headers.clone());

        if let Some(params) = params.filter(|p| !p.is_empty()) {
            request = request.query(&params.to_query());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(into_api_error)?;
        self.parse_response(response).await
    }
}

fn build_auth_headers(config: &ClientConfig) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &config.auth.api_key {
        let value = HeaderValue::from_str(api_key).map_err(|_| ConfigError::InvalidValue {
            field: "auth.api_key",
            reason: "contains characters not allowed in a header value".to_string(),
        })?;
        headers.insert("x-api-key", value);
    }
    if let Some(token) = &config.auth.bearer_token {
        let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ConfigError::InvalidValue {
                field: "auth.bearer_token",
                reason: "contains characters not allowed in a header value".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Map a failed reqwest call to the cloneable error taxonomy.
fn into_api_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::decode(err.to_string())
    } else if err.is_timeout() {
        ApiError::network(format!("request timed out: {err}"))
    } else {
        ApiError::network(err.to_string())
    }
}

/// Turn a non-2xx response body into an `ApiError::Http`, decoding the
/// backend's `{code, message}` envelope when present and falling back to the
/// raw body otherwise.
fn decode_error_body(status: u16, body: &str) -> ApiError {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if envelope.code.is_some() || envelope.message.is_some() {
            return ApiError::Http {
                status,
                code: envelope.code,
                message: envelope.message.unwrap_or_else(|| "request failed".to_string()),
            };
        }
    }
    ApiError::Http {
        status,
        code: None,
        message: if body.is_empty() {
            "request failed".to_string()
        } else {
            body.to_string()
        },
    }
}
