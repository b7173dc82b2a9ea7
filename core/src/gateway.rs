//! The single HTTP call path every operation funnels through.
//!
//! # Design
//! Header policy: a Bearer `Authorization` header when a token is given, and
//! `Content-Type: application/json` for everything except multipart bodies
//! (bodiless requests included). One request per call, no retries.
//!
//! Response policy: any 2xx status decodes the body as JSON into the caller's
//! type without further validation. Other statuses go through
//! `decode_error`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};

/// Message used when an error body carries no usable `message` field.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: String,
}

impl Gateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join `path` onto the base URL. Absolute URLs are returned unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    pub fn build(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<RequestBody>,
        token: Option<&str>,
    ) -> HttpRequest {
        let mut headers = Vec::new();
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        if !matches!(body, Some(RequestBody::Multipart(_))) {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            url: self.url(path),
            headers,
            body,
        }
    }

    /// Serialize `payload` with standard JSON encoding and build the request.
    pub fn build_json<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &B,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload).map_err(|e| ApiError::Serialize(e.to_string()))?;
        Ok(self.build(method, path, Some(RequestBody::Json(body)), token))
    }

    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse, fallback: &str) -> Result<T, ApiError> {
        if !(200..300).contains(&response.status) {
            return Err(decode_error(&response, fallback));
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Execute `request` exactly once and parse the outcome.
    pub fn send<T: DeserializeOwned>(
        &self,
        transport: &dyn Transport,
        request: &HttpRequest,
        fallback: &str,
    ) -> Result<T, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = transport.execute(request)?;
        tracing::debug!(status = response.status, url = %request.url, "received response");
        self.parse(response, fallback)
    }

    /// Build, execute and parse in one step with the default fallback message.
    pub fn request<T: DeserializeOwned>(
        &self,
        transport: &dyn Transport,
        method: HttpMethod,
        path: &str,
        body: Option<RequestBody>,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let request = self.build(method, path, body, token);
        self.send(transport, &request, DEFAULT_ERROR_MESSAGE)
    }
}

/// Map a non-2xx response to an `ApiError`.
fn decode_error(response: &HttpResponse, fallback: &str) -> ApiError {
    match serde_json::from_str::<serde_json::Value>(&response.body) {
        Ok(value) => {
            let message = value
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .unwrap_or(fallback);
            ApiError::Http {
                status: response.status,
                message: message.to_string(),
            }
        }
        Err(_) => ApiError::Unknown {
            status: response.status,
            body: response.body.clone(),
        },
    }
}
