//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values; the
//! host executes the round-trip through a `Transport` implementation.
//!
//! Multipart bodies stay structured until the transport encodes them, so the
//! transport picks the boundary and sets the matching content type. Requests
//! carrying a `MultipartForm` never have a Content-Type header of their own.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single file field of a `multipart/form-data` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A `multipart/form-data` payload described as plain data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub parts: Vec<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(
        mut self,
        field: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FilePart {
            field: field.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        self
    }

    /// Random boundary that will not collide with file contents in practice.
    pub fn generate_boundary() -> String {
        format!("----profile-{}", uuid::Uuid::new_v4().simple())
    }

    /// Encode the form for the wire, returning the `Content-Type` header value
    /// (with boundary) and the body bytes.
    pub fn encode(&self, boundary: &str) -> (String, Vec<u8>) {
        let mut body = Vec::new();
        for part in &self.parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    escape_quoted(&part.field),
                    escape_quoted(&part.file_name)
                )
                .as_bytes(),
            );
            body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
            body.extend_from_slice(&part.bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\r', '\n'], " ")
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Already-serialized JSON text.
    Json(String),
    Multipart(MultipartForm),
}

/// An HTTP request described as plain data.
///
/// Built by `Gateway::build` and the `ProfileClient::build_*` methods. The
/// host executes it and hands back the corresponding `HttpResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// The request never completed: connection refused, DNS failure, broken pipe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Executes a single HTTP round-trip on behalf of the core.
///
/// Implementations must return non-2xx responses as `Ok(HttpResponse)`; only
/// failures to complete the exchange are `Err`. No retries, no timeouts.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
