//! Blocking HTTP transport on top of ureq.

use profile_core::{
    HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody, Transport, TransportError,
};

/// Executes core requests with a shared ureq agent.
///
/// Status codes are returned as data so the gateway can interpret them. No
/// timeout is configured: a hung request blocks its caller.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let (content_type, bytes) = match &request.body {
            Some(RequestBody::Json(text)) => (None, Some(text.as_bytes().to_vec())),
            Some(RequestBody::Multipart(form)) => {
                let (content_type, bytes) = form.encode(&MultipartForm::generate_boundary());
                (Some(content_type), Some(bytes))
            }
            None => (None, None),
        };

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&request.url), &request.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&request.url), &request.headers).call(),
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
                let builder = match request.method {
                    HttpMethod::Post => self.agent.post(&request.url),
                    HttpMethod::Put => self.agent.put(&request.url),
                    _ => self.agent.patch(&request.url),
                };
                let mut builder = with_headers(builder, &request.headers);
                if let Some(content_type) = &content_type {
                    builder = builder.header("Content-Type", content_type.as_str());
                }
                match &bytes {
                    Some(bytes) => builder.send(&bytes[..]),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        // A body that is not UTF-8 still completed; the gateway reports it as undecodable.
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TransportError(e.to_string()))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(HttpResponse { status, headers, body })
    }
}
