//! Executes `HttpRequest` values against the network.
//!
//! `Transport` is the one I/O seam of the crate. `UreqTransport` is the
//! blocking implementation used by the console host and integration tests;
//! any `Fn(&HttpRequest) -> Result<HttpResponse, TransportError>` closure
//! also implements it, which is how unit tests simulate outcomes.

use thiserror::Error;

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// The round-trip failed before a complete response was received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// Status-code-as-error is disabled so 4xx/5xx responses come back as data
/// and the client decides what they mean.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
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

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| TransportError(e.to_string()))?;
        let status = response.status();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TransportError(format!("reading body: {e}")))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_act_as_transports() {
        let transport = |req: &HttpRequest| -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse::new(200, "OK", req.url.as_str()))
        };
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://example.test/x".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let resp = transport.execute(&req).unwrap();
        assert_eq!(resp.body, b"http://example.test/x");
    }

    #[test]
    fn connection_refused_is_a_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://127.0.0.1:{port}/api/users"),
            headers: Vec::new(),
            body: None,
        };
        assert!(UreqTransport::new().execute(&req).is_err());
    }
}
