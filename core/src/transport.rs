//! The seam between the client and the network.
//!
//! # Design
//! `Client` owns its transport explicitly instead of reaching for a shared
//! global agent, so tests can swap in a fake. `UreqTransport` is the real
//! implementation: it disables ureq's status-code-as-error behavior so 4xx and
//! 5xx responses come back as data and the client decides what they mean.

use tracing::trace;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, ResponseBody};

/// Sends one request and returns the response with its body still unread.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// The agent pools connections; clones share the pool.
#[derive(Debug, Clone)]
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

    /// Use a caller-configured agent, e.g. one with timeouts.
    ///
    /// The agent should be built with `http_status_as_error(false)`,
    /// otherwise non-2xx responses surface as transport errors.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = ureq::http::Request::builder()
            .method(request.method.as_str())
            .uri(request.target.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = match request.body {
            Some(body) => self.agent.run(builder.body(&body[..])?)?,
            None => self.agent.run(builder.body(())?)?,
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        trace!(status, "response headers received");

        Ok(HttpResponse {
            status,
            headers,
            body: ResponseBody::new(response.into_body().into_reader()),
        })
    }
}
