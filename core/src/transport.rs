//! Executes `HttpRequest`s against the network.
//!
//! # Design
//! `Transport` is the seam between the I/O-free `TakeoutClient` and the
//! outside world. `UreqTransport` is the production implementation; tests
//! plug in fakes that record requests instead of sending them.
//!
//! Non-2xx statuses are returned as data, never as `Err`, so status
//! interpretation stays in the client's `parse_*` methods. `Err` means the
//! request produced no response at all.

use crate::error::TakeoutError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TakeoutError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TakeoutError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
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

    /// Use a preconfigured agent (proxy, timeouts, TLS). The agent must be
    /// built with `http_status_as_error(false)`.
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
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TakeoutError> {
        // The query string may carry the token.
        let endpoint = request.url.split('?').next().unwrap_or_default().to_string();
        tracing::debug!(method = request.method.as_str(), %endpoint, "sending request");

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (key, value) in &request.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (key, value) in &request.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| {
            tracing::warn!(%endpoint, error = %e, "request failed before a response");
            TakeoutError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (key.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TakeoutError::Transport(e.to_string()))?;

        tracing::debug!(%endpoint, status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
