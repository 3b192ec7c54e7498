//! Blocking client that runs each build → execute → parse round-trip.
//!
//! `login` takes `&mut self` because it replaces the token. Sharing one
//! client between threads therefore needs a caller-owned lock, and that
//! lock decides which token a concurrent `send` sees. No retries, no
//! timeouts beyond what the transport's agent is configured with.

use std::path::Path;

use crate::client::TakeoutClient;
use crate::config::ClientConfig;
use crate::error::TakeoutError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{AuthResult, EmailTemplate, SendResult};

#[derive(Debug, Clone)]
pub struct BlockingClient<T = UreqTransport> {
    inner: TakeoutClient,
    transport: T,
}

impl BlockingClient<UreqTransport> {
    /// Client for the production hosts over `ureq`.
    pub fn new(debug: bool) -> Self {
        Self::with_transport(TakeoutClient::new(debug), UreqTransport::new())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(TakeoutClient::with_config(config), UreqTransport::new())
    }
}

impl<T: Transport> BlockingClient<T> {
    pub fn with_transport(inner: TakeoutClient, transport: T) -> Self {
        Self { inner, transport }
    }

    pub fn client(&self) -> &TakeoutClient {
        &self.inner
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn token(&self) -> &str {
        self.inner.token()
    }

    /// Verify `token` with the service. The token stays active even if
    /// verification fails.
    pub fn login(&mut self, token: &str) -> Result<AuthResult, TakeoutError> {
        let request = self.inner.build_login(token)?;
        let response = self.transport.execute(request)?;
        self.inner.parse_login(response)
    }

    pub fn get_local_template(&self, path: impl AsRef<Path>) -> Result<String, TakeoutError> {
        self.inner.get_local_template(path)
    }

    /// Older name of [`BlockingClient::get_local_template`].
    #[deprecated(note = "use get_local_template")]
    pub fn get_html_file_contents(&self, path: impl AsRef<Path>) -> Result<String, TakeoutError> {
        self.get_local_template(path)
    }

    pub fn get_cloud_template(&self, name: &str) -> Result<String, TakeoutError> {
        let request = self.inner.build_get_cloud_template(name)?;
        let response = self.transport.execute(request)?;
        self.inner.parse_get_cloud_template(response)
    }

    pub fn send(&self, template: &EmailTemplate) -> Result<SendResult, TakeoutError> {
        let request = self.inner.build_send(template)?;
        let response = self.transport.execute(request)?;
        self.inner.parse_send(response)
    }

    /// Ask the service whether `email` can receive mail. Early-stage
    /// endpoint; the returned value's shape is not guaranteed.
    pub fn verify_email(&self, email: &str) -> Result<serde_json::Value, TakeoutError> {
        let request = self.inner.build_verify_email(email)?;
        let response = self.transport.execute(request)?;
        self.inner.parse_verify_email(response)
    }
}
