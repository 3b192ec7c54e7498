//! Request builder and response parser for the Takeout API.
//!
//! # Design
//! `TakeoutClient` owns the client state (debug flag, token, hosts) but never
//! touches the network. Each remote operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. Preconditions are checked in `build_*`, so a refused
//! operation never yields a request to execute.
//!
//! The token is the only mutable state. `build_login` stores it before the
//! request exists, so a token that later fails verification is still the
//! active one.

use std::path::Path;

use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::{SendPrecondition, TakeoutError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::template;
use crate::types::{
    AuthResult, EmailTemplate, LoginPayload, LoginResponse, SendPayload, SendResponse,
    SendResult, VerifyPayload, VerifyResponse,
};

/// Target used for the messages the debug flag turns on.
const LOG_TARGET: &str = "takeout";

/// Stateful, I/O-free client for the Takeout API.
#[derive(Debug, Clone)]
pub struct TakeoutClient {
    config: ClientConfig,
    token: String,
}

impl TakeoutClient {
    /// Client for the production hosts.
    pub fn new(debug: bool) -> Self {
        Self::with_config(ClientConfig::default().with_debug(debug))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config: config.normalized(),
            token: String::new(),
        }
    }

    pub fn debug(&self) -> bool {
        self.config.debug
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn cdn_url(&self) -> &str {
        &self.config.cdn_url
    }

    /// The active token, empty until `build_login` is called.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Browser URL where a sent email can be viewed.
    pub fn preview_url(&self, message_id: &str) -> String {
        format!("{}/preview/{message_id}", self.config.base_url)
    }

    // -----------------------------------------------------------------------
    // login
    // -----------------------------------------------------------------------

    /// Store `token` and build the request that verifies it.
    pub fn build_login(&mut self, token: &str) -> Result<HttpRequest, TakeoutError> {
        self.token = token.to_string();
        let body = to_json(&LoginPayload { token })?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/auth/verify", self.config.base_url),
            headers: vec![json_content_type()],
            body: Some(body),
        })
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<AuthResult, TakeoutError> {
        if !response.is_success() {
            return Err(TakeoutError::Auth {
                status: response.status,
            });
        }
        let parsed: LoginResponse = from_json(&response.body)?;
        if self.config.debug {
            tracing::info!(target: LOG_TARGET, "{}", parsed.message);
        }
        Ok(AuthResult {
            message: parsed.message,
            authenticated: true,
        })
    }

    // -----------------------------------------------------------------------
    // local templates
    // -----------------------------------------------------------------------

    /// Read an HTML file from disk and minify it.
    pub fn get_local_template(&self, path: impl AsRef<Path>) -> Result<String, TakeoutError> {
        template::read_local_template(path.as_ref())
    }

    /// Older name of [`TakeoutClient::get_local_template`].
    #[deprecated(note = "use get_local_template")]
    pub fn get_html_file_contents(&self, path: impl AsRef<Path>) -> Result<String, TakeoutError> {
        self.get_local_template(path)
    }

    // -----------------------------------------------------------------------
    // cloud templates
    // -----------------------------------------------------------------------

    /// Build the template-store read. The token goes along even when empty;
    /// the store decides what an empty token may read.
    pub fn build_get_cloud_template(&self, name: &str) -> Result<HttpRequest, TakeoutError> {
        if name.is_empty() {
            return Err(TakeoutError::MissingTemplateName);
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("name", name)
            .append_pair("token", &self.token)
            .finish();
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/cloud/read?{query}", self.config.cdn_url),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Returns the template body as-is. Cloud templates are not minified.
    pub fn parse_get_cloud_template(&self, response: HttpResponse) -> Result<String, TakeoutError> {
        if !response.is_success() {
            return Err(TakeoutError::CloudTemplate {
                status: response.status,
            });
        }
        Ok(response.body)
    }

    // -----------------------------------------------------------------------
    // send
    // -----------------------------------------------------------------------

    /// Check the token, then the required fields, then build the send request.
    pub fn build_send(&self, template: &EmailTemplate) -> Result<HttpRequest, TakeoutError> {
        if self.token.trim().is_empty() {
            return Err(TakeoutError::SendPrecondition(SendPrecondition::MissingToken));
        }
        let (receiver, sender, subject) = (
            template.to.trim(),
            template.from.trim(),
            template.subject.trim(),
        );
        if receiver.is_empty() || sender.is_empty() || subject.is_empty() {
            return Err(TakeoutError::SendPrecondition(
                SendPrecondition::MissingRequiredField,
            ));
        }

        let body = to_json(&SendPayload {
            sender,
            receiver,
            subject,
            cc: template.cc.as_deref(),
            reply_to: template.reply_to.as_deref(),
            body_text: template.text.as_deref(),
            body_html: template.html.as_deref(),
        })?;
        tracing::debug!(target: LOG_TARGET, "building send request");
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/email/send", self.config.base_url),
            headers: vec![
                json_content_type(),
                ("authorization".to_string(), format!("Token {}", self.token)),
            ],
            body: Some(body),
        })
    }

    pub fn parse_send(&self, response: HttpResponse) -> Result<SendResult, TakeoutError> {
        if !response.is_success() {
            return Err(TakeoutError::SendRemote {
                status: response.status,
                detail: send_error_detail(&response.body),
            });
        }
        let parsed: SendResponse = from_json(&response.body)?;
        if self.config.debug {
            tracing::info!(target: LOG_TARGET, "Sent email successfully");
        }
        Ok(SendResult {
            id: parsed.header.message_id,
        })
    }

    // -----------------------------------------------------------------------
    // verify
    // -----------------------------------------------------------------------

    /// Build an address check. Validation of `email` is left to the service.
    pub fn build_verify_email(&self, email: &str) -> Result<HttpRequest, TakeoutError> {
        if email.is_empty() {
            return Err(TakeoutError::MissingEmail);
        }
        let body = to_json(&VerifyPayload {
            token: &self.token,
            email,
        })?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/email/verify", self.config.base_url),
            headers: vec![json_content_type()],
            body: Some(body),
        })
    }

    /// Returns the response's `message` field, whatever its shape.
    pub fn parse_verify_email(
        &self,
        response: HttpResponse,
    ) -> Result<serde_json::Value, TakeoutError> {
        if !response.is_success() {
            return Err(TakeoutError::Verify {
                status: response.status,
            });
        }
        let parsed: VerifyResponse = from_json(&response.body)?;
        Ok(parsed.message)
    }
}

impl Default for TakeoutClient {
    fn default() -> Self {
        Self::new(false)
    }
}

fn json_content_type() -> (String, String) {
    ("content-type".to_string(), "application/json".to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, TakeoutError> {
    serde_json::to_string(value).map_err(|e| TakeoutError::Serialization(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, TakeoutError> {
    serde_json::from_str(body).map_err(|e| TakeoutError::Deserialization(e.to_string()))
}

/// The service's `message-id` field when the error body has one, otherwise
/// the raw body.
fn send_error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("message-id")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| body.to_string())
}
