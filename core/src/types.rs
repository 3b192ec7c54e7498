//! Domain DTOs and wire payloads for the Takeout API.
//!
//! # Design
//! Public types (`EmailTemplate`, `AuthResult`, `SendResult`) use Rust
//! naming; the `*Payload` and `*Response` types mirror the remote JSON schema
//! field for field and stay crate-private. The mock-server crate defines its
//! own copies, so integration tests catch schema drift.

use serde::{Deserialize, Serialize};

/// An email to send. `html` and `text` may both be set; the remote service
/// prefers `html` when it is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
}

impl EmailTemplate {
    pub fn new(
        to: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            subject: subject.into(),
            ..Self::default()
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = Some(cc.into());
        self
    }
}

/// Outcome of a successful `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    pub message: String,
    pub authenticated: bool,
}

/// Outcome of a successful `send`. `id` is opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub id: String,
}

#[derive(Serialize)]
pub(crate) struct LoginPayload<'a> {
    pub token: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub message: String,
}

/// Body of `POST /api/email/send`. Absent optionals are omitted entirely.
#[derive(Serialize)]
pub(crate) struct SendPayload<'a> {
    pub sender: &'a str,
    pub receiver: &'a str,
    pub subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<&'a str>,
    #[serde(rename = "replyTo", skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<&'a str>,
    #[serde(rename = "bodyText", skip_serializing_if = "Option::is_none")]
    pub body_text: Option<&'a str>,
    #[serde(rename = "bodyHTML", skip_serializing_if = "Option::is_none")]
    pub body_html: Option<&'a str>,
}

#[derive(Deserialize)]
pub(crate) struct SendResponse {
    pub header: SendResponseHeader,
}

#[derive(Deserialize)]
pub(crate) struct SendResponseHeader {
    #[serde(rename = "message-id")]
    pub message_id: String,
}

#[derive(Serialize)]
pub(crate) struct VerifyPayload<'a> {
    pub token: &'a str,
    pub email: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct VerifyResponse {
    #[serde(default)]
    pub message: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_reads_camel_case_reply_to() {
        let template: EmailTemplate = serde_json::from_str(
            r#"{"to":"a@b.com","from":"c@d.com","subject":"hi","replyTo":"e@f.com"}"#,
        )
        .unwrap();
        assert_eq!(template.reply_to.as_deref(), Some("e@f.com"));
        assert!(template.html.is_none());
    }

    #[test]
    fn template_missing_required_fields_default_to_empty() {
        let template: EmailTemplate = serde_json::from_str(r#"{"to":"a@b.com"}"#).unwrap();
        assert_eq!(template.to, "a@b.com");
        assert!(template.from.is_empty());
        assert!(template.subject.is_empty());
    }

    #[test]
    fn send_payload_omits_absent_optionals() {
        let payload = SendPayload {
            sender: "c@d.com",
            receiver: "a@b.com",
            subject: "hi",
            cc: None,
            reply_to: None,
            body_text: None,
            body_html: Some("<p>hi</p>"),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["bodyHTML"], "<p>hi</p>");
        assert!(json.get("bodyText").is_none());
        assert!(json.get("replyTo").is_none());
        assert!(json.get("cc").is_none());
    }

    #[test]
    fn send_response_reads_nested_message_id() {
        let response: SendResponse =
            serde_json::from_str(r#"{"header":{"message-id":"abc-123"}}"#).unwrap();
        assert_eq!(response.header.message_id, "abc-123");
    }
}
