//! In-memory stand-in for the Takeout API.
//!
//! Serves the four endpoints the client talks to from one host and records
//! every request it receives, so tests can assert on headers, bodies, and on
//! requests that should never have been made.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Token accepted by `MockState::default()`.
pub const VALID_TOKEN: &str = "tok123";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub query: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub tokens: HashSet<String>,
    pub templates: HashMap<String, String>,
    pub requests: Vec<RecordedRequest>,
}

impl MockState {
    pub fn with_token(mut self, token: &str) -> Self {
        self.tokens.insert(token.to_string());
        self
    }

    pub fn with_template(mut self, name: &str, html: &str) -> Self {
        self.templates.insert(name.to_string(), html.to_string());
        self
    }
}

pub type Db = Arc<RwLock<MockState>>;

#[derive(Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPayload {
    pub sender: String,
    pub receiver: String,
    pub subject: String,
    pub cc: Option<String>,
    pub reply_to: Option<String>,
    pub body_text: Option<String>,
    #[serde(rename = "bodyHTML")]
    pub body_html: Option<String>,
}

#[derive(Deserialize)]
pub struct VerifyPayload {
    #[serde(default)]
    pub token: String,
    pub email: String,
}

/// A fresh database that accepts `VALID_TOKEN` and holds one template.
pub fn default_db() -> Db {
    Arc::new(RwLock::new(
        MockState::default()
            .with_token(VALID_TOKEN)
            .with_template("welcome.html", "<h1>\n  Welcome\n</h1>"),
    ))
}

pub fn app() -> Router {
    app_with_db(default_db())
}

pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/api/auth/verify", post(verify_token))
        .route("/cloud/read", get(read_template))
        .route("/api/email/send", post(send_email))
        .route("/api/email/verify", post(verify_email))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_db(listener, default_db()).await
}

pub async fn run_with_db(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

async fn record(
    db: &Db,
    method: &str,
    path: &str,
    headers: &HeaderMap,
    query: HashMap<String, String>,
    body: Option<serde_json::Value>,
) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    tracing::debug!(method, path, "mock request");
    db.write().await.requests.push(RecordedRequest {
        method: method.to_string(),
        path: path.to_string(),
        authorization,
        query,
        body,
    });
}

async fn verify_token(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    record(&db, "POST", "/api/auth/verify", &headers, HashMap::new(), Some(body.clone())).await;
    let Ok(input) = serde_json::from_value::<LoginPayload>(body) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Malformed body" }))).into_response();
    };
    if db.read().await.tokens.contains(&input.token) {
        Json(json!({ "message": "Authenticated with Takeout" })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid token" }))).into_response()
    }
}

async fn read_template(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&db, "GET", "/cloud/read", &headers, query.clone(), None).await;
    let state = db.read().await;
    let token = query.get("token").map(String::as_str).unwrap_or_default();
    if !state.tokens.contains(token) {
        return (StatusCode::UNAUTHORIZED, "Invalid token").into_response();
    }
    let name = query.get("name").map(String::as_str).unwrap_or_default();
    match state.templates.get(name) {
        Some(html) => ([(header::CONTENT_TYPE, "text/html")], html.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "Template not found").into_response(),
    }
}

async fn send_email(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    record(&db, "POST", "/api/email/send", &headers, HashMap::new(), Some(body.clone())).await;
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Token "))
        .unwrap_or_default();
    if !db.read().await.tokens.contains(token) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid token" }))).into_response();
    }
    let Ok(input) = serde_json::from_value::<SendPayload>(body) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message-id": "Malformed email" }))).into_response();
    };
    if !input.receiver.contains('@') {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message-id": format!("Receiver {} rejected", input.receiver) })),
        )
            .into_response();
    }
    tracing::info!(
        sender = %input.sender,
        receiver = %input.receiver,
        subject = %input.subject,
        html = input.body_html.is_some(),
        text = input.body_text.is_some(),
        cc = input.cc.is_some(),
        reply_to = input.reply_to.is_some(),
        "mock email accepted"
    );
    Json(json!({ "header": { "message-id": Uuid::new_v4().to_string() } })).into_response()
}

async fn verify_email(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    record(&db, "POST", "/api/email/verify", &headers, HashMap::new(), Some(body.clone())).await;
    let Ok(input) = serde_json::from_value::<VerifyPayload>(body) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Malformed body" }))).into_response();
    };
    if !db.read().await.tokens.contains(&input.token) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid token" }))).into_response();
    }
    let valid = input
        .email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    Json(json!({ "message": { "email": input.email, "valid": valid } })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_payload_reads_wire_names() {
        let input: SendPayload = serde_json::from_str(
            r#"{"sender":"c@d.com","receiver":"a@b.com","subject":"hi","replyTo":"r@s.com","bodyText":"t","bodyHTML":"<p>h</p>"}"#,
        )
        .unwrap();
        assert_eq!(input.reply_to.as_deref(), Some("r@s.com"));
        assert_eq!(input.body_text.as_deref(), Some("t"));
        assert_eq!(input.body_html.as_deref(), Some("<p>h</p>"));
        assert!(input.cc.is_none());
    }

    #[test]
    fn send_payload_rejects_missing_receiver() {
        let result: Result<SendPayload, _> =
            serde_json::from_str(r#"{"sender":"c@d.com","subject":"hi"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn default_db_accepts_valid_token() {
        let db = default_db();
        let state = db.try_read().unwrap();
        assert!(state.tokens.contains(VALID_TOKEN));
        assert!(state.templates.contains_key("welcome.html"));
        assert!(state.requests.is_empty());
    }
}
