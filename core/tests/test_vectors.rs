//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and either an expected result or an expected error. Request bodies are
//! compared as parsed JSON, not raw strings, so field order does not matter.

use takeout_core::{
    AuthResult, ClientConfig, EmailTemplate, ErrorKind, HttpMethod, HttpRequest, HttpResponse,
    SendResult, TakeoutClient, TakeoutError,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> TakeoutClient {
    TakeoutClient::with_config(ClientConfig::single_host(BASE_URL))
}

fn logged_in(vectors: &serde_json::Value) -> TakeoutClient {
    let mut c = client();
    c.build_login(vectors["token"].as_str().unwrap()).unwrap();
    c
}

fn load(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "Auth" => ErrorKind::Auth,
        "CloudTemplate" => ErrorKind::CloudTemplate,
        "SendRemote" => ErrorKind::SendRemote,
        "Verify" => ErrorKind::Verify,
        other => panic!("unknown error kind: {other}"),
    }
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn check_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .map(|headers| {
            headers
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn check_error(name: &str, err: TakeoutError, expected: &serde_json::Value) {
    assert_eq!(err.kind(), parse_kind(expected["kind"].as_str().unwrap()), "{name}: kind");
    assert_eq!(
        err.status().map(u64::from),
        expected["status"].as_u64(),
        "{name}: status"
    );
    if let Some(detail) = expected.get("detail") {
        match err {
            TakeoutError::SendRemote { detail: actual, .. } => {
                assert_eq!(actual, detail.as_str().unwrap(), "{name}: detail")
            }
            other => panic!("{name}: detail given for {other:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[test]
fn login_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/login.json"));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let token = case["input_token"].as_str().unwrap();

        let mut c = client();
        let req = c.build_login(token).unwrap();
        check_request(name, &req, &case["expected_request"]);
        assert_eq!(c.token(), token, "{name}: token stored");

        let result = c.parse_login(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error);
        } else {
            let expected: AuthResult = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Send
// ---------------------------------------------------------------------------

#[test]
fn send_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/send.json"));

    let c = logged_in(&vectors);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: EmailTemplate = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_send(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_send(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error);
        } else {
            let expected: SendResult = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Cloud templates
// ---------------------------------------------------------------------------

#[test]
fn cloud_template_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/cloud_template.json"));

    let c = logged_in(&vectors);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let template_name = case["input_name"].as_str().unwrap();

        let req = c.build_get_cloud_template(template_name).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_cloud_template(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error);
        } else {
            assert_eq!(
                result.unwrap(),
                case["expected_result"].as_str().unwrap(),
                "{name}: parsed result"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Verify
// ---------------------------------------------------------------------------

#[test]
fn verify_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/verify.json"));

    let c = logged_in(&vectors);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let email = case["input_email"].as_str().unwrap();

        let req = c.build_verify_email(email).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_verify_email(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error);
        } else {
            assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
        }
    }
}
