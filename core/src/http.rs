//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `TakeoutClient` builds an
//! `HttpRequest` and parses an `HttpResponse`; whoever sits between the two
//! (a `Transport`, a test, a fake) performs the actual I/O.
//!
//! `url` is absolute because the template store lives on a different host
//! than the rest of the API.

/// HTTP method for a request. The Takeout API only uses these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// `parse_*` methods only look at `status` and `body`. `headers` is filled in
/// by `UreqTransport` for callers driving a `Transport` directly, e.g. to
/// read the content type of a cloud template.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Mirrors `fetch`'s `ok`: any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Post,
            url: "http://localhost/api".to_string(),
            headers: vec![("Authorization".to_string(), "Token abc".to_string())],
            body: None,
        };
        assert_eq!(req.header("authorization"), Some("Token abc"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn response_header_lookup_ignores_case() {
        let mut response = HttpResponse::new(200, "<p>hi</p>");
        response
            .headers
            .push(("content-type".to_string(), "text/html".to_string()));
        assert_eq!(response.header("Content-Type"), Some("text/html"));
        assert_eq!(response.header("etag"), None);
    }

    #[test]
    fn success_covers_whole_2xx_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(401, "").is_success());
    }
}
