//! Transport-neutral request and response types.
//!
//! The dispatcher consumes and produces these; any HTTP stack that can fill
//! a [`SoapRequest`] and emit a [`SoapResponse`] can host a service.

use std::collections::HashMap;

/// An incoming transport request.
#[derive(Debug, Clone)]
pub struct SoapRequest {
    /// HTTP method, uppercase ("GET", "POST").
    pub method: String,
    /// Raw query string, without the leading `?`.
    pub query: String,
    /// Request headers. Lookup through [`SoapRequest::header`] is
    /// case-insensitive.
    pub headers: HashMap<String, String>,
    /// Raw request body.
    pub content: Vec<u8>,
}

impl SoapRequest {
    /// Creates a request with no headers and an empty body.
    #[must_use]
    pub fn new(method: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            query: query.into(),
            headers: HashMap::new(),
            content: Vec::new(),
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = content.into();
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Returns a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the body as UTF-8 text, replacing invalid sequences.
    #[must_use]
    pub fn content_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// An outgoing transport response.
#[derive(Debug, Clone)]
pub struct SoapResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, `Content-Type` included.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub content: Vec<u8>,
}

impl SoapResponse {
    /// Creates a response with the given status, content type and body.
    #[must_use]
    pub fn new(status: u16, content_type: &str, content: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            content: content.into(),
        }
    }

    /// Returns the `Content-Type` header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }
}
