//! Inbound image request events.
//!
//! An [`ImageRequestEvent`] is what the edge router hands to the resolver:
//! the raw URL path, the request headers and the decoded query string. It is
//! never modified during resolution.

use std::collections::HashMap;

use http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use url::form_urlencoded;

/// An inbound HTTP-like image request.
#[derive(Debug, Clone, Default)]
pub struct ImageRequestEvent {
    /// Raw request path, e.g. `/image/abc/large`
    pub path: String,

    /// Request headers
    pub headers: HeaderMap,

    /// Decoded query string parameters
    pub query: HashMap<String, String>,
}

impl ImageRequestEvent {
    /// Create an event for `path` with no headers or query parameters.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            headers: HeaderMap::new(),
            query: HashMap::new(),
        }
    }

    /// Build an event from a request URI of the form `path[?query]`.
    ///
    /// Query parameters are percent-decoded. When a parameter repeats, the
    /// last occurrence wins.
    pub fn from_uri(uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, query),
            None => (uri, ""),
        };

        let query = form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Self {
            path: path.to_string(),
            headers: HeaderMap::new(),
            query,
        }
    }

    /// Add a header. Invalid header names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Look up a query parameter.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// The `Accept` header values joined with `,`, if any are present and valid UTF-8.
    pub fn accept(&self) -> Option<String> {
        let values: Vec<&str> = self
            .headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.join(","))
        }
    }
}
