//! Query and form body decoding.
//!
//! # Responsibilities
//! - Decode `key=value&...` pairs (percent escapes, `+` as space) from the target
//! - Merge pairs from a form-urlencoded POST body into the same map
//!
//! # Design Decisions
//! - Body pairs are inserted after target pairs, so the body wins on collisions
//! - Other body content types are ignored (their bytes were already consumed)

use url::form_urlencoded;

use crate::http::request::{Method, Request};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Case-sensitive parameter map scoped to one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    entries: Vec<(String, String)>,
}

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Decode a urlencoded sequence and merge it in.
    pub fn extend_urlencoded(&mut self, input: &[u8]) {
        for (key, value) in form_urlencoded::parse(input) {
            self.insert(key, value);
        }
    }
}

/// Whether a `Content-Type` value denotes a urlencoded form (parameters ignored).
pub fn is_form_urlencoded(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}

/// Collect the request's parameters: target query first, then a form body for POST.
pub fn decode(request: &Request) -> QueryMap {
    let mut query = QueryMap::new();
    if let Some(raw) = request.query_string() {
        query.extend_urlencoded(raw.as_bytes());
    }

    if request.method == Method::Post {
        let content_type = request.headers.get("Content-Type");
        if is_form_urlencoded(content_type) {
            query.extend_urlencoded(&request.body);
        } else if !request.body.is_empty() {
            tracing::debug!(
                content_type = content_type.unwrap_or("none"),
                body_len = request.body.len(),
                "Ignoring non-form body"
            );
        }
    }
    query
}
