// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use url::form_urlencoded::byte_serialize;

/// A single query string entry.
///
/// A parameter without a value is a flag and renders as the bare key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    pub key: &'static str,
    pub value: Option<String>,
}

impl QueryParam {
    /// A `key=value` parameter
    pub fn value(key: &'static str, value: impl ToString) -> Self {
        Self {
            key,
            value: Some(value.to_string()),
        }
    }

    /// A value-less marker parameter
    pub fn flag(key: &'static str) -> Self {
        Self { key, value: None }
    }
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_encoded(f, self.key)?;
        if let Some(value) = &self.value {
            f.write_str("=")?;
            write_encoded(f, value)?;
        }
        Ok(())
    }
}

fn write_encoded(f: &mut fmt::Formatter<'_>, input: &str) -> fmt::Result {
    for chunk in byte_serialize(input.as_bytes()) {
        f.write_str(chunk)?;
    }
    Ok(())
}

/// Path and ordered query parameters for one GET against the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    path: String,
    query: Vec<QueryParam>,
}

impl LookupRequest {
    pub fn new(path: impl Into<String>, query: Vec<QueryParam>) -> Self {
        Self {
            path: path.into(),
            query,
        }
    }

    /// Absolute API path, e.g. `/podcasts/byfeedid`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[QueryParam] {
        &self.query
    }

    /// Render the query string in insertion order.
    ///
    /// Returns `None` when there are no parameters, so no `?` is emitted.
    pub fn query_string(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }

        let rendered: Vec<String> = self.query.iter().map(ToString::to_string).collect();
        Some(rendered.join("&"))
    }
}

impl fmt::Display for LookupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if let Some(query) = self.query_string() {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}
