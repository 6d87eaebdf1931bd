//! Parsed request head
//!
//! Header lines are kept raw and ordered, exactly as they appeared on the
//! wire: duplicates are allowed and never deduplicated, and lookup is a
//! case-sensitive first-match scan. The typed rims (`Method`, `Version`) come
//! from the `http` crate.

use http::{Method, Version};

/// One raw `key: value` header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    name: String,
    value: String,
}

impl HeaderLine {
    pub fn new(name: String, value: String) -> Self {
        Self { name, value }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A fully framed request head: request line plus raw header lines.
#[derive(Debug)]
pub struct ParsedRequest {
    method: Method,
    target: String,
    version: Version,
    headers: Vec<HeaderLine>,
}

impl ParsedRequest {
    pub fn new(method: Method, target: String, version: Version, headers: Vec<HeaderLine>) -> Self {
        Self { method, target, version, headers }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// All header lines, in wire order.
    pub fn headers(&self) -> &[HeaderLine] {
        &self.headers
    }

    /// First value for `name`, compared case-sensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|line| line.name() == name).map(HeaderLine::value)
    }
}
