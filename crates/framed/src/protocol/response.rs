//! Response descriptor
//!
//! A response is a status, ordered header lines and a body source. The
//! `Content-Length` header is computed from the body's declared length during
//! serialization; handlers never set it themselves. Bodies with an unknown
//! length are rejected before any bytes hit the wire, since chunked encoding
//! is unsupported.

use bytes::Bytes;
use http::StatusCode;

use crate::protocol::{BodyRead, InMemoryBody};

/// Body source attached to a response.
pub enum RespBody {
    /// No body; `Content-Length: 0`.
    Empty,
    /// One buffered chunk.
    Full(InMemoryBody),
    /// Stream the remainder of the request body back to the peer.
    Echo,
    /// Arbitrary pull-based body. Its declared length must be known.
    Stream(Box<dyn BodyRead + Send>),
}

impl std::fmt::Debug for RespBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RespBody::Empty => f.write_str("Empty"),
            RespBody::Full(_) => f.write_str("Full"),
            RespBody::Echo => f.write_str("Echo"),
            RespBody::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// Status, ordered headers and body of one response.
#[derive(Debug)]
pub struct ResponseDescriptor {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: RespBody,
}

impl ResponseDescriptor {
    pub fn new(status: StatusCode) -> Self {
        Self { status, headers: Vec::new(), body: RespBody::Empty }
    }

    /// Shorthand for a one-chunk body response.
    pub fn full(status: StatusCode, chunk: impl Into<Bytes>) -> Self {
        Self::new(status).body(RespBody::Full(InMemoryBody::new(chunk.into())))
    }

    /// Shorthand for echoing the request body back.
    pub fn echo(status: StatusCode) -> Self {
        Self::new(status).body(RespBody::Echo)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: RespBody) -> Self {
        self.body = body;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn into_parts(self) -> (StatusCode, Vec<(String, String)>, RespBody) {
        (self.status, self.headers, self.body)
    }
}
