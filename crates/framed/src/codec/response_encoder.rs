//! Response head serialization
//!
//! Encodes the status line, the handler's header lines and the computed
//! `Content-Length` into one chunk, terminated by the blank line. Body bytes
//! are written separately by the connection as the body reader yields them.

use std::io::Write;

use bytes::{BufMut, BytesMut};
use http::StatusCode;

use crate::protocol::SendError;

/// Initial buffer size allocated for head serialization.
const INIT_HEAD_SIZE: usize = 1024;

/// Serializes response heads. The body length must already be resolved;
/// unknown lengths are rejected by the connection before encoding.
#[derive(Debug, Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Encodes `HTTP/1.1 <code> <reason>`, each header line, the computed
    /// `Content-Length` and the blank-line terminator as one chunk.
    pub fn encode_head(
        &self,
        status: StatusCode,
        headers: &[(String, String)],
        content_length: u64,
    ) -> Result<BytesMut, SendError> {
        let mut dst = BytesMut::with_capacity(INIT_HEAD_SIZE);

        write!(FastWrite(&mut dst), "HTTP/1.1 {} {}\r\n", status.as_str(), status.canonical_reason().unwrap_or("Unknown"))?;

        for (name, value) in headers {
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(b"\r\n");
        }

        write!(FastWrite(&mut dst), "Content-Length: {content_length}\r\n")?;
        dst.put_slice(b"\r\n");

        Ok(dst)
    }
}

/// Infallible writer over `BytesMut`, avoiding an intermediate `String` for
/// the formatted lines.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
