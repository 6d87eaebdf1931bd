//! HTTP/1.x request head framer
//!
//! Scans the accumulator for a complete header block (terminated by a blank
//! line), then parses the request line and header lines with the shape rules
//! this server enforces:
//!
//! - the request line splits on single spaces into exactly three tokens
//! - every header line must contain `": "` with non-empty key and value
//! - header order and duplicates are preserved verbatim
//!
//! Exactly the parsed header block (`idx + 4` bytes, blank line included) is
//! removed from the accumulator, so leftover bytes are the start of the body
//! or of the next pipelined request.

use http::{Method, Version};
use tracing::trace;

use crate::codec::ByteAccumulator;
use crate::ensure;
use crate::protocol::{BodySize, HeaderLine, ParseError, ParsedRequest};

/// Maximum size in bytes allowed for the entire header block.
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// End-of-headers marker.
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Extracts one request head per call from the accumulator.
#[derive(Debug, Default)]
pub struct HttpRequestFramer;

impl HttpRequestFramer {
    /// Attempts to frame and parse one request head.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))` if a complete header block was parsed
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` on oversized or malformed heads
    pub fn decode(&mut self, accumulator: &mut ByteAccumulator) -> Result<Option<ParsedRequest>, ParseError> {
        let src = accumulator.as_slice();

        let idx = match src.windows(HEADER_TERMINATOR.len()).position(|w| w == HEADER_TERMINATOR) {
            Some(idx) => idx,
            None => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::header_too_large(src.len(), MAX_HEADER_BYTES));
                return Ok(None);
            }
        };

        let block_len = idx + HEADER_TERMINATOR.len();
        ensure!(block_len <= MAX_HEADER_BYTES, ParseError::header_too_large(block_len, MAX_HEADER_BYTES));
        trace!(block_len, "framed request header block");

        let request = parse_head(&src[..idx])?;

        // consume the whole parsed block, blank line included
        accumulator.pop_front(block_len);

        Ok(Some(request))
    }
}

/// Parses the header block (terminator excluded) into a request head.
fn parse_head(block: &[u8]) -> Result<ParsedRequest, ParseError> {
    let text = std::str::from_utf8(block).map_err(|_| ParseError::malformed_request("header block is not valid utf-8"))?;

    let mut lines = text.split("\r\n");
    let request_line = lines.next().unwrap_or("");

    let tokens: Vec<&str> = request_line.split(' ').collect();
    ensure!(
        tokens.len() == 3,
        ParseError::malformed_request(format!("request line has {} tokens, expect 3", tokens.len()))
    );

    let method =
        Method::from_bytes(tokens[0].as_bytes()).map_err(|_| ParseError::malformed_request("invalid method token"))?;
    ensure!(!tokens[1].is_empty(), ParseError::malformed_request("empty request target"));

    let version = match tokens[2] {
        "HTTP/1.0" => Version::HTTP_10,
        "HTTP/1.1" => Version::HTTP_11,
        other => return Err(ParseError::malformed_request(format!("unsupported version token {other:?}"))),
    };

    let mut headers = Vec::new();
    for line in lines {
        let (name, value) = line.split_once(": ").ok_or_else(|| ParseError::malformed_header(format!("missing separator in {line:?}")))?;
        ensure!(!name.is_empty(), ParseError::malformed_header("empty header name"));
        ensure!(!value.is_empty(), ParseError::malformed_header("empty header value"));
        headers.push(HeaderLine::new(name.to_string(), value.to_string()));
    }

    Ok(ParsedRequest::new(method, tokens[1].to_string(), version, headers))
}

/// Derives the request body size from the parsed head.
///
/// `Content-Length` is the only supported body framing: any
/// `Transfer-Encoding` is rejected with [`ParseError::UnsupportedBodyFraming`]
/// (chunked encoding is unimplemented), and a GET declaring a non-empty body
/// is malformed.
pub fn body_size(request: &ParsedRequest) -> Result<BodySize, ParseError> {
    if let Some(te) = request.header("Transfer-Encoding") {
        return Err(ParseError::unsupported_body_framing(format!("transfer-encoding {te:?}")));
    }

    let length = match request.header("Content-Length") {
        None => return Ok(BodySize::Empty),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ParseError::invalid_content_length(format!("value {value:?} is not u64")))?,
    };

    ensure!(
        !(request.method() == Method::GET && length > 0),
        ParseError::malformed_request("GET must not declare a body")
    );

    if length == 0 { Ok(BodySize::Empty) } else { Ok(BodySize::Length(length)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn accumulate(bytes: &[u8]) -> ByteAccumulator {
        let mut accumulator = ByteAccumulator::new();
        accumulator.push(bytes);
        accumulator
    }

    #[test]
    fn minimal_request() {
        let mut accumulator = accumulate(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n");

        let request = HttpRequestFramer.decode(&mut accumulator).unwrap().unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.target(), "/");
        assert_eq!(request.version(), Version::HTTP_11);
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("Host"), Some("x"));
        assert!(accumulator.is_empty());
    }

    #[test]
    fn consumes_exactly_the_header_block() {
        // regression: the full block including the blank line is popped,
        // leaving body bytes (or the next request) at offset 0
        let head = b"POST /upload HTTP/1.1\r\nContent-Length: 4\r\n\r\n";
        let mut accumulator = accumulate(b"POST /upload HTTP/1.1\r\nContent-Length: 4\r\n\r\nbodyGET /next HTTP/1.1\r\n\r\n");
        let before = accumulator.len();

        HttpRequestFramer.decode(&mut accumulator).unwrap().unwrap();

        assert_eq!(before - accumulator.len(), head.len());
        assert!(accumulator.as_slice().starts_with(b"body"));
    }

    #[test]
    fn incomplete_until_blank_line() {
        let mut accumulator = accumulate(b"GET / HTTP/1.1\r\nHost: x\r\n");

        assert!(HttpRequestFramer.decode(&mut accumulator).unwrap().is_none());
        assert_eq!(accumulator.len(), 25);

        accumulator.push(b"\r\n");
        assert!(HttpRequestFramer.decode(&mut accumulator).unwrap().is_some());
    }

    #[test]
    fn header_block_over_limit() {
        let mut accumulator = ByteAccumulator::new();
        accumulator.push(b"GET / HTTP/1.1\r\n");
        accumulator.push(&vec![b'a'; MAX_HEADER_BYTES]);

        let err = HttpRequestFramer.decode(&mut accumulator).unwrap_err();
        assert!(matches!(err, ParseError::HeaderTooLarge { .. }));
        assert_eq!(err.status(), Some(http::StatusCode::PAYLOAD_TOO_LARGE));
    }

    #[test]
    fn request_line_token_count_enforced() {
        let mut accumulator = accumulate(b"GET /index.html\r\n\r\n");
        let err = HttpRequestFramer.decode(&mut accumulator).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequest { .. }));

        let mut accumulator = accumulate(b"GET /a b HTTP/1.1\r\n\r\n");
        let err = HttpRequestFramer.decode(&mut accumulator).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequest { .. }));
    }

    #[test]
    fn unsupported_version_token() {
        let mut accumulator = accumulate(b"GET / HTTP/2.0\r\n\r\n");
        let err = HttpRequestFramer.decode(&mut accumulator).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequest { .. }));
    }

    #[test]
    fn header_without_separator_is_malformed() {
        let mut accumulator = accumulate(b"GET / HTTP/1.1\r\nHost:x\r\n\r\n");
        let err = HttpRequestFramer.decode(&mut accumulator).unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { .. }));
    }

    #[test]
    fn header_with_empty_key_or_value_is_malformed() {
        let mut accumulator = accumulate(b"GET / HTTP/1.1\r\n: value\r\n\r\n");
        assert!(matches!(HttpRequestFramer.decode(&mut accumulator).unwrap_err(), ParseError::MalformedHeader { .. }));

        let mut accumulator = accumulate(b"GET / HTTP/1.1\r\nKey: \r\n\r\n");
        assert!(matches!(HttpRequestFramer.decode(&mut accumulator).unwrap_err(), ParseError::MalformedHeader { .. }));
    }

    #[test]
    fn duplicate_headers_preserved_in_order() {
        let raw = indoc! {"
            GET / HTTP/1.1\r
            Accept: text/html\r
            Host: example\r
            Accept: */*\r
            \r
        "};
        let mut accumulator = accumulate(raw.as_bytes());

        let request = HttpRequestFramer.decode(&mut accumulator).unwrap().unwrap();

        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.headers()[0].value(), "text/html");
        assert_eq!(request.headers()[2].value(), "*/*");
        assert_eq!(request.header("Accept"), Some("text/html"));
    }

    #[test]
    fn body_size_from_content_length() {
        let mut accumulator = accumulate(b"POST /data HTTP/1.1\r\nContent-Length: 5\r\n\r\n");
        let request = HttpRequestFramer.decode(&mut accumulator).unwrap().unwrap();

        assert_eq!(body_size(&request).unwrap(), BodySize::Length(5));
    }

    #[test]
    fn body_size_defaults_to_empty() {
        let mut accumulator = accumulate(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n");
        let request = HttpRequestFramer.decode(&mut accumulator).unwrap().unwrap();

        assert_eq!(body_size(&request).unwrap(), BodySize::Empty);
    }

    #[test]
    fn get_with_declared_body_is_malformed() {
        let mut accumulator = accumulate(b"GET / HTTP/1.1\r\nContent-Length: 3\r\n\r\n");
        let request = HttpRequestFramer.decode(&mut accumulator).unwrap().unwrap();

        let err = body_size(&request).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequest { .. }));
        assert_eq!(err.status(), Some(http::StatusCode::BAD_REQUEST));
    }

    #[test]
    fn chunked_transfer_encoding_is_unsupported() {
        let mut accumulator = accumulate(b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n");
        let request = HttpRequestFramer.decode(&mut accumulator).unwrap().unwrap();

        let err = body_size(&request).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedBodyFraming { .. }));
        assert_eq!(err.status(), Some(http::StatusCode::NOT_IMPLEMENTED));
    }

    #[test]
    fn invalid_content_length_value() {
        let mut accumulator = accumulate(b"POST / HTTP/1.1\r\nContent-Length: abc\r\n\r\n");
        let request = HttpRequestFramer.decode(&mut accumulator).unwrap().unwrap();

        assert!(matches!(body_size(&request).unwrap_err(), ParseError::InvalidContentLength { .. }));
    }
}
