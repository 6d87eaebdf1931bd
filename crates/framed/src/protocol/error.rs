use http::StatusCode;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Errors raised while framing requests or reading bodies.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unterminated line too large, current: {current} exceed the limit {max}")]
    FrameTooLarge { current: usize, max: usize },

    #[error("header block too large, current: {current} exceed the limit {max}")]
    HeaderTooLarge { current: usize, max: usize },

    #[error("malformed request: {reason}")]
    MalformedRequest { reason: String },

    #[error("malformed header: {reason}")]
    MalformedHeader { reason: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("peer closed before delivering the promised body")]
    UnexpectedEof,

    #[error("unsupported body framing: {reason}")]
    UnsupportedBodyFraming { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn frame_too_large(current: usize, max: usize) -> Self {
        Self::FrameTooLarge { current, max }
    }

    pub fn header_too_large(current: usize, max: usize) -> Self {
        Self::HeaderTooLarge { current, max }
    }

    pub fn malformed_request<S: ToString>(str: S) -> Self {
        Self::MalformedRequest { reason: str.to_string() }
    }

    pub fn malformed_header<S: ToString>(str: S) -> Self {
        Self::MalformedHeader { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn unsupported_body_framing<S: ToString>(str: S) -> Self {
        Self::UnsupportedBodyFraming { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Status for the best-effort error response, or `None` for transport
    /// errors where response generation is skipped and the connection is
    /// torn down directly.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::FrameTooLarge { .. } | Self::HeaderTooLarge { .. } => Some(StatusCode::PAYLOAD_TOO_LARGE),
            Self::MalformedRequest { .. }
            | Self::MalformedHeader { .. }
            | Self::InvalidContentLength { .. }
            | Self::UnexpectedEof => Some(StatusCode::BAD_REQUEST),
            Self::UnsupportedBodyFraming { .. } => Some(StatusCode::NOT_IMPLEMENTED),
            Self::Io { .. } => None,
        }
    }
}

/// Errors raised while serializing a response.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("response body length is unknown and chunked encoding is unsupported")]
    UnknownBodyLength,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
