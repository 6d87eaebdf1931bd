//! Framing and serialization
//!
//! The codec layer owns the byte accumulator and the logic that turns its
//! live region into parsed messages (and responses back into bytes):
//!
//! - [`ByteAccumulator`]: growable push-back / pop-front byte buffer
//! - [`LineFramer`]: newline-delimited messages
//! - [`HttpRequestFramer`]: HTTP/1.x request heads
//! - [`ResponseEncoder`]: response head serialization

mod accumulator;
mod line_framer;
mod request_framer;
mod response_encoder;

pub use accumulator::ByteAccumulator;
pub use line_framer::LineFramer;
pub use request_framer::{body_size, HttpRequestFramer};
pub use response_encoder::ResponseEncoder;
