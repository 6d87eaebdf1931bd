//! Protocol types and abstractions.

pub mod body;
mod error;
mod request;
mod response;

pub use body::{BodyRead, BodySize, InMemoryBody, ReqBody};
pub use error::{HttpError, ParseError, SendError};
pub use request::{HeaderLine, ParsedRequest};
pub use response::{RespBody, ResponseDescriptor};
