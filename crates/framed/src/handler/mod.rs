//! Request handler seam
//!
//! A handler receives the parsed request head and a pull-based reader for its
//! body, and produces a [`ResponseDescriptor`]. Routing policy (which target
//! maps to which body strategy) belongs to the caller, not this crate; see the
//! crate examples.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::protocol::{BodyRead, HttpError, ParsedRequest, ResponseDescriptor};

/// Processes one request into one response.
///
/// The handler may read any prefix of the body, including none of it; the
/// connection drains whatever is left before framing the next request.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(
        &self,
        request: &ParsedRequest,
        body: &mut (dyn BodyRead + Send),
    ) -> Result<ResponseDescriptor, HttpError>;
}

/// Adapter turning a plain async function into a [`Handler`].
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F> Handler for HandlerFn<F>
where
    F: for<'a> Fn(&'a ParsedRequest, &'a mut (dyn BodyRead + Send)) -> BoxFuture<'a, Result<ResponseDescriptor, HttpError>>
        + Send
        + Sync,
{
    async fn handle(
        &self,
        request: &ParsedRequest,
        body: &mut (dyn BodyRead + Send),
    ) -> Result<ResponseDescriptor, HttpError> {
        (self.f)(request, body).await
    }
}

pub fn make_handler<F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a ParsedRequest, &'a mut (dyn BodyRead + Send)) -> BoxFuture<'a, Result<ResponseDescriptor, HttpError>>
        + Send
        + Sync,
{
    HandlerFn { f }
}
