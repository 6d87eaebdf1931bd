//! HTTP connection processing
//!
//! `HttpConnection` runs the sequential per-connection loop: frame one request
//! head, hand the body reader to the handler, serialize the response, drain
//! whatever body the handler left unread, then decide whether to keep the
//! connection alive. Responses are written in the order requests were framed;
//! nothing is pipelined.

use std::sync::Arc;

use http::{StatusCode, Version};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info};

use crate::codec::{body_size, HttpRequestFramer, ResponseEncoder};
use crate::connection::{BufferedRecv, SendStream};
use crate::handler::Handler;
use crate::protocol::{
    BodyRead, HttpError, ParseError, ParsedRequest, ReqBody, RespBody, ResponseDescriptor, SendError,
};

/// One accepted connection, from first byte to teardown.
///
/// # Type Parameters
///
/// * `R`: the async readable half
/// * `W`: the async writable half
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: BufferedRecv<R>,
    framer: HttpRequestFramer,
    encoder: ResponseEncoder,
    writer: SendStream<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufferedRecv::new(reader),
            framer: HttpRequestFramer,
            encoder: ResponseEncoder::new(),
            writer: SendStream::new(writer),
        }
    }

    /// Runs the request/response loop until the peer closes, the protocol
    /// version demands closing, or an error tears the connection down.
    ///
    /// Framing and body errors produce a best-effort error response before
    /// teardown; transport errors skip response generation. Handler errors
    /// turn into a 500 and the connection continues.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        loop {
            let request = match self.read_request().await {
                Ok(Some(request)) => request,
                Ok(None) => {
                    info!("no more requests, connection shutdown");
                    return Ok(());
                }
                Err(e) => {
                    error!("can't frame next request, cause {e}");
                    self.send_error_response(&e).await?;
                    return Err(e.into());
                }
            };

            let size = match body_size(&request) {
                Ok(size) => size,
                Err(e) => {
                    error!("request body is unprocessable, cause {e}");
                    self.send_error_response(&e).await?;
                    return Err(e.into());
                }
            };

            debug!(method = %request.method(), path = request.target(), body = size.len(), "framed request");

            let mut body = ReqBody::new(&mut self.reader, size);

            match handler.handle(&request, &mut body).await {
                Ok(response) => {
                    write_response(&mut self.writer, &self.encoder, response, &mut body).await?;
                }
                Err(e) => {
                    error!("handler error, cause: {e}");
                    let response = ResponseDescriptor::new(StatusCode::INTERNAL_SERVER_ERROR);
                    write_response(&mut self.writer, &self.encoder, response, &mut body).await?;
                }
            }

            // a keep-alive connection must not leave body bytes in the stream,
            // otherwise the next frame starts mid-body
            body.drain().await.map_err(HttpError::from)?;

            if request.version() == Version::HTTP_10 {
                info!("http/1.0 connection closes after one response");
                return Ok(());
            }
        }
    }

    /// Frames the next request head, filling from the transport as needed.
    ///
    /// `Ok(None)` is the clean shutdown: end-of-stream with an empty
    /// accumulator. End-of-stream mid-frame is [`ParseError::UnexpectedEof`].
    async fn read_request(&mut self) -> Result<Option<ParsedRequest>, ParseError> {
        loop {
            if let Some(request) = self.framer.decode(self.reader.accumulator_mut())? {
                return Ok(Some(request));
            }

            if self.reader.fill().await? == 0 {
                if self.reader.accumulator().is_empty() {
                    return Ok(None);
                }
                return Err(ParseError::UnexpectedEof);
            }
        }
    }

    /// Best-effort error response; skipped for transport errors.
    async fn send_error_response(&mut self, e: &ParseError) -> Result<(), HttpError> {
        let Some(status) = e.status() else {
            return Ok(());
        };

        let head = self.encoder.encode_head(status, &[], 0).map_err(HttpError::from)?;
        self.writer.send(&head).await.map_err(HttpError::from)?;
        self.writer.flush().await.map_err(HttpError::from)?;
        Ok(())
    }
}

/// Serializes one response: resolve the body length, write the head as one
/// chunk, then pump body chunks as they arrive.
async fn write_response<R, W>(
    writer: &mut SendStream<W>,
    encoder: &ResponseEncoder,
    response: ResponseDescriptor,
    req_body: &mut ReqBody<'_, R>,
) -> Result<(), HttpError>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let (status, headers, body) = response.into_parts();

    // the length must be known before any bytes are written
    let content_length = match &body {
        RespBody::Empty => 0,
        RespBody::Full(full) => full.declared_len().unwrap_or(0),
        RespBody::Echo => req_body.remaining(),
        RespBody::Stream(stream) => stream.declared_len().ok_or(SendError::UnknownBodyLength)?,
    };

    let head = encoder.encode_head(status, &headers, content_length)?;
    writer.send(&head).await.map_err(HttpError::from)?;

    match body {
        RespBody::Empty => {}
        RespBody::Full(mut full) => copy_body(writer, &mut full).await?,
        RespBody::Echo => copy_body(writer, req_body).await?,
        RespBody::Stream(mut stream) => copy_body(writer, stream.as_mut()).await?,
    }

    writer.flush().await.map_err(HttpError::from)?;
    Ok(())
}

async fn copy_body<W>(writer: &mut SendStream<W>, body: &mut (dyn BodyRead + Send)) -> Result<(), HttpError>
where
    W: AsyncWrite + Unpin + Send,
{
    loop {
        let chunk = body.read().await?;
        if chunk.is_empty() {
            return Ok(());
        }
        writer.send(&chunk).await.map_err(HttpError::from)?;
    }
}
