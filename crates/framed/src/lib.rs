//! A minimal asynchronous framed-message server
//!
//! This crate terminates raw byte streams into framed application messages,
//! one connection per task, with two framing strategies: newline-delimited
//! text messages and HTTP/1.x request/response framing with content-length
//! bodies. Its core is the stream-to-message adaptation layer: a pull-based
//! wrapper over the socket halves, a growable byte accumulator, the framers
//! that extract complete messages from it, and paired request/response body
//! readers.
//!
//! # Features
//!
//! - Pull-based connection reads: at most one chunk in flight, so the demand
//!   from the framing loop is the flow control
//! - Sticky terminal state: transport error and end-of-stream are recorded
//!   once and observed by every later operation
//! - Streaming request and response bodies bounded by `Content-Length`
//! - Keep-alive for HTTP/1.1, close-after-response for HTTP/1.0
//! - A line/echo protocol variant sharing the same accumulator and streams
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use http::StatusCode;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! use micro_framed::connection::HttpConnection;
//! use micro_framed::handler::Handler;
//! use micro_framed::protocol::{BodyRead, HttpError, ParsedRequest, ResponseDescriptor};
//!
//! struct HelloHandler;
//!
//! #[async_trait]
//! impl Handler for HelloHandler {
//!     async fn handle(
//!         &self,
//!         request: &ParsedRequest,
//!         _body: &mut (dyn BodyRead + Send),
//!     ) -> Result<ResponseDescriptor, HttpError> {
//!         info!(path = request.target(), "handling request");
//!         Ok(ResponseDescriptor::full(StatusCode::OK, "Hello World!\r\n"))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     info!(port = 8080, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(HelloHandler);
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             match connection.process(handler).await {
//!                 Ok(_) => info!("finished process, connection shutdown"),
//!                 Err(e) => error!("service has error, cause {}, connection shutdown", e),
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`connection`]: stream wrappers with sticky terminal state, and the
//!   per-connection HTTP and line-protocol loops
//! - [`codec`]: the byte accumulator, both framers and the response encoder
//! - [`protocol`]: parsed requests, body readers, response descriptors, errors
//! - [`handler`]: the request handler seam
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 only
//! - `Content-Length` is the only supported body framing; chunked
//!   transfer-encoding is rejected with 501
//! - No TLS (use a reverse proxy for HTTPS)
//! - Maximum header block size: 8KB

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
