//! Pull-based wrappers over the raw transport halves
//!
//! The transport's delivery is adapted to a single-outstanding pull: `read()`
//! fetches at most one chunk, and nothing is read from the transport until the
//! caller asks for the next one — that demand-driven read is the connection's
//! sole flow-control mechanism, bounding memory to one in-flight chunk.
//! Taking `&mut self` makes "at most one outstanding read" a compile-time
//! guarantee rather than a caller convention.
//!
//! Transport error and end-of-stream are sticky: once recorded, every later
//! operation observes the remembered outcome without touching the transport
//! again.

use std::io;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::codec::ByteAccumulator;
use crate::protocol::{ParseError, SendError};

/// Upper bound on a single chunk pulled from the transport.
const READ_CHUNK_BYTES: usize = 8 * 1024;

/// Terminal-state machine for one transport direction.
///
/// `Ended` and `Errored` are terminal; once entered, all further operations
/// return the remembered outcome.
#[derive(Debug)]
enum StreamState {
    Open,
    Ended,
    Errored { kind: io::ErrorKind, message: String },
}

impl StreamState {
    fn record(&mut self, e: &io::Error) {
        *self = StreamState::Errored { kind: e.kind(), message: e.to_string() };
    }

    fn replay(&self) -> Option<io::Error> {
        match self {
            StreamState::Errored { kind, message } => Some(io::Error::new(*kind, message.clone())),
            _ => None,
        }
    }
}

/// Receiving half: yields one chunk per `read()`, empty chunk on end-of-stream.
#[derive(Debug)]
pub struct RecvStream<R> {
    inner: R,
    state: StreamState,
}

impl<R> RecvStream<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(inner: R) -> Self {
        Self { inner, state: StreamState::Open }
    }

    /// Pulls the next chunk of bytes from the transport.
    ///
    /// An empty chunk signals end-of-stream; after that, every further call
    /// resolves to an empty chunk immediately. A transport error is recorded
    /// and replayed by all subsequent calls.
    pub async fn read(&mut self) -> Result<Bytes, ParseError> {
        if let Some(e) = self.state.replay() {
            return Err(ParseError::io(e));
        }
        if matches!(self.state, StreamState::Ended) {
            return Ok(Bytes::new());
        }

        let mut chunk = BytesMut::with_capacity(READ_CHUNK_BYTES);
        match self.inner.read_buf(&mut chunk).await {
            Ok(0) => {
                debug!("transport reached end of stream");
                self.state = StreamState::Ended;
                Ok(Bytes::new())
            }
            Ok(_) => Ok(chunk.freeze()),
            Err(e) => {
                self.state.record(&e);
                Err(ParseError::io(e))
            }
        }
    }

    /// True once end-of-stream has been observed.
    pub fn is_ended(&self) -> bool {
        matches!(self.state, StreamState::Ended)
    }
}

/// Receiving half paired with the connection's byte accumulator.
///
/// Framers pop complete messages off the accumulator front; `fill` pulls one
/// more chunk from the transport when they report "incomplete".
#[derive(Debug)]
pub struct BufferedRecv<R> {
    recv: RecvStream<R>,
    accumulator: ByteAccumulator,
}

impl<R> BufferedRecv<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(inner: R) -> Self {
        Self { recv: RecvStream::new(inner), accumulator: ByteAccumulator::new() }
    }

    /// Reads one chunk from the transport into the accumulator.
    ///
    /// Returns the number of bytes appended; 0 means end-of-stream.
    pub async fn fill(&mut self) -> Result<usize, ParseError> {
        let chunk = self.recv.read().await?;
        self.accumulator.push(&chunk);
        Ok(chunk.len())
    }

    pub fn accumulator(&self) -> &ByteAccumulator {
        &self.accumulator
    }

    pub fn accumulator_mut(&mut self) -> &mut ByteAccumulator {
        &mut self.accumulator
    }

    /// Takes up to `n` buffered bytes off the accumulator front.
    pub fn take_at_most(&mut self, n: usize) -> Bytes {
        let take = n.min(self.accumulator.len());
        self.accumulator.split_to(take)
    }
}

/// Sending half: writes chunks, with the transport error sticky.
///
/// A peer half-close on the receive side does not poison this half; the
/// server still drains buffered data and writes its response.
#[derive(Debug)]
pub struct SendStream<W> {
    inner: W,
    state: StreamState,
}

impl<W> SendStream<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(inner: W) -> Self {
        Self { inner, state: StreamState::Open }
    }

    /// Writes the whole chunk, failing immediately with the remembered error
    /// if one is already recorded.
    pub async fn send(&mut self, bytes: &[u8]) -> Result<(), SendError> {
        if let Some(e) = self.state.replay() {
            return Err(SendError::io(e));
        }

        self.inner.write_all(bytes).await.map_err(|e| {
            self.state.record(&e);
            SendError::io(e)
        })
    }

    pub async fn flush(&mut self) -> Result<(), SendError> {
        if let Some(e) = self.state.replay() {
            return Err(SendError::io(e));
        }

        self.inner.flush().await.map_err(|e| {
            self.state.record(&e);
            SendError::io(e)
        })
    }
}
