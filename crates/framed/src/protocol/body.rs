//! Pull-based message bodies
//!
//! A body is a capability: a declared (or unknown) length plus a pull
//! operation yielding the next chunk, where a zero-length chunk signals
//! end-of-body exactly once and stays empty on every later pull.
//!
//! Two concrete readers exist: [`ReqBody`], bounded by the request's declared
//! content length and fed from leftover accumulator bytes before touching the
//! transport, and [`InMemoryBody`], a single pre-supplied chunk.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncRead;
use tracing::debug;

use crate::connection::BufferedRecv;
use crate::protocol::ParseError;

/// Size of a message body as declared by its framing headers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BodySize {
    /// Body with known length in bytes.
    Length(u64),
    /// No body.
    Empty,
}

impl BodySize {
    pub fn len(&self) -> u64 {
        match self {
            BodySize::Length(n) => *n,
            BodySize::Empty => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, BodySize::Empty)
    }
}

/// Pull-based body abstraction.
#[async_trait]
pub trait BodyRead: Send {
    /// Declared body length, or `None` when unknown.
    ///
    /// Unknown-length bodies cannot be serialized by this server (chunked
    /// encoding is unsupported), so response construction rejects them before
    /// writing any bytes.
    fn declared_len(&self) -> Option<u64>;

    /// Pulls the next chunk. An empty chunk signals end-of-body; further
    /// pulls after that stay empty.
    async fn read(&mut self) -> Result<Bytes, ParseError>;
}

/// Length-bounded request body, consumed from the connection's accumulator
/// and topped up from the transport when the accumulator runs dry.
#[derive(Debug)]
pub struct ReqBody<'conn, R> {
    reader: &'conn mut BufferedRecv<R>,
    declared: u64,
    remaining: u64,
}

impl<'conn, R> ReqBody<'conn, R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn new(reader: &'conn mut BufferedRecv<R>, size: BodySize) -> Self {
        let declared = size.len();
        Self { reader, declared, remaining: declared }
    }

    /// Bytes not yet pulled by anyone.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Discards the rest of the body.
    ///
    /// A keep-alive connection must consume the declared body even when the
    /// handler did not, otherwise framing of the next request desynchronizes.
    pub async fn drain(&mut self) -> Result<(), ParseError> {
        let mut skipped: u64 = 0;
        while self.remaining > 0 {
            let chunk = self.read().await?;
            skipped += chunk.len() as u64;
        }
        if skipped > 0 {
            debug!(size = skipped, "skipped unread request body");
        }
        Ok(())
    }
}

#[async_trait]
impl<R> BodyRead for ReqBody<'_, R>
where
    R: AsyncRead + Unpin + Send,
{
    fn declared_len(&self) -> Option<u64> {
        Some(self.declared)
    }

    async fn read(&mut self) -> Result<Bytes, ParseError> {
        if self.remaining == 0 {
            return Ok(Bytes::new());
        }

        if self.reader.accumulator().is_empty() {
            let filled = self.reader.fill().await?;
            if filled == 0 {
                // peer closed before delivering the promised body
                return Err(ParseError::UnexpectedEof);
            }
        }

        let take = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        let chunk = self.reader.take_at_most(take);
        self.remaining -= chunk.len() as u64;
        Ok(chunk)
    }
}

/// Body backed by one buffered chunk.
#[derive(Debug)]
pub struct InMemoryBody {
    declared: u64,
    chunk: Option<Bytes>,
}

impl InMemoryBody {
    pub fn new(chunk: Bytes) -> Self {
        Self { declared: chunk.len() as u64, chunk: Some(chunk) }
    }
}

impl From<&'static str> for InMemoryBody {
    fn from(value: &'static str) -> Self {
        Self::new(Bytes::from_static(value.as_bytes()))
    }
}

#[async_trait]
impl BodyRead for InMemoryBody {
    fn declared_len(&self) -> Option<u64> {
        Some(self.declared)
    }

    async fn read(&mut self) -> Result<Bytes, ParseError> {
        Ok(self.chunk.take().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    fn pair() -> (tokio::io::WriteHalf<tokio::io::DuplexStream>, BufferedRecv<tokio::io::ReadHalf<tokio::io::DuplexStream>>) {
        // the unused halves can be dropped; each split half keeps the
        // underlying duplex stream alive
        let (client, server) = tokio::io::duplex(64);
        let (server_read, _server_write) = tokio::io::split(server);
        let (_client_read, client_write) = tokio::io::split(client);
        (client_write, BufferedRecv::new(server_read))
    }

    #[tokio::test]
    async fn yields_chunks_until_declared_length_then_idempotent_empty() {
        let (mut client, mut reader) = pair();
        let mut body = ReqBody::new(&mut reader, BodySize::Length(5));
        assert_eq!(body.declared_len(), Some(5));

        client.write_all(b"ab").await.unwrap();
        assert_eq!(&body.read().await.unwrap()[..], b"ab");

        client.write_all(b"cde").await.unwrap();
        assert_eq!(&body.read().await.unwrap()[..], b"cde");

        assert!(body.read().await.unwrap().is_empty());
        // end is idempotent
        assert!(body.read().await.unwrap().is_empty());
        assert_eq!(body.remaining(), 0);
    }

    #[tokio::test]
    async fn prefers_leftover_accumulator_bytes() {
        let (_client, mut reader) = pair();
        reader.accumulator_mut().push(b"leftover");

        let mut body = ReqBody::new(&mut reader, BodySize::Length(4));
        assert_eq!(&body.read().await.unwrap()[..], b"left");
        assert!(body.read().await.unwrap().is_empty());

        // bytes past the declared length stay buffered for the next frame
        assert_eq!(reader.accumulator().as_slice(), b"over");
    }

    #[tokio::test]
    async fn eof_before_declared_length_is_an_error() {
        let (mut client, mut reader) = pair();
        client.write_all(b"ab").await.unwrap();
        client.shutdown().await.unwrap();
        drop(client);

        let mut body = ReqBody::new(&mut reader, BodySize::Length(5));
        assert_eq!(&body.read().await.unwrap()[..], b"ab");

        let err = body.read().await.unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof));
    }

    #[tokio::test]
    async fn drain_discards_unread_body() {
        let (mut client, mut reader) = pair();
        client.write_all(b"0123456789tail").await.unwrap();

        let mut body = ReqBody::new(&mut reader, BodySize::Length(10));
        body.drain().await.unwrap();
        assert_eq!(body.remaining(), 0);

        assert_eq!(reader.accumulator().as_slice(), b"tail");
    }

    #[tokio::test]
    async fn empty_declared_body_reads_empty() {
        let (_client, mut reader) = pair();
        let mut body = ReqBody::new(&mut reader, BodySize::Empty);

        assert_eq!(body.declared_len(), Some(0));
        assert!(body.read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn in_memory_body_yields_once() {
        let mut body = InMemoryBody::new(Bytes::from_static(b"hello"));

        assert_eq!(body.declared_len(), Some(5));
        assert_eq!(&body.read().await.unwrap()[..], b"hello");
        assert!(body.read().await.unwrap().is_empty());
        assert!(body.read().await.unwrap().is_empty());
    }
}
