//! Line-protocol connection processing
//!
//! The echo variant of the server: newline-terminated messages are echoed back
//! verbatim, and a `quit` message gets a `bye` reply before the connection
//! closes.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

use crate::codec::LineFramer;
use crate::connection::{BufferedRecv, SendStream};
use crate::protocol::{HttpError, ParseError};

/// Reply sent for the `quit` control message.
const QUIT_REPLY: &[u8] = b"bye\n";

/// One accepted line-protocol connection.
#[derive(Debug)]
pub struct LineConnection<R, W> {
    reader: BufferedRecv<R>,
    framer: LineFramer,
    writer: SendStream<W>,
}

impl<R, W> LineConnection<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader: BufferedRecv::new(reader), framer: LineFramer::new(), writer: SendStream::new(writer) }
    }

    /// Echoes framed lines until `quit`, end-of-stream or an error.
    ///
    /// End-of-stream with a partial unterminated line buffered is
    /// [`ParseError::UnexpectedEof`]; with an empty accumulator it is a clean
    /// shutdown.
    pub async fn run(mut self) -> Result<(), HttpError> {
        loop {
            let line = match self.framer.decode(self.reader.accumulator_mut()).map_err(HttpError::from)? {
                Some(line) => line,
                None => {
                    if self.reader.fill().await.map_err(HttpError::from)? == 0 {
                        if self.reader.accumulator().is_empty() {
                            info!("no more lines, connection shutdown");
                            return Ok(());
                        }
                        return Err(ParseError::UnexpectedEof.into());
                    }
                    continue;
                }
            };

            // the framer guarantees a trailing newline
            let message = &line[..line.len() - 1];
            let message = message.strip_suffix(b"\r").unwrap_or(message);
            if message == b"quit" {
                debug!("received quit command");
                self.writer.send(QUIT_REPLY).await.map_err(HttpError::from)?;
                self.writer.flush().await.map_err(HttpError::from)?;
                return Ok(());
            }

            self.writer.send(&line).await.map_err(HttpError::from)?;
            self.writer.flush().await.map_err(HttpError::from)?;
        }
    }
}
