//! Newline-delimited message framer for the line protocol variant.

use bytes::Bytes;

use crate::codec::ByteAccumulator;
use crate::ensure;
use crate::protocol::ParseError;

/// Maximum bytes an unterminated line may accumulate before the frame is
/// rejected.
const MAX_LINE_BYTES: usize = 8 * 1024;

/// Extracts newline-terminated messages from the accumulator.
///
/// Each yielded message includes its trailing `\n`.
#[derive(Debug)]
pub struct LineFramer {
    max_line_bytes: usize,
}

impl LineFramer {
    pub fn new() -> Self {
        Self { max_line_bytes: MAX_LINE_BYTES }
    }

    /// Caps the number of bytes an unterminated line may occupy.
    pub fn with_max_line_bytes(max_line_bytes: usize) -> Self {
        Self { max_line_bytes }
    }

    /// Attempts to extract the next line.
    ///
    /// Returns `Ok(None)` when no `\n` has arrived yet. Fails with
    /// [`ParseError::FrameTooLarge`] once the unterminated prefix exceeds the
    /// configured limit.
    pub fn decode(&mut self, accumulator: &mut ByteAccumulator) -> Result<Option<Bytes>, ParseError> {
        match accumulator.as_slice().iter().position(|&b| b == b'\n') {
            Some(i) => Ok(Some(accumulator.split_to(i + 1))),
            None => {
                ensure!(
                    accumulator.len() <= self.max_line_bytes,
                    ParseError::frame_too_large(accumulator.len(), self.max_line_bytes)
                );
                Ok(None)
            }
        }
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_first_line_and_keeps_remainder() {
        let mut accumulator = ByteAccumulator::new();
        accumulator.push(b"ab\ncd");

        let mut framer = LineFramer::new();

        let line = framer.decode(&mut accumulator).unwrap().unwrap();
        assert_eq!(&line[..], b"ab\n");

        // "cd" keeps accumulating with no message until a further newline
        assert!(framer.decode(&mut accumulator).unwrap().is_none());
        assert_eq!(accumulator.as_slice(), b"cd");

        accumulator.push(b"e\n");
        let line = framer.decode(&mut accumulator).unwrap().unwrap();
        assert_eq!(&line[..], b"cde\n");
        assert!(accumulator.is_empty());
    }

    #[test]
    fn incomplete_without_newline() {
        let mut accumulator = ByteAccumulator::new();
        accumulator.push(b"no terminator yet");

        assert!(LineFramer::new().decode(&mut accumulator).unwrap().is_none());
        assert_eq!(accumulator.len(), 17);
    }

    #[test]
    fn unterminated_line_over_limit_is_rejected() {
        let mut accumulator = ByteAccumulator::new();
        accumulator.push(&[b'x'; 33]);

        let mut framer = LineFramer::with_max_line_bytes(32);
        let err = framer.decode(&mut accumulator).unwrap_err();
        assert!(matches!(err, ParseError::FrameTooLarge { current: 33, max: 32 }));
    }

    #[test]
    fn newline_only_message() {
        let mut accumulator = ByteAccumulator::new();
        accumulator.push(b"\n");

        let line = LineFramer::new().decode(&mut accumulator).unwrap().unwrap();
        assert_eq!(&line[..], b"\n");
        assert!(accumulator.is_empty());
    }
}
