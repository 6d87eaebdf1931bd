//! Growable byte accumulator shared by all framers
//!
//! Connection reads are pushed onto the back of the accumulator and framers
//! pop complete messages off the front. The buffer grows by doubling and never
//! shrinks, so repeated push/pop cycles on a keep-alive connection settle into
//! a steady state with no further allocation.

/// Smallest capacity allocated on first growth.
const MIN_CAPACITY: usize = 32;

use bytes::Bytes;

/// Append-only producer / pop-front consumer byte buffer.
///
/// Invariants:
/// - `len <= capacity` at all times
/// - capacity only grows, by doubling from a floor of [`MIN_CAPACITY`]
/// - `pop_front` shifts the remainder to offset 0 without reallocating
#[derive(Debug)]
pub struct ByteAccumulator {
    storage: Box<[u8]>,
    len: usize,
}

impl ByteAccumulator {
    /// Creates an empty accumulator. No storage is allocated until the first push.
    pub fn new() -> Self {
        Self { storage: Box::new([]), len: 0 }
    }

    /// Appends `bytes` to the end, growing capacity by doubling when needed.
    pub fn push(&mut self, bytes: &[u8]) {
        let needed = self.len + bytes.len();
        if needed > self.storage.len() {
            self.grow(needed);
        }
        self.storage[self.len..needed].copy_from_slice(bytes);
        self.len = needed;
    }

    /// Removes `n` bytes from the front, shifting the remainder to offset 0.
    ///
    /// # Panics
    ///
    /// Panics if `n > len()`. `n = 0` is a no-op.
    pub fn pop_front(&mut self, n: usize) {
        assert!(n <= self.len, "pop_front({n}) exceeds buffered length {}", self.len);
        self.storage.copy_within(n..self.len, 0);
        self.len -= n;
    }

    /// Copies out the first `n` bytes and removes them from the front.
    ///
    /// # Panics
    ///
    /// Panics if `n > len()`.
    pub fn split_to(&mut self, n: usize) -> Bytes {
        let out = Bytes::copy_from_slice(&self.storage[..n]);
        self.pop_front(n);
        out
    }

    /// The live region: every byte pushed and not yet popped, in order.
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// Number of bytes currently held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current backing capacity. Monotonically non-decreasing.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    fn grow(&mut self, needed: usize) {
        let mut capacity = self.storage.len().max(MIN_CAPACITY);
        while capacity < needed {
            capacity *= 2;
        }
        let mut storage = vec![0u8; capacity].into_boxed_slice();
        storage[..self.len].copy_from_slice(&self.storage[..self.len]);
        self.storage = storage;
    }
}

impl Default for ByteAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
