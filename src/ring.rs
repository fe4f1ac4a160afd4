//! Fixed-capacity circular byte buffer for async staging.
//!
//! # Architecture
//!
//! ```text
//! Producers (under output lock)        Consumer (drain)
//! ─────────────────────────────        ────────────────
//!
//! push([hdr|msg]) ──▶ [..frame..|..frame..|....] ──▶ peek_header()
//!                     ▲ write_index    ▲ read_index    pop(hdr + len)
//! ```
//!
//! # Rules
//!
//! - Push and pop are all-or-nothing; a failed call leaves the buffer untouched
//! - Both indices stay in `[0, N)`, wrapping at the end of the arena
//! - `data_size == pushed - popped` at all times
//! - Callers push whole frames and pop exactly `HEADER_SIZE + message_length`
//!   after a `peek_header`, so the read cursor never lands mid-frame
//!
//! Any capacity works; frames are variable length, so indices wrap by
//! modulo rather than by mask.

use crate::config::RING_BUF_SIZE;
use crate::error::RingError;
use crate::frame::{FrameHeader, HEADER_SIZE};

/// Circular byte store with a static arena of `N` bytes.
pub struct FrameRing<const N: usize = RING_BUF_SIZE> {
    buf: [u8; N],
    data_size: usize,
    write_index: usize,
    read_index: usize,
}

impl<const N: usize> FrameRing<N> {
    /// Create new empty buffer.
    pub const fn new() -> Self {
        const { assert!(N > 0, "Ring buffer capacity must be non-zero") };

        Self {
            buf: [0u8; N],
            data_size: 0,
            write_index: 0,
            read_index: 0,
        }
    }

    /// Arena size in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes currently buffered.
    #[inline]
    pub fn used(&self) -> usize {
        self.data_size
    }

    /// Bytes that can still be pushed.
    #[inline]
    pub fn avail(&self) -> usize {
        N - self.data_size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data_size == 0
    }

    #[inline]
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    #[inline]
    pub fn read_index(&self) -> usize {
        self.read_index
    }

    /// Append `data`, wrapping around the end of the arena.
    ///
    /// Fails without side effects if `data` does not fit entirely.
    pub fn push(&mut self, data: &[u8]) -> Result<(), RingError> {
        let len = data.len();
        if len > self.avail() {
            return Err(RingError::InsufficientSpace {
                requested: len,
                available: self.avail(),
            });
        }

        let first = len.min(N - self.write_index);
        self.buf[self.write_index..self.write_index + first].copy_from_slice(&data[..first]);
        self.buf[..len - first].copy_from_slice(&data[first..]);

        self.write_index = (self.write_index + len) % N;
        self.data_size += len;
        Ok(())
    }

    /// Remove exactly `out.len()` bytes into `out`.
    ///
    /// Fails without side effects if fewer bytes are buffered.
    pub fn pop(&mut self, out: &mut [u8]) -> Result<(), RingError> {
        self.peek(out)?;
        self.read_index = (self.read_index + out.len()) % N;
        self.data_size -= out.len();
        Ok(())
    }

    /// Copy `out.len()` bytes from the read cursor without consuming them.
    pub fn peek(&self, out: &mut [u8]) -> Result<(), RingError> {
        let len = out.len();
        if len > self.data_size {
            return Err(RingError::InsufficientData {
                requested: len,
                available: self.data_size,
            });
        }

        let first = len.min(N - self.read_index);
        out[..first].copy_from_slice(&self.buf[self.read_index..self.read_index + first]);
        out[first..].copy_from_slice(&self.buf[..len - first]);
        Ok(())
    }

    /// Read the header of the oldest pending frame without consuming it.
    pub fn peek_header(&self) -> Result<FrameHeader, RingError> {
        let mut raw = [0u8; HEADER_SIZE];
        self.peek(&mut raw)?;
        FrameHeader::decode(&raw).map_err(|_| RingError::InsufficientData {
            requested: HEADER_SIZE,
            available: self.data_size,
        })
    }

    /// Discard everything.
    pub fn clear(&mut self) {
        self.data_size = 0;
        self.write_index = 0;
        self.read_index = 0;
    }
}

impl<const N: usize> Default for FrameRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
