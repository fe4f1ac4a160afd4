//! Binary frame layout.
//!
//! ```text
//! offset  0      4      5             9             13              17
//!         ┌──────┬──────┬─────────────┬─────────────┬───────────────┬─────────┐
//!         │ seq  │ lvl  │ ts_low      │ ts_high     │ message_len   │ message │
//!         │ u32  │ u8   │ u32         │ u32         │ u32           │ bytes   │
//!         └──────┴──────┴─────────────┴─────────────┴───────────────┴─────────┘
//! ```
//!
//! All integers little-endian, no padding. The header layout is verified at
//! compile time via `zerocopy`, so a frame can be copied byte-for-byte into
//! the ring buffer and decoded on the consumer side without any alignment
//! assumptions.

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::error::FrameError;
use crate::level::LogLevel;

/// 64-bit timestamp split in two 32-bit halves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub low: u32,
    pub high: u32,
}

impl Timestamp {
    /// Split a 64-bit tick count.
    #[inline]
    pub const fn from_u64(ticks: u64) -> Self {
        Self {
            low: ticks as u32,
            high: (ticks >> 32) as u32,
        }
    }

    /// Join the halves back into a 64-bit tick count.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        ((self.high as u64) << 32) | self.low as u64
    }
}

/// Fixed-size frame header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct FrameHeader {
    sequence: U32,
    level: u8,
    timestamp_low: U32,
    timestamp_high: U32,
    message_length: U32,
}

/// Size of [`FrameHeader`] on the wire.
pub const HEADER_SIZE: usize = core::mem::size_of::<FrameHeader>();

const _: () = assert!(HEADER_SIZE == 17, "frame header must be packed");

impl FrameHeader {
    /// Build a header.
    pub fn new(sequence: u32, level: LogLevel, timestamp: Timestamp, message_length: u32) -> Self {
        Self {
            sequence: U32::new(sequence),
            level: level.as_u8(),
            timestamp_low: U32::new(timestamp.low),
            timestamp_high: U32::new(timestamp.high),
            message_length: U32::new(message_length),
        }
    }

    /// Decode a header from the first [`HEADER_SIZE`] bytes of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        Self::read_from_prefix(bytes)
            .map(|(header, _)| header)
            .map_err(|_| FrameError::Truncated)
    }

    /// Encode into the first [`HEADER_SIZE`] bytes of `dst`.
    ///
    /// Returns `false` (and writes nothing) if `dst` is too short.
    pub fn encode(&self, dst: &mut [u8]) -> bool {
        match dst.get_mut(..HEADER_SIZE) {
            Some(slot) => {
                slot.copy_from_slice(self.as_bytes());
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn sequence(&self) -> u32 {
        self.sequence.get()
    }

    /// Raw level byte as written by the producer.
    #[inline]
    pub fn raw_level(&self) -> u8 {
        self.level
    }

    #[inline]
    pub fn level(&self) -> Option<LogLevel> {
        LogLevel::from_u8(self.level)
    }

    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        Timestamp {
            low: self.timestamp_low.get(),
            high: self.timestamp_high.get(),
        }
    }

    #[inline]
    pub fn message_length(&self) -> usize {
        self.message_length.get() as usize
    }

    /// Header plus message size.
    #[inline]
    pub fn frame_size(&self) -> usize {
        HEADER_SIZE + self.message_length()
    }
}

/// Borrowed, validated view over one complete frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    header: FrameHeader,
    message: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Parse exactly one frame. Trailing bytes are rejected.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, FrameError> {
        let (header, message) = FrameHeader::read_from_prefix(bytes).map_err(|_| FrameError::Truncated)?;
        if header.message_length() != message.len() {
            return Err(FrameError::LengthMismatch {
                declared: header.message_length(),
                actual: message.len(),
            });
        }
        Ok(Self { header, message })
    }

    #[inline]
    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    #[inline]
    pub fn sequence(&self) -> u32 {
        self.header.sequence()
    }

    #[inline]
    pub fn level(&self) -> Option<LogLevel> {
        self.header.level()
    }

    #[inline]
    pub fn raw_level(&self) -> u8 {
        self.header.raw_level()
    }

    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        self.header.timestamp()
    }

    /// Message bytes, including the trailing newline.
    #[inline]
    pub fn message(&self) -> &'a [u8] {
        self.message
    }

    /// Total encoded size.
    #[inline]
    pub fn len(&self) -> usize {
        HEADER_SIZE + self.message.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }
}
