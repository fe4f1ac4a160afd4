//! Error types.
//!
//! Only conditions a caller can act on are signaled. Everything on the
//! emission path that can fail (formatting, lock contention, a full ring
//! buffer) is a silent drop, visible only as a sequence gap.

use thiserror::Error;

/// Errors returned by the public logger API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LogError {
    /// Port initialization failed; the logger stays uninitialized.
    #[error("port initialization failed")]
    InitFailure,

    /// Drain buffer is smaller than the pending frame.
    #[error("input too small: pending frame needs {needed} bytes, buffer has {provided}")]
    InvalidInput { needed: usize, provided: usize },

    /// Nothing (or only a partial header) is pending.
    #[error("no log available")]
    NoLogAvailable,

    /// The output lock could not be taken; nothing was changed.
    #[error("output lock unavailable")]
    LockUnavailable,

    /// Every tag-level override slot is in use.
    #[error("tag level table is full")]
    TagTableFull,
}

/// Ring buffer push/pop failures. The buffer is unchanged when returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    #[error("insufficient space: requested {requested} bytes, {available} available")]
    InsufficientSpace { requested: usize, available: usize },

    #[error("insufficient data: requested {requested} bytes, {available} buffered")]
    InsufficientData { requested: usize, available: usize },
}

/// Frame decoding failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame shorter than its header")]
    Truncated,

    #[error("header declares {declared} message bytes, {actual} present")]
    LengthMismatch { declared: usize, actual: usize },
}

/// Failure reported by a [`crate::port::Port`] during init.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("port error: {0}")]
pub struct PortError(pub &'static str);

impl From<PortError> for LogError {
    fn from(_: PortError) -> Self {
        LogError::InitFailure
    }
}
