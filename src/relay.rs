//! Sync/async routing of finished frames.
//!
//! - **sync**: frames go straight to [`Port::output`]
//! - **async**: frames are staged in the [`FrameRing`]; if they do not fit
//!   they are dropped (load shedding, producers never wait for the transport)
//!
//! The drain side reconstructs one whole frame per call.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::error::LogError;
use crate::port::Port;
use crate::ring::FrameRing;

/// Routing switch between the line buffer and the transport.
pub struct AsyncRelay {
    enabled: AtomicBool,
}

impl AsyncRelay {
    /// New relay in sync mode.
    pub const fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Route one complete frame.
    ///
    /// Returns `false` if the frame was dropped because the ring is full.
    pub fn relay<P: Port, const N: usize>(&self, port: &P, ring: &mut FrameRing<N>, frame: &[u8]) -> bool {
        if self.is_enabled() {
            ring.push(frame).is_ok()
        } else {
            port.output(frame);
            true
        }
    }

    /// Move the oldest pending frame into `dst`.
    ///
    /// Returns the frame length. On [`LogError::InvalidInput`] the ring is
    /// untouched, so a retry with a larger buffer succeeds.
    pub fn drain<const N: usize>(ring: &mut FrameRing<N>, dst: &mut [u8]) -> Result<usize, LogError> {
        let header = ring.peek_header().map_err(|_| LogError::NoLogAvailable)?;
        let size = header.frame_size();
        let Some(slot) = dst.get_mut(..size) else {
            return Err(LogError::InvalidInput {
                needed: size,
                provided: dst.len(),
            });
        };
        ring.pop(slot).map_err(|_| LogError::NoLogAvailable)?;
        Ok(size)
    }
}

impl Default for AsyncRelay {
    fn default() -> Self {
        Self::new()
    }
}
