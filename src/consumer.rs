//! Drain-side consumer.
//!
//! The logger is best effort: frames can be lost to lock contention, format
//! failures or a full ring buffer. Every lost attempt still consumed a
//! sequence number, so a reader can count losses exactly by watching for
//! gaps.
//!
//! # Example
//!
//! ```ignore
//! let mut consumer = FrameConsumer::new(&LOGGER);
//!
//! loop {
//!     while let Ok(frame) = consumer.poll() {
//!         uart.write(frame.message());
//!     }
//!     if consumer.dropped() > 0 {
//!         report(consumer.take_dropped());
//!     }
//!     sleep();
//! }
//! ```

use crate::error::LogError;
use crate::frame::Frame;
use crate::logger::Logger;
use crate::port::Port;

/// Counts missing sequence numbers between delivered frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceTracker {
    next: Option<u32>,
    dropped: u32,
    received: u32,
}

impl SequenceTracker {
    pub const fn new() -> Self {
        Self {
            next: None,
            dropped: 0,
            received: 0,
        }
    }

    /// Record a delivered sequence number and return the gap before it.
    ///
    /// The first frame observed establishes the baseline (gap 0).
    pub fn observe(&mut self, sequence: u32) -> u32 {
        let gap = self.next.map_or(0, |expected| sequence.wrapping_sub(expected));
        self.next = Some(sequence.wrapping_add(1));
        self.dropped = self.dropped.saturating_add(gap);
        self.received = self.received.wrapping_add(1);
        gap
    }

    /// Sequence number expected next, if any frame was seen.
    pub fn expected(&self) -> Option<u32> {
        self.next
    }

    /// Messages lost since the last [`take_dropped`](Self::take_dropped).
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Return and reset the lost-message count.
    pub fn take_dropped(&mut self) -> u32 {
        core::mem::take(&mut self.dropped)
    }

    /// Frames observed.
    pub fn received(&self) -> u32 {
        self.received
    }
}

/// Single consumer draining one logger's ring buffer.
pub struct FrameConsumer<'a, P: Port, const LINE: usize, const RING: usize> {
    logger: &'a Logger<P, LINE, RING>,
    buf: [u8; LINE],
    tracker: SequenceTracker,
}

impl<'a, P: Port, const LINE: usize, const RING: usize> FrameConsumer<'a, P, LINE, RING> {
    pub fn new(logger: &'a Logger<P, LINE, RING>) -> Self {
        Self {
            logger,
            buf: [0u8; LINE],
            tracker: SequenceTracker::new(),
        }
    }

    /// Drain the oldest staged frame.
    ///
    /// [`LogError::NoLogAvailable`] when the ring buffer is empty.
    pub fn poll(&mut self) -> Result<Frame<'_>, LogError> {
        let len = self.logger.drain(&mut self.buf)?;
        let frame = Frame::parse(&self.buf[..len]).map_err(|_| LogError::NoLogAvailable)?;
        self.tracker.observe(frame.sequence());
        Ok(frame)
    }

    pub fn tracker(&self) -> &SequenceTracker {
        &self.tracker
    }

    pub fn dropped(&self) -> u32 {
        self.tracker.dropped()
    }

    pub fn take_dropped(&mut self) -> u32 {
        self.tracker.take_dropped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_first_frame_is_baseline() {
        let mut tracker = SequenceTracker::new();
        assert_eq!(tracker.observe(41), 0);
        assert_eq!(tracker.expected(), Some(42));
        assert_eq!(tracker.dropped(), 0);
    }

    #[test]
    fn test_tracker_counts_gaps() {
        let mut tracker = SequenceTracker::new();
        tracker.observe(1);
        assert_eq!(tracker.observe(2), 0);
        assert_eq!(tracker.observe(5), 2);
        assert_eq!(tracker.observe(6), 0);
        assert_eq!(tracker.dropped(), 2);
        assert_eq!(tracker.received(), 4);

        assert_eq!(tracker.take_dropped(), 2);
        assert_eq!(tracker.dropped(), 0);
    }

    #[test]
    fn test_tracker_handles_counter_wrap() {
        let mut tracker = SequenceTracker::new();
        tracker.observe(u32::MAX - 1);
        assert_eq!(tracker.observe(u32::MAX), 0);
        assert_eq!(tracker.observe(1), 1);
    }
}
