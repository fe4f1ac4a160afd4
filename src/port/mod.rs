//! Platform port: the only seam between the logger core and the hardware.
//!
//! The core never touches a concrete mutex, clock or transport. A port
//! supplies:
//! - two lock pairs: a blocking one for task context and a non-blocking
//!   one that is safe to call from an interrupt handler
//! - a byte sink for finished frames (sync mode) and one for raw text
//! - a 64-bit timestamp source
//!
//! Lock functions return `false` on failure. In ISR context that is the
//! expected outcome under contention; the caller drops the message.

use crate::error::PortError;
use crate::frame::Timestamp;

#[cfg(feature = "esp")]
pub mod esp;

#[cfg(feature = "esp")]
pub use esp::EspPort;

/// Platform capabilities consumed by [`crate::Logger`].
pub trait Port {
    /// Called once by [`crate::Logger::init`].
    fn init(&self) -> Result<(), PortError> {
        Ok(())
    }

    /// Called once by [`crate::Logger::deinit`].
    fn deinit(&self) {}

    /// Write one complete `[header|message]` frame to the transport.
    /// Must not call back into the logger.
    fn output(&self, frame: &[u8]);

    /// Write unframed text from [`crate::Logger::raw`]. Defaults to
    /// [`output`](Self::output) for transports that do not care.
    fn output_raw(&self, text: &[u8]) {
        self.output(text)
    }

    /// Acquire the task-context lock. May block.
    fn lock(&self) -> bool;

    /// Release the task-context lock.
    fn unlock(&self) -> bool;

    /// Try to acquire the lock from interrupt context. Never blocks.
    fn lock_isr(&self) -> bool;

    /// Release the lock from interrupt context.
    fn unlock_isr(&self) -> bool;

    /// Current time.
    fn now(&self) -> Timestamp;
}

impl<P: Port + ?Sized> Port for &P {
    fn init(&self) -> Result<(), PortError> {
        (**self).init()
    }

    fn deinit(&self) {
        (**self).deinit()
    }

    fn output(&self, frame: &[u8]) {
        (**self).output(frame)
    }

    fn output_raw(&self, text: &[u8]) {
        (**self).output_raw(text)
    }

    fn lock(&self) -> bool {
        (**self).lock()
    }

    fn unlock(&self) -> bool {
        (**self).unlock()
    }

    fn lock_isr(&self) -> bool {
        (**self).lock_isr()
    }

    fn unlock_isr(&self) -> bool {
        (**self).unlock_isr()
    }

    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
