//! Output gate: enable flag plus lock-intent tracking.
//!
//! The lock feature can be switched off at runtime (typically so a fault
//! handler can print while some task may hold the mutex). While it is off,
//! lock/unlock calls are inert but their intent is remembered:
//!
//! ```text
//! feature on:  lock()   → real lock, locked_before_disable = true if granted
//!              unlock() → locked_before_disable = false, real unlock
//! feature off: lock()   → locked_before_enable  = true,  no-op
//!              unlock() → locked_before_enable  = false, no-op
//!
//! switch on:   before_disable && !before_enable → real unlock
//!              !before_disable && before_enable → real lock
//!              otherwise                        → nothing
//! ```
//!
//! At most one deferred transition is replayed per switch-on.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::port::Port;

/// Gate state. All flags are atomics so the gate can be shared by
/// task and interrupt context.
pub struct OutputGate {
    initialized: AtomicBool,
    output_enabled: AtomicBool,
    lock_enabled: AtomicBool,
    locked_before_enable: AtomicBool,
    locked_before_disable: AtomicBool,
}

impl OutputGate {
    /// New gate: uninitialized, output off, lock feature off.
    pub const fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            output_enabled: AtomicBool::new(false),
            lock_enabled: AtomicBool::new(false),
            locked_before_enable: AtomicBool::new(false),
            locked_before_disable: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn set_initialized(&self, initialized: bool) {
        self.initialized.store(initialized, Ordering::Release);
    }

    #[inline]
    pub fn set_output_enabled(&self, enabled: bool) {
        self.output_enabled.store(enabled, Ordering::Release);
    }

    #[inline]
    pub fn output_enabled(&self) -> bool {
        self.output_enabled.load(Ordering::Acquire)
    }

    #[inline]
    pub fn lock_enabled(&self) -> bool {
        self.lock_enabled.load(Ordering::Acquire)
    }

    /// Recorded intent while the feature was off.
    #[inline]
    pub fn locked_before_enable(&self) -> bool {
        self.locked_before_enable.load(Ordering::Acquire)
    }

    /// Recorded intent while the feature was on.
    #[inline]
    pub fn locked_before_disable(&self) -> bool {
        self.locked_before_disable.load(Ordering::Acquire)
    }

    /// Forget recorded intent (init).
    pub(crate) fn reset_intent(&self) {
        self.locked_before_enable.store(false, Ordering::Release);
        self.locked_before_disable.store(false, Ordering::Release);
    }

    /// Acquire the context-appropriate lock.
    ///
    /// A refused lock is not recorded, so a later switch-on never replays
    /// an unlock for it.
    pub fn lock<P: Port>(&self, port: &P, is_isr: bool) -> bool {
        if self.lock_enabled() {
            let acquired = if is_isr { port.lock_isr() } else { port.lock() };
            if acquired {
                self.locked_before_disable.store(true, Ordering::Release);
            }
            acquired
        } else {
            self.locked_before_enable.store(true, Ordering::Release);
            true
        }
    }

    /// Release the context-appropriate lock.
    pub fn unlock<P: Port>(&self, port: &P, is_isr: bool) -> bool {
        if self.lock_enabled() {
            self.locked_before_disable.store(false, Ordering::Release);
            if is_isr {
                port.unlock_isr()
            } else {
                port.unlock()
            }
        } else {
            self.locked_before_enable.store(false, Ordering::Release);
            true
        }
    }

    /// Switch the lock feature, replaying a deferred transition on switch-on.
    pub fn set_lock_enabled<P: Port>(&self, port: &P, enabled: bool) {
        self.lock_enabled.store(enabled, Ordering::Release);
        if !enabled {
            return;
        }

        let before_enable = self.locked_before_enable();
        let before_disable = self.locked_before_disable();
        if !before_disable && before_enable {
            port.lock();
        } else if before_disable && !before_enable {
            port.unlock();
        }
    }
}

impl Default for OutputGate {
    fn default() -> Self {
        Self::new()
    }
}
