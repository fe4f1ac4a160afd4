//! Logger context: owns every piece of pipeline state.
//!
//! One value per independent logger. It is `const`-constructible so it can
//! live in a `static`, and it is shared by reference between tasks and
//! interrupt handlers.
//!
//! # Concurrency
//!
//! ```text
//!                                ┌──────────── output lock (Port) ────────────┐
//! emit() ──▶ threshold ──▶ tag ──▶ │ filter ─▶ seq ─▶ line buffer ─▶ relay/ring │ ──▶ unlock
//!            (atomic)   (mirror)   └────────────────────────────────────────────┘
//! drain() ───────────────────────▶ │ ring peek + pop │
//! ```
//!
//! The line buffer, the filter and the ring buffer are only touched while
//! the output lock is held. The threshold and tag mirrors and the sequence
//! counter are atomics and may be read without it.

use core::cell::UnsafeCell;
use core::fmt;
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use crate::builder::{self, FrameMeta};
use crate::config::{LoggerConfig, LINE_BUF_SIZE, RING_BUF_SIZE, VERSION};
use crate::error::LogError;
use crate::filter::{Filter, TagMirror};
use crate::frame::HEADER_SIZE;
use crate::gate::OutputGate;
use crate::level::{LogLevel, LEVEL_ALL};
use crate::logging::Location;
use crate::port::Port;
use crate::relay::AsyncRelay;
use crate::ring::FrameRing;

/// Framed logger over a platform [`Port`].
///
/// `LINE` bounds a single frame (header + message + newline); `RING` is the
/// async staging capacity.
pub struct Logger<P: Port, const LINE: usize = LINE_BUF_SIZE, const RING: usize = RING_BUF_SIZE> {
    port: P,
    config: LoggerConfig,
    gate: OutputGate,
    relay: AsyncRelay,
    /// Next sequence number; advanced once per admitted attempt.
    sequence: AtomicU32,
    /// Lock-free copy of the filter threshold for early rejection.
    threshold: AtomicU8,
    /// Lock-free copy of the tag filter, so admission is settled before
    /// a sequence number is spent.
    tag_mirror: TagMirror,
    filter: UnsafeCell<Filter>,
    line_buf: UnsafeCell<[u8; LINE]>,
    ring: UnsafeCell<FrameRing<RING>>,
}

// SAFETY: `filter`, `line_buf` and `ring` are only accessed between
// `gate.lock()` and `gate.unlock()`, which the port guarantees to be
// mutually exclusive across tasks and interrupt handlers while the lock
// feature is enabled. Everything else is atomic.
unsafe impl<P: Port + Sync, const LINE: usize, const RING: usize> Sync for Logger<P, LINE, RING> {}

impl<P: Port, const LINE: usize, const RING: usize> Logger<P, LINE, RING> {
    /// Create an uninitialized logger. Output and async mode start disabled.
    pub const fn new(port: P, config: LoggerConfig) -> Self {
        const { assert!(LINE > HEADER_SIZE, "Line buffer must hold a frame header and a message") };

        Self {
            port,
            config,
            gate: OutputGate::new(),
            relay: AsyncRelay::new(),
            sequence: AtomicU32::new(0),
            threshold: AtomicU8::new(config.level as u8),
            tag_mirror: TagMirror::new(),
            filter: UnsafeCell::new(Filter::new(config.level)),
            line_buf: UnsafeCell::new([0u8; LINE]),
            ring: UnsafeCell::new(FrameRing::new()),
        }
    }

    /// Platform port.
    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Initialize the port and enable locking. Idempotent.
    pub fn init(&self) -> Result<(), LogError> {
        if self.gate.is_initialized() {
            return Ok(());
        }

        self.port.init()?;

        self.gate.reset_intent();
        self.gate.set_lock_enabled(&self.port, true);
        self.gate.set_initialized(true);
        Ok(())
    }

    /// Deinitialize the port. Emission becomes a no-op until the next `init`.
    pub fn deinit(&self) {
        if !self.gate.is_initialized() {
            return;
        }

        self.port.deinit();
        self.gate.set_initialized(false);
    }

    pub fn is_initialized(&self) -> bool {
        self.gate.is_initialized()
    }

    /// Enable output and async mode, then announce the version.
    pub fn start(&self) {
        if !self.gate.is_initialized() {
            return;
        }

        self.set_output_enabled(true);
        self.set_async_enabled(true);
        self.banner("started");
    }

    /// Announce shutdown, then disable output and async mode.
    ///
    /// Frames already staged stay in the ring buffer and can still be drained.
    pub fn stop(&self) {
        if !self.gate.is_initialized() {
            return;
        }

        self.banner("stopped");
        self.set_output_enabled(false);
        self.set_async_enabled(false);
    }

    fn banner(&self, what: &str) {
        self.emit(
            false,
            LogLevel::Info,
            self.config.banner_tag,
            crate::location!(),
            format_args!("framelog v{} {}.", VERSION, what),
        );
    }

    // ── output gate ───────────────────────────────────────────────────────

    pub fn set_output_enabled(&self, enabled: bool) {
        self.gate.set_output_enabled(enabled);
    }

    pub fn output_enabled(&self) -> bool {
        self.gate.output_enabled()
    }

    /// Switch the output lock on or off.
    ///
    /// Turning it off is meant for fault handlers that must print while the
    /// lock may be held; see [`OutputGate`].
    pub fn set_lock_enabled(&self, enabled: bool) {
        self.gate.set_lock_enabled(&self.port, enabled);
    }

    pub fn gate(&self) -> &OutputGate {
        &self.gate
    }

    // ── filter ────────────────────────────────────────────────────────────

    /// Run `f` on the filter under the task-context lock.
    fn with_filter<R>(&self, f: impl FnOnce(&mut Filter) -> R) -> Option<R> {
        if !self.gate.lock(&self.port, false) {
            return None;
        }

        // SAFETY: output lock held.
        let filter = unsafe { &mut *self.filter.get() };
        let result = f(&mut *filter);
        self.threshold.store(filter.level().as_u8(), Ordering::Release);
        self.tag_mirror.publish(filter.tag());

        self.gate.unlock(&self.port, false);
        Some(result)
    }

    pub fn set_filter(&self, level: LogLevel, tag: &str, keyword: &str) {
        self.with_filter(|filter| filter.set(level, tag, keyword));
    }

    pub fn set_filter_level(&self, level: LogLevel) {
        self.with_filter(|filter| filter.set_level(level));
    }

    pub fn set_filter_tag(&self, tag: &str) {
        self.with_filter(|filter| filter.set_tag(tag));
    }

    pub fn set_filter_keyword(&self, keyword: &str) {
        self.with_filter(|filter| filter.set_keyword(keyword));
    }

    /// Current threshold.
    pub fn filter_level(&self) -> LogLevel {
        LogLevel::from_u8(self.threshold.load(Ordering::Acquire)).unwrap_or(LEVEL_ALL)
    }

    /// Copy of the whole filter, or `None` if the lock could not be taken.
    pub fn filter(&self) -> Option<Filter> {
        self.with_filter(|filter| *filter)
    }

    /// Set or clear (`LEVEL_ALL`) a per-tag level override.
    ///
    /// [`LogError::LockUnavailable`] if the output lock could not be taken
    /// (table unchanged).
    pub fn set_tag_level(&self, tag: &str, level: LogLevel) -> Result<(), LogError> {
        self.with_filter(|filter| filter.set_tag_level(tag, level))
            .unwrap_or(Err(LogError::LockUnavailable))
    }

    /// Override for `tag`, or `LEVEL_ALL` if none is set.
    pub fn tag_level(&self, tag: &str) -> LogLevel {
        self.with_filter(|filter| filter.tag_level(tag))
            .unwrap_or(LEVEL_ALL)
    }

    // ── emission ──────────────────────────────────────────────────────────

    /// Build and route one frame. Best effort: never fails, never blocks in
    /// ISR context.
    ///
    /// Filtered messages leave no trace: level and tag are both checked
    /// against lock-free mirrors before the lock is tried. A message that
    /// passes them but cannot take the lock, or whose formatting fails,
    /// still consumes a sequence number so consumers see the gap. The
    /// source location is not encoded into the frame.
    pub fn emit(&self, is_isr: bool, level: LogLevel, tag: &str, _location: Location, args: fmt::Arguments<'_>) {
        if !self.gate.is_initialized() || !self.gate.output_enabled() {
            return;
        }
        if level.as_u8() > self.threshold.load(Ordering::Acquire) {
            return;
        }
        // `None` only while a filter update races this read; the check
        // under the lock below then decides.
        if self.tag_mirror.matches(tag) == Some(false) {
            return;
        }

        if !self.gate.lock(&self.port, is_isr) {
            self.sequence.fetch_add(1, Ordering::AcqRel);
            return;
        }

        // SAFETY: output lock held for the rest of this block.
        let filter = unsafe { &*self.filter.get() };
        if filter.admit(level, tag) {
            let meta = FrameMeta {
                sequence: self.sequence.fetch_add(1, Ordering::AcqRel),
                level,
                timestamp: self.port.now(),
            };

            // SAFETY: output lock held.
            let line = unsafe { &mut *self.line_buf.get() };
            if let Some(len) = builder::build_frame(line, meta, self.config.newline, args) {
                // SAFETY: output lock held.
                let ring = unsafe { &mut *self.ring.get() };
                self.relay.relay(&self.port, ring, &line[..len]);
            }
        }

        self.gate.unlock(&self.port, is_isr);
    }

    /// Write formatted text straight to the transport: no header, no
    /// filter, no sequence number, never staged in the ring buffer.
    pub fn raw(&self, args: fmt::Arguments<'_>) {
        if !self.gate.is_initialized() || !self.gate.output_enabled() {
            return;
        }
        if !self.gate.lock(&self.port, false) {
            return;
        }

        // SAFETY: output lock held.
        let line = unsafe { &mut *self.line_buf.get() };
        if let Some(len) = builder::build_raw(line, args) {
            self.port.output_raw(&line[..len]);
        }

        self.gate.unlock(&self.port, false);
    }

    /// Sequence number the next admitted attempt will take.
    pub fn next_sequence(&self) -> u32 {
        self.sequence.load(Ordering::Acquire)
    }

    // ── async staging ─────────────────────────────────────────────────────

    pub fn set_async_enabled(&self, enabled: bool) {
        self.relay.set_enabled(enabled);
    }

    pub fn async_enabled(&self) -> bool {
        self.relay.is_enabled()
    }

    /// Move the oldest staged frame into `dst` and return its length.
    ///
    /// Single consumer, task context only.
    pub fn drain(&self, dst: &mut [u8]) -> Result<usize, LogError> {
        if !self.gate.lock(&self.port, false) {
            return Err(LogError::NoLogAvailable);
        }

        // SAFETY: output lock held.
        let ring = unsafe { &mut *self.ring.get() };
        let result = AsyncRelay::drain(ring, dst);

        self.gate.unlock(&self.port, false);
        result
    }

    /// Bytes currently staged in the ring buffer.
    pub fn buffered(&self) -> usize {
        if !self.gate.lock(&self.port, false) {
            return 0;
        }

        // SAFETY: output lock held.
        let used = unsafe { (*self.ring.get()).used() };

        self.gate.unlock(&self.port, false);
        used
    }
}
