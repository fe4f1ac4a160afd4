//! Shared test port.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;

use rt_framelog::{Frame, LogLevel, Logger, LoggerConfig, Port, PortError, Timestamp};

pub const LINE: usize = 64;
pub const RING: usize = 512;

pub type TestLogger = Logger<MockPort, LINE, RING>;

/// Port with a spin lock, a frame recorder and fault injection.
#[derive(Default)]
pub struct MockPort {
    held: AtomicBool,
    fail_locks: AtomicU32,
    fail_init: AtomicBool,
    clock: AtomicU64,
    outputs: Mutex<Vec<Vec<u8>>>,
    raw_outputs: Mutex<Vec<Vec<u8>>>,
    pub init_calls: AtomicU32,
    pub deinit_calls: AtomicU32,
    pub lock_calls: AtomicU32,
    pub unlock_calls: AtomicU32,
    pub isr_lock_calls: AtomicU32,
    pub isr_unlock_calls: AtomicU32,
}

/// Owned copy of a delivered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub sequence: u32,
    pub level: Option<LogLevel>,
    pub timestamp: u64,
    pub message: Vec<u8>,
}

impl Delivered {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let frame = Frame::parse(bytes).unwrap();
        Self {
            sequence: frame.sequence(),
            level: frame.level(),
            timestamp: frame.timestamp().as_u64(),
            message: frame.message().to_vec(),
        }
    }

    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.message).unwrap()
    }
}

impl MockPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_init() -> Self {
        let port = Self::default();
        port.fail_init.store(true, Ordering::SeqCst);
        port
    }

    /// Make the next `n` lock attempts (either context) fail.
    pub fn fail_next_locks(&self, n: u32) {
        self.fail_locks.store(n, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        self.fail_locks
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Physical lock state.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }

    /// (task locks, task unlocks)
    pub fn physical_counts(&self) -> (u32, u32) {
        (
            self.lock_calls.load(Ordering::SeqCst),
            self.unlock_calls.load(Ordering::SeqCst),
        )
    }

    /// Bytes passed to `output`.
    pub fn outputs(&self) -> Vec<Vec<u8>> {
        self.outputs.lock().unwrap().clone()
    }

    /// Bytes passed to `output_raw`.
    pub fn raw_outputs(&self) -> Vec<Vec<u8>> {
        self.raw_outputs.lock().unwrap().clone()
    }

    /// Outputs decoded as frames.
    pub fn frames(&self) -> Vec<Delivered> {
        self.outputs().iter().map(|bytes| Delivered::from_bytes(bytes)).collect()
    }
}

impl Port for MockPort {
    fn init(&self) -> Result<(), PortError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(PortError("mock init failure"));
        }
        Ok(())
    }

    fn deinit(&self) {
        self.deinit_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn output(&self, frame: &[u8]) {
        self.outputs.lock().unwrap().push(frame.to_vec());
    }

    fn output_raw(&self, text: &[u8]) {
        self.raw_outputs.lock().unwrap().push(text.to_vec());
    }

    fn lock(&self) -> bool {
        self.lock_calls.fetch_add(1, Ordering::SeqCst);
        if self.take_failure() {
            return false;
        }
        while self
            .held
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            std::thread::yield_now();
        }
        true
    }

    fn unlock(&self) -> bool {
        self.unlock_calls.fetch_add(1, Ordering::SeqCst);
        self.held.store(false, Ordering::Release);
        true
    }

    fn lock_isr(&self) -> bool {
        self.isr_lock_calls.fetch_add(1, Ordering::SeqCst);
        if self.take_failure() {
            return false;
        }
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    fn unlock_isr(&self) -> bool {
        self.isr_unlock_calls.fetch_add(1, Ordering::SeqCst);
        self.held.store(false, Ordering::Release);
        true
    }

    fn now(&self) -> Timestamp {
        Timestamp::from_u64(1_000 + self.clock.fetch_add(1, Ordering::SeqCst))
    }
}

/// Initialized logger with output on, sync mode.
pub fn sync_logger(config: LoggerConfig) -> TestLogger {
    let logger = TestLogger::new(MockPort::new(), config);
    logger.init().unwrap();
    logger.set_output_enabled(true);
    logger
}

/// Initialized logger with output on, async mode, no banner.
pub fn async_logger(config: LoggerConfig) -> TestLogger {
    let logger = sync_logger(config);
    logger.set_async_enabled(true);
    logger
}

/// Drain every staged frame.
pub fn drain_all(logger: &TestLogger) -> Vec<Delivered> {
    let mut out = Vec::new();
    let mut buf = [0u8; LINE];
    while let Ok(len) = logger.drain(&mut buf) {
        out.push(Delivered::from_bytes(&buf[..len]));
    }
    out
}
