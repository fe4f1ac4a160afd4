//! Logging macro surface and bounded formatting.
//!
//! # Architecture
//!
//! ```text
//! Task / ISR               Logger                      Drain task
//! ──────────               ──────                      ──────────
//!
//! log_info!() ──filter──▶ [hdr|msg] line buffer ──┬──▶ Port::output   (sync)
//!             ──lock────▶ (one shared buffer)     └──▶ FrameRing ──▶ drain()
//! ```
//!
//! # Rules
//!
//! - Emission never allocates and never returns an error
//! - ISR callers use the `_isr` path; it fails fast under lock contention
//! - Messages longer than the line buffer are truncated, not rejected
//! - Levels above [`STATIC_MAX_LEVEL`](crate::config::STATIC_MAX_LEVEL) are
//!   compiled out at the macro call site

use core::fmt;

/// Source location of a log call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub file: &'static str,
    pub module: &'static str,
    pub line: u32,
}

impl Location {
    pub const fn new(file: &'static str, module: &'static str, line: u32) -> Self {
        Self { file, module, line }
    }
}

/// `fmt::Write` sink over a fixed byte slice that stops when full.
///
/// Overflow is not a formatting failure: [`finish`](Self::finish) reports
/// the truncated length. Only an error raised by a `Display` impl itself is.
pub struct TruncatingWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
    truncated: bool,
}

impl<'a> TruncatingWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            truncated: false,
        }
    }

    /// Bytes written so far.
    #[inline]
    pub fn written(&self) -> usize {
        self.pos
    }

    /// True once some output did not fit.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Append raw bytes, truncating at capacity.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> fmt::Result {
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;

        if to_write < bytes.len() {
            // Abort the rest of the format run; nothing more fits.
            self.truncated = true;
            return Err(fmt::Error);
        }
        Ok(())
    }

    /// Resolve a `fmt::write` result into the written length.
    ///
    /// `None` means a `Display` impl failed; the output must be discarded.
    pub fn finish(self, result: fmt::Result) -> Option<usize> {
        match result {
            Ok(()) => Some(self.pos),
            Err(_) if self.truncated => Some(self.pos),
            Err(_) => None,
        }
    }
}

impl fmt::Write for TruncatingWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes())
    }
}

/// Capture the current source location.
#[macro_export]
macro_rules! location {
    () => {
        $crate::logging::Location::new(file!(), module_path!(), line!())
    };
}

/// Emit through a logger with explicit context and level.
///
/// # Example
///
/// ```ignore
/// log_frame!(LOGGER, false, LogLevel::Info, "net", "link up after {} ms", ms);
/// ```
#[macro_export]
macro_rules! log_frame {
    ($logger:expr, $is_isr:expr, $level:expr, $tag:expr, $($arg:tt)*) => {{
        let level: $crate::level::LogLevel = $level;
        if level <= $crate::config::STATIC_MAX_LEVEL {
            $logger.emit($is_isr, level, $tag, $crate::location!(), format_args!($($arg)*));
        }
    }};
}

/// Emit from interrupt context.
#[macro_export]
macro_rules! log_isr {
    ($logger:expr, $level:expr, $tag:expr, $($arg:tt)*) => {
        $crate::log_frame!($logger, true, $level, $tag, $($arg)*)
    };
}

/// Assert-level log.
#[macro_export]
macro_rules! log_assert {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {
        $crate::log_frame!($logger, false, $crate::level::LogLevel::Assert, $tag, $($arg)*)
    };
}

/// Error log.
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {
        $crate::log_frame!($logger, false, $crate::level::LogLevel::Error, $tag, $($arg)*)
    };
}

/// Warning log.
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {
        $crate::log_frame!($logger, false, $crate::level::LogLevel::Warn, $tag, $($arg)*)
    };
}

/// Info log.
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {
        $crate::log_frame!($logger, false, $crate::level::LogLevel::Info, $tag, $($arg)*)
    };
}

/// Debug log.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {
        $crate::log_frame!($logger, false, $crate::level::LogLevel::Debug, $tag, $($arg)*)
    };
}

/// Verbose log (maximum verbosity).
#[macro_export]
macro_rules! log_verbose {
    ($logger:expr, $tag:expr, $($arg:tt)*) => {
        $crate::log_frame!($logger, false, $crate::level::LogLevel::Verbose, $tag, $($arg)*)
    };
}
