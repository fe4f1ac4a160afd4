//! Module: config
//!
//! Purpose: Build-time configuration surface for the logger.
//!
//! Capacities are fixed at compile time (const generics on
//! [`crate::Logger`] default to the values below). Everything else lives
//! in [`LoggerConfig`], handed to the logger once at construction.

use crate::level::{LogLevel, LEVEL_ALL};

/// Default line buffer capacity (header + message + newline).
pub const LINE_BUF_SIZE: usize = 1024;

/// Default ring buffer capacity for async mode.
pub const RING_BUF_SIZE: usize = LINE_BUF_SIZE * 10;

/// Maximum stored length of a tag filter or tag-table key, in bytes.
pub const FILTER_TAG_MAX_LEN: usize = 30;

/// Maximum stored length of the keyword filter, in bytes.
pub const FILTER_KW_MAX_LEN: usize = 16;

/// Number of per-tag level override slots.
pub const FILTER_TAG_LVL_MAX_NUM: usize = 4;

/// Newline appended to every message that does not already end with it.
pub const DEFAULT_NEWLINE: &str = "\n";

/// Version string shown in the start/stop banner.
pub const VERSION: &str = env!("VERSION_STRING");

/// Compile-time level ceiling for the `log_*!` macros.
///
/// Levels above it are removed by the compiler at the call site.
#[cfg(feature = "max_level_assert")]
pub const STATIC_MAX_LEVEL: LogLevel = LogLevel::Assert;
#[cfg(all(feature = "max_level_error", not(feature = "max_level_assert")))]
pub const STATIC_MAX_LEVEL: LogLevel = LogLevel::Error;
#[cfg(all(
    feature = "max_level_warn",
    not(any(feature = "max_level_assert", feature = "max_level_error"))
))]
pub const STATIC_MAX_LEVEL: LogLevel = LogLevel::Warn;
#[cfg(all(
    feature = "max_level_info",
    not(any(
        feature = "max_level_assert",
        feature = "max_level_error",
        feature = "max_level_warn"
    ))
))]
pub const STATIC_MAX_LEVEL: LogLevel = LogLevel::Info;
#[cfg(all(
    feature = "max_level_debug",
    not(any(
        feature = "max_level_assert",
        feature = "max_level_error",
        feature = "max_level_warn",
        feature = "max_level_info"
    ))
))]
pub const STATIC_MAX_LEVEL: LogLevel = LogLevel::Debug;
#[cfg(not(any(
    feature = "max_level_assert",
    feature = "max_level_error",
    feature = "max_level_warn",
    feature = "max_level_info",
    feature = "max_level_debug"
)))]
pub const STATIC_MAX_LEVEL: LogLevel = LogLevel::Verbose;

/// Runtime configuration, fixed for the lifetime of a logger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Line terminator appended to messages.
    pub newline: &'static str,
    /// Initial filter threshold.
    pub level: LogLevel,
    /// Tag used for the start/stop banner.
    pub banner_tag: &'static str,
}

impl LoggerConfig {
    /// Default configuration: `"\n"`, everything admitted, tag `"framelog"`.
    pub const DEFAULT: Self = Self {
        newline: DEFAULT_NEWLINE,
        level: LEVEL_ALL,
        banner_tag: "framelog",
    };

    /// Same configuration with a different initial threshold.
    pub const fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Same configuration with a different newline sequence.
    pub const fn with_newline(mut self, newline: &'static str) -> Self {
        self.newline = newline;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
