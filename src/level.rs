//! Log severity levels.
//!
//! Lower numeric value means more severe. A filter threshold admits every
//! level whose value is less than or equal to it.

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Assert = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Verbose = 5,
}

/// Threshold that only lets `Assert` through.
pub const LEVEL_SILENT: LogLevel = LogLevel::Assert;

/// Least restrictive threshold. Also the "no override" value of the tag table.
pub const LEVEL_ALL: LogLevel = LogLevel::Verbose;

/// Number of distinct levels.
pub const LEVEL_COUNT: usize = 6;

impl LogLevel {
    /// All levels, most severe first.
    pub const ALL: [LogLevel; LEVEL_COUNT] = [
        LogLevel::Assert,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Verbose,
    ];

    /// Convert from raw u8 value.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(LogLevel::Assert),
            1 => Some(LogLevel::Error),
            2 => Some(LogLevel::Warn),
            3 => Some(LogLevel::Info),
            4 => Some(LogLevel::Debug),
            5 => Some(LogLevel::Verbose),
            _ => None,
        }
    }

    /// Raw wire value.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Bare name for output.
    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Assert => "Assert",
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Verbose => "Verbose",
        }
    }

    /// Bracketed label used by the text renderer.
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Assert => "[Assert]",
            LogLevel::Error => "[Error]",
            LogLevel::Warn => "[Warn]",
            LogLevel::Info => "[Info]",
            LogLevel::Debug => "[Debug]",
            LogLevel::Verbose => "[Verbose]",
        }
    }
}

impl core::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Assert < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Verbose);
        assert_eq!(LEVEL_SILENT, LogLevel::Assert);
        assert_eq!(LEVEL_ALL, LogLevel::Verbose);
    }

    #[test]
    fn test_from_u8_round_trip() {
        for level in LogLevel::ALL {
            assert_eq!(LogLevel::from_u8(level.as_u8()), Some(level));
        }
        assert_eq!(LogLevel::from_u8(6), None);
        assert_eq!(LogLevel::from_u8(255), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(LogLevel::Info.label(), "[Info]");
        assert_eq!(LogLevel::Verbose.label(), "[Verbose]");
        assert_eq!(LogLevel::Warn.name(), "Warn");
    }
}
