//! Log level to OTLP severity mapping.

/// Application log level.
///
/// Ordered by importance: `Error` > `Warn` > `Info` > `Debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// OTLP severity number for this level (error→17, warn→13, info→9,
    /// debug→5).
    #[must_use]
    pub fn severity_number(self) -> u32 {
        match self {
            LogLevel::Error => 17,
            LogLevel::Warn => 13,
            LogLevel::Info => 9,
            LogLevel::Debug => 5,
        }
    }

    /// OTLP severity text for this level (upper-case level name).
    #[must_use]
    pub fn severity_text(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Lower-case level name, as carried in the `log.level` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    /// Rank for min-level filtering (higher is more important).
    #[must_use]
    pub(crate) fn rank(self) -> u8 {
        match self {
            LogLevel::Error => 4,
            LogLevel::Warn => 3,
            LogLevel::Info => 2,
            LogLevel::Debug => 1,
        }
    }

    /// Parse a level name. Returns `None` for unknown names.
    #[must_use]
    pub fn parse(level: &str) -> Option<Self> {
        match level {
            "error" => Some(LogLevel::Error),
            "warn" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// Parse a level name, falling back to `Info` for unknown names.
    #[must_use]
    pub fn parse_or_info(level: &str) -> Self {
        Self::parse(level).unwrap_or(LogLevel::Info)
    }
}

/// OTLP severity number for a level name.
///
/// Total function: unknown names map to 9 (info) as a safe default.
#[must_use]
pub fn severity_number(level: &str) -> u32 {
    LogLevel::parse_or_info(level).severity_number()
}
