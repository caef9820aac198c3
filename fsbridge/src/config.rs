//! Driver configuration
//!
//! The only tunable is verbosity. Firmware exposes it as a small decimal
//! number stored in a variable, so both a narrow and a UTF-16 parser exist.

use log::LevelFilter;

/// Driver log verbosity, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum LogLevel {
    /// Silent
    None = 0,
    /// Errors only
    #[default]
    Error = 1,
    /// Errors and warnings
    Warning = 2,
    /// Adds informational messages, including probe failures
    Info = 3,
    /// Adds debug messages
    Debug = 4,
    /// Everything, including per-block tracing
    Extra = 5,
}

impl LogLevel {
    /// Level from its numeric value, saturating at [`LogLevel::Extra`]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Error,
            2 => Self::Warning,
            3 => Self::Info,
            4 => Self::Debug,
            _ => Self::Extra,
        }
    }

    /// Parse a decimal level, ignoring surrounding whitespace
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Anything that does not fit in a u8 is clearly "everything"
        Some(value.parse::<u8>().map_or(Self::Extra, Self::from_u8))
    }

    /// Parse a NUL-terminated UTF-16 variable value
    pub fn from_utf16(value: &[u16]) -> Option<Self> {
        let mut digits = [0u8; 8];
        let mut len = 0;
        for &unit in value.iter().take_while(|&&u| u != 0) {
            let byte = u8::try_from(unit).ok()?;
            if len == digits.len() {
                return None;
            }
            digits[len] = byte;
            len += 1;
        }
        core::str::from_utf8(&digits[..len]).ok().and_then(Self::parse)
    }

    /// Matching filter for the `log` facade
    pub const fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::None => LevelFilter::Off,
            Self::Error => LevelFilter::Error,
            Self::Warning => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Extra => LevelFilter::Trace,
        }
    }
}

/// Per-instance driver settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FsConfig {
    /// Verbosity for this instance
    pub log_level: LogLevel,
}

impl FsConfig {
    /// Config with the given verbosity
    pub const fn with_log_level(log_level: LogLevel) -> Self {
        Self { log_level }
    }

    /// Whether messages at `level` should be emitted
    pub fn logs(&self, level: LogLevel) -> bool {
        level != LogLevel::None && self.log_level >= level
    }
}
