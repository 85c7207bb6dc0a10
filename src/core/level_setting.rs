//! Management-facing level settings

use super::error::{RegistryError, Result};
use super::level::Level;
use std::fmt;
use std::str::FromStr;

/// Display text for a level that is not set.
pub const UNSET: &str = "<unset>";

/// The levels an operator can see through the management surface.
///
/// Only the settable subset may be written; `ALL`, `FATAL` and `OFF` are shown
/// when the framework reports them but are refused as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LevelSetting {
    All,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Off,
}

impl LevelSetting {
    pub const ALL_SETTINGS: [LevelSetting; 8] = [
        LevelSetting::All,
        LevelSetting::Trace,
        LevelSetting::Debug,
        LevelSetting::Info,
        LevelSetting::Warn,
        LevelSetting::Error,
        LevelSetting::Fatal,
        LevelSetting::Off,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LevelSetting::All => "ALL",
            LevelSetting::Trace => "TRACE",
            LevelSetting::Debug => "DEBUG",
            LevelSetting::Info => "INFO",
            LevelSetting::Warn => "WARN",
            LevelSetting::Error => "ERROR",
            LevelSetting::Fatal => "FATAL",
            LevelSetting::Off => "OFF",
        }
    }

    /// The framework value this setting stands for.
    pub fn level(&self) -> Level {
        match self {
            LevelSetting::All => Level::ALL,
            LevelSetting::Trace => Level::TRACE,
            LevelSetting::Debug => Level::DEBUG,
            LevelSetting::Info => Level::INFO,
            LevelSetting::Warn => Level::WARN,
            LevelSetting::Error => Level::ERROR,
            LevelSetting::Fatal => Level::FATAL,
            LevelSetting::Off => Level::OFF,
        }
    }

    /// Only settable levels may be written through the management surface.
    pub fn is_settable(&self) -> bool {
        match self {
            LevelSetting::Trace
            | LevelSetting::Debug
            | LevelSetting::Info
            | LevelSetting::Warn
            | LevelSetting::Error => true,
            LevelSetting::All | LevelSetting::Fatal | LevelSetting::Off => false,
        }
    }

    /// Parse operator input. Exact, case-sensitive, settable levels only.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL_SETTINGS
            .into_iter()
            .find(|setting| setting.is_settable() && setting.to_str() == name)
    }

    /// Map a framework value onto its setting.
    ///
    /// A value without a counterpart means the framework knows levels this crate
    /// does not, which is reported as [`RegistryError::UnmappedLevel`].
    pub fn from_underlying(level: Level) -> Result<Self> {
        Self::ALL_SETTINGS
            .into_iter()
            .find(|setting| setting.level() == level)
            .ok_or_else(|| RegistryError::unmapped_level(level.value()))
    }

    /// Render an optional framework value, `<unset>` when absent.
    pub fn display(level: Option<Level>) -> Result<String> {
        match level {
            Some(level) => Ok(Self::from_underlying(level)?.to_string()),
            None => Ok(UNSET.to_string()),
        }
    }
}

impl fmt::Display for LevelSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Recognizes every displayed name, settable or not.
impl FromStr for LevelSetting {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL_SETTINGS
            .into_iter()
            .find(|setting| setting.to_str() == s)
            .ok_or_else(|| format!("Invalid level setting: '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settable_levels() {
        assert_eq!(LevelSetting::parse("TRACE"), Some(LevelSetting::Trace));
        assert_eq!(LevelSetting::parse("DEBUG"), Some(LevelSetting::Debug));
        assert_eq!(LevelSetting::parse("INFO"), Some(LevelSetting::Info));
        assert_eq!(LevelSetting::parse("WARN"), Some(LevelSetting::Warn));
        assert_eq!(LevelSetting::parse("ERROR"), Some(LevelSetting::Error));
    }

    #[test]
    fn test_parse_rejects_non_settable_levels() {
        assert_eq!(LevelSetting::parse("ALL"), None);
        assert_eq!(LevelSetting::parse("FATAL"), None);
        assert_eq!(LevelSetting::parse("OFF"), None);
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(LevelSetting::parse("info"), None);
        assert_eq!(LevelSetting::parse(" INFO"), None);
        assert_eq!(LevelSetting::parse("WARNING"), None);
        assert_eq!(LevelSetting::parse(""), None);
    }

    #[test]
    fn test_from_underlying_known_levels() {
        for setting in LevelSetting::ALL_SETTINGS {
            assert_eq!(LevelSetting::from_underlying(setting.level()).unwrap(), setting);
        }
    }

    #[test]
    fn test_from_underlying_unmapped_level() {
        let err = LevelSetting::from_underlying(Level::custom(12_345)).unwrap_err();
        assert!(matches!(err, RegistryError::UnmappedLevel { value: 12_345 }));
    }

    #[test]
    fn test_display() {
        assert_eq!(LevelSetting::display(None).unwrap(), UNSET);
        assert_eq!(LevelSetting::display(Some(Level::OFF)).unwrap(), "OFF");
        assert!(LevelSetting::display(Some(Level::custom(1))).is_err());
    }

    #[test]
    fn test_from_str_accepts_display_names() {
        assert_eq!("OFF".parse::<LevelSetting>(), Ok(LevelSetting::Off));
        assert!("Off".parse::<LevelSetting>().is_err());
    }
}
