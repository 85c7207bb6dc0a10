//! Native level values of the logger hierarchy

use std::fmt;

/// A framework level, ordered by integer priority.
///
/// The well-known values mirror the classic hierarchical logging frameworks.
/// Frameworks may introduce further values through [`Level::custom`]; those have
/// no management-facing counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level(i32);

impl Level {
    pub const ALL: Level = Level(i32::MIN);
    pub const TRACE: Level = Level(5_000);
    pub const DEBUG: Level = Level(10_000);
    pub const INFO: Level = Level(20_000);
    pub const WARN: Level = Level(30_000);
    pub const ERROR: Level = Level(40_000);
    pub const FATAL: Level = Level(50_000);
    pub const OFF: Level = Level(i32::MAX);

    /// Create a level with an arbitrary priority value.
    pub const fn custom(value: i32) -> Self {
        Level(value)
    }

    #[inline]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Canonical name of a well-known level, `None` for custom values.
    pub fn to_str(&self) -> Option<&'static str> {
        match *self {
            Level::ALL => Some("ALL"),
            Level::TRACE => Some("TRACE"),
            Level::DEBUG => Some("DEBUG"),
            Level::INFO => Some("INFO"),
            Level::WARN => Some("WARN"),
            Level::ERROR => Some("ERROR"),
            Level::FATAL => Some("FATAL"),
            Level::OFF => Some("OFF"),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_str() {
            Some(name) => f.write_str(name),
            None => write!(f, "LEVEL({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::ALL < Level::TRACE);
        assert!(Level::TRACE < Level::DEBUG);
        assert!(Level::DEBUG < Level::INFO);
        assert!(Level::INFO < Level::WARN);
        assert!(Level::WARN < Level::ERROR);
        assert!(Level::ERROR < Level::FATAL);
        assert!(Level::FATAL < Level::OFF);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::WARN.to_string(), "WARN");
        assert_eq!(Level::custom(15_000).to_string(), "LEVEL(15000)");
    }

    #[test]
    fn test_level_names() {
        assert_eq!(Level::TRACE.to_str(), Some("TRACE"));
        assert_eq!(Level::OFF.to_str(), Some("OFF"));
        assert_eq!(Level::custom(30_001).to_str(), None);
        assert_eq!(Level::custom(30_000), Level::WARN);
    }
}
