//! Configuration error types
//!
//! The simulation itself cannot fail; everything that can go wrong happens
//! while building an engine from tuning values and the archetype table.

use std::fmt;

use crate::tuning::Category;

/// Error type for rejected engine configuration
#[derive(Debug)]
pub enum ConfigError {
    /// JSON could not be parsed into the expected shape
    Parse(serde_json::Error),
    /// No archetype belongs to the given category
    EmptyCategory(Category),
    /// An archetype's values contradict its category
    InvalidArchetype { name: String, reason: &'static str },
    /// A tuning value is out of range
    InvalidTuning { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "Config parse error: {}", err),
            ConfigError::EmptyCategory(category) => {
                write!(f, "Archetype table has no {:?} archetypes", category)
            }
            ConfigError::InvalidArchetype { name, reason } => {
                write!(f, "Invalid archetype '{}': {}", name, reason)
            }
            ConfigError::InvalidTuning { field, reason } => {
                write!(f, "Invalid tuning value '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offender() {
        let err = ConfigError::InvalidArchetype {
            name: "stone".to_string(),
            reason: "bad archetypes must not award points",
        };
        let msg = err.to_string();
        assert!(msg.contains("stone"));
        assert!(msg.contains("must not award points"));
    }

    #[test]
    fn test_parse_error_has_source() {
        use std::error::Error;

        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Config parse error"));
    }
}
