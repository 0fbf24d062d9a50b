//! Error types for engine construction.

use std::fmt;

/// Errors raised while building an engine from its configuration.
///
/// Construction is the only fallible boundary: once a world exists every
/// tick and drain is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration value is outside its accepted range.
    InvalidParameter {
        /// Name of the offending field.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// The configuration document could not be parsed.
    Parse(String),
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, reason } => {
                write!(f, "invalid configuration for `{name}`: {reason}")
            }
            Self::Parse(message) => write!(f, "failed to parse configuration: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}
