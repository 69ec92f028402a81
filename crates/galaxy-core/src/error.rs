use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonFinite { field: &'static str, value: f64 },
    Negative { field: &'static str, value: f64 },
    ZeroAttempts,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonFinite { field, value } => {
                write!(f, "{field} must be finite, got {value}")
            }
            ConfigError::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            ConfigError::ZeroAttempts => write!(f, "max_attempts must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub type Result<T> = std::result::Result<T, ConfigError>;
