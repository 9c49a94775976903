//! Engine configuration.
//!
//! Settings are read from environment variables (and a `.env` file, if
//! present). Every setting is optional; unset variables take the
//! [`Default`] value.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `TRANSFOLD_MAILBOX_CAPACITY` | per-account mailbox bound | unbounded |
//! | `TRANSFOLD_RETRY_ATTEMPTS` | retries after a failed append | 3 |
//! | `TRANSFOLD_RETRY_DELAY_MS` | first retry delay, doubled each time | 100 |
//!
//! # Example
//!
//! ```rust,ignore
//! use transfold::config::EngineConfig;
//!
//! let config = EngineConfig::from_env()?;
//! println!("retrying appends {} times", config.retry_attempts);
//! ```

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::actor::Mailbox;
use crate::effect::Backoff;

/// Variable holding the mailbox bound.
pub const MAILBOX_CAPACITY_VAR: &str = "TRANSFOLD_MAILBOX_CAPACITY";
/// Variable holding the number of append retries.
pub const RETRY_ATTEMPTS_VAR: &str = "TRANSFOLD_RETRY_ATTEMPTS";
/// Variable holding the first retry delay in milliseconds.
pub const RETRY_DELAY_MS_VAR: &str = "TRANSFOLD_RETRY_DELAY_MS";

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be used.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The name of the environment variable.
        key: String,
        /// Description of why the value is invalid.
        message: String,
    },
}

/// Settings of the command-handling engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Mailbox policy of each per-account actor.
    pub mailbox: Mailbox,
    /// How many times a failed append is retried.
    pub retry_attempts: u32,
    /// Delay before the first retry.
    pub retry_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mailbox: Mailbox::Unbounded,
            retry_attempts: 3,
            retry_delay: Duration::from_millis(100),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but cannot
    /// be parsed, or if the mailbox capacity is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors if file doesn't exist)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mailbox = match parse_optional::<usize>(&lookup, MAILBOX_CAPACITY_VAR)? {
            None => Mailbox::Unbounded,
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: MAILBOX_CAPACITY_VAR.to_string(),
                    message: "capacity must be at least 1".to_string(),
                });
            }
            Some(capacity) => Mailbox::Bounded(capacity),
        };
        let retry_attempts =
            parse_optional(&lookup, RETRY_ATTEMPTS_VAR)?.unwrap_or(defaults.retry_attempts);
        let retry_delay = parse_optional(&lookup, RETRY_DELAY_MS_VAR)?
            .map_or(defaults.retry_delay, Duration::from_millis);

        Ok(Self {
            mailbox,
            retry_attempts,
            retry_delay,
        })
    }

    /// Backoff policy for append retries.
    #[must_use]
    pub const fn backoff(&self) -> Backoff {
        Backoff::exponential(self.retry_delay)
    }
}

/// Parses an optional variable.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if the variable is set but cannot be parsed.
fn parse_optional<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|value| {
            value.trim().parse().map_err(|error: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: error.to_string(),
            })
        })
        .transpose()
}
