//! Client configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Timeout applied to each phase when none is configured, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings used to build the shared HTTP client.
///
/// A timeout of `0` disables that timeout. Each timeout bounds a single phase,
/// never the request as a whole. The transport has no write phase timeout, so
/// `write_timeout_secs` is accepted and reported but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base address every endpoint path is resolved against.
    pub base_url: String,
    /// Log request and response bodies.
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_timeout")]
    pub write_timeout_secs: u64,
}

impl ClientConfig {
    /// Creates a configuration with default timeouts and debug disabled.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            debug: false,
            connect_timeout_secs: DEFAULT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_TIMEOUT_SECS,
            write_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Enable or disable body logging.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the connect, read and write timeouts in seconds.
    pub fn timeouts(mut self, connect_secs: u64, read_secs: u64, write_secs: u64) -> Self {
        self.connect_timeout_secs = connect_secs;
        self.read_timeout_secs = read_secs;
        self.write_timeout_secs = write_secs;
        self
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Time allowed to establish a connection.
    pub fn connect_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.connect_timeout_secs)
    }

    /// Time allowed between two reads of the response.
    pub fn read_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.read_timeout_secs)
    }

    /// Time allowed for sending the request body.
    pub fn write_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.write_timeout_secs)
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
