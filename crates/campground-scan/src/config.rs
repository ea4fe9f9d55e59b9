use rec_gov::DEFAULT_BASE_URL;

use crate::ScanError;

/// Default address the HTTP service binds to.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Process-wide settings, read once at startup and passed to collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    /// recreation.gov base URL (`REC_GOV_BASE_URL`)
    pub base_url: String,
    /// Shared secret for the HTTP check endpoint (`CHECK_KEY`)
    pub check_key: Option<String>,
    /// HTTP service bind address (`BIND_ADDRESS`)
    pub bind_address: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            check_key: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

impl CheckerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through `lookup`, falling back to defaults for unset or empty values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            base_url: get("REC_GOV_BASE_URL").unwrap_or(defaults.base_url),
            check_key: get("CHECK_KEY"),
            bind_address: get("BIND_ADDRESS").unwrap_or(defaults.bind_address),
        }
    }

    /// The check key, required by the HTTP service.
    pub fn require_check_key(&self) -> Result<&str, ScanError> {
        self.check_key
            .as_deref()
            .ok_or_else(|| {
                ScanError::ConfigError("CHECK_KEY environment variable not set".to_string())
            })
    }

    /// Check `key` against the configured check key. Fails when no key is
    /// configured.
    pub fn authorize(&self, key: Option<&str>) -> Result<(), ScanError> {
        match (self.check_key.as_deref(), key) {
            (Some(expected), Some(given)) if expected == given => Ok(()),
            _ => Err(ScanError::AuthenticationFailed),
        }
    }
}
