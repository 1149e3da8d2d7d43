//! Verifier configuration.

use serde::{Deserialize, Serialize};

/// Well-known endpoint publishing the webhook signing keys.
pub const DEFAULT_KEYS_URL: &str = "https://api.voxeet.com/v1/public/keys/webhooks";

/// Verifier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// URL of the public key registry.
    #[serde(default = "default_keys_url")]
    pub keys_url: String,

    /// Timeout for the registry request, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_keys_url() -> String {
    DEFAULT_KEYS_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            keys_url: default_keys_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl VerifierConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `HOOKSIG_KEYS_URL` | Public key registry URL |
    /// | `HOOKSIG_TIMEOUT` | Registry request timeout in seconds |
    pub fn from_env() -> Self {
        Self {
            keys_url: std::env::var("HOOKSIG_KEYS_URL").unwrap_or_else(|_| default_keys_url()),
            timeout_secs: std::env::var("HOOKSIG_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
        }
    }

    /// Set the registry URL.
    pub fn with_keys_url(mut self, url: impl Into<String>) -> Self {
        self.keys_url = url.into();
        self
    }

    /// Set the registry request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VerifierConfig::default();
        assert_eq!(config.keys_url, DEFAULT_KEYS_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: VerifierConfig =
            serde_json::from_str(r#"{"keys_url": "http://localhost:8080/keys"}"#).unwrap();
        assert_eq!(config.keys_url, "http://localhost:8080/keys");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_builders() {
        let config = VerifierConfig::default()
            .with_keys_url("http://127.0.0.1/keys")
            .with_timeout_secs(5);
        assert_eq!(config.keys_url, "http://127.0.0.1/keys");
        assert_eq!(config.timeout_secs, 5);
    }
}
