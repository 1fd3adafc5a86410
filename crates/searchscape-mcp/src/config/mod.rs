//! Configuration loading and resolution.
//!
//! Every setting resolves as: explicit value (CLI flag) > environment variable > default.

use std::time::Duration;

use searchscape::{DEFAULT_HF_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_UNSPLASH_URL};

pub const UNSPLASH_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";
pub const HF_KEY_ENV: &str = "HUGGING_FACE_API_KEY";
pub const UNSPLASH_URL_ENV: &str = "SEARCHSCAPE_UNSPLASH_URL";
pub const HF_URL_ENV: &str = "SEARCHSCAPE_HF_URL";
pub const TIMEOUT_ENV: &str = "SEARCHSCAPE_TIMEOUT_SECS";
pub const TOKEN_ENV: &str = "SEARCHSCAPE_TOKEN";

/// Values supplied on the command line. `None` falls through to the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub unsplash_key: Option<String>,
    pub hf_key: Option<String>,
    pub unsplash_url: Option<String>,
    pub hf_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub unsplash_access_key: String,
    pub hf_api_key: String,
    pub unsplash_url: String,
    pub hf_url: String,
    pub timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            unsplash_access_key: String::new(),
            hf_api_key: String::new(),
            unsplash_url: DEFAULT_UNSPLASH_URL.to_string(),
            hf_url: DEFAULT_HF_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    /// Resolve the configuration from CLI overrides and the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        let timeout_secs = overrides
            .timeout_secs
            .or_else(|| {
                resolve_setting(None, TIMEOUT_ENV).and_then(|v| match v.parse() {
                    Ok(secs) => Some(secs),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid {TIMEOUT_ENV}={v}");
                        None
                    }
                })
            })
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            unsplash_access_key: resolve_setting(overrides.unsplash_key, UNSPLASH_KEY_ENV)
                .unwrap_or_default(),
            hf_api_key: resolve_setting(overrides.hf_key, HF_KEY_ENV).unwrap_or_default(),
            unsplash_url: resolve_setting(overrides.unsplash_url, UNSPLASH_URL_ENV)
                .unwrap_or_else(|| DEFAULT_UNSPLASH_URL.to_string()),
            hf_url: resolve_setting(overrides.hf_url, HF_URL_ENV)
                .unwrap_or_else(|| DEFAULT_HF_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Names of the credential variables that resolved to nothing.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.unsplash_access_key.is_empty() {
            missing.push(UNSPLASH_KEY_ENV);
        }
        if self.hf_api_key.is_empty() {
            missing.push(HF_KEY_ENV);
        }
        missing
    }
}

/// Resolve one setting: explicit value first, then the named environment variable.
/// Empty strings count as unset.
pub fn resolve_setting(explicit: Option<String>, env_var: &str) -> Option<String> {
    if let Some(value) = explicit.filter(|v| !v.is_empty()) {
        return Some(value);
    }

    std::env::var(env_var).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins() {
        let value = resolve_setting(Some("flag".to_string()), "SEARCHSCAPE_TEST_UNUSED_A");
        assert_eq!(value.as_deref(), Some("flag"));
    }

    #[test]
    fn test_env_fallback() {
        std::env::set_var("SEARCHSCAPE_TEST_FALLBACK_B", "from-env");
        let value = resolve_setting(None, "SEARCHSCAPE_TEST_FALLBACK_B");
        assert_eq!(value.as_deref(), Some("from-env"));

        let value = resolve_setting(Some(String::new()), "SEARCHSCAPE_TEST_FALLBACK_B");
        assert_eq!(value.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_overrides_applied() {
        let config = ServerConfig::resolve(ConfigOverrides {
            unsplash_key: Some("u-key".to_string()),
            hf_key: Some("h-key".to_string()),
            unsplash_url: Some("http://search.test".to_string()),
            hf_url: Some("http://hf.test".to_string()),
            timeout_secs: Some(3),
        });
        assert_eq!(config.unsplash_access_key, "u-key");
        assert_eq!(config.hf_api_key, "h-key");
        assert_eq!(config.unsplash_url, "http://search.test");
        assert_eq!(config.hf_url, "http://hf.test");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(config.missing_keys().is_empty());
    }

    #[test]
    fn test_default_reports_missing_keys() {
        let config = ServerConfig::default();
        assert_eq!(config.missing_keys(), vec![UNSPLASH_KEY_ENV, HF_KEY_ENV]);
        assert_eq!(config.unsplash_url, DEFAULT_UNSPLASH_URL);
    }
}
