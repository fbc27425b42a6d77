//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated
//! configuration. CLI flags override environment variables, which override
//! the defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
/// Default log file, used in TUI mode
pub const DEFAULT_LOG_FILE: &str = "event_hub.log";
/// Default registration success hold, in seconds
pub const DEFAULT_SUCCESS_DELAY_SECS: u64 = 5;
/// Longest accepted success hold, in seconds
pub const MAX_SUCCESS_DELAY_SECS: u64 = 60;

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL
    pub api_url: String,
    /// Key-value store file; `None` keeps the session in memory only
    pub storage_path: Option<PathBuf>,
    /// How long the registration success message stays up
    pub success_delay: Duration,
    /// Log file used while the TUI owns the terminal
    pub log_file: PathBuf,
}

/// Values given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub storage_path: Option<PathBuf>,
    /// Ignore any storage path and keep the session in memory
    pub ephemeral: bool,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `overrides` - Values from CLI flags, applied over the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no storage location can be determined
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let api_url = overrides
            .api_url
            .or_else(|| std::env::var("EVENT_HUB_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let storage_path = if overrides.ephemeral {
            None
        } else {
            let path = overrides
                .storage_path
                .or_else(|| std::env::var("EVENT_HUB_STORAGE").ok().map(PathBuf::from))
                .or_else(default_storage_path)
                .ok_or_else(|| ConfigError::MissingRequired {
                    var: "EVENT_HUB_STORAGE".to_string(),
                    hint: "Set HOME, pass --storage PATH, or run with --ephemeral".to_string(),
                })?;
            Some(path)
        };

        let success_delay = Duration::from_secs(parse_env_or(
            "EVENT_HUB_SUCCESS_DELAY_SECS",
            DEFAULT_SUCCESS_DELAY_SECS,
        ));

        let log_file = std::env::var("EVENT_HUB_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE));

        Ok(ClientConfig {
            api_url,
            storage_path,
            success_delay,
            log_file,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "EVENT_HUB_API_URL".to_string(),
                reason: format!("Must start with http:// or https:// (got '{}')", self.api_url),
            });
        }

        if self.success_delay > Duration::from_secs(MAX_SUCCESS_DELAY_SECS) {
            return Err(ConfigError::Invalid {
                var: "EVENT_HUB_SUCCESS_DELAY_SECS".to_string(),
                reason: format!("Must be at most {} seconds", MAX_SUCCESS_DELAY_SECS),
            });
        }

        Ok(())
    }
}

fn default_storage_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".event_hub").join("storage.json"))
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "EVENT_HUB_API_URL",
        "EVENT_HUB_STORAGE",
        "EVENT_HUB_SUCCESS_DELAY_SECS",
        "EVENT_HUB_LOG_FILE",
    ];

    fn clear_env() {
        for var in VARS {
            // SAFETY: env-mutating tests are serialized with #[serial]
            unsafe { std::env::remove_var(var) };
        }
    }

    fn set_env(key: &str, value: &str) {
        // SAFETY: env-mutating tests are serialized with #[serial]
        unsafe { std::env::set_var(key, value) };
    }

    fn config() -> ClientConfig {
        ClientConfig {
            api_url: DEFAULT_API_URL.to_string(),
            storage_path: None,
            success_delay: Duration::from_secs(5),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }

    // === Loading ===

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let home = std::env::var_os("HOME");
        set_env("HOME", "/home/tester");

        let config = ClientConfig::from_env(ConfigOverrides::default()).unwrap();
        match home {
            // SAFETY: env-mutating tests are serialized with #[serial]
            Some(home) => unsafe { std::env::set_var("HOME", home) },
            None => unsafe { std::env::remove_var("HOME") },
        }

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(
            config.storage_path,
            Some(PathBuf::from("/home/tester/.event_hub/storage.json"))
        );
        assert_eq!(config.success_delay, Duration::from_secs(5));
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    #[serial]
    fn test_env_values() {
        clear_env();
        set_env("EVENT_HUB_API_URL", "https://events.example.com/api");
        set_env("EVENT_HUB_STORAGE", "/tmp/eh.json");
        set_env("EVENT_HUB_SUCCESS_DELAY_SECS", "2");

        let config = ClientConfig::from_env(ConfigOverrides::default()).unwrap();

        assert_eq!(config.api_url, "https://events.example.com/api");
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/eh.json")));
        assert_eq!(config.success_delay, Duration::from_secs(2));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides_win_over_env() {
        clear_env();
        set_env("EVENT_HUB_API_URL", "https://env.example.com/api");
        set_env("EVENT_HUB_STORAGE", "/tmp/env.json");

        let config = ClientConfig::from_env(ConfigOverrides {
            api_url: Some("http://flag.example.com/api".to_string()),
            storage_path: Some(PathBuf::from("/tmp/flag.json")),
            ephemeral: false,
        })
        .unwrap();

        assert_eq!(config.api_url, "http://flag.example.com/api");
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/flag.json")));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_ephemeral_ignores_storage() {
        clear_env();
        set_env("EVENT_HUB_STORAGE", "/tmp/env.json");

        let config = ClientConfig::from_env(ConfigOverrides {
            ephemeral: true,
            ..Default::default()
        })
        .unwrap();

        assert!(config.storage_path.is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_unparseable_delay_uses_default() {
        clear_env();
        set_env("EVENT_HUB_STORAGE", "/tmp/env.json");
        set_env("EVENT_HUB_SUCCESS_DELAY_SECS", "soon");

        let config = ClientConfig::from_env(ConfigOverrides::default()).unwrap();

        assert_eq!(config.success_delay, Duration::from_secs(5));
        clear_env();
    }

    // === Validation ===

    #[test]
    fn test_validate_default_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = ClientConfig {
            api_url: "ftp://example.com".to_string(),
            ..config()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "EVENT_HUB_API_URL"));
    }

    #[test]
    fn test_validate_rejects_long_delay() {
        let config = ClientConfig {
            success_delay: Duration::from_secs(61),
            ..config()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at most 60 seconds"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "EVENT_HUB_STORAGE".to_string(),
            hint: "Pass --storage".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("EVENT_HUB_STORAGE"));
        assert!(msg.contains("Pass --storage"));
    }
}
