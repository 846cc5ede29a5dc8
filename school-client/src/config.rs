//! Client configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | SCHOOL_STORE_URL | http://localhost:54321 | Hosted store base URL |
//! | SCHOOL_STORE_KEY | (empty) | API key sent as `apikey` |
//! | SCHOOL_STORE_TOKEN | (none) | Bearer token; the API key is used when unset |
//! | SCHOOL_STORE_TIMEOUT | 30 | Request timeout (seconds) |
//! | LOG_LEVEL | info | Log filter when `RUST_LOG` is unset |
//! | LOG_JSON | false | JSON console output |
//! | LOG_DIR | (none) | Directory for daily rolling log files |

/// Connection settings for the hosted store
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Store base URL (e.g., "https://project.example.co")
    pub base_url: String,

    /// Public API key
    pub api_key: String,

    /// User access token, forwarded as `Authorization: Bearer`
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: String::new(),
            token: None,
            timeout: 30,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("SCHOOL_STORE_URL").unwrap_or_else(|_| "http://localhost:54321".into()),
        );
        if let Ok(key) = std::env::var("SCHOOL_STORE_KEY") {
            config.api_key = key;
        }
        config.token = std::env::var("SCHOOL_STORE_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        config.timeout = std::env::var("SCHOOL_STORE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        config
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:54321")
    }
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
    pub dir: Option<String>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("https://school.example.co")
            .with_api_key("anon-key")
            .with_token("user-jwt")
            .with_timeout(5);
        assert_eq!(config.base_url, "https://school.example.co");
        assert_eq!(config.api_key, "anon-key");
        assert_eq!(config.token.as_deref(), Some("user-jwt"));
        assert_eq!(config.timeout, 5);
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:54321");
        assert!(config.api_key.is_empty());
        assert!(config.token.is_none());
        assert_eq!(config.timeout, 30);

        let log = LogConfig::default();
        assert_eq!(log.level, "info");
        assert!(!log.json);
        assert!(log.dir.is_none());
    }
}
