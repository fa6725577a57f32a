use serde::{Deserialize, Serialize};

/// Connection settings for the HTTP reasoning oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// URL receiving `POST` requests with an `OracleRequest` body
    pub endpoint: String,

    /// Sent as a bearer token when present
    pub api_key: Option<String>,

    /// Per-request timeout
    pub timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/v1/impact".to_string(),
            api_key: None,
            timeout_ms: 60_000,
        }
    }
}

impl OracleConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err("oracle endpoint must not be empty".to_string());
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(format!("oracle endpoint must be an http(s) URL, got '{endpoint}'"));
        }
        if self.timeout_ms == 0 {
            return Err("oracle timeout_ms must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        assert!(OracleConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_endpoint_and_zero_timeout() {
        assert!(OracleConfig::with_endpoint("").validate().is_err());
        assert!(OracleConfig::with_endpoint("ftp://host").validate().is_err());

        let mut config = OracleConfig::default();
        config.timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
