use crate::error::ConfigError;
use crate::limits::{default_concurrency, parse_concurrency, CONCURRENCY_ENV, MAX_CONCURRENCY};
use anyhow::Context;
use impact_oracle::OracleConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const ORACLE_ENDPOINT_ENV: &str = "IMPACT_ORACLE_ENDPOINT";
const ORACLE_API_KEY_ENV: &str = "IMPACT_ORACLE_API_KEY";

/// Fan-out behaviour of an analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Oracle calls allowed in flight at once
    pub max_concurrency: usize,

    /// Upper bound for one oracle call, counted from the moment it holds a slot
    pub task_timeout_ms: Option<u64>,

    /// Appended to the member name of failed reports
    pub failure_suffix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_concurrency(),
            task_timeout_ms: None,
            failure_suffix: " (Failed)".to_string(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_ms.map(Duration::from_millis)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_CONCURRENCY).contains(&self.max_concurrency) {
            return Err(format!(
                "max_concurrency ({}) must be within 1..={MAX_CONCURRENCY}",
                self.max_concurrency
            ));
        }
        if self.task_timeout_ms == Some(0) {
            return Err("task_timeout_ms must be > 0 when set".to_string());
        }
        if self.failure_suffix.trim().is_empty() {
            return Err("failure_suffix must not be blank".to_string());
        }
        Ok(())
    }
}

/// Complete analyzer configuration, usually read from `impact.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub pipeline: PipelineConfig,
    pub oracle: OracleConfig,
}

impl AnalyzerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: Self =
            toml::from_str(&raw).with_context(|| format!("Invalid {}", path.display()))?;
        config.apply_env_overrides();
        config
            .validate()
            .with_context(|| format!("Invalid {}", path.display()))?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(CONCURRENCY_ENV) {
            self.pipeline.max_concurrency =
                parse_concurrency(Some(raw.as_str()), self.pipeline.max_concurrency);
        }
        if let Some(endpoint) = lookup(ORACLE_ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            self.oracle.endpoint = endpoint.trim().to_string();
        }
        if let Some(key) = lookup(ORACLE_API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.oracle.api_key = Some(key.trim().to_string());
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline.validate().map_err(ConfigError::Invalid)?;
        self.oracle.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn default_config_valid() {
        assert!(AnalyzerConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AnalyzerConfig::from_toml_str(
            r#"
            [pipeline]
            max_concurrency = 3
            task_timeout_ms = 45000

            [oracle]
            endpoint = "https://oracle.internal/assess"
            "#,
        )
        .unwrap();

        assert_eq!(config.pipeline.max_concurrency, 3);
        assert_eq!(config.pipeline.task_timeout(), Some(Duration::from_secs(45)));
        assert_eq!(config.pipeline.failure_suffix, " (Failed)");
        assert_eq!(config.oracle.endpoint, "https://oracle.internal/assess");
        assert_eq!(config.oracle.timeout_ms, OracleConfig::default().timeout_ms);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            AnalyzerConfig::from_toml_str("[pipeline]\nmax_concurrency = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AnalyzerConfig::from_toml_str("[pipeline]\nfailure_suffix = \"  \"\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AnalyzerConfig::from_toml_str("[pipeline\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn overrides_are_applied_and_clamped() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("IMPACT_MAX_CONCURRENCY", "500"),
            ("IMPACT_ORACLE_ENDPOINT", " http://10.0.0.5:9000/impact "),
            ("IMPACT_ORACLE_API_KEY", ""),
        ]);

        let mut config = AnalyzerConfig::default();
        config.apply_overrides_from(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.pipeline.max_concurrency, MAX_CONCURRENCY);
        assert_eq!(config.oracle.endpoint, "http://10.0.0.5:9000/impact");
        assert_eq!(config.oracle.api_key, None);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("impact.toml");
        std::fs::write(&path, "[pipeline]\nfailure_suffix = \" [error]\"\n").unwrap();

        let config = AnalyzerConfig::load(&path).unwrap();
        assert_eq!(config.pipeline.failure_suffix, " [error]");

        let missing = AnalyzerConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(missing.to_string().contains("Failed to read"));
    }
}
