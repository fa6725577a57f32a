use crate::config::OracleConfig;
use crate::error::{OracleError, Result};
use crate::response::parse_verdict;
use crate::ReasoningOracle;
use async_trait::async_trait;
use impact_protocol::{ImpactVerdict, OracleRequest};
use reqwest::Client;
use std::time::{Duration, Instant};

/// Oracle reached over HTTP: `POST` the request as JSON, read a verdict back.
///
/// The response body may be bare JSON or JSON wrapped in a Markdown code fence.
pub struct HttpOracle {
    client: Client,
    config: OracleConfig,
}

impl HttpOracle {
    pub fn new(config: OracleConfig) -> Result<Self> {
        config.validate().map_err(OracleError::Config)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| OracleError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn map_send_error(&self, e: reqwest::Error) -> OracleError {
        if e.is_timeout() {
            OracleError::Timeout {
                ms: self.config.timeout_ms,
            }
        } else {
            OracleError::transport(e.to_string())
        }
    }
}

#[async_trait]
impl ReasoningOracle for HttpOracle {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn assess(&self, request: OracleRequest) -> Result<ImpactVerdict> {
        let start = Instant::now();
        log::debug!(
            "Submitting {} to {}",
            request.target_member_name,
            self.config.endpoint
        );

        let mut builder = self.client.post(&self.config.endpoint).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        let verdict = parse_verdict(&body)?;

        log::debug!(
            "Verdict for {}: risk {} in {} ms",
            request.target_member_name,
            verdict.risk_score,
            start.elapsed().as_millis()
        );
        Ok(verdict)
    }
}
