//! # Impact Oracle
//!
//! The external reasoning service that turns a change plus its caller context into an
//! [`ImpactVerdict`]. The pipeline only sees the [`ReasoningOracle`] trait; the
//! bundled [`HttpOracle`] talks JSON over HTTP.

mod config;
mod error;
mod http;
mod response;

use async_trait::async_trait;
use impact_protocol::{ImpactVerdict, OracleRequest};

pub use config::OracleConfig;
pub use error::{OracleError, Result};
pub use http::HttpOracle;
pub use response::{parse_verdict, strip_code_fence};

/// Produces a verdict for one change.
///
/// Called concurrently from many tasks; implementations must be shareable.
#[async_trait]
pub trait ReasoningOracle: Send + Sync {
    /// Oracle name for logging
    fn name(&self) -> &'static str {
        "oracle"
    }

    async fn assess(&self, request: OracleRequest) -> Result<ImpactVerdict>;
}
