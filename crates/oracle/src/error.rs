use impact_protocol::{FailureCategory, VerdictError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OracleError>;

/// Failure of one oracle invocation
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Oracle transport error: {0}")]
    Transport(String),

    #[error("Oracle did not answer within {ms} ms")]
    Timeout { ms: u64 },

    #[error("Oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed oracle response: {0}")]
    Malformed(String),

    #[error("Invalid verdict: {0}")]
    InvalidVerdict(#[from] VerdictError),

    #[error("Invalid oracle configuration: {0}")]
    Config(String),
}

impl OracleError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Category recorded on the failure report
    #[must_use]
    pub const fn category(&self) -> FailureCategory {
        match self {
            Self::Transport(_) | Self::Status { .. } | Self::Config(_) => FailureCategory::Transport,
            Self::Timeout { .. } => FailureCategory::Timeout,
            Self::Malformed(_) => FailureCategory::MalformedResponse,
            Self::InvalidVerdict(_) => FailureCategory::InvalidVerdict,
        }
    }
}
