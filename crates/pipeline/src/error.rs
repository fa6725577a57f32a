use impact_diff::DeclarationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Fatal errors of an analysis run; per-change failures are reported, not raised.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Target file not found in corpus: {0}")]
    TargetNotFound(String),

    #[error("Cannot parse {file_id}: {source}")]
    UnparsableSource {
        file_id: String,
        source: DeclarationError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Parser setup failed: {0}")]
    ParserSetup(String),
}

impl PipelineError {
    pub fn unparsable(file_id: impl Into<String>, source: DeclarationError) -> Self {
        Self::UnparsableSource {
            file_id: file_id.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(String),
}

impl From<ConfigError> for PipelineError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}
