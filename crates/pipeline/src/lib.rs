//! # Impact Pipeline
//!
//! Estimates the blast radius of an edit to one Java file.
//!
//! ## Architecture
//!
//! ```text
//! AnalysisRequest
//!     │
//!     ├──> validate inputs, merge repositories (RepositoryStore)
//!     │
//!     ├──> resolve target file id
//!     │
//!     ├──> StructuralDiff(original, changed) → ChangeRecord[]
//!     │      └─ none → single "No Structural Changes Detected" report
//!     │
//!     ├──> per record, sequentially:
//!     │      ├─ DependencyDiscovery over the original corpus
//!     │      ├─ OracleRequest { diffText, contextSnippets, member }
//!     │      └─ tokio::spawn (bounded by ConcurrencyLimiter)
//!     │
//!     └──> join every task in spawn order
//!            ├─ verdict  → analyzed report
//!            └─ error / timeout / panic → "<member> (Failed)" report
//! ```
//!
//! A failing oracle call never affects its siblings; the run itself fails only for
//! blank inputs, an unknown target, or a target that does not parse.

mod config;
mod error;
mod limits;
mod pipeline;

pub use config::{AnalyzerConfig, PipelineConfig};
pub use error::{ConfigError, PipelineError, Result};
pub use limits::{
    default_concurrency, parse_concurrency, ConcurrencyLimiter, ConcurrencyPermit, ConcurrencySnapshot,
    MAX_CONCURRENCY,
};
pub use pipeline::{resolve_target, AnalysisPipeline, AnalysisRequest};
