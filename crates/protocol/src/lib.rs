//! # Impact Protocol
//!
//! Data model shared by every stage of an impact analysis run:
//!
//! ```text
//! DeclarationSnapshot ──diff──> ChangeRecord[] ──discovery──> CallerMatch{}
//!                                     │
//!                                     └──> OracleRequest ──oracle──> ImpactVerdict
//!                                                                       │
//!                                                     AggregatedReport[] <┘
//! ```

use std::collections::BTreeMap;

mod change;
mod report;
mod verdict;

pub use change::{CallerExcerpt, CallerMatch, ChangeKind, ChangeRecord, MemberKind};
pub use report::{
    AggregatedReport, AnalysisFailure, FailureCategory, ReportOutcome, NO_STRUCTURAL_CHANGE,
};
pub use verdict::{
    ImpactType, ImpactVerdict, ImpactedModule, OracleRequest, Priority, TestCase, TestStrategy,
    VerdictError,
};

/// Identifier of one file inside a corpus (a fully qualified class name for Java sources).
pub type FileId = String;

/// File id -> source text for every file taking part in one analysis run.
pub type Corpus = BTreeMap<FileId, String>;

/// Results of one discovery call, keyed by the calling file.
pub type CallerMap = BTreeMap<FileId, CallerMatch>;
