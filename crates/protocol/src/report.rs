use serde::{Deserialize, Serialize};

use crate::change::{ChangeKind, ChangeRecord};
use crate::verdict::ImpactVerdict;

/// Label used when the changed file has no structural delta at all
pub const NO_STRUCTURAL_CHANGE: &str = "No Structural Changes Detected";

/// Why a per-change task produced no verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Connection, DNS, TLS or HTTP status failure
    Transport,
    Timeout,
    /// Response body was not a decodable verdict
    MalformedResponse,
    /// Verdict decoded but violates a value constraint
    InvalidVerdict,
    /// The task itself panicked or was aborted
    TaskAborted,
}

impl FailureCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Timeout => "timeout",
            Self::MalformedResponse => "malformed_response",
            Self::InvalidVerdict => "invalid_verdict",
            Self::TaskAborted => "task_aborted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub category: FailureCategory,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Analyzed { verdict: ImpactVerdict },
    Failed { failure: AnalysisFailure },
    NoStructuralChange,
}

/// Final per-change entry of an analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedReport {
    /// Member name, file id for file-level changes; failed entries carry a suffix
    pub changed_member: String,
    pub file_id: String,
    pub change_kind: Option<ChangeKind>,
    pub outcome: ReportOutcome,
}

impl AggregatedReport {
    #[must_use]
    pub fn analyzed(change: &ChangeRecord, verdict: ImpactVerdict) -> Self {
        Self {
            changed_member: change.changed_member().to_string(),
            file_id: change.file_id.clone(),
            change_kind: Some(change.change_kind),
            outcome: ReportOutcome::Analyzed { verdict },
        }
    }

    /// Failure entry; `suffix` is appended to the member name (e.g. `" (Failed)"`).
    #[must_use]
    pub fn failed(change: &ChangeRecord, suffix: &str, failure: AnalysisFailure) -> Self {
        Self {
            changed_member: format!("{}{suffix}", change.changed_member()),
            file_id: change.file_id.clone(),
            change_kind: Some(change.change_kind),
            outcome: ReportOutcome::Failed { failure },
        }
    }

    #[must_use]
    pub fn no_structural_change(file_id: impl Into<String>) -> Self {
        Self {
            changed_member: NO_STRUCTURAL_CHANGE.to_string(),
            file_id: file_id.into(),
            change_kind: None,
            outcome: ReportOutcome::NoStructuralChange,
        }
    }

    #[must_use]
    pub const fn verdict(&self) -> Option<&ImpactVerdict> {
        match &self.outcome {
            ReportOutcome::Analyzed { verdict } => Some(verdict),
            _ => None,
        }
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&AnalysisFailure> {
        match &self.outcome {
            ReportOutcome::Failed { failure } => Some(failure),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.outcome, ReportOutcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::MemberKind;

    #[test]
    fn failed_report_is_suffixed_and_keeps_cause() {
        let change = ChangeRecord::added("com.app.A", MemberKind::Method, "foo", "void foo()", "void foo() {}");
        let report = AggregatedReport::failed(
            &change,
            " (Failed)",
            AnalysisFailure {
                category: FailureCategory::Timeout,
                message: "no answer after 30000 ms".to_string(),
            },
        );

        assert_eq!(report.changed_member, "foo (Failed)");
        assert!(report.is_failed());
        assert!(report.verdict().is_none());
        assert_eq!(report.failure().map(|f| f.category), Some(FailureCategory::Timeout));
    }

    #[test]
    fn sentinel_report_serializes_status_tag() {
        let report = AggregatedReport::no_structural_change("com.app.A");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["changed_member"], NO_STRUCTURAL_CHANGE);
        assert_eq!(json["outcome"]["status"], "no_structural_change");
        assert!(!report.is_failed());
    }
}
