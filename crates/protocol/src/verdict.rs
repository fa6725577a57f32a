use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload submitted to the reasoning oracle for one change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleRequest {
    pub diff_text: String,
    pub context_snippets: String,
    pub target_member_name: String,
}

/// Risk/impact verdict returned by the reasoning oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactVerdict {
    pub analysis_id: String,

    /// 1 (low risk) ..= 10 (API break)
    pub risk_score: u8,

    pub reasoning: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_strategy: Option<TestStrategy>,

    #[serde(default)]
    pub impacted_modules: Vec<ImpactedModule>,
}

impl ImpactVerdict {
    pub const MIN_RISK_SCORE: u8 = 1;
    pub const MAX_RISK_SCORE: u8 = 10;

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), VerdictError> {
        if self.analysis_id.trim().is_empty() {
            return Err(VerdictError::MissingField("analysisId"));
        }
        if self.reasoning.trim().is_empty() {
            return Err(VerdictError::MissingField("reasoning"));
        }
        if !(Self::MIN_RISK_SCORE..=Self::MAX_RISK_SCORE).contains(&self.risk_score) {
            return Err(VerdictError::RiskScoreOutOfRange(self.risk_score));
        }
        Ok(())
    }

    /// Highest-severity impact type reported, if any
    #[must_use]
    pub fn worst_impact(&self) -> Option<ImpactType> {
        self.impacted_modules
            .iter()
            .map(|module| module.impact_type)
            .max_by_key(|impact| impact.severity())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStrategy {
    pub scope: String,
    pub priority: Priority,
    #[serde(default, alias = "testCasesRequired")]
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[serde(alias = "high", alias = "High")]
    High,
    #[serde(alias = "medium", alias = "Medium")]
    Medium,
    #[serde(alias = "low", alias = "Low")]
    Low,
}

impl Priority {
    /// Priority implied by a risk score (>= 8 high, >= 5 medium)
    #[must_use]
    pub const fn from_risk_score(score: u8) -> Self {
        if score >= 8 {
            Self::High
        } else if score >= 5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub module_name: String,
    pub test_type: String,
    pub focus: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactedModule {
    pub module_name: String,
    pub impact_type: ImpactType,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactType {
    SyntacticBreak,
    SemanticBreak,
    PerformanceRisk,
    RuntimeRisk,
    NoImpact,
}

impl ImpactType {
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::SyntacticBreak => 4,
            Self::SemanticBreak => 3,
            Self::RuntimeRisk => 2,
            Self::PerformanceRisk => 1,
            Self::NoImpact => 0,
        }
    }
}

/// A verdict decoded fine but violates a value constraint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerdictError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Risk score {0} outside 1..=10")]
    RiskScoreOutOfRange(u8),
}
