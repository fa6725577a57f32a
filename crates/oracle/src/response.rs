use crate::error::{OracleError, Result};
use impact_protocol::ImpactVerdict;

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````), if any.
#[must_use]
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // language tag runs to the end of the opening line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Decode and validate a verdict from raw oracle output.
pub fn parse_verdict(raw: &str) -> Result<ImpactVerdict> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(OracleError::malformed("empty response body"));
    }

    let verdict: ImpactVerdict =
        serde_json::from_str(body).map_err(|e| OracleError::malformed(e.to_string()))?;
    verdict.validate()?;
    Ok(verdict)
}
