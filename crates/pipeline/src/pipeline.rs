use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::limits::ConcurrencyLimiter;
use impact_diff::StructuralDiff;
use impact_discovery::{DependencyDiscovery, TextualCallerDiscovery};
use impact_oracle::{OracleError, ReasoningOracle};
use impact_protocol::{
    AggregatedReport, AnalysisFailure, CallerMap, ChangeKind, ChangeRecord, Corpus, FailureCategory,
    ImpactVerdict, OracleRequest,
};
use impact_store::RepositoryStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Inputs of one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub selected_repository_id: String,
    pub compare_repository_ids: Vec<String>,
    pub changed_file_content: String,
    pub target_file_name: String,
}

impl AnalysisRequest {
    pub fn new(
        selected_repository_id: impl Into<String>,
        compare_repository_ids: Vec<String>,
        changed_file_content: impl Into<String>,
        target_file_name: impl Into<String>,
    ) -> Self {
        Self {
            selected_repository_id: selected_repository_id.into(),
            compare_repository_ids,
            changed_file_content: changed_file_content.into(),
            target_file_name: target_file_name.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.selected_repository_id.trim().is_empty() {
            return Err(PipelineError::MissingInput("selected repository id"));
        }
        if self.changed_file_content.trim().is_empty() {
            return Err(PipelineError::MissingInput("changed file content"));
        }
        if self.target_file_name.trim().is_empty() {
            return Err(PipelineError::MissingInput("target file name"));
        }
        Ok(())
    }

    /// Compare ids plus the selected repository, blanks and duplicates removed
    #[must_use]
    pub fn repository_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(self.compare_repository_ids.len() + 1);
        let candidates = self
            .compare_repository_ids
            .iter()
            .chain(std::iter::once(&self.selected_repository_id));
        for id in candidates {
            let id = id.trim();
            if !id.is_empty() && !ids.iter().any(|known| known == id) {
                ids.push(id.to_string());
            }
        }
        ids
    }
}

/// Resolve a user-supplied target name to a corpus file id.
///
/// An exact id wins. Otherwise `.java` is stripped, path separators become dots and
/// the first id (in sorted order) matching on a package boundary is taken, in either
/// direction: `DataService.java` finds `com.app.DataService`, and
/// `src/main/java/com/app/DataService.java` finds it too.
#[must_use]
pub fn resolve_target<'a>(corpus: &'a Corpus, target: &str) -> Option<&'a str> {
    let target = target.trim();
    if let Some((id, _)) = corpus.get_key_value(target) {
        return Some(id.as_str());
    }

    let wanted = dotted(target);
    if wanted.is_empty() {
        return None;
    }

    corpus
        .keys()
        .find(|id| {
            let id = dotted(id);
            !id.is_empty() && (ends_on_boundary(&id, &wanted) || ends_on_boundary(&wanted, &id))
        })
        .map(String::as_str)
}

fn dotted(name: &str) -> String {
    let name = name.strip_suffix(".java").unwrap_or(name);
    name.replace(['/', '\\'], ".").trim_matches('.').to_string()
}

fn ends_on_boundary(haystack: &str, suffix: &str) -> bool {
    haystack == suffix
        || haystack
            .strip_suffix(suffix)
            .is_some_and(|head| head.ends_with('.'))
}

/// Diff → discovery → concurrent oracle fan-out → report aggregation.
///
/// The pipeline holds no per-run state, so one instance serves many runs. Every run
/// shares the instance's concurrency bound.
pub struct AnalysisPipeline {
    oracle: Arc<dyn ReasoningOracle>,
    discovery: Arc<dyn DependencyDiscovery>,
    limiter: ConcurrencyLimiter,
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(oracle: Arc<dyn ReasoningOracle>, config: PipelineConfig) -> Result<Self> {
        config.validate().map_err(PipelineError::InvalidConfig)?;
        Ok(Self {
            oracle,
            discovery: Arc::new(TextualCallerDiscovery::new()),
            limiter: ConcurrencyLimiter::new(config.max_concurrency),
            config,
        })
    }

    /// Replace the caller discovery strategy
    #[must_use]
    pub fn with_discovery(mut self, discovery: Arc<dyn DependencyDiscovery>) -> Self {
        self.discovery = discovery;
        self
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Analyse a changed file against the merged repositories of `store`.
    ///
    /// Fatal only for blank inputs, an unknown target or an unparsable target
    /// version; every other failure becomes a report entry.
    pub async fn run_analysis(
        &self,
        store: &RepositoryStore,
        request: AnalysisRequest,
    ) -> Result<Vec<AggregatedReport>> {
        request.validate()?;

        let repository_ids = request.repository_ids();
        let corpus = store.merged_corpus(&repository_ids);
        log::info!(
            "Analysing {} against {} files from {:?}",
            request.target_file_name,
            corpus.len(),
            repository_ids
        );

        self.analyze_corpus(&corpus, &request.target_file_name, &request.changed_file_content)
            .await
    }

    /// Analyse a changed file against an already merged corpus.
    pub async fn analyze_corpus(
        &self,
        corpus: &Corpus,
        target_file_name: &str,
        changed_file_content: &str,
    ) -> Result<Vec<AggregatedReport>> {
        let start = Instant::now();

        let target = resolve_target(corpus, target_file_name)
            .ok_or_else(|| PipelineError::TargetNotFound(target_file_name.trim().to_string()))?;
        let original = corpus.get(target).map(String::as_str).unwrap_or_default();

        let changes = StructuralDiff::new()
            .map_err(|e| PipelineError::ParserSetup(e.to_string()))?
            .diff(target, original, changed_file_content)
            .map_err(|e| PipelineError::unparsable(target, e))?;

        if changes.is_empty() {
            log::info!("{target}: no structural changes");
            return Ok(vec![AggregatedReport::no_structural_change(target)]);
        }
        log::info!("{target}: {} change record(s)", changes.len());

        let mut tasks: Vec<(ChangeRecord, JoinHandle<std::result::Result<ImpactVerdict, AnalysisFailure>>)> =
            Vec::with_capacity(changes.len());

        for change in changes {
            // discovery always runs over the unmodified corpus
            let callers = if change.change_kind == ChangeKind::MetadataChange {
                CallerMap::new()
            } else {
                self.discovery
                    .find_callers(target, change.changed_member(), corpus)
            };

            let request = OracleRequest {
                diff_text: change.diff_text(),
                context_snippets: context_snippets(&callers),
                target_member_name: change.changed_member().to_string(),
            };

            let handle = tokio::spawn(assess(
                Arc::clone(&self.oracle),
                self.limiter.clone(),
                self.config.task_timeout(),
                request,
            ));
            tasks.push((change, handle));
        }

        let mut reports = Vec::with_capacity(tasks.len());
        for (change, task) in tasks {
            match task.await {
                Ok(Ok(verdict)) => reports.push(AggregatedReport::analyzed(&change, verdict)),
                Ok(Err(failure)) => {
                    log::warn!(
                        "Oracle failed for {} ({}): {}",
                        change.changed_member(),
                        failure.category.as_str(),
                        failure.message
                    );
                    reports.push(AggregatedReport::failed(&change, &self.config.failure_suffix, failure));
                }
                Err(e) => {
                    log::error!("Task for {} panicked: {e}", change.changed_member());
                    let failure = AnalysisFailure {
                        category: FailureCategory::TaskAborted,
                        message: format!("Task panicked: {e}"),
                    };
                    reports.push(AggregatedReport::failed(&change, &self.config.failure_suffix, failure));
                }
            }
        }

        let failed = reports.iter().filter(|r| r.is_failed()).count();
        log::info!(
            "{target}: {} report(s), {failed} failed, in {} ms",
            reports.len(),
            start.elapsed().as_millis()
        );
        Ok(reports)
    }
}

fn context_snippets(callers: &CallerMap) -> String {
    callers
        .values()
        .map(|caller| caller.context_snippet())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One oracle task: wait for a slot, call, validate.
///
/// The timeout starts once the slot is held, so queueing behind the concurrency
/// bound never counts against the oracle.
async fn assess(
    oracle: Arc<dyn ReasoningOracle>,
    limiter: ConcurrencyLimiter,
    timeout: Option<Duration>,
    request: OracleRequest,
) -> std::result::Result<ImpactVerdict, AnalysisFailure> {
    let _permit = limiter.acquire().await.map_err(|e| AnalysisFailure {
        category: FailureCategory::TaskAborted,
        message: e.to_string(),
    })?;

    let call = oracle.assess(request);
    let verdict = match timeout {
        Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
            Err(OracleError::Timeout {
                ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            })
        }),
        None => call.await,
    }
    .map_err(into_failure)?;

    verdict.validate().map_err(|e| into_failure(e.into()))?;
    Ok(verdict)
}

fn into_failure(e: OracleError) -> AnalysisFailure {
    AnalysisFailure {
        category: e.category(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(ids: &[&str]) -> Corpus {
        ids.iter()
            .map(|id| ((*id).to_string(), format!("// {id}")))
            .collect()
    }

    #[test]
    fn exact_id_wins() {
        let corpus = corpus(&["com.app.DataService", "legacy.DataService"]);
        assert_eq!(
            resolve_target(&corpus, "legacy.DataService"),
            Some("legacy.DataService")
        );
    }

    #[test]
    fn file_name_resolves_on_package_boundary() {
        let corpus = corpus(&["com.app.BigDataService", "com.app.DataService"]);
        assert_eq!(
            resolve_target(&corpus, "DataService.java"),
            Some("com.app.DataService")
        );
        assert_eq!(resolve_target(&corpus, "Service.java"), None);
    }

    #[test]
    fn source_path_resolves_to_fqcn() {
        let corpus = corpus(&["com.app.DataService"]);
        assert_eq!(
            resolve_target(&corpus, "src/main/java/com/app/DataService.java"),
            Some("com.app.DataService")
        );
        assert_eq!(
            resolve_target(&corpus, "com\\app\\DataService.java"),
            Some("com.app.DataService")
        );
    }

    #[test]
    fn path_keyed_files_resolve_too() {
        let corpus = corpus(&["src/main/java/package-info.java"]);
        assert_eq!(
            resolve_target(&corpus, "package-info.java"),
            Some("src/main/java/package-info.java")
        );
        assert_eq!(resolve_target(&corpus, ".java"), None);
    }

    #[test]
    fn selected_repository_is_appended_once() {
        let request = AnalysisRequest::new(
            "main",
            vec!["feature".to_string(), " ".to_string(), "main".to_string()],
            "class A {}",
            "A.java",
        );
        assert_eq!(request.repository_ids(), vec!["feature", "main"]);

        let request = AnalysisRequest::new("main", vec![], "class A {}", "A.java");
        assert_eq!(request.repository_ids(), vec!["main"]);
    }

    #[test]
    fn blank_inputs_are_rejected_in_order() {
        let request = AnalysisRequest::new(" ", vec![], "", "");
        assert!(matches!(
            request.validate(),
            Err(PipelineError::MissingInput("selected repository id"))
        ));

        let request = AnalysisRequest::new("main", vec![], "\n", "A.java");
        assert!(matches!(
            request.validate(),
            Err(PipelineError::MissingInput("changed file content"))
        ));
    }
}
