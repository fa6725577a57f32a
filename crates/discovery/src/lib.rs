//! # Impact Discovery
//!
//! Finds the methods elsewhere in a corpus that appear to call a changed member.
//!
//! The default strategy is a deliberately cheap textual heuristic: a file is a
//! candidate when its text contains `symbol(`, and within a candidate every method
//! whose canonical rendering contains the same pattern is reported. Calls on
//! unrelated receivers sharing the name, or hits inside string literals, are accepted
//! false positives. Hits that only occur in comments or outside any method are
//! dropped by the per-method check.

use impact_declarations::DeclarationExtractor;
use impact_protocol::{CallerExcerpt, CallerMap, CallerMatch, Corpus};

/// Strategy for locating callers of a symbol.
///
/// Implementations must not return an entry for `target_file_id` and must skip
/// files they cannot read rather than fail the whole scan.
pub trait DependencyDiscovery: Send + Sync {
    fn find_callers(&self, target_file_id: &str, symbol: &str, corpus: &Corpus) -> CallerMap;
}

/// Call pattern searched for a member name
#[must_use]
pub fn call_pattern(symbol: &str) -> String {
    format!("{symbol}(")
}

/// Text-pattern caller discovery backed by tree-sitter method extraction
#[derive(Debug, Clone, Copy, Default)]
pub struct TextualCallerDiscovery;

impl TextualCallerDiscovery {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn scan_file(
        extractor: &mut DeclarationExtractor,
        file_id: &str,
        text: &str,
        pattern: &str,
    ) -> Option<CallerMatch> {
        let methods = match extractor.methods(text) {
            Ok(methods) => methods,
            Err(e) => {
                log::warn!("Skipping {file_id} during caller discovery: {e}");
                return None;
            }
        };

        let mut caller = CallerMatch::new(file_id);
        caller.excerpts = methods
            .into_iter()
            .filter(|method| method.canonical.contains(pattern))
            .map(|method| CallerExcerpt {
                text: method.excerpt(),
                member_name: method.name,
            })
            .collect();

        if caller.is_empty() {
            log::debug!("{file_id} mentions {pattern} outside any method body");
            return None;
        }
        Some(caller)
    }
}

impl DependencyDiscovery for TextualCallerDiscovery {
    fn find_callers(&self, target_file_id: &str, symbol: &str, corpus: &Corpus) -> CallerMap {
        let mut callers = CallerMap::new();

        let symbol = symbol.trim();
        if symbol.is_empty() {
            return callers;
        }
        let pattern = call_pattern(symbol);

        let candidates: Vec<_> = corpus
            .iter()
            .filter(|(file_id, text)| file_id.as_str() != target_file_id && text.contains(&pattern))
            .collect();

        if candidates.is_empty() {
            log::debug!("No candidate callers of {pattern} in {} files", corpus.len());
            return callers;
        }

        // Parser is not Sync, so each scan owns one
        let mut extractor = match DeclarationExtractor::new() {
            Ok(extractor) => extractor,
            Err(e) => {
                log::error!("Caller discovery unavailable: {e}");
                return callers;
            }
        };

        for (file_id, text) in candidates {
            if let Some(caller) = Self::scan_file(&mut extractor, file_id, text, &pattern) {
                log::debug!("{file_id}: {} caller(s) of {pattern}", caller.excerpts.len());
                callers.insert(file_id.clone(), caller);
            }
        }

        log::info!(
            "Discovered {} caller file(s) of {pattern} across {} files",
            callers.len(),
            corpus.len()
        );
        callers
    }
}
