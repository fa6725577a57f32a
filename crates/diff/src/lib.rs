//! # Impact Diff
//!
//! Member-level structural comparison of two versions of one Java file.
//!
//! ```text
//! original text ──> DeclarationSnapshot ─┐
//!                                        ├──> added / modified / removed per key
//! modified text ──> DeclarationSnapshot ─┘         │
//!                                                  └──> nothing found but text differs
//!                                                        → one MetadataChange
//! ```
//!
//! A member is modified when its canonical rendering differs, so a body-only edit is a
//! modification even though the signature is unchanged.

use impact_declarations::{Declaration, DeclarationExtractor, DeclarationSnapshot};
use impact_protocol::ChangeRecord;

pub use impact_declarations::{DeclarationError, Result};

/// Structural diff engine for Java sources
pub struct StructuralDiff {
    extractor: DeclarationExtractor,
}

impl StructuralDiff {
    pub fn new() -> Result<Self> {
        Ok(Self {
            extractor: DeclarationExtractor::new()?,
        })
    }

    /// Compare two versions of `file_id`.
    ///
    /// Identical texts short-circuit to an empty list without parsing. Either text
    /// failing to parse is an `UnparsableSource` error.
    pub fn diff(&mut self, file_id: &str, original: &str, modified: &str) -> Result<Vec<ChangeRecord>> {
        if original == modified {
            return Ok(Vec::new());
        }

        let before = self.extractor.snapshot(original)?;
        let after = self.extractor.snapshot(modified)?;
        Ok(diff_snapshots(file_id, &before, &after))
    }
}

/// Diff two already-built snapshots of the same file.
#[must_use]
pub fn diff_snapshots(
    file_id: &str,
    original: &DeclarationSnapshot,
    modified: &DeclarationSnapshot,
) -> Vec<ChangeRecord> {
    let mut records = Vec::new();

    for (key, after) in modified.iter() {
        match original.get(key.kind, &key.name) {
            None => records.push(added(file_id, after)),
            Some(before) if before.canonical != after.canonical => {
                records.push(modified_record(file_id, before, after));
            }
            Some(_) => {}
        }
    }

    for (key, before) in original.iter() {
        if !modified.contains(key) {
            records.push(removed(file_id, before));
        }
    }

    if records.is_empty() && original.source() != modified.source() {
        records.push(ChangeRecord::metadata(file_id));
    }

    for record in &records {
        log::debug!("{file_id}: {} {}", record.marker(), record.changed_member());
    }

    records
}

fn added(file_id: &str, decl: &Declaration) -> ChangeRecord {
    ChangeRecord::added(file_id, decl.kind, &decl.name, &decl.signature, decl.excerpt())
}

fn removed(file_id: &str, decl: &Declaration) -> ChangeRecord {
    ChangeRecord::removed(file_id, decl.kind, &decl.name, &decl.signature, decl.excerpt())
}

fn modified_record(file_id: &str, before: &Declaration, after: &Declaration) -> ChangeRecord {
    ChangeRecord::modified(
        file_id,
        after.kind,
        &after.name,
        &before.signature,
        &after.signature,
        after.excerpt(),
    )
}
