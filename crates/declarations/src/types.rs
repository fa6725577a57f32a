use impact_protocol::MemberKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of a member inside one file: kind plus simple name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberKey {
    pub kind: MemberKind,
    pub name: String,
}

impl MemberKey {
    pub fn new(kind: MemberKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// A named member extracted from Java source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Declaration {
    pub kind: MemberKind,

    /// Simple name (method name, variable name, type name)
    pub name: String,

    /// Layout-insensitive rendering used for equality and call matching
    pub canonical: String,

    /// Header line presented to the oracle (no body)
    pub signature: String,

    /// Original source text of the member
    pub source: String,

    /// Javadoc directly preceding the member, if any
    pub documentation: Option<String>,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Number of same-named declarations folded into this one
    pub overloads: usize,
}

impl Declaration {
    #[must_use]
    pub fn key(&self) -> MemberKey {
        MemberKey::new(self.kind, self.name.clone())
    }

    /// Source text with its javadoc, as shown in diffs and caller context
    #[must_use]
    pub fn excerpt(&self) -> String {
        match &self.documentation {
            Some(doc) => format!("{doc}\n{}", self.source),
            None => self.source.clone(),
        }
    }

    /// Fold a same-named declaration (an overload) into this slot.
    ///
    /// Renderings are concatenated in declaration order, so a slot compares equal
    /// across versions only if every overload is unchanged and in the same order.
    pub(crate) fn absorb(&mut self, other: Declaration) {
        self.canonical.push('\n');
        self.canonical.push_str(&other.canonical);
        self.signature.push_str("; ");
        self.signature.push_str(&other.signature);
        self.source.push_str("\n\n");
        self.source.push_str(&other.excerpt());
        self.end_line = self.end_line.max(other.end_line);
        self.overloads += other.overloads;
    }
}

/// Every member of one file, keyed by kind and name.
///
/// Ordered by key so that diffs over two snapshots are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationSnapshot {
    source: String,
    members: BTreeMap<MemberKey, Declaration>,
}

impl DeclarationSnapshot {
    pub(crate) fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            members: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, declaration: Declaration) {
        match self.members.get_mut(&declaration.key()) {
            Some(existing) => existing.absorb(declaration),
            None => {
                self.members.insert(declaration.key(), declaration);
            }
        }
    }

    #[must_use]
    pub fn get(&self, kind: MemberKind, name: &str) -> Option<&Declaration> {
        self.members.get(&MemberKey::new(kind, name))
    }

    #[must_use]
    pub fn contains(&self, key: &MemberKey) -> bool {
        self.members.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberKey, &Declaration)> {
        self.members.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &MemberKey> {
        self.members.keys()
    }

    /// Members of one kind, ordered by name
    pub fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = &Declaration> {
        self.members.values().filter(move |decl| decl.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Full source text the snapshot was built from
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}
