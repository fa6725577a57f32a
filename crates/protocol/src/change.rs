use serde::{Deserialize, Serialize};

/// Kind of structural member tracked in a declaration snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Method,
    Field,
    Type,
}

impl MemberKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Field => "field",
            Self::Type => "type",
        }
    }

    const fn marker(self) -> &'static str {
        match self {
            Self::Method => "METHOD",
            Self::Field => "FIELD",
            Self::Type => "TYPE",
        }
    }
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to a member between the original and modified file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    /// Raw text differs but no member changed (imports, package, comments).
    MetadataChange,
}

impl ChangeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::MetadataChange => "metadata_change",
        }
    }

    const fn marker(self) -> &'static str {
        match self {
            Self::Added => "ADDED",
            Self::Modified => "MODIFIED",
            Self::Removed => "REMOVED",
            Self::MetadataChange => "METADATA_CHANGE",
        }
    }
}

/// One structural delta for a single named member of the changed file.
///
/// `Modified` records carry both signatures, `Added` only the new one and `Removed`
/// only the old one. A `MetadataChange` record has no member at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub file_id: String,
    pub member_kind: Option<MemberKind>,
    pub member_name: Option<String>,
    pub change_kind: ChangeKind,
    pub old_signature: Option<String>,
    pub new_signature: Option<String>,
    /// Source text of the member (the modified version unless it was removed)
    pub rendered_body: String,
}

impl ChangeRecord {
    #[must_use]
    pub fn added(
        file_id: impl Into<String>,
        kind: MemberKind,
        name: impl Into<String>,
        new_signature: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            member_kind: Some(kind),
            member_name: Some(name.into()),
            change_kind: ChangeKind::Added,
            old_signature: None,
            new_signature: Some(new_signature.into()),
            rendered_body: body.into(),
        }
    }

    #[must_use]
    pub fn modified(
        file_id: impl Into<String>,
        kind: MemberKind,
        name: impl Into<String>,
        old_signature: impl Into<String>,
        new_signature: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            member_kind: Some(kind),
            member_name: Some(name.into()),
            change_kind: ChangeKind::Modified,
            old_signature: Some(old_signature.into()),
            new_signature: Some(new_signature.into()),
            rendered_body: body.into(),
        }
    }

    #[must_use]
    pub fn removed(
        file_id: impl Into<String>,
        kind: MemberKind,
        name: impl Into<String>,
        old_signature: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            member_kind: Some(kind),
            member_name: Some(name.into()),
            change_kind: ChangeKind::Removed,
            old_signature: Some(old_signature.into()),
            new_signature: None,
            rendered_body: body.into(),
        }
    }

    #[must_use]
    pub fn metadata(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            member_kind: None,
            member_name: None,
            change_kind: ChangeKind::MetadataChange,
            old_signature: None,
            new_signature: None,
            rendered_body: String::new(),
        }
    }

    /// Member name, falling back to the file id for file-level records
    #[must_use]
    pub fn changed_member(&self) -> &str {
        self.member_name.as_deref().unwrap_or(&self.file_id)
    }

    /// Marker such as `METHOD_MODIFIED` or `STRUCTURAL_METADATA_CHANGE`
    #[must_use]
    pub fn marker(&self) -> String {
        match self.member_kind {
            Some(kind) => format!("{}_{}", kind.marker(), self.change_kind.marker()),
            None => format!("STRUCTURAL_{}", self.change_kind.marker()),
        }
    }

    /// Render the change as annotated diff text for the reasoning oracle.
    #[must_use]
    pub fn diff_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("// CHANGE: {}\n", self.marker()));
        out.push_str(&format!("// FILE: {}\n", self.file_id));

        if self.change_kind == ChangeKind::MetadataChange {
            out.push_str(
                "// DESCRIPTION: Changes detected outside of primary members \
                 (imports, package, file-level comments).\n",
            );
            return out;
        }

        if let Some(name) = &self.member_name {
            out.push_str(&format!("// MEMBER: {name}\n"));
        }
        if let Some(old) = &self.old_signature {
            out.push_str(&format!("// OLD SIGNATURE: {old}\n"));
        }
        if let Some(new) = &self.new_signature {
            out.push_str(&format!("// NEW SIGNATURE: {new}\n"));
        }
        out.push_str(&self.rendered_body);
        if !self.rendered_body.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

/// A method in a caller file whose body contains the searched call pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerExcerpt {
    pub member_name: String,
    pub text: String,
}

/// Discovery hit for one corpus file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerMatch {
    pub file_id: String,
    /// Matching declarations in source order
    pub excerpts: Vec<CallerExcerpt>,
}

impl CallerMatch {
    #[must_use]
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            excerpts: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.excerpts.is_empty()
    }

    /// Render every excerpt under a `// Module: .. - Method: ..` header.
    #[must_use]
    pub fn context_snippet(&self) -> String {
        self.excerpts
            .iter()
            .map(|excerpt| {
                format!(
                    "// Module: {} - Method: {}\n{}\n",
                    self.file_id, excerpt.member_name, excerpt.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
