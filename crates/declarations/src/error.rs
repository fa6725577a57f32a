use thiserror::Error;

/// Result type for declaration extraction
pub type Result<T> = std::result::Result<T, DeclarationError>;

/// Errors that can occur while turning source text into declarations
#[derive(Error, Debug)]
pub enum DeclarationError {
    /// The text does not parse into a well-formed syntax tree
    #[error("Unparsable source: {0}")]
    UnparsableSource(String),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl DeclarationError {
    /// Create an unparsable source error
    pub fn unparsable(msg: impl Into<String>) -> Self {
        Self::UnparsableSource(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }

    #[must_use]
    pub const fn is_unparsable(&self) -> bool {
        matches!(self, Self::UnparsableSource(_))
    }
}
