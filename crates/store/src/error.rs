use impact_declarations::DeclarationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parser setup failed: {0}")]
    Parser(#[from] DeclarationError),

    #[error("Invalid repository path: {0}")]
    InvalidPath(String),

    #[error("Unknown repository: {0}")]
    UnknownRepository(String),

    #[error("Repository {0} was not loaded from a directory")]
    NotDirectoryBacked(String),
}
