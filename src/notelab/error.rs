use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotelabError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but a project, section or note is missing a required field.
    #[error("Invalid import: {0}")]
    Validation(String),

    #[error("Invalid format: expected {{ projects: [...] }}, {{ completeStructure: [...] }} or a bare array of projects")]
    InvalidFormat,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, NotelabError>;
