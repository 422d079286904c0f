use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Reference property {id} not found")]
    NotFound { id: i64 },
    #[error("Invalid request: {message}")]
    Validation { message: String },
    #[error("Invalid config at {path}: {message}")]
    Config { path: PathBuf, message: String },
    /// Property store, content index or engagement sink failure, as reported
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }
}
