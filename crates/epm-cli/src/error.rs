//! CLI error type

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the terminal
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A user-facing message with no underlying cause
    #[error("{0}")]
    User(String),

    #[error(transparent)]
    Core(#[from] epm_core::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User(message.into())
    }
}
