// Error type shared by the client and the commands.
//
// User cancellation is deliberately absent: prompts return `Option`
// and a `None` ends the command quietly.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GistError>;

#[derive(Debug, Error)]
pub enum GistError {
    /// Empty required input, detected before any request is sent.
    #[error("{0}")]
    Validation(String),

    #[error("No active editor. Open a Gist file first.")]
    NoActiveEditor,

    /// Any non-2xx response. The body is kept as raw text.
    #[error("GitHub API error: {} {body}", .status.as_u16())]
    Api { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    /// A host capability (prompt, clipboard, browser) failed.
    #[error("{0}")]
    Host(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GistError {
    pub fn validation(message: impl Into<String>) -> Self {
        GistError::Validation(message.into())
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GistError::Api { status, .. } => Some(*status),
            GistError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Validation errors are shown as-is; everything else gets the
    /// command's "Failed to ..." prefix.
    pub fn is_validation(&self) -> bool {
        matches!(self, GistError::Validation(_) | GistError::NoActiveEditor)
    }
}
