use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Server,
    Transport,
    Clipboard,
    Render,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("Please enter some text to convert.")]
    EmptyInput,

    #[error("A conversion is already in progress.")]
    Busy,

    /// Message is either the server's own `error` field or a status fallback.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("The server returned no converted text.")]
    NoContent,

    #[error("Malformed response from server: {0}")]
    MalformedBody(String),

    #[error("{0}")]
    Transport(String),

    #[error("Copy failed: {0}")]
    Clipboard(String),

    #[error(transparent)]
    Render(#[from] SurfaceError),
}

impl ConvertError {
    pub fn server_status(status: u16) -> Self {
        ConvertError::Server {
            status,
            message: format!("Server error ({})", status),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ConvertError::EmptyInput | ConvertError::Busy => ErrorCategory::Validation,
            ConvertError::Server { .. }
            | ConvertError::NoContent
            | ConvertError::MalformedBody(_) => ErrorCategory::Server,
            ConvertError::Transport(_) => ErrorCategory::Transport,
            ConvertError::Clipboard(_) => ErrorCategory::Clipboard,
            ConvertError::Render(_) => ErrorCategory::Render,
        }
    }
}

impl From<reqwest::Error> for ConvertError {
    fn from(err: reqwest::Error) -> Self {
        ConvertError::Transport(err.to_string())
    }
}

/// Failure raised by a rendering surface while drawing an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("render failed: {0}")]
pub struct SurfaceError(pub String);
