//! Error types for the quiz client.
//!
//! Errors are split by how the engine reacts to them: validation errors are
//! shown in place, service errors either abort back to the menu or render
//! inline, and configuration errors only happen at startup.

use std::io;
use std::path::PathBuf;

/// A specialized `Result` for remote service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Input that does not allow the requested transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter your name")]
    MissingName,

    #[error("Please select a course and a topic")]
    MissingSelection,

    #[error("Course and topic must not be empty")]
    EmptyTopicKey,

    #[error("No topic is selected, start again from the menu")]
    NoActiveTopic,

    #[error("There is no finished quiz to save")]
    NothingToSave,

    #[error("This score has already been saved")]
    AlreadySaved,
}

/// Failures talking to the remote content service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with HTTP {status}")]
    Status { status: u16 },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Service reported an error: {message}")]
    Rejected { message: String },

    #[error("Unexpected data: {0}")]
    DataShape(String),
}

impl ServiceError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn data_shape(message: impl Into<String>) -> Self {
        Self::DataShape(message.into())
    }

    /// Whether the request never produced a usable answer, as opposed to
    /// the service answering with `ok: false` or odd data.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::Decode(_)
        )
    }
}

/// Configuration that could not be loaded or is out of range.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid JSON in config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Top-level error for running the client.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to reach the content service: {0}")]
    Service(#[from] ServiceError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
