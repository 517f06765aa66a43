use std::io;
use thiserror::Error;

use crate::brain::classifier::ClassifierError;
use crate::speech::SpeechError;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents errors originating from the record store, typically from `sqlx`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents standard input/output errors (console, audio clips, data directory).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents failures while fitting or querying the text classifier.
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// Represents speech-to-text failures that were not absorbed into a reply string.
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    /// Represents data validation errors (e.g., out-of-range training parameters).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., a speech mode without an endpoint).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}
