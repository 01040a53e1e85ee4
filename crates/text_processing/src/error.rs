//! Error types for text processing

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextProcessingError {
    #[error("Invalid intent rule for '{topic}': {message}")]
    InvalidRule { topic: String, message: String },
}

pub type Result<T> = std::result::Result<T, TextProcessingError>;
