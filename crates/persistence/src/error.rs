//! Persistence error types

use scylla::transport::errors::{NewSessionError, QueryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Connection error: {0}")]
    Connection(#[from] NewSessionError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Webhook error: {0}")]
    Webhook(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        PersistenceError::Webhook(err.to_string())
    }
}

impl From<concierge_core::Error> for PersistenceError {
    fn from(err: concierge_core::Error) -> Self {
        PersistenceError::InvalidData(err.to_string())
    }
}
