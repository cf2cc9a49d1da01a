//! Error types for the Vigil system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VigilError {
    #[error("Principal not found: {id}")]
    NotFound { id: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type VigilResult<T> = Result<T, VigilError>;
