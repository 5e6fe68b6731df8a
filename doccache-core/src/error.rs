//! Error types for doccache operations

use thiserror::Error;

/// Construction-time configuration errors.
///
/// These are fatal to cache construction and never recovered internally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no cache name defined")]
    EmptyName,
}

/// Identity normalization errors.
///
/// Raised when a lookup input cannot be reduced to a canonical key.
/// These surface synchronously to the caller of `put`/`remove`/`get`
/// and are never retried internally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid object id {value:?}: {reason}")]
    InvalidKey { value: String, reason: String },

    #[error("empty identity key")]
    EmptyKey,
}

/// Master error type for all doccache errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("invalid chunk size {size}, must be greater than zero")]
    InvalidChunkSize { size: usize },
}

/// Result type alias for doccache operations.
pub type CacheResult<T> = Result<T, CacheError>;

// =============================================================================
// TESTS
// =============================================================================
