//! Storage traits and error types
//!
//! This module defines the trait interface for tracking-list backends and
//! associated error types.

use crate::store::Entries;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for tracking-list backends
///
/// Backends persist the whole list at once; there are no partial updates.
pub trait Storage {
    /// Reads the full tracking list
    ///
    /// # Returns
    ///
    /// * `Ok(Some(entries))` - The stored list
    /// * `Ok(None)` - Nothing has been stored yet
    /// * `Err(StoreError)` - The list exists but could not be read
    fn load(&self) -> StoreResult<Option<Entries>>;

    /// Replaces the stored list with `entries`
    fn save(&self, entries: &Entries) -> StoreResult<()>;
}
