//! Persistence collaborators. The domain modules define their store
//! traits; this module carries the shared error vocabulary and the
//! in-memory implementations the binary and tests run against.

pub mod memory;

/// Error enumeration shared by every store trait.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
