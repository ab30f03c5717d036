//! Document store seam.
//!
//! The facade only needs five primitives from a remote document database:
//! merge-set, update of an existing document, append with a generated key,
//! point read and full collection scan. [`FirestoreStore`] speaks the
//! Firestore REST API; [`MemoryStore`] keeps everything in process with the
//! same semantics.

use async_trait::async_trait;

use crate::errors::StoreError;

pub mod firestore;
pub mod memory;
pub mod value;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use value::{Document, Fields, Value};

/// Longest document id the remote store accepts, in bytes
pub const MAX_DOCUMENT_ID_BYTES: usize = 1500;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logging
    fn name(&self) -> &'static str;

    /// Writes `fields` into the document, creating it if absent. Fields not
    /// named in `fields` keep their stored values.
    async fn set_merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Like [`DocumentStore::set_merge`] but fails with
    /// [`StoreError::NotFound`] when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Appends a new document and returns its generated key
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Every document in the collection, in no particular order
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;
}

/// Rejects keys that cannot address a single document
pub fn validate_document_id(id: &str) -> Result<(), StoreError> {
    if id.is_empty() {
        return Err(StoreError::invalid_key(id, "document id cannot be empty"));
    }
    if id.contains('/') {
        return Err(StoreError::invalid_key(id, "document id cannot contain '/'"));
    }
    if id == "." || id == ".." {
        return Err(StoreError::invalid_key(id, "document id cannot be '.' or '..'"));
    }
    if id.len() >= 4 && id.starts_with("__") && id.ends_with("__") {
        return Err(StoreError::invalid_key(id, "ids matching __.*__ are reserved"));
    }
    if id.len() > MAX_DOCUMENT_ID_BYTES {
        return Err(StoreError::invalid_key(
            id,
            format!("document id exceeds {} bytes", MAX_DOCUMENT_ID_BYTES),
        ));
    }
    Ok(())
}
