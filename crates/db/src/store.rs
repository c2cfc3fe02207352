use async_trait::async_trait;
use scoring_kernel::IndexSpec;

use crate::error::StoreError;

/// An index as reported by the store's catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub name: String,
    pub keys: Vec<(String, i32)>,
    pub unique: bool,
}

impl IndexInfo {
    /// True when this index is equivalent to `spec`: same single key,
    /// same direction, same uniqueness.
    pub fn matches(&self, spec: &IndexSpec) -> bool {
        self.unique == spec.unique
            && self.keys.len() == 1
            && self.keys[0].0 == spec.field
            && self.keys[0].1 == spec.direction.as_i32()
    }

    /// True when this index is keyed on the same field as `spec`,
    /// whatever its options.
    pub fn shares_key_with(&self, spec: &IndexSpec) -> bool {
        self.keys.len() == 1 && self.keys[0].0 == spec.field
    }
}

/// Catalog operations the initializer needs from a document store bound to
/// one database.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Database every request targets.
    fn database_name(&self) -> &str;

    /// Round-trip to the server; fails when it cannot be reached.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Create `name`; fails with [`StoreError::AlreadyExists`] if present.
    async fn create_collection(&self, name: &str) -> Result<(), StoreError>;

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError>;

    /// Create `index` on `collection` under the store's default name.
    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<(), StoreError>;

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexInfo>, StoreError>;
}
