//! In-memory [`SchemaStore`] following MongoDB's catalog semantics, for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use scoring_kernel::IndexSpec;

use crate::error::StoreError;
use crate::store::{IndexInfo, SchemaStore};

#[derive(Debug, Default)]
struct MemoryCollection {
    indexes: Vec<IndexInfo>,
    ids: Vec<String>,
}

impl MemoryCollection {
    fn new() -> Self {
        Self {
            indexes: vec![IndexInfo {
                name: "_id_".to_string(),
                keys: vec![("_id".to_string(), 1)],
                unique: false,
            }],
            ids: Vec::new(),
        }
    }

    fn enforces_unique_id(&self) -> bool {
        self.indexes
            .iter()
            .any(|index| index.unique && index.keys == [("id".to_string(), 1)])
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    database: String,
    collections: Mutex<BTreeMap<String, MemoryCollection>>,
    requests: Mutex<Vec<String>>,
    unreachable: bool,
    deny_collection_creation: bool,
    deny_index_creation: bool,
}

impl MemoryStore {
    pub fn new(database: &str) -> Self {
        Self {
            database: database.to_string(),
            ..Self::default()
        }
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn deny_collection_creation(mut self) -> Self {
        self.deny_collection_creation = true;
        self
    }

    pub fn deny_index_creation(mut self) -> Self {
        self.deny_index_creation = true;
        self
    }

    /// Seed a collection with plain documents carrying the given `id`s.
    pub fn with_documents(self, collection: &str, ids: &[&str]) -> Self {
        {
            let mut collections = self.collections.lock().unwrap();
            let entry = collections
                .entry(collection.to_string())
                .or_insert_with(MemoryCollection::new);
            entry.ids.extend(ids.iter().map(|id| id.to_string()));
        }
        self
    }

    /// Seed an index definition directly, bypassing conflict checks.
    pub fn with_index(self, collection: &str, index: IndexInfo) -> Self {
        {
            let mut collections = self.collections.lock().unwrap();
            collections
                .entry(collection.to_string())
                .or_insert_with(MemoryCollection::new)
                .indexes
                .push(index);
        }
        self
    }

    /// Insert a document with the given `id`, honouring unique indexes.
    pub fn insert(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().unwrap();
        let entry = collections
            .entry(collection.to_string())
            .or_insert_with(MemoryCollection::new);

        if entry.enforces_unique_id() && entry.ids.iter().any(|existing| existing == id) {
            return Err(StoreError::DuplicateKey(format!(
                "{}.{} index: id_1 dup key: {{ id: \"{}\" }}",
                self.database, collection, id
            )));
        }
        entry.ids.push(id.to_string());
        Ok(())
    }

    pub fn indexes_of(&self, collection: &str) -> Vec<IndexInfo> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|c| c.indexes.clone())
            .unwrap_or_default()
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.collections.lock().unwrap().keys().cloned().collect()
    }

    /// Mutating requests received so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.unreachable {
            return Err(StoreError::Unreachable(
                "server selection timeout".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SchemaStore for MemoryStore {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_reachable()
    }

    async fn create_collection(&self, name: &str) -> Result<(), StoreError> {
        self.check_reachable()?;
        self.record(format!("create_collection {}", name));

        if self.deny_collection_creation {
            return Err(StoreError::Unauthorized(format!(
                "not authorized on {} to execute command {{ create: \"{}\" }}",
                self.database, name
            )));
        }

        let mut collections = self.collections.lock().unwrap();
        if collections.contains_key(name) {
            return Err(StoreError::AlreadyExists(format!(
                "Collection {}.{} already exists.",
                self.database, name
            )));
        }
        collections.insert(name.to_string(), MemoryCollection::new());
        Ok(())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        self.check_reachable()?;
        Ok(self.collection_names())
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<(), StoreError> {
        self.check_reachable()?;
        self.record(format!("create_index {} {}", collection, index.default_name()));

        if self.deny_index_creation {
            return Err(StoreError::Unauthorized(format!(
                "not authorized on {} to execute command {{ createIndexes: \"{}\" }}",
                self.database, collection
            )));
        }

        let mut collections = self.collections.lock().unwrap();
        // Like MongoDB, building an index implicitly creates the collection.
        let entry = collections
            .entry(collection.to_string())
            .or_insert_with(MemoryCollection::new);

        if let Some(existing) = entry.indexes.iter().find(|i| i.shares_key_with(index)) {
            if existing.matches(index) {
                return Ok(());
            }
            return Err(StoreError::IndexConflict(format!(
                "An existing index has the same name as the requested index: {}",
                existing.name
            )));
        }

        if index.unique {
            let mut seen = std::collections::HashSet::new();
            if let Some(dup) = entry.ids.iter().find(|id| !seen.insert(id.as_str())) {
                return Err(StoreError::DuplicateKey(format!(
                    "{}.{} index: {} dup key: {{ {}: \"{}\" }}",
                    self.database,
                    collection,
                    index.default_name(),
                    index.field,
                    dup
                )));
            }
        }

        entry.indexes.push(IndexInfo {
            name: index.default_name(),
            keys: vec![(index.field.to_string(), index.direction.as_i32())],
            unique: index.unique,
        });
        Ok(())
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexInfo>, StoreError> {
        self.check_reachable()?;
        let collections = self.collections.lock().unwrap();
        match collections.get(collection) {
            Some(entry) => Ok(entry.indexes.clone()),
            // MongoDB answers listIndexes on a missing namespace with NamespaceNotFound.
            None => Err(StoreError::NotFound(format!(
                "ns does not exist: {}.{}",
                self.database, collection
            ))),
        }
    }
}
