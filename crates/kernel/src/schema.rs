//! Store-neutral description of the collections and indexes a database must carry.

use serde::Serialize;

/// Sort direction of an index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Numeric form used in document-store key specifications.
    pub fn as_i32(self) -> i32 {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => -1,
        }
    }
}

/// A single-field index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSpec {
    pub field: &'static str,
    pub direction: Direction,
    pub unique: bool,
}

impl IndexSpec {
    /// Unique ascending index on `field`.
    pub const fn unique(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
            unique: true,
        }
    }

    /// Name the store assigns when none is given, e.g. `id_1`.
    pub fn default_name(&self) -> String {
        format!("{}_{}", self.field, self.direction.as_i32())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub indexes: Vec<IndexSpec>,
}

impl CollectionSpec {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            indexes: Vec::new(),
        }
    }

    pub fn with_index(mut self, index: IndexSpec) -> Self {
        self.indexes.push(index);
        self
    }
}

/// A database together with every collection the initializer ensures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub database: &'static str,
    pub collections: Vec<CollectionSpec>,
}

impl Schema {
    pub fn new(database: &'static str) -> Self {
        Self {
            database,
            collections: Vec::new(),
        }
    }

    pub fn with_collection(mut self, collection: CollectionSpec) -> Self {
        self.collections.push(collection);
        self
    }

    pub fn collection(&self, name: &str) -> Option<&CollectionSpec> {
        self.collections.iter().find(|c| c.name == name)
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.collections.iter().map(|c| c.name)
    }
}
