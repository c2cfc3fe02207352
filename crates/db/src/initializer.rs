//! Idempotent schema initialization: collections first, then their indexes.

use scoring_kernel::{IndexSpec, Schema};

use crate::error::{InitError, StoreError};
use crate::store::SchemaStore;

/// What an ensure step found in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyPresent,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Created => "created",
            Outcome::AlreadyPresent => "already present",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub name: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    pub name: String,
    pub outcome: Outcome,
    pub indexes: Vec<IndexReport>,
}

/// Result of a successful [`initialize`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub database: String,
    pub collections: Vec<CollectionReport>,
}

impl InitReport {
    /// The single line printed once every step has succeeded.
    pub fn confirmation(&self) -> String {
        format!("Database {} initialized successfully!", self.database)
    }

    /// Number of collections and indexes this run actually created.
    pub fn created(&self) -> usize {
        self.collections
            .iter()
            .map(|c| {
                usize::from(c.outcome == Outcome::Created)
                    + c.indexes
                        .iter()
                        .filter(|i| i.outcome == Outcome::Created)
                        .count()
            })
            .sum()
    }
}

/// Create `name` unless it already exists.
pub async fn ensure_collection<S>(store: &S, name: &str) -> Result<Outcome, StoreError>
where
    S: SchemaStore + ?Sized,
{
    match store.create_collection(name).await {
        Ok(()) => Ok(Outcome::Created),
        Err(err) if err.is_already_exists() => {
            tracing::debug!(collection = name, error = %err, "collection exists; skipping");
            Ok(Outcome::AlreadyPresent)
        }
        Err(err) => Err(err),
    }
}

/// Create `index` on `collection` unless an equivalent index already exists.
///
/// An index on the same key with different options is not equivalent; the
/// store rejects the request and the conflict is returned.
pub async fn ensure_index<S>(
    store: &S,
    collection: &str,
    index: &IndexSpec,
) -> Result<Outcome, StoreError>
where
    S: SchemaStore + ?Sized,
{
    // A missing namespace has no indexes; building one creates it.
    let existing = match store.list_indexes(collection).await {
        Ok(existing) => existing,
        Err(StoreError::NotFound(_)) => Vec::new(),
        Err(err) => return Err(err),
    };
    if existing.iter().any(|info| info.matches(index)) {
        return Ok(Outcome::AlreadyPresent);
    }

    match store.create_index(collection, index).await {
        Ok(()) => Ok(Outcome::Created),
        Err(err) if err.is_already_exists() => Ok(Outcome::AlreadyPresent),
        Err(err) => Err(err),
    }
}

/// Create a unique ascending index on `field` unless one already exists.
pub async fn ensure_unique_index<S>(
    store: &S,
    collection: &str,
    field: &'static str,
) -> Result<Outcome, StoreError>
where
    S: SchemaStore + ?Sized,
{
    ensure_index(store, collection, &IndexSpec::unique(field)).await
}

/// Bring the store in line with `schema`.
///
/// Fails fast: the first error other than "already exists" aborts the run and
/// whatever was created before it stays in place.
pub async fn initialize<S>(store: &S, schema: &Schema) -> Result<InitReport, InitError>
where
    S: SchemaStore + ?Sized,
{
    store.ping().await.map_err(|source| InitError::Unreachable {
        database: store.database_name().to_string(),
        source,
    })?;

    tracing::info!(
        database = schema.database,
        collections = schema.collections.len(),
        "initializing schema"
    );

    let mut collections = Vec::with_capacity(schema.collections.len());

    for spec in &schema.collections {
        let outcome = ensure_collection(store, spec.name).await.map_err(|source| {
            InitError::CreateCollection {
                collection: spec.name.to_string(),
                source,
            }
        })?;
        tracing::info!(collection = spec.name, outcome = outcome.as_str(), "collection ensured");

        let mut indexes = Vec::with_capacity(spec.indexes.len());
        for index in &spec.indexes {
            let name = index.default_name();
            let outcome = ensure_index(store, spec.name, index).await.map_err(|source| {
                InitError::CreateIndex {
                    collection: spec.name.to_string(),
                    index: name.clone(),
                    source,
                }
            })?;
            tracing::info!(
                collection = spec.name,
                field = index.field,
                unique = index.unique,
                outcome = outcome.as_str(),
                "index ensured"
            );
            indexes.push(IndexReport { name, outcome });
        }

        collections.push(CollectionReport {
            name: spec.name.to_string(),
            outcome,
            indexes,
        });
    }

    let report = InitReport {
        database: schema.database.to_string(),
        collections,
    };
    tracing::info!(
        database = schema.database,
        created = report.created(),
        "schema initialized"
    );

    Ok(report)
}
