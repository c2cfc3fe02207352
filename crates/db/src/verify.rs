//! Read-only comparison of the store catalog against a schema.

use scoring_kernel::Schema;

use crate::error::InitError;
use crate::store::SchemaStore;

/// An index that is absent, or present more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexProblem {
    pub collection: String,
    pub index: String,
    pub found: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerifyReport {
    pub database: String,
    pub missing_collections: Vec<String>,
    pub index_problems: Vec<IndexProblem>,
    /// Collections in the database the schema does not name.
    pub unexpected_collections: Vec<String>,
}

impl VerifyReport {
    /// Every collection exists and carries exactly one of each declared index.
    /// Extra collections do not make a schema incomplete.
    pub fn is_complete(&self) -> bool {
        self.missing_collections.is_empty() && self.index_problems.is_empty()
    }
}

pub async fn verify<S>(store: &S, schema: &Schema) -> Result<VerifyReport, InitError>
where
    S: SchemaStore + ?Sized,
{
    store.ping().await.map_err(|source| InitError::Unreachable {
        database: store.database_name().to_string(),
        source,
    })?;

    let present = store
        .list_collection_names()
        .await
        .map_err(|source| InitError::Inspect {
            target: format!("collections of '{}'", schema.database),
            source,
        })?;

    let mut report = VerifyReport {
        database: schema.database.to_string(),
        unexpected_collections: present
            .iter()
            .filter(|name| schema.collection(name).is_none())
            .cloned()
            .collect(),
        ..VerifyReport::default()
    };

    for spec in &schema.collections {
        if !present.iter().any(|name| name == spec.name) {
            tracing::warn!(collection = spec.name, "collection missing");
            report.missing_collections.push(spec.name.to_string());
            continue;
        }

        let indexes = store
            .list_indexes(spec.name)
            .await
            .map_err(|source| InitError::Inspect {
                target: format!("indexes of '{}'", spec.name),
                source,
            })?;

        for index in &spec.indexes {
            let found = indexes.iter().filter(|info| info.matches(index)).count();
            if found != 1 {
                tracing::warn!(
                    collection = spec.name,
                    index = %index.default_name(),
                    found,
                    "index count mismatch"
                );
                report.index_problems.push(IndexProblem {
                    collection: spec.name.to_string(),
                    index: index.default_name(),
                    found,
                });
            }
        }
    }

    Ok(report)
}
