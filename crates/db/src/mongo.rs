//! [`SchemaStore`] backed by the official MongoDB driver.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{ClientOptions, IndexOptions},
    Client, Database, IndexModel,
};
use scoring_kernel::{settings::DatabaseSettings, IndexSpec};

use crate::error::StoreError;
use crate::store::{IndexInfo, SchemaStore};

/// MongoDB database handle used for catalog operations.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Build a client from `settings` and select `database`.
    ///
    /// The driver connects lazily; call [`SchemaStore::ping`] to find out
    /// whether the server is reachable.
    #[tracing::instrument(skip(settings), fields(app = %settings.app_name))]
    pub async fn connect(settings: &DatabaseSettings, database: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&settings.uri).await?;
        options.app_name = Some(settings.app_name.clone());
        options.connect_timeout = Some(Duration::from_millis(settings.connect_timeout_ms));
        options.server_selection_timeout =
            Some(Duration::from_millis(settings.server_selection_timeout_ms));

        let client = Client::with_options(options)?;
        tracing::debug!("mongodb client configured");

        Ok(Self::new(client.database(database)))
    }

    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

#[async_trait]
impl SchemaStore for MongoStore {
    fn database_name(&self) -> &str {
        self.database.name()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn create_collection(&self, name: &str) -> Result<(), StoreError> {
        self.database.create_collection(name).await?;
        Ok(())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        let names = self.database.list_collection_names().await?;
        Ok(names
            .into_iter()
            .filter(|name| !name.starts_with("system."))
            .collect())
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<(), StoreError> {
        let mut keys = Document::new();
        keys.insert(index.field, index.direction.as_i32());

        let model = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(index.unique).build())
            .build();

        self.database
            .collection::<Document>(collection)
            .create_index(model)
            .await?;
        Ok(())
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexInfo>, StoreError> {
        let models: Vec<IndexModel> = self
            .database
            .collection::<Document>(collection)
            .list_indexes()
            .await?
            .try_collect()
            .await?;

        Ok(models.into_iter().map(index_info).collect())
    }
}

fn index_info(model: IndexModel) -> IndexInfo {
    let (name, unique) = match &model.options {
        Some(options) => (
            options.name.clone().unwrap_or_default(),
            options.unique.unwrap_or(false),
        ),
        None => (String::new(), false),
    };

    let keys = model
        .keys
        .iter()
        .map(|(field, value)| (field.clone(), key_direction(value)))
        .collect();

    IndexInfo { name, keys, unique }
}

/// Numeric key direction; special index types (`"text"`, `"2dsphere"`) map to 0.
fn key_direction(value: &Bson) -> i32 {
    match value {
        Bson::Int32(n) => *n,
        Bson::Int64(n) => (*n).clamp(-1, 1) as i32,
        Bson::Double(f) => f.signum() as i32,
        _ => 0,
    }
}
