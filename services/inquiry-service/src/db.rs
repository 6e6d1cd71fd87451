use async_trait::async_trait;
use mongodb::{
    bson::{self, Bson, DateTime, Document},
    options::ClientOptions,
    Client, Database,
};
use serde::Serialize;
use std::time::Duration;

use crate::config::DatabaseConfig;

const APP_NAME: &str = "inquiry-service";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),
    #[error("encode document failed: {0}")]
    Encode(#[from] bson::ser::Error),
    #[error("{0}")]
    Operation(String),
}

/// The document-store operations the service needs. Implementations must be
/// safe to share across concurrent requests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts `document` into `collection` and returns the generated id.
    async fn insert_document(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<String, StoreError>;

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError>;
}

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Builds a pooled client for `url`. The driver connects lazily, so an
    /// unreachable server surfaces on first use, not here.
    pub async fn connect(
        url: &str,
        name: &str,
        server_selection_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(url).await?;
        options.server_selection_timeout = Some(server_selection_timeout);
        if options.app_name.is_none() {
            options.app_name = Some(APP_NAME.to_string());
        }
        let client = Client::with_options(options)?;
        Ok(Self {
            db: client.database(name),
        })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_document(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<String, StoreError> {
        let result = self
            .db
            .collection::<Document>(collection)
            .insert_one(document)
            .await?;
        match result.inserted_id {
            Bson::ObjectId(id) => Ok(id.to_hex()),
            Bson::String(id) if !id.is_empty() => Ok(id),
            Bson::Null | Bson::String(_) => Err(StoreError::Operation(format!(
                "insert into {collection} returned no identifier"
            ))),
            other => Ok(other.to_string()),
        }
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.db.list_collection_names().await?)
    }
}

/// Resolves the store handle from the environment-derived settings. Missing
/// settings or a malformed URL leave the service running without storage.
pub async fn connect(config: &DatabaseConfig) -> Option<MongoStore> {
    let (Some(url), Some(name)) = (config.url.as_deref(), config.name.as_deref()) else {
        tracing::warn!(
            url_set = config.url_set(),
            name_set = config.name_set(),
            "database settings incomplete, storage disabled"
        );
        return None;
    };

    match MongoStore::connect(url, name, config.server_selection_timeout).await {
        Ok(store) => {
            tracing::info!(database = name, "document store configured");
            Some(store)
        }
        Err(err) => {
            tracing::warn!(error = %err, "document store init failed, storage disabled");
            None
        }
    }
}

/// Encodes `value` as a new document stamped with creation metadata.
pub fn stamped_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    let mut document = bson::to_document(value)?;
    let now = DateTime::now();
    document.insert("created_at", now);
    document.insert("updated_at", now);
    Ok(document)
}
