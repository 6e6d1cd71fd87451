use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;

use crate::db::{self, DocumentStore, StoreError};
use crate::models::{DiagnosticsReport, ErrorDetail, ErrorResponse, Inquiry};
use crate::validation::{self, ValidationError};

pub const INQUIRY_COLLECTION: &str = "inquiry";
const MAX_LISTED_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 80;

#[derive(Debug)]
pub struct ServiceError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ServiceError {
    fn message(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            body: ErrorResponse {
                detail: ErrorDetail::Message(message),
            },
        }
    }

    pub fn storage_unavailable() -> Self {
        Self::message(StatusCode::SERVICE_UNAVAILABLE, "Database not available")
    }

    pub fn storage_failed() -> Self {
        Self::message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store inquiry")
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorResponse {
                detail: ErrorDetail::Fields(err.errors),
            },
        }
    }
}

/// Validates and stores inquiries against an optional document store.
///
/// The store is fixed at construction; `None` means the service runs without
/// storage and every persist attempt reports it as unavailable.
#[derive(Clone)]
pub struct InquiryService {
    store: Option<Arc<dyn DocumentStore>>,
}

impl InquiryService {
    pub fn new(store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { store }
    }

    pub fn storage_available(&self) -> bool {
        self.store.is_some()
    }

    pub fn validate(&self, payload: &Value) -> Result<Inquiry, ValidationError> {
        validation::validate(payload)
    }

    pub async fn persist(&self, inquiry: &Inquiry) -> Result<String, ServiceError> {
        let Some(store) = &self.store else {
            return Err(ServiceError::storage_unavailable());
        };

        let stored = match db::stamped_document(inquiry) {
            Ok(document) => store.insert_document(INQUIRY_COLLECTION, document).await,
            Err(err) => Err(err),
        };
        match stored {
            Ok(id) => {
                tracing::info!(id = id.as_str(), "inquiry stored");
                Ok(id)
            }
            Err(err) => {
                tracing::error!(error = %err, "inquiry insert failed");
                Err(ServiceError::storage_failed())
            }
        }
    }

    /// Runs validate then persist; nothing is written unless validation passes.
    pub async fn submit(&self, payload: &Value) -> Result<String, ServiceError> {
        let inquiry = self.validate(payload).map_err(|err| {
            tracing::info!(fields = ?err.fields(), "inquiry rejected");
            ServiceError::from(err)
        })?;
        self.persist(&inquiry).await
    }

    /// Probes the store for the diagnostic endpoint. Store errors become part
    /// of the report instead of failing the call.
    pub async fn diagnostics(&self, url_set: bool, name_set: bool) -> DiagnosticsReport {
        let mut report = DiagnosticsReport {
            backend: "✅ Running",
            database: "❌ Not Available".to_string(),
            database_url: set_label(url_set),
            database_name: set_label(name_set),
            connection_status: "Not Connected",
            collections: Vec::new(),
        };

        let Some(store) = &self.store else {
            report.database = "⚠️ Available but not initialized".to_string();
            return report;
        };

        report.database = "✅ Available".to_string();
        match store.list_collection_names().await {
            Ok(mut names) => {
                names.truncate(MAX_LISTED_COLLECTIONS);
                report.collections = names;
                report.connection_status = "Connected";
                report.database = "✅ Connected & Working".to_string();
            }
            Err(err) => {
                tracing::warn!(error = %err, "collection listing failed");
                report.database = format!("⚠️ Connected but Error: {}", truncate(&err));
            }
        }
        report
    }
}

fn set_label(set: bool) -> &'static str {
    if set {
        "✅ Set"
    } else {
        "❌ Not Set"
    }
}

fn truncate(err: &StoreError) -> String {
    err.to_string().chars().take(MAX_ERROR_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use serde_json::json;
    use std::collections::HashSet;

    fn service_with(store: Arc<MemoryStore>) -> InquiryService {
        let store: Arc<dyn DocumentStore> = store;
        InquiryService::new(Some(store))
    }

    fn ada() -> Value {
        json!({"name": "Ada", "email": "ada@example.com", "message": "hello"})
    }

    #[tokio::test]
    async fn persists_and_round_trips() {
        let store = Arc::new(MemoryStore::default());
        let service = service_with(store.clone());

        let id = service.submit(&ada()).await.unwrap();
        assert!(!id.is_empty());

        let documents = store.documents(INQUIRY_COLLECTION);
        assert_eq!(documents.len(), 1);
        let stored = &documents[0];
        assert_eq!(stored.get_object_id("_id").unwrap().to_hex(), id);
        assert_eq!(stored.get_str("name").unwrap(), "Ada");
        assert_eq!(stored.get_str("email").unwrap(), "ada@example.com");
        assert_eq!(stored.get_str("message").unwrap(), "hello");
        assert!(stored.get_datetime("created_at").is_ok());
        assert!(!stored.contains_key("company"));
    }

    #[tokio::test]
    async fn invalid_payload_writes_nothing() {
        let store = Arc::new(MemoryStore::default());
        let service = service_with(store.clone());

        let err = service
            .submit(&json!({"email": "ada@example.com", "message": "hello"}))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(store.documents(INQUIRY_COLLECTION).is_empty());
    }

    #[tokio::test]
    async fn persist_without_store_is_unavailable() {
        let service = InquiryService::new(None);
        let inquiry = service.validate(&ada()).unwrap();

        let err = service.persist(&inquiry).await.unwrap_err();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(matches!(
            err.body.detail,
            ErrorDetail::Message("Database not available")
        ));
    }

    #[tokio::test]
    async fn insert_failure_is_internal_error() {
        let service = service_with(Arc::new(MemoryStore::failing("connection reset")));

        let err = service.submit(&ada()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn concurrent_submissions_get_distinct_ids() {
        let store = Arc::new(MemoryStore::default());
        let service = service_with(store.clone());

        let mut tasks = tokio::task::JoinSet::new();
        for index in 0..32 {
            let service = service.clone();
            tasks.spawn(async move {
                let payload = json!({
                    "name": format!("Sender {index}"),
                    "email": format!("sender{index}@example.com"),
                    "message": "hello"
                });
                service.submit(&payload).await.ok()
            });
        }

        let mut ids = HashSet::new();
        while let Some(joined) = tasks.join_next().await {
            ids.insert(joined.unwrap().unwrap());
        }
        assert_eq!(ids.len(), 32);
        assert_eq!(store.documents(INQUIRY_COLLECTION).len(), 32);
    }

    #[tokio::test]
    async fn diagnostics_without_store() {
        let report = InquiryService::new(None).diagnostics(false, true).await;
        assert_eq!(report.database, "⚠️ Available but not initialized");
        assert_eq!(report.database_url, "❌ Not Set");
        assert_eq!(report.database_name, "✅ Set");
        assert_eq!(report.connection_status, "Not Connected");
        assert!(report.collections.is_empty());
    }

    #[tokio::test]
    async fn diagnostics_lists_at_most_ten_collections() {
        let names: Vec<String> = (0..12).map(|index| format!("c{index:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let service = service_with(Arc::new(MemoryStore::with_collections(&refs)));

        let report = service.diagnostics(true, true).await;
        assert_eq!(report.database, "✅ Connected & Working");
        assert_eq!(report.connection_status, "Connected");
        assert_eq!(report.collections.len(), 10);
        assert_eq!(report.collections[0], "c00");
    }

    #[tokio::test]
    async fn diagnostics_reports_store_errors() {
        let long_error = "x".repeat(200);
        let service = service_with(Arc::new(MemoryStore::failing(&long_error)));

        let report = service.diagnostics(true, true).await;
        assert_eq!(
            report.database,
            format!("⚠️ Connected but Error: {}", "x".repeat(80))
        );
        assert_eq!(report.connection_status, "Not Connected");
    }
}
