use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::models::{DiagnosticsReport, FieldError, InquiryResponse, RootResponse};
use crate::service::ServiceError;
use crate::state::AppState;
use crate::validation::ValidationError;

pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} backend is running", state.config.service_name),
    })
}

pub async fn test_database(State(state): State<AppState>) -> Json<DiagnosticsReport> {
    let database = &state.config.database;
    let report = state
        .inquiries
        .diagnostics(database.url_set(), database.name_set())
        .await;
    Json(report)
}

pub async fn create_inquiry(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let result = match payload {
        Ok(Json(payload)) => state.inquiries.submit(&payload).await,
        Err(rejection) => Err(unreadable_body(&rejection)),
    };

    match result {
        Ok(id) => (StatusCode::OK, Json(InquiryResponse { status: "ok", id })).into_response(),
        Err(err) => (err.status, Json(err.body)).into_response(),
    }
}

fn unreadable_body(rejection: &JsonRejection) -> ServiceError {
    tracing::info!(reason = %rejection.body_text(), "inquiry body unreadable");
    ServiceError::from(ValidationError {
        errors: vec![FieldError::new(
            "body",
            "json_invalid",
            rejection.body_text(),
        )],
    })
}
