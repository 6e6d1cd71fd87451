use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{create_inquiry, root, test_database};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/test", get(test_database))
        .route("/inquiry", post(create_inquiry))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Wildcards are not allowed together with credentials, so echo the request.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
