mod app;
mod config;
mod db;
mod handlers;
mod models;
mod service;
mod state;
mod validation;

use std::sync::Arc;

use resplend_common::{bind_listener, init_tracing, shutdown_signal};

use crate::config::ServiceConfig;
use crate::db::DocumentStore;
use crate::service::InquiryService;
use crate::state::AppState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let _guards = init_tracing("inquiry-service");

    let config = ServiceConfig::from_env();
    // Startup continues without storage; /test and / stay available.
    let store = db::connect(&config.database)
        .await
        .map(|store| Arc::new(store) as Arc<dyn DocumentStore>);
    let inquiries = InquiryService::new(store);
    tracing::info!(
        service = config.service_name.as_str(),
        storage = inquiries.storage_available(),
        "inquiry service starting"
    );

    let port = config.port;
    let app = app::build_router(AppState::new(config, inquiries));
    let listener = bind_listener(port).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
