/// HTTP control surface for status checks and manual triggering
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::Data;
use crate::notifier::Notifier;
use crate::schedule::ScheduleManager;

/// State shared across all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<Data>,
    pub notifier: Arc<Notifier>,
    pub manager: Arc<ScheduleManager>,
}

/// Create the application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/status", get(handlers::status))
        .route("/time", get(handlers::time_info))
        .route("/messages/test", post(handlers::send_test_message))
        .route("/messages", post(handlers::send_message))
        .route("/messages/schedule", post(handlers::schedule_message))
        .route("/config", put(handlers::update_config))
        .route("/timetable/:day", put(handlers::update_timetable_day))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the control surface until the process exits
pub async fn serve(port: u16, state: AppState) -> Result<(), std::io::Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on port {}", port);
    axum::serve(listener, create_router(state)).await
}
