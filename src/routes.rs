// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    routing::{MethodRouter, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers::notify, state::AppState};

/// Assembles the application router.
///
/// * Mounts the notification endpoint under its legacy script path and under `/api/notify`.
/// * Methods other than POST and OPTIONS get a JSON 405.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let notify_route: MethodRouter<AppState> = post(notify::submit_report)
        .options(notify::preflight)
        .fallback(notify::method_not_allowed);

    Router::new()
        .route("/sendmail.php", notify_route.clone())
        .route("/api/notify", notify_route)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
