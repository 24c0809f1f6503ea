use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    auth::inspector_auth,
    handlers::{
        inspector::{
            alerts_handler, get_log_handler, health_handler, list_logs_handler,
            providers_handler, stats_handler,
        },
        webhooks::{intake_handler, verification_handler},
    },
    state::AppState,
};

pub fn build_router(state: AppState) -> Router {
    let inspector = Router::new()
        .route("/logs", get(list_logs_handler))
        .route("/logs/:log_id", get(get_log_handler))
        .route("/stats", get(stats_handler))
        .route("/alerts", get(alerts_handler))
        .route("/providers", get(providers_handler))
        .layer(middleware::from_fn_with_state(state.clone(), inspector_auth));

    Router::new()
        .route("/", get(health_handler))
        .route(
            "/webhooks/:provider",
            get(verification_handler).post(intake_handler),
        )
        .nest("/api", inspector)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
