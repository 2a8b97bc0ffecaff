pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    clients::{BitbucketClient, CopilotClient, FairwindsClient},
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    bitbucket: Option<Arc<BitbucketClient>>,
    copilot: Option<Arc<CopilotClient>>,
    fairwinds: Option<Arc<FairwindsClient>>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, bitbucket, copilot, fairwinds, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        // API routes
        .nest("/api", api_routes())
        // Resolve bearer tokens to identities; handlers enforce permissions.
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth::attach_identity,
        ))
        .with_state(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/announcements", announcement_routes())
        .nest("/categories", category_routes())
        .nest("/tags", tag_routes())
        .nest("/feedback", feedback_routes())
        .route("/pull-requests", get(handlers::pull_requests::list))
        .nest("/copilot", copilot_routes())
        .nest("/insights", insights_routes())
}

fn announcement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::announcements::list))
        .route("/", post(handlers::announcements::create))
        .route("/:id", get(handlers::announcements::get))
        .route("/:id", put(handlers::announcements::update))
        .route("/:id", delete(handlers::announcements::delete))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::categories::list))
        .route("/", post(handlers::categories::create))
        .route("/:slug", delete(handlers::categories::delete))
}

fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::tags::list))
        .route("/", post(handlers::tags::create))
        .route("/:slug", delete(handlers::tags::delete))
}

fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::feedback::list))
        .route("/", post(handlers::feedback::create))
        .route("/:id", get(handlers::feedback::get))
}

fn copilot_routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(handlers::copilot::metrics))
        .route("/metrics/daily", get(handlers::copilot::daily))
}

fn insights_routes() -> Router<AppState> {
    Router::new()
        .route("/vulnerabilities", get(handlers::fairwinds::vulnerabilities))
        .route("/costs", get(handlers::fairwinds::costs))
}
