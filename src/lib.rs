use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod encoder;
pub mod errors;
pub mod expiry;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod share;
pub mod storage;

use handlers::AppState;

pub fn create_app(state: AppState) -> Router {
    // Leave headroom above the content ceiling for multipart framing.
    let body_limit = state.config.max_content_file_bytes as usize + 1024 * 1024;
    let files_dir = state.config.storage_dir.clone();

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route(
            "/api/v1/qr",
            post(handlers::qr::generate).get(handlers::qr::list),
        )
        .route("/api/v1/qr/:id", delete(handlers::qr::remove))
        .route("/api/v1/qr/:id/notes", patch(handlers::qr::update_notes))
        .route("/api/v1/qr/:id/share", get(handlers::qr::share_links))
        .route(
            "/api/v1/profile",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        .route(
            "/api/v1/profile/avatar",
            post(handlers::profile::upload_avatar),
        )
        .route(
            "/api/v1/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .nest_service("/files", ServeDir::new(files_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
