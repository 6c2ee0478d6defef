//! Proco Backend
//!
//! REST backend for the portfolio and course inquiry site, with a SQLite
//! document store, an in-memory fallback and live inquiry notifications.

mod api;
mod config;
mod db;
mod errors;
mod ids;
mod listener;
mod models;
mod notifications;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::{DocumentRepository, StorageAdapter, StoreMode};
use models::{CourseCatalog, Inquiry, Project};
use notifications::Notifier;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<StorageAdapter<Project>>,
    pub inquiries: Arc<StorageAdapter<Inquiry>>,
    pub courses: Arc<CourseCatalog>,
    pub notifier: Arc<Notifier>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build the state; `None` for `primary` means demo mode from the start.
    pub fn new(primary: Option<DocumentRepository>, config: Config) -> Self {
        Self {
            projects: Arc::new(StorageAdapter::new(primary.clone())),
            inquiries: Arc::new(StorageAdapter::new(primary)),
            courses: Arc::new(CourseCatalog::builtin()),
            notifier: Notifier::new(config.subscriber_buffer),
            config: Arc::new(config),
        }
    }

    /// Primary only while every collection is still on the primary store.
    pub fn store_mode(&self) -> StoreMode {
        if self.projects.is_connected() && self.inquiries.is_connected() {
            StoreMode::Database
        } else {
            StoreMode::Demo
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(config.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!config.log_json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting Proco Backend");

    // Connect to the primary store, or run on in-memory storage
    let primary = match db::init_database(&config.database_url, config.connect_timeout).await {
        Ok(pool) => {
            tracing::info!("Document store connected successfully");
            Some(DocumentRepository::new(pool))
        }
        Err(e) => {
            tracing::error!("Document store connection error: {}", e);
            tracing::warn!("Running in demo mode with in-memory storage");
            None
        }
    };

    let listener =
        listener::bind_with_fallback(config.host, config.port, config.port_attempts).await?;

    // Create application state
    let state = AppState::new(primary, config);

    // Build router
    let app = create_router(state);

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    let api_routes = Router::new()
        // Projects
        .route(
            "/projects",
            get(api::list_projects).post(api::create_project),
        )
        .route(
            "/projects/{id}",
            delete(api::delete_project).patch(api::publish_project),
        )
        // Inquiries
        .route(
            "/inquiries",
            get(api::list_inquiries).post(api::create_inquiry),
        )
        .route("/inquiries/{id}", delete(api::delete_inquiry))
        .route("/inquiries/{id}/status", patch(api::update_inquiry_status))
        // Courses
        .route("/courses", get(api::list_courses))
        .route("/courses/{id}", get(api::get_course))
        // Notifications
        .route(
            "/notifications/subscribe",
            get(api::subscribe_notifications),
        )
        // Health
        .route("/health", get(api::health_check));

    Router::new()
        .nest("/api", api_routes)
        .layer(CatchPanicLayer::custom(errors::panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the site: the configured origin, or whichever origin asks.
/// Credentials are allowed either way.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(AllowOrigin::exact(origin)),
        Some(Err(e)) => {
            tracing::warn!("Ignoring invalid CORS origin: {}", e);
            cors.allow_origin(AllowOrigin::mirror_request())
        }
        None => cors.allow_origin(AllowOrigin::mirror_request()),
    }
}
