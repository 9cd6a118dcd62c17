//! Student habit journal service.
//!
//! Students record entries against seven daily habits; an admin view
//! monitors them, sets teacher/parent validation and exports CSV or a
//! printable report.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod export;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;

use auth::gate::{AdminGate, TokenGate};
use config::Config;
use store::EntryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntryStore>,
    pub config: Arc<Config>,
    pub admin_gate: Arc<dyn AdminGate>,
}

impl AppState {
    /// State with the token gate configured from `config`.
    pub fn new(store: Arc<dyn EntryStore>, config: Config) -> Self {
        let admin_gate = Arc::new(TokenGate::new(config.admin_api_token.clone()));
        Self {
            store,
            config: Arc::new(config),
            admin_gate,
        }
    }

    pub fn with_admin_gate(mut self, gate: Arc<dyn AdminGate>) -> Self {
        self.admin_gate = gate;
        self
    }
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let student_routes = Router::new()
        .route(
            "/api/entries",
            get(handlers::entries::list_entries).post(handlers::entries::create_entry),
        )
        .route(
            "/api/entries/:id",
            get(handlers::entries::get_entry)
                .put(handlers::entries::update_entry)
                .delete(handlers::entries::delete_entry),
        )
        .layer(middleware::from_fn(auth::middleware::require_student));

    let admin_routes = Router::new()
        .route("/api/admin/entries", get(handlers::admin::list_entries))
        .route(
            "/api/admin/entries/:id/validation",
            put(handlers::admin::set_validation),
        )
        .route("/api/admin/export/csv", get(handlers::exports::export_csv))
        .route(
            "/api/admin/export/print",
            get(handlers::exports::export_printable),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(student_routes)
        .merge(admin_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(&state.config)),
        )
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(auth::middleware::STUDENT_ID_HEADER),
        ])
        .allow_credentials(true)
}
