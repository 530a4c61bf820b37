//! REST transport.
//!
//! Thin axum handlers over [`crate::core`]. Handlers decode the path, query and body,
//! call one store function, and render the result. Every failure is rendered by the
//! `IntoResponse` impl in [`error`].

use crate::{
    config::AppConfig,
    core::validation::FieldErrors,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Error to response mapping
pub mod error;
/// `/api/events` handlers
pub mod events;
/// `/api/staff` handlers
pub mod staff;
/// `/api/vendors` handlers
pub mod vendors;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool, shared rather than cloned
    pub db: Arc<DatabaseConnection>,
    /// Loaded configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Bundles a connection with its configuration.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }
}

/// Builds the full router with CORS and request tracing applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/api/vendors",
            get(vendors::list_vendors).post(vendors::create_vendor),
        )
        .route(
            "/api/vendors/{id}",
            get(vendors::get_vendor)
                .put(vendors::update_vendor)
                .delete(vendors::delete_vendor),
        )
        .route("/api/staff", get(staff::list_staff).post(staff::create_staff))
        .route(
            "/api/staff/{id}",
            get(staff::get_staff)
                .put(staff::update_staff)
                .delete(staff::delete_staff),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Query string accepted by the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive contains filter on the record's name field
    pub search: Option<String>,
}

/// Parses a path id. Anything that is not an integer cannot name a record.
pub(crate) fn parse_id(kind: &'static str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::not_found(kind, raw))
}

/// Turns a body rejection (bad JSON, wrong content type) into a field error.
pub(crate) fn read_body(body: std::result::Result<Json<Value>, JsonRejection>) -> Result<Value> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            let mut errors = FieldErrors::new();
            errors.add("body", rejection.body_text());
            Err(errors.into())
        }
    }
}

/// Confirmation body for a successful delete.
pub(crate) fn deleted(kind: &str) -> Json<Value> {
    Json(json!({ "message": format!("{kind} deleted successfully") }))
}
