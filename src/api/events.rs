use super::{AppState, ListQuery, deleted, parse_id, read_body};
use crate::{
    core::event::{self, KIND},
    entities::EventModel,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;

/// `POST /api/events`
pub async fn create_event(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<EventModel>)> {
    let body = read_body(body)?;
    let created = event::create_event(&state.db, &body, state.config.event_rules()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/events`
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<EventModel>>> {
    let events = event::get_all_events(&state.db, query.search.as_deref()).await?;
    Ok(Json(events))
}

/// `GET /api/events/{id}`
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventModel>> {
    let event_id = parse_id(KIND, &id)?;
    Ok(Json(event::get_event_by_id(&state.db, event_id).await?))
}

/// `PUT /api/events/{id}`
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<EventModel>> {
    let event_id = parse_id(KIND, &id)?;
    let body = read_body(body)?;
    let updated =
        event::update_event(&state.db, event_id, &body, state.config.event_rules()).await?;
    Ok(Json(updated))
}

/// `DELETE /api/events/{id}`
///
/// Staff assignments that name this event are left in place and read back as
/// unresolved markers.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let event_id = parse_id(KIND, &id)?;
    event::delete_event(&state.db, event_id).await?;
    Ok(deleted(KIND))
}
