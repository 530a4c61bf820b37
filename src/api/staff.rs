use super::{AppState, ListQuery, deleted, parse_id, read_body};
use crate::{
    core::staff::{self, KIND, StaffRecord},
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;

/// `POST /api/staff`
pub async fn create_staff(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<StaffRecord>)> {
    let body = read_body(body)?;
    let created = staff::create_staff(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/staff`, with assigned events resolved
pub async fn list_staff(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<StaffRecord>>> {
    let members = staff::get_all_staff(&state.db, query.search.as_deref()).await?;
    Ok(Json(members))
}

/// `GET /api/staff/{id}`, with assigned events resolved
pub async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StaffRecord>> {
    let staff_id = parse_id(KIND, &id)?;
    Ok(Json(staff::get_staff_by_id(&state.db, staff_id).await?))
}

/// `PUT /api/staff/{id}`
pub async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<StaffRecord>> {
    let staff_id = parse_id(KIND, &id)?;
    let body = read_body(body)?;
    Ok(Json(staff::update_staff(&state.db, staff_id, &body).await?))
}

/// `DELETE /api/staff/{id}`
pub async fn delete_staff(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let staff_id = parse_id(KIND, &id)?;
    staff::delete_staff(&state.db, staff_id).await?;
    Ok(deleted(KIND))
}
