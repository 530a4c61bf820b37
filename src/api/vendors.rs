use super::{AppState, ListQuery, deleted, parse_id, read_body};
use crate::{
    core::vendor::{self, KIND, VendorRecord},
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;

/// `POST /api/vendors`
pub async fn create_vendor(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<VendorRecord>)> {
    let body = read_body(body)?;
    let created = vendor::create_vendor(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/vendors`
pub async fn list_vendors(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<VendorRecord>>> {
    let vendors = vendor::get_all_vendors(&state.db, query.search.as_deref()).await?;
    Ok(Json(vendors))
}

/// `GET /api/vendors/{id}`
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VendorRecord>> {
    let vendor_id = parse_id(KIND, &id)?;
    Ok(Json(vendor::get_vendor_by_id(&state.db, vendor_id).await?))
}

/// `PUT /api/vendors/{id}`
pub async fn update_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<VendorRecord>> {
    let vendor_id = parse_id(KIND, &id)?;
    let body = read_body(body)?;
    Ok(Json(vendor::update_vendor(&state.db, vendor_id, &body).await?))
}

/// `DELETE /api/vendors/{id}`
pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let vendor_id = parse_id(KIND, &id)?;
    vendor::delete_vendor(&state.db, vendor_id).await?;
    Ok(deleted(KIND))
}
