//! End-to-end tests driving the router against an in-memory database.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use event_desk::{
    api::{self, AppState},
    config::{AppConfig, database},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let db = database::connect("sqlite::memory:").await.unwrap();
    database::create_tables(&db).await.unwrap();
    api::router(AppState::new(db, AppConfig::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn wedding() -> Value {
    json!({
        "eventType": "Wedding",
        "eventDate": "2030-01-01",
        "budget": 5000,
        "venue": "Hall A"
    })
}

fn jane(assigned_events: Value) -> Value {
    json!({
        "fullName": "Jane Doe",
        "phoneNumber": "1234567890",
        "email": "jane@x.com",
        "role": "Manager",
        "assignedEvents": assigned_events,
        "salary": 50000,
        "joiningDate": "2025-01-01"
    })
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_event_lifecycle() {
    let app = app().await;

    let (status, created) = send(&app, "POST", "/api/events", Some(wedding())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["eventType"], "Wedding");
    assert_eq!(created["eventDate"], "2030-01-01");
    let id = created["id"].as_i64().unwrap();

    let (status, listed) = send(&app, "GET", "/api/events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created]));

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/events/{id}"),
        Some(json!({"budget": 7500})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["budget"], 7500.0);
    assert_eq!(updated["venue"], "Hall A");

    let (status, body) = send(&app, "DELETE", &format!("/api/events/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Event deleted successfully"}));

    let (status, body) = send(&app, "GET", &format!("/api/events/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Event not found"}));
}

#[tokio::test]
async fn test_invalid_event_is_rejected_with_field_errors() {
    let app = app().await;

    let mut body = wedding();
    body["budget"] = json!(0);
    let (status, response) = send(&app, "POST", "/api/events", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response,
        json!({"errors": {"budget": "Budget must be a positive number"}})
    );

    let (_, listed) = send(&app, "GET", "/api/events", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_malformed_body_and_ids() {
    let app = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/events")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/vendors/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/staff/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_staff_assignments_resolve_and_dangle() {
    let app = app().await;

    let (_, event) = send(&app, "POST", "/api/events", Some(wedding())).await;
    let event_id = event["id"].as_i64().unwrap();

    let (status, created) = send(&app, "POST", "/api/staff", Some(jane(json!([event_id])))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["assignedEvents"], json!([event]));
    let staff_id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, "GET", &format!("/api/staff/{staff_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["assignedEvents"][0]["eventType"], "Wedding");

    send(&app, "DELETE", &format!("/api/events/{event_id}"), None).await;

    let (status, fetched) = send(&app, "GET", &format!("/api/staff/{staff_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        fetched["assignedEvents"],
        json!([{"id": event_id, "unresolved": true}])
    );
}

#[tokio::test]
async fn test_staff_with_unknown_event_is_rejected() {
    let app = app().await;

    let (status, body) = send(&app, "POST", "/api/staff", Some(jane(json!([404])))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["assignedEvents"], "Unknown event id(s): 404");

    let mut short_phone = jane(json!([]));
    short_phone["phoneNumber"] = json!("12345");
    let (status, body) = send(&app, "POST", "/api/staff", Some(short_phone)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["phoneNumber"], "Phone number must be 10 digits");
}

#[tokio::test]
async fn test_vendor_duplicate_email_and_legacy_service_type() {
    let app = app().await;

    let vendor = json!({
        "vendorName": "Acme Supplies",
        "contactPerson": "Wile E. Coyote",
        "contactNumber": "5550101",
        "serviceType": "Delivery, Repair",
        "email": "ops@acme.com",
        "paymentTerms": "Prepaid",
        "pricingDetails": "Flat fee",
        "address": "1 Desert Road",
        "contactName": "Wile"
    });

    let (status, created) = send(&app, "POST", "/api/vendors", Some(vendor.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["serviceType"], json!(["Delivery", "Repair"]));

    let (status, body) = send(&app, "POST", "/api/vendors", Some(vendor)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");

    let (status, listed) = send(&app, "GET", "/api/vendors?search=acme", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_staff_update_with_unknown_event_is_rejected() {
    let app = app().await;

    let (_, event) = send(&app, "POST", "/api/events", Some(wedding())).await;
    let event_id = event["id"].as_i64().unwrap();
    let (_, created) = send(&app, "POST", "/api/staff", Some(jane(json!([event_id])))).await;
    let staff_id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/staff/{staff_id}"),
        Some(json!({"assignedEvents": [event_id, 404]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["assignedEvents"], "Unknown event id(s): 404");

    let (_, fetched) = send(&app, "GET", &format!("/api/staff/{staff_id}"), None).await;
    assert_eq!(fetched["assignedEvents"], json!([event]));

    let (status, _) = send(&app, "PUT", "/api/vendors/999", Some(json!({"address": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_reads_back_exactly_as_posted() {
    let app = app().await;

    let posted = json!({
        "eventType": " Wedding ",
        "eventDate": "2030-01-01",
        "budget": 5000.0,
        "venue": "Hall A"
    });
    let (status, created) = send(&app, "POST", "/api/events", Some(posted.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_i64().unwrap();
    let (_, fetched) = send(&app, "GET", &format!("/api/events/{id}"), None).await;
    let mut expected = posted;
    expected["id"] = json!(id);
    assert_eq!(fetched, expected);

    let mut short_date = wedding();
    short_date["eventDate"] = json!("2030-1-1");
    let (status, body) = send(&app, "POST", "/api/events", Some(short_date)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["eventDate"].is_string());
}

#[tokio::test]
async fn test_search_wildcards_match_literally() {
    let app = app().await;

    send(&app, "POST", "/api/events", Some(wedding())).await;
    let mut gala = wedding();
    gala["eventType"] = json!("Gala");
    send(&app, "POST", "/api/events", Some(gala)).await;

    let (_, listed) = send(&app, "GET", "/api/events?search=%25", None).await;
    assert_eq!(listed, json!([]));
    let (_, listed) = send(&app, "GET", "/api/events?search=_", None).await;
    assert_eq!(listed, json!([]));
    let (_, listed) = send(&app, "GET", "/api/events?search=wed", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}
