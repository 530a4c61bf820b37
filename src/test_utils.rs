//! Shared test utilities for `EventDesk`.
//!
//! This module provides common helper functions for setting up test databases,
//! building request bodies with sensible defaults, and creating test records.

use crate::{
    core::{
        event::{self, EventRules},
        staff::{self, StaffRecord},
        validation::FieldErrors,
    },
    entities,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::fmt::Debug;

/// Routes tracing output through the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A valid event body.
///
/// # Defaults
/// * `eventDate`: "2030-01-01"
/// * `budget`: 5000
/// * `venue`: "Hall A"
pub fn event_body(event_type: &str) -> Value {
    json!({
        "eventType": event_type,
        "eventDate": "2030-01-01",
        "budget": 5000,
        "venue": "Hall A",
    })
}

/// A valid vendor body for "Acme Supplies" with the given email.
pub fn vendor_body(email: &str) -> Value {
    json!({
        "vendorName": "Acme Supplies",
        "contactPerson": "Wile E. Coyote",
        "contactNumber": "5550101",
        "serviceType": ["Delivery", "Installation"],
        "email": email,
        "paymentTerms": "Net 30",
        "pricingDetails": "Flat fee per delivery",
        "address": "1 Desert Road",
        "contactName": "Wile",
    })
}

/// A valid staff body for "Jane Doe" with the given email and assignments.
///
/// # Defaults
/// * `phoneNumber`: "1234567890"
/// * `role`: "Manager"
/// * `salary`: 50000
/// * `joiningDate`: "2025-01-01"
pub fn staff_body(email: &str, assigned_events: &[i64]) -> Value {
    json!({
        "fullName": "Jane Doe",
        "phoneNumber": "1234567890",
        "email": email,
        "role": "Manager",
        "assignedEvents": assigned_events,
        "salary": 50000,
        "joiningDate": "2025-01-01",
    })
}

/// Creates a test event with the defaults of [`event_body`].
pub async fn create_test_event(
    db: &DatabaseConnection,
    event_type: &str,
) -> Result<entities::event::Model> {
    event::create_event(db, &event_body(event_type), EventRules::default()).await
}

/// Creates a test staff member with the defaults of [`staff_body`].
pub async fn create_test_staff(
    db: &DatabaseConnection,
    email: &str,
    assigned_events: &[i64],
) -> Result<StaffRecord> {
    staff::create_staff(db, &staff_body(email, assigned_events)).await
}

/// Sets up a complete test environment with one "Wedding" event.
/// Returns (db, event) for common test scenarios.
pub async fn setup_with_event() -> Result<(DatabaseConnection, entities::event::Model)> {
    let db = setup_test_db().await?;
    let event = create_test_event(&db, "Wedding").await?;
    Ok((db, event))
}

/// Unwraps the field errors of a rejected write.
///
/// # Panics
/// Panics if `result` is anything other than a validation error.
pub fn expect_field_errors<T: Debug>(result: Result<T>) -> FieldErrors {
    match result {
        Err(Error::Validation { errors }) => errors,
        other => panic!("expected a validation error, got {other:?}"),
    }
}
