//! Event business logic - Handles all event-related operations.
//!
//! Provides decoding, validation, and the create/read/update/delete operations for
//! events. Writes are validated in full before anything is persisted; an update
//! overlays the submitted fields on the stored record and validates the result.

use crate::{
    core::{
        payload::PayloadReader,
        search::{name_contains, search_term},
        validation::{self, FieldErrors},
    },
    entities::{Event, event},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Display name used in not-found errors and delete confirmations.
pub const KIND: &str = "Event";

/// Optional rules on top of the field rules every event must satisfy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventRules {
    /// Reject event dates earlier than today
    pub reject_past_dates: bool,
}

impl EventRules {
    fn earliest_date(self) -> Option<NaiveDate> {
        self.reject_past_dates
            .then(|| chrono::Local::now().date_naive())
    }
}

/// Event fields as submitted by a client. `None` means the field was absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPayload {
    /// `eventType`
    pub event_type: Option<String>,
    /// `eventDate`, unparsed
    pub event_date: Option<String>,
    /// `budget`
    pub budget: Option<f64>,
    /// `venue`
    pub venue: Option<String>,
}

impl EventPayload {
    /// Decodes a JSON body, failing on any field of the wrong type.
    pub fn decode(body: &Value) -> Result<Self> {
        let mut reader = PayloadReader::new(body)?;
        let payload = Self {
            event_type: reader.text("eventType", "Event type"),
            event_date: reader.text("eventDate", "Event date"),
            budget: reader.number("budget", "Budget"),
            venue: reader.text("venue", "Venue"),
        };
        reader.finish().into_result(payload)
    }

    fn from_model(model: &event::Model) -> Self {
        Self {
            event_type: Some(model.event_type.clone()),
            event_date: Some(model.event_date.format(validation::DATE_FORMAT).to_string()),
            budget: Some(model.budget),
            venue: Some(model.venue.clone()),
        }
    }

    /// Fields present in `patch` replace the ones in `self`.
    #[must_use]
    pub fn overlay(self, patch: Self) -> Self {
        Self {
            event_type: patch.event_type.or(self.event_type),
            event_date: patch.event_date.or(self.event_date),
            budget: patch.budget.or(self.budget),
            venue: patch.venue.or(self.venue),
        }
    }
}

/// A fully validated event, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    /// Non-blank event type
    pub event_type: String,
    /// Parsed event date
    pub event_date: NaiveDate,
    /// Positive budget
    pub budget: f64,
    /// Non-blank venue
    pub venue: String,
}

/// Applies the event field rules. `earliest` additionally bounds the event date.
pub fn validate_event(
    payload: &EventPayload,
    earliest: Option<NaiveDate>,
) -> std::result::Result<EventDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let event_type = validation::require_text(
        &mut errors,
        "eventType",
        "Event type",
        payload.event_type.as_deref(),
    );
    let event_date = validation::require_date(
        &mut errors,
        "eventDate",
        "Event date",
        payload.event_date.as_deref(),
    );
    if let (Some(date), Some(earliest)) = (event_date, earliest) {
        if date < earliest {
            errors.add("eventDate", "Event date cannot be in the past");
        }
    }
    let budget = validation::require_positive(&mut errors, "budget", "Budget", payload.budget);
    let venue = validation::require_text(&mut errors, "venue", "Venue", payload.venue.as_deref());

    match (event_type, event_date, budget, venue) {
        (Some(event_type), Some(event_date), Some(budget), Some(venue)) if errors.is_empty() => {
            Ok(EventDraft {
                event_type,
                event_date,
                budget,
                venue,
            })
        }
        _ => Err(errors),
    }
}

/// Creates an event from a JSON body.
///
/// # Errors
/// Returns a validation error if the body fails decoding or any field rule,
/// or a database error if the insert fails.
#[instrument(skip(db, body))]
pub async fn create_event(
    db: &DatabaseConnection,
    body: &Value,
    rules: EventRules,
) -> Result<event::Model> {
    let payload = EventPayload::decode(body)?;
    let draft = validate_event(&payload, rules.earliest_date())
        .inspect_err(|errors| warn!(%errors, "Rejected event"))?;

    let event = event::ActiveModel {
        event_type: Set(draft.event_type),
        event_date: Set(draft.event_date),
        budget: Set(draft.budget),
        venue: Set(draft.venue),
        ..Default::default()
    };
    let created = event.insert(db).await?;
    info!(event_id = created.id, "Event created");
    Ok(created)
}

/// Lists events in insertion order, optionally filtered by event type.
///
/// `search` matches any event whose type contains the term, ignoring ASCII case.
pub async fn get_all_events(
    db: &DatabaseConnection,
    search: Option<&str>,
) -> Result<Vec<event::Model>> {
    let mut query = Event::find().order_by_asc(event::Column::Id);
    if let Some(term) = search_term(search) {
        query = query.filter(name_contains(event::Column::EventType, term));
    }
    let events = query.all(db).await?;
    debug!(count = events.len(), "Listed events");
    Ok(events)
}

/// Retrieves an event by id.
///
/// # Errors
/// Returns `Error::NotFound` if no event has this id.
pub async fn get_event_by_id(db: &DatabaseConnection, event_id: i64) -> Result<event::Model> {
    Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(KIND, event_id))
}

/// Updates an event with a full or partial JSON body.
///
/// # Errors
/// Returns `Error::NotFound` for an unknown id and a validation error if the merged
/// record fails any rule; nothing is written in either case.
#[instrument(skip(db, body))]
pub async fn update_event(
    db: &DatabaseConnection,
    event_id: i64,
    body: &Value,
    rules: EventRules,
) -> Result<event::Model> {
    let existing = get_event_by_id(db, event_id).await?;
    let patch = EventPayload::decode(body)?;
    let merged = EventPayload::from_model(&existing).overlay(patch);
    let draft = validate_event(&merged, rules.earliest_date())
        .inspect_err(|errors| warn!(event_id, %errors, "Rejected event update"))?;

    let mut event: event::ActiveModel = existing.into();
    event.event_type = Set(draft.event_type);
    event.event_date = Set(draft.event_date);
    event.budget = Set(draft.budget);
    event.venue = Set(draft.venue);

    let updated = event.update(db).await?;
    info!(event_id, "Event updated");
    Ok(updated)
}

/// Deletes an event.
///
/// Staff records that reference the event keep the id; it reads back as unresolved.
///
/// # Errors
/// Returns `Error::NotFound` if no event has this id.
#[instrument(skip(db))]
pub async fn delete_event(db: &DatabaseConnection, event_id: i64) -> Result<()> {
    let result = Event::delete_by_id(event_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(KIND, event_id));
    }
    info!(event_id, "Event deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    #[test]
    fn test_validate_event_reports_every_field() {
        let errors = validate_event(&EventPayload::default(), None).unwrap_err();

        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("eventType"), Some("Event type is required"));
        assert_eq!(errors.get("eventDate"), Some("Event date is required"));
        assert_eq!(errors.get("budget"), Some("Budget is required"));
        assert_eq!(errors.get("venue"), Some("Venue is required"));
    }

    #[test]
    fn test_validate_event_past_date_rule() {
        let payload = EventPayload::decode(&event_body("Wedding")).unwrap();
        let payload = payload.overlay(EventPayload {
            event_date: Some("2020-06-01".to_string()),
            ..Default::default()
        });

        assert!(validate_event(&payload, None).is_ok());

        let earliest = NaiveDate::from_ymd_opt(2025, 1, 1);
        let errors = validate_event(&payload, earliest).unwrap_err();
        assert_eq!(errors.get("eventDate"), Some("Event date cannot be in the past"));
    }

    #[tokio::test]
    async fn test_create_event_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Non-positive budget
        let body = json!({"eventType": "Gala", "eventDate": "2030-01-01", "budget": 0, "venue": "Hall A"});
        let errors = expect_field_errors(create_event(&db, &body, EventRules::default()).await);
        assert_eq!(errors.get("budget"), Some("Budget must be a positive number"));

        // Unparseable date
        let body = json!({"eventType": "Gala", "eventDate": "soon", "budget": 10, "venue": "Hall A"});
        let errors = expect_field_errors(create_event(&db, &body, EventRules::default()).await);
        assert!(errors.contains("eventDate"));

        // Type mismatch fails decoding before the field rules run
        let body = json!({"eventType": "Gala", "budget": {"amount": 10}});
        let errors = expect_field_errors(create_event(&db, &body, EventRules::default()).await);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("budget"), Some("Budget must be a number"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_then_get_returns_payload_with_id() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_event(&db, &event_body("Wedding"), EventRules::default()).await?;
        let fetched = get_event_by_id(&db, created.id).await?;

        assert_eq!(fetched, created);
        assert_eq!(fetched.event_type, "Wedding");
        assert_eq!(fetched.event_date, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        assert_eq!(fetched.budget, 5000.0);
        assert_eq!(fetched.venue, "Hall A");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_event_accepts_numeric_strings() -> Result<()> {
        let db = setup_test_db().await?;

        let body = json!({
            "eventType": "Conference",
            "eventDate": "2031-03-04",
            "budget": "1250.50",
            "venue": "Main Hall"
        });
        let created = create_event(&db, &body, EventRules::default()).await?;

        assert_eq!(created.event_date, NaiveDate::from_ymd_opt(2031, 3, 4).unwrap());
        assert_eq!(created.budget, 1250.5);

        Ok(())
    }

    #[tokio::test]
    async fn test_created_event_reads_back_as_submitted() -> Result<()> {
        let db = setup_test_db().await?;

        let body = json!({
            "eventType": " Wedding ",
            "eventDate": "2030-01-01",
            "budget": 5000.0,
            "venue": "Hall A  "
        });
        let created = create_event(&db, &body, EventRules::default()).await?;
        let fetched = get_event_by_id(&db, created.id).await?;

        let mut expected = body;
        expected["id"] = json!(created.id);
        assert_eq!(serde_json::to_value(&fetched).unwrap(), expected);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_event_rejects_non_canonical_dates() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for date in ["2030-1-1", "2031-03-04T09:00:00Z", " 2030-01-01"] {
            let mut body = event_body("Wedding");
            body["eventDate"] = json!(date);
            let errors = expect_field_errors(create_event(&db, &body, EventRules::default()).await);
            assert_eq!(
                errors.get("eventDate"),
                Some("Event date must be a valid date (YYYY-MM-DD)")
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_events_with_search() -> Result<()> {
        let db = setup_test_db().await?;

        let wedding = create_test_event(&db, "Wedding").await?;
        let birthday = create_test_event(&db, "Birthday Party").await?;
        create_test_event(&db, "Conference").await?;

        let all = get_all_events(&db, None).await?;
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], wedding);
        assert_eq!(all[1], birthday);

        let matches = get_all_events(&db, Some("wed")).await?;
        assert_eq!(matches, vec![wedding]);

        let matches = get_all_events(&db, Some("PARTY")).await?;
        assert_eq!(matches, vec![birthday]);

        // Blank search term is ignored
        assert_eq!(get_all_events(&db, Some("  ")).await?.len(), 3);

        // Wildcards in the term match literally
        assert!(get_all_events(&db, Some("%")).await?.is_empty());
        assert!(get_all_events(&db, Some("_")).await?.is_empty());
        let discount = create_test_event(&db, "50% Off Sale").await?;
        assert_eq!(get_all_events(&db, Some("50%")).await?, vec![discount]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_event_partial() -> Result<()> {
        let (db, event) = setup_with_event().await?;

        let updated = update_event(
            &db,
            event.id,
            &json!({"budget": 7500, "id": 999}),
            EventRules::default(),
        )
        .await?;

        assert_eq!(updated.id, event.id);
        assert_eq!(updated.budget, 7500.0);
        assert_eq!(updated.event_type, event.event_type);
        assert_eq!(updated.venue, event.venue);

        let fetched = get_event_by_id(&db, event.id).await?;
        assert_eq!(fetched, updated);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_event_rejects_without_writing() -> Result<()> {
        let (db, event) = setup_with_event().await?;

        let result = update_event(
            &db,
            event.id,
            &json!({"venue": "", "budget": 9000}),
            EventRules::default(),
        )
        .await;
        let errors = expect_field_errors(result);
        assert_eq!(errors.get("venue"), Some("Venue is required"));

        // Neither field was persisted
        let fetched = get_event_by_id(&db, event.id).await?;
        assert_eq!(fetched, event);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_event_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_event(&db, 999, &event_body("Wedding"), EventRules::default()).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { kind: KIND, .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_event_twice() -> Result<()> {
        let (db, event) = setup_with_event().await?;

        delete_event(&db, event.id).await?;

        let result = delete_event(&db, event.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        let result = get_event_by_id(&db, event.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }
}
