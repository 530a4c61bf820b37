//! Cross-reference resolution between staff and the events they are assigned to.
//!
//! Staff rows hold event ids only. On write every id must name an existing event; on
//! read each id is swapped for the full event, or for an [`UnresolvedEvent`] marker when
//! the event has since been deleted. Both directions look at the events table as it is
//! at call time, in a single query, and never modify it.

use crate::{
    core::validation::FieldErrors,
    entities::{Event, event},
    errors::Result,
};
use sea_orm::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Field name assigned-event errors are reported under.
pub const ASSIGNED_EVENTS_FIELD: &str = "assignedEvents";

/// Placeholder for an assigned event id that no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnresolvedEvent {
    /// The dangling event id
    pub id: i64,
    /// Always `true`; lets clients tell markers apart from events
    pub unresolved: bool,
}

/// One entry of a staff member's resolved assignment list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AssignedEvent {
    /// The event exists and is returned in full
    Resolved(event::Model),
    /// The event was deleted after the assignment was written
    Unresolved(UnresolvedEvent),
}

impl AssignedEvent {
    /// The referenced event id.
    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Resolved(event) => event.id,
            Self::Unresolved(marker) => marker.id,
        }
    }

    /// Whether the event still exists.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Reads stored assigned event ids, skipping anything that is not an id.
#[must_use]
pub fn ids_from_json(value: &Json) -> Vec<i64> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default()
}

/// Renders assigned event ids for storage.
#[must_use]
pub fn ids_to_json(ids: &[i64]) -> Json {
    Value::Array(ids.iter().map(|id| Value::from(*id)).collect())
}

async fn load_events<C>(db: &C, ids: &[i64]) -> Result<HashMap<i64, event::Model>>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let events = Event::find()
        .filter(event::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;
    Ok(events.into_iter().map(|event| (event.id, event)).collect())
}

fn resolve_with(found: &HashMap<i64, event::Model>, ids: &[i64]) -> Vec<AssignedEvent> {
    ids.iter()
        .map(|id| {
            found.get(id).map_or(
                AssignedEvent::Unresolved(UnresolvedEvent {
                    id: *id,
                    unresolved: true,
                }),
                |event| AssignedEvent::Resolved(event.clone()),
            )
        })
        .collect()
}

/// Replaces each id with its event, keeping order. Deleted events become markers.
pub async fn resolve_assigned_events<C>(db: &C, ids: &[i64]) -> Result<Vec<AssignedEvent>>
where
    C: ConnectionTrait,
{
    let found = load_events(db, ids).await?;
    Ok(resolve_with(&found, ids))
}

/// Resolves several id lists with one query over their union.
pub async fn resolve_many<C>(db: &C, id_lists: &[Vec<i64>]) -> Result<Vec<Vec<AssignedEvent>>>
where
    C: ConnectionTrait,
{
    let mut all_ids: Vec<i64> = id_lists.iter().flatten().copied().collect();
    all_ids.sort_unstable();
    all_ids.dedup();

    let found = load_events(db, &all_ids).await?;
    debug!(
        requested = all_ids.len(),
        found = found.len(),
        "Resolved assigned events"
    );
    Ok(id_lists
        .iter()
        .map(|ids| resolve_with(&found, ids))
        .collect())
}

/// Returns the ids, in input order, that do not name an existing event.
pub async fn missing_event_ids<C>(db: &C, ids: &[i64]) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    let found = load_events(db, ids).await?;
    Ok(ids
        .iter()
        .copied()
        .filter(|id| !found.contains_key(id))
        .collect())
}

/// Records an `assignedEvents` error naming every id that does not exist.
pub async fn check_assigned_events<C>(db: &C, ids: &[i64], errors: &mut FieldErrors) -> Result<()>
where
    C: ConnectionTrait,
{
    let missing = missing_event_ids(db, ids).await?;
    if !missing.is_empty() {
        let listed: Vec<String> = missing.iter().map(ToString::to_string).collect();
        errors.add(
            ASSIGNED_EVENTS_FIELD,
            format!("Unknown event id(s): {}", listed.join(", ")),
        );
    }
    Ok(())
}
