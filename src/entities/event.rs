//! Event entity - A scheduled occasion with a venue and a budget.
//!
//! Events have an independent lifecycle. Staff records reference them by id only,
//! so deleting an event never touches the staff table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Kind of event (e.g., "Wedding", "Conference")
    pub event_type: String,
    /// Calendar date the event takes place on
    pub event_date: Date,
    /// Budget in currency units, always positive
    pub budget: f64,
    /// Where the event is held
    pub venue: String,
}

/// Events have no structural relationships; staff assignments are weak references
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
