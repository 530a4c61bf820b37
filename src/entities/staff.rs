//! Staff entity - A member of staff and the events they are assigned to.
//!
//! `assigned_events` holds a JSON array of event ids. It is a weak reference set:
//! there is no foreign key, and the ids are checked against the events table by the
//! staff store on every write.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    /// Unique identifier for the staff member
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub full_name: String,
    /// Ten-digit phone number
    pub phone_number: String,
    /// Contact email, unique among staff
    #[sea_orm(unique)]
    pub email: String,
    /// Role name (e.g., "Manager")
    pub role: String,
    /// Ordered JSON array of assigned event ids
    pub assigned_events: Json,
    /// Salary in currency units, always positive
    pub salary: f64,
    /// Date the staff member joined
    pub joining_date: Date,
    /// Optional free-form notes
    pub notes: Option<String>,
}

/// `Staff` has no structural relationships; see the module docs
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
