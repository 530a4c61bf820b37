//! Vendor entity - A supplier the back office contracts with.
//!
//! Service types are stored as a JSON array of names. Rows written before the list
//! representation may still hold a single (possibly comma-separated) string; the
//! vendor store reads both shapes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vendor database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    /// Unique identifier for the vendor
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Trading name of the vendor
    pub vendor_name: String,
    /// Person responsible for the account on the vendor side
    pub contact_person: String,
    /// Phone number, digits only
    pub contact_number: String,
    /// Offered services, JSON array of service type names
    pub service_types: Json,
    /// Contact email, unique among vendors
    #[sea_orm(unique)]
    pub email: String,
    /// Payment terms name (e.g., "Net 30")
    pub payment_terms: String,
    /// Free-form pricing description
    pub pricing_details: String,
    /// Postal address
    pub address: String,
    /// Name used when addressing correspondence
    pub contact_name: String,
}

/// `Vendor` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
