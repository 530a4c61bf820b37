//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod event;
pub mod staff;
pub mod vendor;

// Re-export specific types to avoid conflicts
pub use event::{Column as EventColumn, Entity as Event, Model as EventModel};
pub use staff::{Column as StaffColumn, Entity as Staff, Model as StaffModel};
pub use vendor::{Column as VendorColumn, Entity as Vendor, Model as VendorModel};
