//! Database connection and table creation.
//!
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema, including the unique email indexes, always matches the Rust models.
//! Creation is idempotent and safe to run on every startup.

use crate::entities::{Event, Staff, Vendor};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{info, instrument};

/// Opens a connection pool for `database_url`.
///
/// The URL may carry credentials, so only the backend is logged.
#[instrument(skip(database_url))]
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    info!(backend = ?db.get_database_backend(), "Connected to database");
    Ok(db)
}

/// Creates the events, vendors and staff tables if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut event_table = schema.create_table_from_entity(Event);
    let mut vendor_table = schema.create_table_from_entity(Vendor);
    let mut staff_table = schema.create_table_from_entity(Staff);

    event_table.if_not_exists();
    vendor_table.if_not_exists();
    staff_table.if_not_exists();

    db.execute(builder.build(&event_table)).await?;
    db.execute(builder.build(&vendor_table)).await?;
    db.execute(builder.build(&staff_table)).await?;

    Ok(())
}
