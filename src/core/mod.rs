//! Core business logic - framework-agnostic operations for every record kind.
//!
//! Each record module exposes async free functions over a `DatabaseConnection`. The
//! HTTP layer in [`crate::api`] only decodes requests and maps results to responses.

/// Event records: create, list, fetch, update and delete
pub mod event;
/// Lenient decoding of JSON request bodies into typed payloads
pub mod payload;
/// Resolution and existence checks for staff event assignments
pub mod references;
/// Literal name filters for list queries
pub mod search;
/// Staff records, including assigned event checks
pub mod staff;
/// Shared field rules and the field error mapping
pub mod validation;
/// Vendor records, service types and payment terms
pub mod vendor;
