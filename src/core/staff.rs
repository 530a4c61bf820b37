//! Staff business logic - Handles all staff-related operations.
//!
//! Staff writes pass two gates before anything is persisted: the field rules, and a
//! check that every assigned event id currently exists. Errors from both gates are
//! reported together. Reads always resolve assigned event ids into full events, see
//! [`crate::core::references`].

use crate::{
    core::{
        payload::PayloadReader,
        search::{name_contains, search_term},
        references::{self, AssignedEvent, ASSIGNED_EVENTS_FIELD},
        validation::{self, FieldErrors},
    },
    entities::{Staff, staff},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use strum::VariantNames;
use tracing::{debug, info, instrument, warn};

/// Display name used in not-found errors and delete confirmations.
pub const KIND: &str = "Staff member";

/// Roles a staff member can hold.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::VariantNames,
)]
pub enum Role {
    /// Runs events end to end
    Manager,
    /// Coordinates vendors and schedules
    Coordinator,
    /// Supports the other roles
    Assistant,
    /// Oversees on-site staff
    Supervisor,
}

/// A staff member as returned to clients, with assigned events resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecord {
    /// Unique identifier
    pub id: i64,
    /// Full name
    pub full_name: String,
    /// Ten-digit phone number
    pub phone_number: String,
    /// Unique contact email
    pub email: String,
    /// Role name
    pub role: String,
    /// Assigned events in stored order
    pub assigned_events: Vec<AssignedEvent>,
    /// Positive salary
    pub salary: f64,
    /// Date the staff member joined
    pub joining_date: NaiveDate,
    /// Optional notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StaffRecord {
    fn new(model: staff::Model, assigned_events: Vec<AssignedEvent>) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            phone_number: model.phone_number,
            email: model.email,
            role: model.role,
            assigned_events,
            salary: model.salary,
            joining_date: model.joining_date,
            notes: model.notes,
        }
    }

    /// Ids of the assigned events, resolved or not.
    #[must_use]
    pub fn assigned_event_ids(&self) -> Vec<i64> {
        self.assigned_events.iter().map(AssignedEvent::id).collect()
    }
}

/// Staff fields as submitted by a client. `None` means the field was absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffPayload {
    /// `fullName`
    pub full_name: Option<String>,
    /// `phoneNumber`
    pub phone_number: Option<String>,
    /// `email`
    pub email: Option<String>,
    /// `role`
    pub role: Option<String>,
    /// `assignedEvents`, as ids
    pub assigned_events: Option<Vec<i64>>,
    /// `salary`
    pub salary: Option<f64>,
    /// `joiningDate`, unparsed
    pub joining_date: Option<String>,
    /// `notes`
    pub notes: Option<String>,
}

impl StaffPayload {
    /// Decodes a JSON body, failing on any field of the wrong type.
    pub fn decode(body: &Value) -> Result<Self> {
        let mut reader = PayloadReader::new(body)?;
        let payload = Self {
            full_name: reader.text("fullName", "Full name"),
            phone_number: reader.text("phoneNumber", "Phone number"),
            email: reader.text("email", "Email"),
            role: reader.text("role", "Role"),
            assigned_events: reader.id_list(ASSIGNED_EVENTS_FIELD, "Assigned events"),
            salary: reader.number("salary", "Salary"),
            joining_date: reader.text("joiningDate", "Joining date"),
            notes: reader.text("notes", "Notes"),
        };
        reader.finish().into_result(payload)
    }

    fn from_model(model: &staff::Model) -> Self {
        Self {
            full_name: Some(model.full_name.clone()),
            phone_number: Some(model.phone_number.clone()),
            email: Some(model.email.clone()),
            role: Some(model.role.clone()),
            assigned_events: Some(references::ids_from_json(&model.assigned_events)),
            salary: Some(model.salary),
            joining_date: Some(model.joining_date.format(validation::DATE_FORMAT).to_string()),
            notes: model.notes.clone(),
        }
    }

    /// Fields present in `patch` replace the ones in `self`.
    #[must_use]
    pub fn overlay(self, patch: Self) -> Self {
        Self {
            full_name: patch.full_name.or(self.full_name),
            phone_number: patch.phone_number.or(self.phone_number),
            email: patch.email.or(self.email),
            role: patch.role.or(self.role),
            assigned_events: patch.assigned_events.or(self.assigned_events),
            salary: patch.salary.or(self.salary),
            joining_date: patch.joining_date.or(self.joining_date),
            notes: patch.notes.or(self.notes),
        }
    }
}

/// A fully validated staff member, ready to persist once its event ids are checked.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffDraft {
    /// Non-blank full name
    pub full_name: String,
    /// Exactly ten digits
    pub phone_number: String,
    /// Email of valid shape
    pub email: String,
    /// Parsed role
    pub role: Role,
    /// Assigned event ids, no repeats
    pub assigned_events: Vec<i64>,
    /// Positive salary
    pub salary: f64,
    /// Parsed joining date
    pub joining_date: NaiveDate,
    /// Notes as submitted, `None` when blank
    pub notes: Option<String>,
}

fn parse_role(errors: &mut FieldErrors, value: Option<&str>) -> Option<Role> {
    let text = validation::require_text(errors, "role", "Role", value)?;
    Role::from_str(&text).ok().or_else(|| {
        errors.add(
            "role",
            format!("Role must be one of {}", Role::VARIANTS.join(", ")),
        );
        None
    })
}

/// Applies the staff field rules. Event id existence is checked separately by the store.
pub fn validate_staff(payload: &StaffPayload) -> std::result::Result<StaffDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let full_name = validation::require_text(
        &mut errors,
        "fullName",
        "Full name",
        payload.full_name.as_deref(),
    );
    let phone_number = validation::require_digits(
        &mut errors,
        "phoneNumber",
        "Phone number",
        payload.phone_number.as_deref(),
        Some(10),
    );
    let email = validation::require_email(&mut errors, "email", "Email", payload.email.as_deref());
    let role = parse_role(&mut errors, payload.role.as_deref());
    let salary = validation::require_positive(&mut errors, "salary", "Salary", payload.salary);
    let joining_date = validation::require_date(
        &mut errors,
        "joiningDate",
        "Joining date",
        payload.joining_date.as_deref(),
    );
    let notes = payload
        .notes
        .as_deref()
        .filter(|notes| !notes.trim().is_empty())
        .map(ToString::to_string);

    match (full_name, phone_number, email, role, salary, joining_date) {
        (
            Some(full_name),
            Some(phone_number),
            Some(email),
            Some(role),
            Some(salary),
            Some(joining_date),
        ) if errors.is_empty() => Ok(StaffDraft {
            full_name,
            phone_number,
            email,
            role,
            assigned_events: payload.assigned_events.clone().unwrap_or_default(),
            salary,
            joining_date,
            notes,
        }),
        _ => Err(errors),
    }
}

/// Runs the field rules and the assigned event check, merging their errors.
async fn validate_staff_write(db: &DatabaseConnection, payload: &StaffPayload) -> Result<StaffDraft> {
    let outcome = validate_staff(payload);
    let mut errors = outcome.as_ref().err().cloned().unwrap_or_default();
    let ids = payload.assigned_events.as_deref().unwrap_or_default();
    references::check_assigned_events(db, ids, &mut errors).await?;

    match outcome {
        Ok(draft) if errors.is_empty() => Ok(draft),
        _ => {
            warn!(%errors, "Rejected staff write");
            Err(errors.into())
        }
    }
}

fn duplicate_email(err: DbErr, email: &str) -> Error {
    Error::on_unique_violation(
        err,
        "email",
        format!("A staff member with email {email} already exists"),
    )
}

async fn resolve_record(db: &DatabaseConnection, model: staff::Model) -> Result<StaffRecord> {
    let ids = references::ids_from_json(&model.assigned_events);
    let assigned = references::resolve_assigned_events(db, &ids).await?;
    Ok(StaffRecord::new(model, assigned))
}

/// Creates a staff member from a JSON body.
///
/// # Errors
/// Returns a validation error if the body fails decoding, any field rule, or names an
/// event that does not exist; `Error::Conflict` if another staff member already uses
/// the email; or a database error if the insert fails.
#[instrument(skip(db, body))]
pub async fn create_staff(db: &DatabaseConnection, body: &Value) -> Result<StaffRecord> {
    let payload = StaffPayload::decode(body)?;
    let draft = validate_staff_write(db, &payload).await?;

    let email = draft.email.clone();
    let member = staff::ActiveModel {
        full_name: Set(draft.full_name),
        phone_number: Set(draft.phone_number),
        email: Set(draft.email),
        role: Set(draft.role.to_string()),
        assigned_events: Set(references::ids_to_json(&draft.assigned_events)),
        salary: Set(draft.salary),
        joining_date: Set(draft.joining_date),
        notes: Set(draft.notes),
        ..Default::default()
    };
    let created = member
        .insert(db)
        .await
        .map_err(|err| duplicate_email(err, &email))?;
    info!(staff_id = created.id, "Staff member created");
    resolve_record(db, created).await
}

/// Lists staff in insertion order with assigned events resolved, optionally filtered
/// by full name.
pub async fn get_all_staff(
    db: &DatabaseConnection,
    search: Option<&str>,
) -> Result<Vec<StaffRecord>> {
    let mut query = Staff::find().order_by_asc(staff::Column::Id);
    if let Some(term) = search_term(search) {
        query = query.filter(name_contains(staff::Column::FullName, term));
    }
    let members = query.all(db).await?;
    debug!(count = members.len(), "Listed staff");

    let id_lists: Vec<Vec<i64>> = members
        .iter()
        .map(|member| references::ids_from_json(&member.assigned_events))
        .collect();
    let resolved = references::resolve_many(db, &id_lists).await?;

    Ok(members
        .into_iter()
        .zip(resolved)
        .map(|(member, assigned)| StaffRecord::new(member, assigned))
        .collect())
}

async fn find_staff(db: &DatabaseConnection, staff_id: i64) -> Result<staff::Model> {
    Staff::find_by_id(staff_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(KIND, staff_id))
}

/// Retrieves a staff member by id with assigned events resolved.
///
/// # Errors
/// Returns `Error::NotFound` if no staff member has this id.
pub async fn get_staff_by_id(db: &DatabaseConnection, staff_id: i64) -> Result<StaffRecord> {
    let member = find_staff(db, staff_id).await?;
    resolve_record(db, member).await
}

/// Updates a staff member with a full or partial JSON body.
///
/// The merged record must pass every rule, including the assigned event check, so an
/// id left dangling by a deleted event has to be dropped before the update succeeds.
///
/// # Errors
/// Returns `Error::NotFound` for an unknown id, a validation error if the merged record
/// fails any rule, or `Error::Conflict` if the new email belongs to another staff member.
#[instrument(skip(db, body))]
pub async fn update_staff(
    db: &DatabaseConnection,
    staff_id: i64,
    body: &Value,
) -> Result<StaffRecord> {
    let existing = find_staff(db, staff_id).await?;
    let patch = StaffPayload::decode(body)?;
    let merged = StaffPayload::from_model(&existing).overlay(patch);
    let draft = validate_staff_write(db, &merged).await?;

    let email = draft.email.clone();
    let mut member: staff::ActiveModel = existing.into();
    member.full_name = Set(draft.full_name);
    member.phone_number = Set(draft.phone_number);
    member.email = Set(draft.email);
    member.role = Set(draft.role.to_string());
    member.assigned_events = Set(references::ids_to_json(&draft.assigned_events));
    member.salary = Set(draft.salary);
    member.joining_date = Set(draft.joining_date);
    member.notes = Set(draft.notes);

    let updated = member
        .update(db)
        .await
        .map_err(|err| duplicate_email(err, &email))?;
    info!(staff_id, "Staff member updated");
    resolve_record(db, updated).await
}

/// Deletes a staff member.
///
/// # Errors
/// Returns `Error::NotFound` if no staff member has this id.
#[instrument(skip(db))]
pub async fn delete_staff(db: &DatabaseConnection, staff_id: i64) -> Result<()> {
    let result = Staff::delete_by_id(staff_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(KIND, staff_id));
    }
    info!(staff_id, "Staff member deleted");
    Ok(())
}
