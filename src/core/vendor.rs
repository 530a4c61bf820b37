//! Vendor business logic - Handles all vendor-related operations.
//!
//! Vendors have an independent lifecycle and no relationship to events or staff.
//! Their email is unique among vendors; the constraint lives on the table, so two
//! concurrent creates with the same email cannot both succeed.
//!
//! Service types are an ordered set drawn from [`ServiceType`]. Older rows and older
//! clients use a single string (sometimes comma-separated) instead of a list; both the
//! decoder and [`service_types_from_json`] accept that shape and the store always
//! writes the list form back.

use crate::{
    core::{
        payload::{PayloadReader, split_list},
        search::{name_contains, search_term},
        validation::{self, FieldErrors},
    },
    entities::{Vendor, vendor},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use strum::VariantNames;
use tracing::{debug, info, instrument, warn};

/// Display name used in not-found errors and delete confirmations.
pub const KIND: &str = "Vendor";

/// Services a vendor can offer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::VariantNames,
)]
pub enum ServiceType {
    /// Goods delivery
    Delivery,
    /// Repair work
    Repair,
    /// Installation work
    Installation,
}

/// Payment terms agreed with a vendor.
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
pub enum PaymentTerms {
    /// Payment due 30 days after invoice
    #[serde(rename = "Net 30")]
    #[strum(serialize = "Net 30")]
    Net30,
    /// Payment due 60 days after invoice
    #[serde(rename = "Net 60")]
    #[strum(serialize = "Net 60")]
    Net60,
    /// Payment before delivery
    Prepaid,
}

/// A vendor as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRecord {
    /// Unique identifier
    pub id: i64,
    /// Trading name
    pub vendor_name: String,
    /// Account contact on the vendor side
    pub contact_person: String,
    /// Digits-only phone number
    pub contact_number: String,
    /// Offered services, in submission order
    pub service_type: Vec<ServiceType>,
    /// Unique contact email
    pub email: String,
    /// Payment terms name
    pub payment_terms: String,
    /// Free-form pricing description
    pub pricing_details: String,
    /// Postal address
    pub address: String,
    /// Name used on correspondence
    pub contact_name: String,
}

impl From<vendor::Model> for VendorRecord {
    fn from(model: vendor::Model) -> Self {
        Self {
            service_type: service_types_from_json(&model.service_types),
            id: model.id,
            vendor_name: model.vendor_name,
            contact_person: model.contact_person,
            contact_number: model.contact_number,
            email: model.email,
            payment_terms: model.payment_terms,
            pricing_details: model.pricing_details,
            address: model.address,
            contact_name: model.contact_name,
        }
    }
}

/// Reads stored service types, accepting both the list form and the legacy single string.
///
/// Unknown names are skipped so a bad legacy row never makes the vendor unreadable.
#[must_use]
pub fn service_types_from_json(value: &Json) -> Vec<ServiceType> {
    let names: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(split_list)
            .collect(),
        Value::String(text) => split_list(text),
        _ => Vec::new(),
    };

    let mut types = Vec::with_capacity(names.len());
    for name in names {
        match ServiceType::from_str(&name) {
            Ok(service) if !types.contains(&service) => types.push(service),
            Ok(_) => {}
            Err(_) => warn!(%name, "Skipping unknown stored service type"),
        }
    }
    types
}

fn service_types_to_json(types: &[ServiceType]) -> Json {
    Value::Array(
        types
            .iter()
            .map(|service| Value::String(service.to_string()))
            .collect(),
    )
}

/// Vendor fields as submitted by a client. `None` means the field was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorPayload {
    /// `vendorName`
    pub vendor_name: Option<String>,
    /// `contactPerson`
    pub contact_person: Option<String>,
    /// `contactNumber`
    pub contact_number: Option<String>,
    /// `serviceType`, unparsed names
    pub service_type: Option<Vec<String>>,
    /// `email`
    pub email: Option<String>,
    /// `paymentTerms`
    pub payment_terms: Option<String>,
    /// `pricingDetails`
    pub pricing_details: Option<String>,
    /// `address`
    pub address: Option<String>,
    /// `contactName`
    pub contact_name: Option<String>,
}

impl VendorPayload {
    /// Decodes a JSON body, failing on any field of the wrong type.
    pub fn decode(body: &Value) -> Result<Self> {
        let mut reader = PayloadReader::new(body)?;
        let payload = Self {
            vendor_name: reader.text("vendorName", "Vendor name"),
            contact_person: reader.text("contactPerson", "Contact person"),
            contact_number: reader.text("contactNumber", "Contact number"),
            service_type: reader.text_list("serviceType", "Service type"),
            email: reader.text("email", "Email"),
            payment_terms: reader.text("paymentTerms", "Payment terms"),
            pricing_details: reader.text("pricingDetails", "Pricing details"),
            address: reader.text("address", "Address"),
            contact_name: reader.text("contactName", "Contact name"),
        };
        reader.finish().into_result(payload)
    }

    fn from_model(model: &vendor::Model) -> Self {
        Self {
            vendor_name: Some(model.vendor_name.clone()),
            contact_person: Some(model.contact_person.clone()),
            contact_number: Some(model.contact_number.clone()),
            service_type: Some(
                service_types_from_json(&model.service_types)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            ),
            email: Some(model.email.clone()),
            payment_terms: Some(model.payment_terms.clone()),
            pricing_details: Some(model.pricing_details.clone()),
            address: Some(model.address.clone()),
            contact_name: Some(model.contact_name.clone()),
        }
    }

    /// Fields present in `patch` replace the ones in `self`.
    #[must_use]
    pub fn overlay(self, patch: Self) -> Self {
        Self {
            vendor_name: patch.vendor_name.or(self.vendor_name),
            contact_person: patch.contact_person.or(self.contact_person),
            contact_number: patch.contact_number.or(self.contact_number),
            service_type: patch.service_type.or(self.service_type),
            email: patch.email.or(self.email),
            payment_terms: patch.payment_terms.or(self.payment_terms),
            pricing_details: patch.pricing_details.or(self.pricing_details),
            address: patch.address.or(self.address),
            contact_name: patch.contact_name.or(self.contact_name),
        }
    }
}

/// A fully validated vendor, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorDraft {
    /// Non-blank vendor name
    pub vendor_name: String,
    /// Non-blank contact person
    pub contact_person: String,
    /// Digits-only contact number
    pub contact_number: String,
    /// At least one service, no repeats
    pub service_types: Vec<ServiceType>,
    /// Email of valid shape
    pub email: String,
    /// Parsed payment terms
    pub payment_terms: PaymentTerms,
    /// Non-blank pricing details
    pub pricing_details: String,
    /// Non-blank address
    pub address: String,
    /// Non-blank contact name
    pub contact_name: String,
}

fn parse_service_types(
    errors: &mut FieldErrors,
    names: Option<&[String]>,
) -> Option<Vec<ServiceType>> {
    let mut types = Vec::new();
    for name in names.unwrap_or_default() {
        if let Ok(service) = ServiceType::from_str(name) {
            if !types.contains(&service) {
                types.push(service);
            }
        } else {
            errors.add(
                "serviceType",
                format!(
                    "Unknown service type '{name}' (expected one of {})",
                    ServiceType::VARIANTS.join(", ")
                ),
            );
            return None;
        }
    }
    if types.is_empty() {
        errors.add("serviceType", "Select at least one service type");
        return None;
    }
    Some(types)
}

fn parse_payment_terms(errors: &mut FieldErrors, value: Option<&str>) -> Option<PaymentTerms> {
    let text = validation::require_text(errors, "paymentTerms", "Payment terms", value)?;
    PaymentTerms::from_str(&text).ok().or_else(|| {
        errors.add(
            "paymentTerms",
            format!(
                "Payment terms must be one of {}",
                PaymentTerms::VARIANTS.join(", ")
            ),
        );
        None
    })
}

/// Applies the vendor field rules.
pub fn validate_vendor(payload: &VendorPayload) -> std::result::Result<VendorDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let vendor_name = validation::require_text(
        &mut errors,
        "vendorName",
        "Vendor name",
        payload.vendor_name.as_deref(),
    );
    let contact_person = validation::require_text(
        &mut errors,
        "contactPerson",
        "Contact person",
        payload.contact_person.as_deref(),
    );
    let contact_number = validation::require_digits(
        &mut errors,
        "contactNumber",
        "Contact number",
        payload.contact_number.as_deref(),
        None,
    );
    let service_types = parse_service_types(&mut errors, payload.service_type.as_deref());
    let email = validation::require_email(&mut errors, "email", "Email", payload.email.as_deref());
    let payment_terms = parse_payment_terms(&mut errors, payload.payment_terms.as_deref());
    let pricing_details = validation::require_text(
        &mut errors,
        "pricingDetails",
        "Pricing details",
        payload.pricing_details.as_deref(),
    );
    let address =
        validation::require_text(&mut errors, "address", "Address", payload.address.as_deref());
    let contact_name = validation::require_text(
        &mut errors,
        "contactName",
        "Contact name",
        payload.contact_name.as_deref(),
    );

    match (
        vendor_name,
        contact_person,
        contact_number,
        service_types,
        email,
        payment_terms,
        pricing_details,
        address,
        contact_name,
    ) {
        (
            Some(vendor_name),
            Some(contact_person),
            Some(contact_number),
            Some(service_types),
            Some(email),
            Some(payment_terms),
            Some(pricing_details),
            Some(address),
            Some(contact_name),
        ) if errors.is_empty() => Ok(VendorDraft {
            vendor_name,
            contact_person,
            contact_number,
            service_types,
            email,
            payment_terms,
            pricing_details,
            address,
            contact_name,
        }),
        _ => Err(errors),
    }
}

fn duplicate_email(err: DbErr, email: &str) -> Error {
    Error::on_unique_violation(
        err,
        "email",
        format!("A vendor with email {email} already exists"),
    )
}

/// Creates a vendor from a JSON body.
///
/// # Errors
/// Returns a validation error if the body fails decoding or any field rule,
/// `Error::Conflict` if another vendor already uses the email,
/// or a database error if the insert fails.
#[instrument(skip(db, body))]
pub async fn create_vendor(db: &DatabaseConnection, body: &Value) -> Result<VendorRecord> {
    let payload = VendorPayload::decode(body)?;
    let draft = validate_vendor(&payload).inspect_err(|errors| warn!(%errors, "Rejected vendor"))?;

    let email = draft.email.clone();
    let vendor = vendor::ActiveModel {
        vendor_name: Set(draft.vendor_name),
        contact_person: Set(draft.contact_person),
        contact_number: Set(draft.contact_number),
        service_types: Set(service_types_to_json(&draft.service_types)),
        email: Set(draft.email),
        payment_terms: Set(draft.payment_terms.to_string()),
        pricing_details: Set(draft.pricing_details),
        address: Set(draft.address),
        contact_name: Set(draft.contact_name),
        ..Default::default()
    };
    let created = vendor
        .insert(db)
        .await
        .map_err(|err| duplicate_email(err, &email))?;
    info!(vendor_id = created.id, "Vendor created");
    Ok(created.into())
}

/// Lists vendors in insertion order, optionally filtered by vendor name.
pub async fn get_all_vendors(
    db: &DatabaseConnection,
    search: Option<&str>,
) -> Result<Vec<VendorRecord>> {
    let mut query = Vendor::find().order_by_asc(vendor::Column::Id);
    if let Some(term) = search_term(search) {
        query = query.filter(name_contains(vendor::Column::VendorName, term));
    }
    let vendors = query.all(db).await?;
    debug!(count = vendors.len(), "Listed vendors");
    Ok(vendors.into_iter().map(VendorRecord::from).collect())
}

async fn find_vendor(db: &DatabaseConnection, vendor_id: i64) -> Result<vendor::Model> {
    Vendor::find_by_id(vendor_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(KIND, vendor_id))
}

/// Retrieves a vendor by id.
///
/// # Errors
/// Returns `Error::NotFound` if no vendor has this id.
pub async fn get_vendor_by_id(db: &DatabaseConnection, vendor_id: i64) -> Result<VendorRecord> {
    find_vendor(db, vendor_id).await.map(VendorRecord::from)
}

/// Updates a vendor with a full or partial JSON body.
///
/// # Errors
/// Returns `Error::NotFound` for an unknown id, a validation error if the merged record
/// fails any rule, or `Error::Conflict` if the new email belongs to another vendor.
#[instrument(skip(db, body))]
pub async fn update_vendor(
    db: &DatabaseConnection,
    vendor_id: i64,
    body: &Value,
) -> Result<VendorRecord> {
    let existing = find_vendor(db, vendor_id).await?;
    let patch = VendorPayload::decode(body)?;
    let merged = VendorPayload::from_model(&existing).overlay(patch);
    let draft = validate_vendor(&merged)
        .inspect_err(|errors| warn!(vendor_id, %errors, "Rejected vendor update"))?;

    let email = draft.email.clone();
    let mut vendor: vendor::ActiveModel = existing.into();
    vendor.vendor_name = Set(draft.vendor_name);
    vendor.contact_person = Set(draft.contact_person);
    vendor.contact_number = Set(draft.contact_number);
    vendor.service_types = Set(service_types_to_json(&draft.service_types));
    vendor.email = Set(draft.email);
    vendor.payment_terms = Set(draft.payment_terms.to_string());
    vendor.pricing_details = Set(draft.pricing_details);
    vendor.address = Set(draft.address);
    vendor.contact_name = Set(draft.contact_name);

    let updated = vendor
        .update(db)
        .await
        .map_err(|err| duplicate_email(err, &email))?;
    info!(vendor_id, "Vendor updated");
    Ok(updated.into())
}

/// Deletes a vendor.
///
/// # Errors
/// Returns `Error::NotFound` if no vendor has this id.
#[instrument(skip(db))]
pub async fn delete_vendor(db: &DatabaseConnection, vendor_id: i64) -> Result<()> {
    let result = Vendor::delete_by_id(vendor_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(KIND, vendor_id));
    }
    info!(vendor_id, "Vendor deleted");
    Ok(())
}
