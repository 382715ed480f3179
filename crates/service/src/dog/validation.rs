//! Field and cross-field rules for roster records.
//!
//! Create and update use different wording and different date checks:
//! create only compares the leaving date with the acquisition date, update
//! compares both the leaving date and the birth date with it.

use chrono::NaiveDate;
use models::dog::{DogStatus, LeavingReason};

use crate::dog::domain::{DogInput, FieldChange, NewDog};
use crate::errors::ServiceError;

pub const DUPLICATE_BADGE: &str =
    "Dog badge ID already exists. Please check and try again or use the PUT method to update the existing record.";
pub const NO_UPDATE_VALUES: &str = "No update values have been provided.";

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn required(value: &Option<String>, message: &str) -> Result<String, ServiceError> {
    if is_blank(value.as_deref()) {
        return Err(ServiceError::validation(message));
    }
    Ok(value.clone().unwrap_or_default())
}

/// Rules 1-8 of record creation, in order. The badge uniqueness lookup and
/// the date check run afterwards in the service.
pub fn validate_draft(input: &DogInput) -> Result<NewDog, ServiceError> {
    let name = required(&input.name, "Dog name is required.")?;
    let breed = required(&input.breed, "Dog breed is required.")?;
    let supplier = input.supplier.clone().unwrap_or_default();
    let gender = input.gender.clone().unwrap_or_default();

    let status = required(&input.status, "Dog status is required.")?;
    if status.parse::<DogStatus>().is_err() {
        return Err(ServiceError::validation(format!(
            "Dog status must be one of the following: {}",
            DogStatus::vocabulary()
        )));
    }

    let leaving_reason = match &input.leaving_reason {
        None => String::new(),
        Some(reason) => {
            if reason.parse::<LeavingReason>().is_err() {
                return Err(ServiceError::validation(format!(
                    "If provided, the leaving reason must be one of the following: {}",
                    LeavingReason::vocabulary()
                )));
            }
            reason.clone()
        }
    };

    let kenneling_characteristics = input.kenneling_characteristics.clone().unwrap_or_default();

    let badge_id = input.badge_id.ok_or_else(|| ServiceError::validation("Dog badge ID is required."))?;
    if badge_id <= 0 {
        return Err(ServiceError::validation("Dog badge ID must be a positive number."));
    }

    Ok(NewDog {
        name,
        breed,
        supplier,
        badge_id,
        gender,
        birth_date: input.birth_date,
        date_acquired: input.date_acquired,
        status,
        leaving_date: input.leaving_date,
        leaving_reason,
        kenneling_characteristics,
    })
}

/// Validate each supplied field on its own and turn the patch into column changes.
/// Absent fields are neither checked nor changed.
pub fn validate_patch(patch: &DogInput) -> Result<Vec<FieldChange>, ServiceError> {
    if patch.name.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return Err(ServiceError::validation("Name cannot be empty if provided."));
    }
    if patch.breed.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return Err(ServiceError::validation("Breed cannot be empty if provided."));
    }
    if patch.badge_id.is_some_and(|b| b <= 0) {
        return Err(ServiceError::validation("Badge ID must be a positive number if provided."));
    }
    if let Some(status) = &patch.status {
        if status.trim().is_empty() {
            return Err(ServiceError::validation("Status cannot be empty if provided."));
        }
        if status.parse::<DogStatus>().is_err() {
            return Err(ServiceError::validation(format!(
                "Status must be one of the following: {}",
                DogStatus::vocabulary()
            )));
        }
    }
    if let Some(reason) = &patch.leaving_reason {
        if reason.trim().is_empty() {
            return Err(ServiceError::validation("Leaving Reason cannot be empty if provided."));
        }
        if reason.parse::<LeavingReason>().is_err() {
            return Err(ServiceError::validation(format!(
                "Leaving reason must be one of the following: {}",
                LeavingReason::vocabulary()
            )));
        }
    }

    let changes = patch.changes();
    if changes.is_empty() {
        return Err(ServiceError::validation(NO_UPDATE_VALUES));
    }
    Ok(changes)
}

pub fn check_leaving_not_before_acquired(
    leaving: Option<NaiveDate>,
    acquired: Option<NaiveDate>,
) -> Result<(), ServiceError> {
    match (leaving, acquired) {
        (Some(l), Some(a)) if l < a => {
            Err(ServiceError::validation("Leaving date cannot be before the acquisition date."))
        }
        _ => Ok(()),
    }
}

pub fn check_birth_not_after_acquired(
    birth: Option<NaiveDate>,
    acquired: Option<NaiveDate>,
) -> Result<(), ServiceError> {
    match (birth, acquired) {
        (Some(b), Some(a)) if b > a => Err(ServiceError::validation("Birth date cannot be after the acquisition date.")),
        _ => Ok(()),
    }
}
