//! Caller payloads for booking operations.
//!
//! Payload types reject unknown keys at deserialization, so a misspelled
//! field surfaces as an error instead of a silent no-op.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// One requested add-on service for a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BundleLineInput {
    pub service_id: i64,
    pub charge: Decimal,
}

/// Payload for creating a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BookingRequest {
    pub booking_date: NaiveDate,
    pub venue_id: i64,
    pub slot_id: i64,
    /// Owning account. Defaults to the calling actor when absent.
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub photo: Option<String>,
    pub venue_charge: Decimal,
    pub total_charge: Decimal,
    #[serde(default)]
    pub services: Vec<BundleLineInput>,
}

impl BookingRequest {
    /// Check required references and charge constraints.
    ///
    /// Does not compare `total_charge` against `venue_charge` plus the bundle;
    /// totals are trusted as submitted.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` describing the first violated rule.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_reference("venue_id", self.venue_id)?;
        require_reference("slot_id", self.slot_id)?;
        if let Some(owner) = self.owner_id {
            require_reference("owner_id", owner)?;
        }
        require_non_negative("venue_charge", self.venue_charge)?;
        require_non_negative("total_charge", self.total_charge)?;
        validate_bundle(&self.services)
    }
}

/// Validate a replacement bundle: positive service ids, non-negative
/// charges, and no service listed twice.
///
/// # Errors
///
/// Returns `CoreError::Validation` describing the first violated rule.
pub fn validate_bundle(lines: &[BundleLineInput]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        require_reference("services[].service_id", line.service_id)?;
        require_non_negative("services[].charge", line.charge)?;
        if !seen.insert(line.service_id) {
            return Err(CoreError::Validation(format!(
                "service {} appears more than once in the bundle",
                line.service_id
            )));
        }
    }
    Ok(())
}

/// Reject ids that are zero or negative.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming `field`.
pub fn require_reference(field: &str, value: i64) -> Result<(), CoreError> {
    if value <= 0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a positive id, got {value}"
        )));
    }
    Ok(())
}

/// Reject negative amounts.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming `field`.
pub fn require_non_negative(field: &str, value: Decimal) -> Result<(), CoreError> {
    if value < Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}
