//! Reservation patch and builder.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use vb_core::errors::CoreError;
use vb_core::requests::{BundleLineInput, require_non_negative, require_reference, validate_bundle};

/// Fields an amendment may touch. Anything else is a deserialization error.
///
/// `services`, when present, replaces the whole bundle in the same
/// transaction as the field changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ReservationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_charge: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<BundleLineInput>>,
}

impl ReservationPatch {
    /// True when applying the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.booking_date.is_none()
            && self.venue_id.is_none()
            && self.slot_id.is_none()
            && self.theme.is_none()
            && self.total_charge.is_none()
            && self.active.is_none()
            && self.services.is_none()
    }

    /// Check the supplied fields. Absent fields are not inspected.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the first bad field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(venue_id) = self.venue_id {
            require_reference("venue_id", venue_id)?;
        }
        if let Some(slot_id) = self.slot_id {
            require_reference("slot_id", slot_id)?;
        }
        if let Some(total) = self.total_charge {
            require_non_negative("total_charge", total)?;
        }
        if let Some(ref lines) = self.services {
            validate_bundle(lines)?;
        }
        Ok(())
    }
}

pub struct ReservationPatchBuilder(ReservationPatch);

impl ReservationPatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ReservationPatch::default())
    }

    #[must_use]
    pub fn booking_date(mut self, date: NaiveDate) -> Self {
        self.0.booking_date = Some(date);
        self
    }

    #[must_use]
    pub fn venue_id(mut self, venue_id: i64) -> Self {
        self.0.venue_id = Some(venue_id);
        self
    }

    #[must_use]
    pub fn slot_id(mut self, slot_id: i64) -> Self {
        self.0.slot_id = Some(slot_id);
        self
    }

    #[must_use]
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.0.theme = Some(theme.into());
        self
    }

    #[must_use]
    pub fn total_charge(mut self, total: Decimal) -> Self {
        self.0.total_charge = Some(total);
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.0.active = Some(active);
        self
    }

    #[must_use]
    pub fn services(mut self, lines: Vec<BundleLineInput>) -> Self {
        self.0.services = Some(lines);
        self
    }

    #[must_use]
    pub fn build(self) -> ReservationPatch {
        self.0
    }
}

impl Default for ReservationPatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}
