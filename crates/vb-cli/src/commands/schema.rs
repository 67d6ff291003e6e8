use anyhow::bail;
use schemars::schema_for;
use vb_core::entities::{AuditEntry, BundleLine, Reservation};
use vb_core::identity::Actor;
use vb_core::requests::{BookingRequest, BundleLineInput};
use vb_db::updates::reservation::ReservationPatch;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

const TYPE_NAMES: &str = "booking, patch, bundle, bundle-line, reservation, audit-entry, actor";

/// Handle `vbk schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name.trim().to_ascii_lowercase().as_str() {
        "booking" | "booking-request" => schema_for!(BookingRequest),
        "patch" | "reservation-patch" => schema_for!(ReservationPatch),
        "bundle" => schema_for!(Vec<BundleLineInput>),
        "bundle-line" => schema_for!(BundleLine),
        "reservation" => schema_for!(Reservation),
        "audit-entry" | "audit" => schema_for!(AuditEntry),
        "actor" => schema_for!(Actor),
        other => bail!("unknown schema type '{other}' (expected one of: {TYPE_NAMES})"),
    };
    output(&schema, flags.output)
}
