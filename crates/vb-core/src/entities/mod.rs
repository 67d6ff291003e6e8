//! Entity structs for venuebook domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `vb-db/migrations`). All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` for JSON output and schema export.

mod account;
mod audit;
mod bundle;
mod reservation;

pub use account::Account;
pub use audit::{AuditEntry, NewAuditEntry};
pub use bundle::BundleLine;
pub use reservation::Reservation;
