//! Repository modules implementing store operations.
//!
//! Each module adds methods to `VenueDb` via `impl VenueDb` blocks.

pub mod audit;
pub mod bundle;
pub mod directory;
pub mod reports;
pub mod reservation;
