mod audit;
mod bundle;

pub use audit::{AuditCommands, AuditListArgs};
pub use bundle::BundleCommands;
