//! # vb-core
//!
//! Core types, change normalization, and error types for venuebook.
//!
//! This crate provides the foundational types shared across all venuebook crates:
//! - Entity structs for reservations, bundle lines, audit entries, and accounts
//! - Action, entity, role, and sort enums
//! - Booking request types and caller identity
//! - The change normalizer used to canonicalize audit snapshots
//! - Typed snapshot schemas for entities with known field kinds
//! - Aggregate report row shapes
//! - Cross-cutting error types

pub mod aggregates;
pub mod changes;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod listing;
pub mod requests;
pub mod snapshot;
