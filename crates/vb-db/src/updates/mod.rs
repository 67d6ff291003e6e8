//! Typed update payloads for entity mutations.
//!
//! Each patch has `Option` fields. Only `Some` fields generate SET clauses
//! in the dynamic UPDATE SQL. Unknown keys are rejected at deserialization.

pub mod reservation;
