//! Client domain model.
//!
//! # Responsibility
//! - Define the canonical `Client` record and its `ClientShort` projection.
//! - Own every field-format rule so no other layer re-validates.
//!
//! # Invariants
//! - A `Client` value is valid from construction onward; setters reject
//!   invalid input without touching the stored value.
//! - Identity is the positive integer id once assigned.

pub mod client;
pub mod field;
mod validate;
