//! Repository layer: one contract, three storage strategies.
//!
//! # Responsibility
//! - Define the `ClientRepository` contract and its error vocabulary.
//! - Provide JSON and YAML file repositories and a SQLite repository.
//!
//! # Invariants
//! - Every backend satisfies the same contract; callers never branch on the
//!   concrete type.
//! - Repositories own their entities and hand out copies.

pub mod client_repo;
pub mod file_repo;
pub mod sqlite_repo;
pub mod sqlite_store;
