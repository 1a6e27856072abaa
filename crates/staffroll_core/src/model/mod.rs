//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical data structures used by storage and services.
//! - Keep field rules next to the types they guard.
//!
//! # Invariants
//! - Every stored employee is identified by a storage-assigned `EmployeeId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod employee;
