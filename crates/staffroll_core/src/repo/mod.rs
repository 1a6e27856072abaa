//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the employee record-store contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `EmployeeDraft::validate()` before persistence.
//! - Backend conflict codes are translated into `RepoError::EmailConflict`;
//!   callers never inspect SQLite error codes.

pub mod employee_repo;
pub mod memory_repo;
