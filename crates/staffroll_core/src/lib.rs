//! Core domain logic for staffroll.
//! This crate is the single source of truth for employee record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::employee::{
    Employee, EmployeeCandidate, EmployeeDraft, EmployeeId, EmployeeValidationError, Gender,
    MAX_AGE, MIN_AGE,
};
pub use repo::employee_repo::{
    BatchItemOutcome, EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository,
};
pub use repo::memory_repo::InMemoryEmployeeRepository;
pub use service::employee_service::{
    BulkCreateReport, BulkRejection, BulkRejectionReason, EmployeeService, EmployeeServiceError,
    ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
