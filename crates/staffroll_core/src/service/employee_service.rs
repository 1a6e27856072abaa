//! Employee use-case service.
//!
//! # Responsibility
//! - Provide the create/list/update/delete entry points callers use.
//! - Run candidate validation before any repository call.
//! - Collapse repository errors into the four caller-facing outcomes.
//!
//! # Invariants
//! - A candidate that fails validation never reaches the repository.
//! - Service layer remains storage-agnostic.
//! - Log events carry ids and outcome kinds, never field values.

use crate::model::employee::{Employee, EmployeeCandidate, EmployeeId, EmployeeValidationError};
use crate::repo::employee_repo::{BatchItemOutcome, EmployeeRepository, RepoError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-facing error for employee use-cases.
#[derive(Debug)]
pub enum EmployeeServiceError {
    /// Input failed a field rule. Carries the first failing rule.
    Validation(EmployeeValidationError),
    /// Email already used by another record (case-insensitive).
    EmailConflict(String),
    /// Target employee does not exist.
    NotFound(EmployeeId),
    /// Unexpected backing-store fault. Not retried here.
    Storage(RepoError),
}

impl EmployeeServiceError {
    /// Stable short label used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::EmailConflict(_) => "email_conflict",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
        }
    }
}

impl Display for EmployeeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmailConflict(email) => write!(f, "email already exists: {email}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for EmployeeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EmployeeValidationError> for EmployeeServiceError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for EmployeeServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::EmailConflict(email) => Self::EmailConflict(email),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, EmployeeServiceError>;

/// Why one item of a bulk create was not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkRejectionReason {
    Validation(EmployeeValidationError),
    EmailConflict(String),
}

impl Display for BulkRejectionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmailConflict(_) => write!(f, "Email already exists."),
        }
    }
}

/// One rejected bulk item, addressed by its position in the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRejection {
    pub index: usize,
    pub reason: BulkRejectionReason,
}

/// Outcome of [`EmployeeService::create_many`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkCreateReport {
    /// Stored employees in request order.
    pub created: Vec<Employee>,
    /// Items that were skipped, in request order.
    pub rejected: Vec<BulkRejection>,
}

/// Use-case service wrapper for employee operations.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores one employee.
    pub fn create_employee(&self, candidate: &EmployeeCandidate) -> ServiceResult<Employee> {
        let result = candidate
            .validate()
            .map_err(EmployeeServiceError::from)
            .and_then(|draft| {
                self.repo
                    .create_employee(&draft)
                    .map_err(EmployeeServiceError::from)
            });
        log_outcome("employee_create", None, &result);
        result
    }

    /// Validates every candidate and stores the valid ones in one batch.
    ///
    /// Invalid or conflicting items are reported, not stored. A storage
    /// failure discards the whole batch.
    pub fn create_many(&self, candidates: &[EmployeeCandidate]) -> ServiceResult<BulkCreateReport> {
        let mut report = BulkCreateReport::default();
        let mut accepted_indexes = Vec::new();
        let mut drafts = Vec::new();

        for (index, candidate) in candidates.iter().enumerate() {
            match candidate.validate() {
                Ok(draft) => {
                    accepted_indexes.push(index);
                    drafts.push(draft);
                }
                Err(err) => report.rejected.push(BulkRejection {
                    index,
                    reason: BulkRejectionReason::Validation(err),
                }),
            }
        }

        let outcomes = match self.repo.create_batch(&drafts) {
            Ok(outcomes) => outcomes,
            Err(err) => {
                let err = EmployeeServiceError::from(err);
                error!(
                    "event=employee_batch_create module=service status=error kind={} items={} error={}",
                    err.kind(),
                    candidates.len(),
                    err
                );
                return Err(err);
            }
        };

        for (index, outcome) in accepted_indexes.into_iter().zip(outcomes) {
            match outcome {
                BatchItemOutcome::Created(employee) => report.created.push(employee),
                BatchItemOutcome::EmailConflict(email) => report.rejected.push(BulkRejection {
                    index,
                    reason: BulkRejectionReason::EmailConflict(email),
                }),
            }
        }
        report.rejected.sort_by_key(|rejection| rejection.index);

        info!(
            "event=employee_batch_create module=service status=ok items={} created={} rejected={}",
            candidates.len(),
            report.created.len(),
            report.rejected.len()
        );
        Ok(report)
    }

    /// Lists all employees ordered by ascending id.
    pub fn list_employees(&self) -> ServiceResult<Vec<Employee>> {
        match self.repo.list_employees() {
            Ok(employees) => {
                info!(
                    "event=employee_list module=service status=ok count={}",
                    employees.len()
                );
                Ok(employees)
            }
            Err(err) => {
                let err = EmployeeServiceError::from(err);
                error!("event=employee_list module=service status=error error={err}");
                Err(err)
            }
        }
    }

    /// Validates the candidate and replaces every field of employee `id`.
    ///
    /// Validation runs before the lookup, so an invalid candidate for a
    /// missing id reports the validation error.
    pub fn update_employee(
        &self,
        id: EmployeeId,
        candidate: &EmployeeCandidate,
    ) -> ServiceResult<Employee> {
        let result = candidate
            .validate()
            .map_err(EmployeeServiceError::from)
            .and_then(|draft| {
                self.repo
                    .update_employee(id, &draft)
                    .map_err(EmployeeServiceError::from)
            });
        log_outcome("employee_update", Some(id), &result);
        result
    }

    /// Hard-deletes employee `id`.
    pub fn delete_employee(&self, id: EmployeeId) -> ServiceResult<()> {
        let result = self
            .repo
            .delete_employee(id)
            .map_err(EmployeeServiceError::from);
        match &result {
            Ok(()) => info!("event=employee_delete module=service status=ok id={id}"),
            Err(err) => log_failure("employee_delete", Some(id), err),
        }
        result
    }
}

fn log_outcome(event: &str, id: Option<EmployeeId>, result: &ServiceResult<Employee>) {
    match result {
        Ok(employee) => info!(
            "event={event} module=service status=ok id={}",
            employee.id
        ),
        Err(err) => log_failure(event, id, err),
    }
}

fn log_failure(event: &str, id: Option<EmployeeId>, err: &EmployeeServiceError) {
    let id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
    match err {
        EmployeeServiceError::Storage(inner) => error!(
            "event={event} module=service status=error kind=storage id={id} error={inner}"
        ),
        other => warn!(
            "event={event} module=service status=rejected kind={} id={id}",
            other.kind()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{BulkRejectionReason, EmployeeService, EmployeeServiceError};
    use crate::model::employee::{EmployeeCandidate, EmployeeValidationError};
    use crate::repo::employee_repo::{EmployeeRepository, RepoError};
    use crate::repo::memory_repo::InMemoryEmployeeRepository;

    #[test]
    fn repo_errors_collapse_into_service_kinds() {
        assert!(matches!(
            EmployeeServiceError::from(RepoError::NotFound(4)),
            EmployeeServiceError::NotFound(4)
        ));
        assert!(matches!(
            EmployeeServiceError::from(RepoError::EmailConflict("a@b.c".to_string())),
            EmployeeServiceError::EmailConflict(_)
        ));
        assert!(matches!(
            EmployeeServiceError::from(RepoError::LockPoisoned),
            EmployeeServiceError::Storage(RepoError::LockPoisoned)
        ));
        assert!(matches!(
            EmployeeServiceError::from(RepoError::InvalidData("bad".to_string())),
            EmployeeServiceError::Storage(_)
        ));
    }

    #[test]
    fn invalid_candidate_never_reaches_repository() {
        let repo = InMemoryEmployeeRepository::new();
        let service = EmployeeService::new(&repo);

        let candidate = EmployeeCandidate::new("Bo", "bo@co.com", "Male", 99, "Sales");
        let err = service.create_employee(&candidate).unwrap_err();
        assert!(matches!(
            err,
            EmployeeServiceError::Validation(EmployeeValidationError::AgeOutOfRange)
        ));
        assert!(repo.list_employees().unwrap().is_empty());
    }

    #[test]
    fn create_many_reports_rejections_in_request_order() {
        let repo = InMemoryEmployeeRepository::new();
        let service = EmployeeService::new(&repo);

        let candidates = vec![
            EmployeeCandidate::new("Priya Raman", "priya@co.com", "Female", 29, "HR"),
            EmployeeCandidate::new("Mohan Das", "PRIYA@co.com", "Male", 41, "Finance"),
            EmployeeCandidate::default(),
            EmployeeCandidate::new("Lee Chen", "lee@co.com", "Male", "33", "Finance"),
        ];
        let report = service.create_many(&candidates).unwrap();

        let created: Vec<_> = report.created.iter().map(|e| e.id).collect();
        assert_eq!(created, vec![1, 2]);
        assert_eq!(report.created[1].email, "lee@co.com");

        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].index, 1);
        assert!(matches!(
            report.rejected[0].reason,
            BulkRejectionReason::EmailConflict(_)
        ));
        assert_eq!(report.rejected[1].index, 2);
        assert_eq!(
            report.rejected[1].reason,
            BulkRejectionReason::Validation(EmployeeValidationError::MissingFields)
        );
    }
}
