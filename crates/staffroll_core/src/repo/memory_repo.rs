//! In-memory employee repository.
//!
//! # Responsibility
//! - Provide a process-local `EmployeeRepository` with the same observable
//!   contract as the SQLite implementation.
//! - Serve as the storage double for service-level tests.
//!
//! # Invariants
//! - Records and the id counter live behind one lock; the email check and the
//!   write it guards happen under that lock.
//! - Email comparison folds ASCII case only, matching SQLite `NOCASE`.
//! - The id counter only moves forward; deleted ids are never reissued.

use crate::model::employee::{Employee, EmployeeDraft, EmployeeId};
use crate::repo::employee_repo::{BatchItemOutcome, EmployeeRepository, RepoError, RepoResult};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    employees: BTreeMap<EmployeeId, Employee>,
    last_issued_id: EmployeeId,
}

impl MemoryState {
    fn email_taken(&self, email: &str, except: Option<EmployeeId>) -> bool {
        self.employees
            .values()
            .any(|existing| Some(existing.id) != except && existing.email.eq_ignore_ascii_case(email))
    }

    fn insert(&mut self, draft: &EmployeeDraft) -> RepoResult<Employee> {
        if self.email_taken(&draft.email, None) {
            return Err(RepoError::EmailConflict(draft.email.clone()));
        }

        self.last_issued_id += 1;
        let employee = Employee::from_draft(self.last_issued_id, draft.clone());
        self.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }
}

/// Mutex-guarded employee store that lives for the lifetime of the value.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryEmployeeRepository {
    /// Creates an empty store whose first id will be `1`.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| RepoError::LockPoisoned)
    }
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn create_employee(&self, draft: &EmployeeDraft) -> RepoResult<Employee> {
        draft.validate()?;
        self.lock()?.insert(draft)
    }

    fn create_batch(&self, drafts: &[EmployeeDraft]) -> RepoResult<Vec<BatchItemOutcome>> {
        for draft in drafts {
            draft.validate()?;
        }

        let mut state = self.lock()?;
        let mut outcomes = Vec::with_capacity(drafts.len());
        for draft in drafts {
            match state.insert(draft) {
                Ok(employee) => outcomes.push(BatchItemOutcome::Created(employee)),
                Err(RepoError::EmailConflict(email)) => {
                    outcomes.push(BatchItemOutcome::EmailConflict(email));
                }
                Err(err) => return Err(err),
            }
        }

        Ok(outcomes)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        Ok(self.lock()?.employees.values().cloned().collect())
    }

    fn update_employee(&self, id: EmployeeId, draft: &EmployeeDraft) -> RepoResult<Employee> {
        draft.validate()?;

        let mut state = self.lock()?;
        if !state.employees.contains_key(&id) {
            return Err(RepoError::NotFound(id));
        }
        if state.email_taken(&draft.email, Some(id)) {
            return Err(RepoError::EmailConflict(draft.email.clone()));
        }

        let employee = Employee::from_draft(id, draft.clone());
        state.employees.insert(id, employee.clone());
        Ok(employee)
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        self.lock()?
            .employees
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryEmployeeRepository;
    use crate::model::employee::{EmployeeDraft, Gender};
    use crate::repo::employee_repo::{EmployeeRepository, RepoError};

    fn draft(email: &str) -> EmployeeDraft {
        EmployeeDraft {
            name: "Grace Hopper".to_string(),
            email: email.to_string(),
            gender: Gender::Female,
            age: 40,
            department: "Research".to_string(),
        }
    }

    #[test]
    fn email_comparison_folds_ascii_case_only() {
        let repo = InMemoryEmployeeRepository::new();
        repo.create_employee(&draft("grace@navy.mil")).unwrap();

        let err = repo.create_employee(&draft("GRACE@Navy.MIL")).unwrap_err();
        assert!(matches!(err, RepoError::EmailConflict(_)));

        // Non-ASCII letters are compared byte-wise, as SQLite NOCASE does.
        repo.create_employee(&draft("émile@navy.mil")).unwrap();
        repo.create_employee(&draft("Émile@navy.mil")).unwrap();
    }

    #[test]
    fn poisoned_lock_surfaces_as_storage_failure() {
        let repo = std::sync::Arc::new(InMemoryEmployeeRepository::new());
        let poisoner = std::sync::Arc::clone(&repo);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.state.lock().unwrap();
            panic!("poison the store");
        })
        .join();

        let err = repo.list_employees().unwrap_err();
        assert!(matches!(err, RepoError::LockPoisoned));
        assert!(err.is_storage_failure());
    }
}
