//! Shared request state.
//!
//! One SQLite connection serves the whole process. Core calls block, so they
//! run on tokio's blocking pool with the connection locked for the call.

use crate::error::{ApiError, Operation};
use log::error;
use rusqlite::Connection;
use staffroll_core::{
    EmployeeService, EmployeeServiceError, RepoError, ServiceResult, SqliteEmployeeRepository,
};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// Fails when the connection's schema is not usable by the employee
    /// repository, so misconfiguration surfaces at startup rather than on the
    /// first request. Requests reuse this check.
    pub fn try_new(conn: Connection) -> Result<Self, RepoError> {
        SqliteEmployeeRepository::check_schema(&conn)?;
        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` against an employee service on the blocking pool.
    pub async fn with_employee_service<T, F>(&self, operation: Operation, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&EmployeeService<SqliteEmployeeRepository<'_>>) -> ServiceResult<T>
            + Send
            + 'static,
    {
        let db = Arc::clone(&self.db);
        let joined = tokio::task::spawn_blocking(move || -> ServiceResult<T> {
            let conn = db
                .lock()
                .map_err(|_| EmployeeServiceError::Storage(RepoError::LockPoisoned))?;
            let service = EmployeeService::new(SqliteEmployeeRepository::from_checked(&conn));
            f(&service)
        })
        .await;

        match joined {
            Ok(result) => result.map_err(|err| ApiError::from_service(operation, err)),
            Err(err) => {
                error!(
                    "event=blocking_task module=api status=error operation={:?} error={}",
                    operation, err
                );
                Err(ApiError::Storage(operation))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffroll_core::db::open_db_in_memory;

    #[test]
    fn test_try_new_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(matches!(
            AppState::try_new(conn),
            Err(RepoError::UninitializedConnection { .. })
        ));
    }

    #[tokio::test]
    async fn test_requests_reuse_startup_schema_check() {
        let state = AppState::try_new(open_db_in_memory().unwrap()).unwrap();
        state
            .db
            .lock()
            .unwrap()
            .execute_batch("PRAGMA user_version = 0;")
            .unwrap();

        let employees = state
            .with_employee_service(Operation::Fetch, |service| service.list_employees())
            .await
            .unwrap();
        assert!(employees.is_empty());
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_a_storage_failure() {
        let state = AppState::try_new(open_db_in_memory().unwrap()).unwrap();
        let db = Arc::clone(&state.db);
        let _ = std::thread::spawn(move || {
            let _guard = db.lock().unwrap();
            panic!("poison the connection lock");
        })
        .join();

        let err = state
            .with_employee_service(Operation::Fetch, |service| service.list_employees())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Storage(Operation::Fetch)));
        assert_eq!(err.to_string(), "Failed to fetch employees.");
    }
}
