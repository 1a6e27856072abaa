//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/update/delete over canonical `employees` storage.
//! - Keep SQL details and SQLite error codes inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `EmployeeDraft::validate()` before SQL mutations.
//! - Email uniqueness is enforced by the `UNIQUE COLLATE NOCASE` column, so
//!   the conflict check and the write are a single atomic statement.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Ids come from `AUTOINCREMENT` and are never reissued after deletion.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::employee::{
    Employee, EmployeeDraft, EmployeeId, EmployeeValidationError, Gender,
};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEES_TABLE: &str = "employees";
const REQUIRED_COLUMNS: &[&str] = &["id", "name", "email", "gender", "age", "department"];

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    gender,
    age,
    department
FROM employees";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Draft failed field rules; nothing was written.
    Validation(EmployeeValidationError),
    /// Another record already uses this email (case-insensitive).
    EmailConflict(String),
    NotFound(EmployeeId),
    Db(DbError),
    /// A persisted row violates the employee invariants.
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// A lock guarding the store was poisoned by a panicking writer.
    LockPoisoned,
}

impl RepoError {
    /// Returns whether this is an unexpected backend fault rather than an
    /// expected, caller-reportable outcome.
    pub fn is_storage_failure(&self) -> bool {
        !matches!(
            self,
            Self::Validation(_) | Self::EmailConflict(_) | Self::NotFound(_)
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmailConflict(email) => write!(f, "email already exists: {email}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted employee data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::LockPoisoned => write!(f, "employee store lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Per-item result of [`EmployeeRepository::create_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchItemOutcome {
    Created(Employee),
    EmailConflict(String),
}

/// Repository interface for employee CRUD operations.
///
/// Implementations must be interchangeable: the same calls produce the same
/// outcomes whatever the backing store.
pub trait EmployeeRepository {
    /// Persists a new employee and returns it with its assigned id.
    fn create_employee(&self, draft: &EmployeeDraft) -> RepoResult<Employee>;
    /// Persists several employees in one unit of work.
    ///
    /// Email conflicts reject only the offending item. Any other failure
    /// discards the whole batch.
    fn create_batch(&self, drafts: &[EmployeeDraft]) -> RepoResult<Vec<BatchItemOutcome>>;
    /// Returns every employee ordered by ascending id.
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    /// Replaces all fields of an existing employee.
    fn update_employee(&self, id: EmployeeId, draft: &EmployeeDraft) -> RepoResult<Employee>;
    /// Hard-deletes an employee.
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
}

impl<R: EmployeeRepository + ?Sized> EmployeeRepository for &R {
    fn create_employee(&self, draft: &EmployeeDraft) -> RepoResult<Employee> {
        (**self).create_employee(draft)
    }

    fn create_batch(&self, drafts: &[EmployeeDraft]) -> RepoResult<Vec<BatchItemOutcome>> {
        (**self).create_batch(drafts)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        (**self).list_employees()
    }

    fn update_employee(&self, id: EmployeeId, draft: &EmployeeDraft) -> RepoResult<Employee> {
        (**self).update_employee(id, draft)
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        (**self).delete_employee(id)
    }
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the `employees` layout.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::check_schema(conn)?;
        Ok(Self { conn })
    }

    /// Runs the schema checks of [`Self::try_new`] without building a
    /// repository.
    pub fn check_schema(conn: &Connection) -> RepoResult<()> {
        ensure_connection_ready(conn)
    }

    /// Wraps a connection that already passed [`Self::check_schema`].
    ///
    /// Skips the schema queries; for callers that own the connection for the
    /// whole process and verified it once at startup.
    pub fn from_checked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, draft: &EmployeeDraft) -> RepoResult<Employee> {
        draft.validate()?;
        insert_employee(self.conn, draft)
    }

    fn create_batch(&self, drafts: &[EmployeeDraft]) -> RepoResult<Vec<BatchItemOutcome>> {
        for draft in drafts {
            draft.validate()?;
        }

        // A failed INSERT only rolls back its own statement, so conflicts
        // leave earlier items of the batch in place.
        let tx = self.conn.unchecked_transaction()?;
        let mut outcomes = Vec::with_capacity(drafts.len());
        for draft in drafts {
            match insert_employee(&tx, draft) {
                Ok(employee) => outcomes.push(BatchItemOutcome::Created(employee)),
                Err(RepoError::EmailConflict(email)) => {
                    outcomes.push(BatchItemOutcome::EmailConflict(email));
                }
                Err(err) => return Err(err),
            }
        }
        tx.commit()?;

        Ok(outcomes)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn update_employee(&self, id: EmployeeId, draft: &EmployeeDraft) -> RepoResult<Employee> {
        draft.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE employees
                 SET
                    name = ?1,
                    email = ?2,
                    gender = ?3,
                    age = ?4,
                    department = ?5
                 WHERE id = ?6;",
                params![
                    draft.name.as_str(),
                    draft.email.as_str(),
                    draft.gender.as_str(),
                    draft.age,
                    draft.department.as_str(),
                    id,
                ],
            )
            .map_err(|err| classify_write_error(err, &draft.email))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(Employee::from_draft(id, draft.clone()))
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn insert_employee(conn: &Connection, draft: &EmployeeDraft) -> RepoResult<Employee> {
    conn.execute(
        "INSERT INTO employees (
            name,
            email,
            gender,
            age,
            department
        ) VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            draft.name.as_str(),
            draft.email.as_str(),
            draft.gender.as_str(),
            draft.age,
            draft.department.as_str(),
        ],
    )
    .map_err(|err| classify_write_error(err, &draft.email))?;

    Ok(Employee::from_draft(conn.last_insert_rowid(), draft.clone()))
}

fn classify_write_error(err: rusqlite::Error, email: &str) -> RepoError {
    // `email` is the only UNIQUE column besides the primary key, which
    // reports a different extended code.
    let err = DbError::from(err);
    if err.is_unique_violation() {
        RepoError::EmailConflict(email.to_string())
    } else {
        RepoError::Db(err)
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id: EmployeeId = row.get("id")?;

    let gender_text: String = row.get("gender")?;
    let gender = Gender::parse(&gender_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid gender `{gender_text}` in employees.gender (id {id})"
        ))
    })?;

    let age_value: i64 = row.get("age")?;
    let age = u8::try_from(age_value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid age `{age_value}` in employees.age (id {id})"
        ))
    })?;

    let draft = EmployeeDraft {
        name: row.get("name")?,
        email: row.get("email")?,
        gender,
        age,
        department: row.get("department")?,
    };
    draft
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("employee {id}: {err}")))?;

    Ok(Employee::from_draft(id, draft))
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    if actual_version > expected_version {
        return Err(RepoError::Db(DbError::UnsupportedSchemaVersion {
            db_version: actual_version,
            latest_supported: expected_version,
        }));
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [EMPLOYEES_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(EMPLOYEES_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([EMPLOYEES_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in REQUIRED_COLUMNS {
        if !columns.iter().any(|existing| existing.as_str() == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: EMPLOYEES_TABLE,
                column,
            });
        }
    }

    Ok(())
}
