//! Employee domain model and field validation.
//!
//! # Responsibility
//! - Define the raw input (`EmployeeCandidate`), the normalized record
//!   (`EmployeeDraft`) and the stored record (`Employee`).
//! - Own every field rule an employee must satisfy.
//!
//! # Invariants
//! - Candidate validation is pure and reports only the first failing rule.
//! - Rule order is presence, name, department, email, gender, age.
//! - `id` is assigned by storage and never changes afterwards.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned employee identifier.
pub type EmployeeId = i64;

/// Youngest accepted age, inclusive.
pub const MIN_AGE: u8 = 18;
/// Oldest accepted age, inclusive.
pub const MAX_AGE: u8 = 65;

// 2-50 chars, leading letter, then letters/space/period/apostrophe/hyphen.
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z .'\-]{1,49}$").expect("valid name regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Employee gender. Matching on input is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Returns the canonical wire/storage spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    /// Parses the exact canonical spelling; anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            _ => None,
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a candidate or draft was rejected.
///
/// `Display` yields the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeValidationError {
    /// At least one of the five fields is absent or blank.
    MissingFields,
    InvalidName,
    InvalidDepartment,
    InvalidEmail,
    InvalidGender,
    /// Age could not be read as a whole number.
    AgeNotANumber,
    /// Age is a whole number outside `MIN_AGE..=MAX_AGE`.
    AgeOutOfRange,
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::MissingFields => "All fields are required.",
            Self::InvalidName => "Name must contain letters only (2-50).",
            Self::InvalidDepartment => "Department: letters only (2-50).",
            Self::InvalidEmail => "Invalid e-mail address.",
            Self::InvalidGender => "Gender must be Male or Female.",
            Self::AgeNotANumber => "Age must be a whole number.",
            Self::AgeOutOfRange => "Age must be between 18 and 65.",
        };
        f.write_str(message)
    }
}

impl Error for EmployeeValidationError {}

/// Unvalidated employee input as received from a caller.
///
/// Every field keeps the raw JSON value so that any input, whatever its
/// type, reaches [`EmployeeCandidate::validate`] and fails the rule of the
/// field it was given for. A missing key, `null` and a blank string are all
/// reported as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeCandidate {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub gender: Option<Value>,
    pub age: Option<Value>,
    pub department: Option<Value>,
}

impl EmployeeCandidate {
    /// Builds a fully populated candidate.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        gender: impl Into<String>,
        age: impl Into<Value>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(Value::String(name.into())),
            email: Some(Value::String(email.into())),
            gender: Some(Value::String(gender.into())),
            age: Some(age.into()),
            department: Some(Value::String(department.into())),
        }
    }

    /// Checks every rule in order and returns the normalized record.
    ///
    /// Strings are trimmed before any rule runs; a whitespace-only value
    /// counts as missing. A non-string value for a text field is present but
    /// fails that field's rule.
    pub fn validate(&self) -> Result<EmployeeDraft, EmployeeValidationError> {
        let (Some(name), Some(email), Some(gender), Some(age), Some(department)) = (
            present(self.name.as_ref()),
            present(self.email.as_ref()),
            present(self.gender.as_ref()),
            present(self.age.as_ref()),
            present(self.department.as_ref()),
        ) else {
            return Err(EmployeeValidationError::MissingFields);
        };

        let name = text(name).ok_or(EmployeeValidationError::InvalidName)?;
        check_name(name)?;
        let department = text(department).ok_or(EmployeeValidationError::InvalidDepartment)?;
        check_department(department)?;
        let email = text(email).ok_or(EmployeeValidationError::InvalidEmail)?;
        check_email(email)?;
        let gender = text(gender)
            .and_then(Gender::parse)
            .ok_or(EmployeeValidationError::InvalidGender)?;
        let age = parse_age(age)?;

        Ok(EmployeeDraft {
            name: name.to_string(),
            email: email.to_string(),
            gender,
            age,
            department: department.to_string(),
        })
    }
}

/// A candidate that passed validation, with canonical types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub age: u8,
    pub department: String,
}

impl EmployeeDraft {
    /// Re-checks a typed draft against the field rules.
    ///
    /// Storage write paths call this so drafts assembled in code cannot
    /// bypass validation.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        check_name(&self.name)?;
        check_department(&self.department)?;
        check_email(&self.email)?;
        check_age_range(i64::from(self.age))?;
        Ok(())
    }
}

/// Stored employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub age: u8,
    pub department: String,
}

impl Employee {
    /// Attaches a storage-assigned id to a draft.
    pub fn from_draft(id: EmployeeId, draft: EmployeeDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            gender: draft.gender,
            age: draft.age,
            department: draft.department,
        }
    }

    /// Returns the record fields without the id.
    pub fn draft(&self) -> EmployeeDraft {
        EmployeeDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            gender: self.gender,
            age: self.age,
            department: self.department.clone(),
        }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(other) => Some(other),
    }
}

fn text(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim)
}

fn check_name(value: &str) -> Result<(), EmployeeValidationError> {
    if NAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(EmployeeValidationError::InvalidName)
    }
}

fn check_department(value: &str) -> Result<(), EmployeeValidationError> {
    if NAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(EmployeeValidationError::InvalidDepartment)
    }
}

fn check_email(value: &str) -> Result<(), EmployeeValidationError> {
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(EmployeeValidationError::InvalidEmail)
    }
}

fn parse_age(value: &Value) -> Result<u8, EmployeeValidationError> {
    match value {
        Value::Number(number) => {
            if let Some(whole) = number.as_i64() {
                check_age_range(whole)
            } else if number.is_u64() {
                // Larger than i64::MAX.
                Err(EmployeeValidationError::AgeOutOfRange)
            } else {
                number
                    .as_f64()
                    .ok_or(EmployeeValidationError::AgeNotANumber)
                    .and_then(whole_float_age)
            }
        }
        Value::String(text) => {
            let text = text.trim();
            match text.parse::<i64>() {
                Ok(whole) => check_age_range(whole),
                Err(_) => text
                    .parse::<f64>()
                    .map_err(|_| EmployeeValidationError::AgeNotANumber)
                    .and_then(whole_float_age),
            }
        }
        _ => Err(EmployeeValidationError::AgeNotANumber),
    }
}

fn whole_float_age(value: f64) -> Result<u8, EmployeeValidationError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(EmployeeValidationError::AgeNotANumber);
    }
    if value < f64::from(MIN_AGE) || value > f64::from(MAX_AGE) {
        return Err(EmployeeValidationError::AgeOutOfRange);
    }
    check_age_range(value as i64)
}

fn check_age_range(value: i64) -> Result<u8, EmployeeValidationError> {
    if (i64::from(MIN_AGE)..=i64::from(MAX_AGE)).contains(&value) {
        u8::try_from(value).map_err(|_| EmployeeValidationError::AgeOutOfRange)
    } else {
        Err(EmployeeValidationError::AgeOutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::{check_age_range, parse_age, EmployeeValidationError, Gender};
    use serde_json::json;

    #[test]
    fn gender_parse_is_case_sensitive() {
        assert_eq!(Gender::parse("Male"), Some(Gender::Male));
        assert_eq!(Gender::parse("Female"), Some(Gender::Female));
        assert_eq!(Gender::parse("male"), None);
        assert_eq!(Gender::parse("FEMALE"), None);
    }

    #[test]
    fn age_range_boundaries() {
        assert_eq!(check_age_range(18), Ok(18));
        assert_eq!(check_age_range(65), Ok(65));
        assert_eq!(
            check_age_range(17),
            Err(EmployeeValidationError::AgeOutOfRange)
        );
        assert_eq!(
            check_age_range(66),
            Err(EmployeeValidationError::AgeOutOfRange)
        );
    }

    #[test]
    fn age_accepts_numeric_strings_and_whole_floats() {
        assert_eq!(parse_age(&json!("42")), Ok(42));
        assert_eq!(parse_age(&json!(" 30 ")), Ok(30));
        assert_eq!(parse_age(&json!(30.0)), Ok(30));
        assert_eq!(parse_age(&json!("65.0")), Ok(65));
    }

    #[test]
    fn age_rejects_non_numbers_distinctly_from_range() {
        assert_eq!(
            parse_age(&json!("thirty")),
            Err(EmployeeValidationError::AgeNotANumber)
        );
        assert_eq!(
            parse_age(&json!(30.5)),
            Err(EmployeeValidationError::AgeNotANumber)
        );
        assert_eq!(
            parse_age(&json!(true)),
            Err(EmployeeValidationError::AgeNotANumber)
        );
        assert_eq!(
            parse_age(&json!("NaN")),
            Err(EmployeeValidationError::AgeNotANumber)
        );
        assert_eq!(
            parse_age(&json!("17")),
            Err(EmployeeValidationError::AgeOutOfRange)
        );
        assert_eq!(
            parse_age(&json!(u64::MAX)),
            Err(EmployeeValidationError::AgeOutOfRange)
        );
        assert_eq!(
            parse_age(&json!(1e300)),
            Err(EmployeeValidationError::AgeOutOfRange)
        );
    }
}
