use serde_json::json;
use staffroll_core::{
    Employee, EmployeeCandidate, EmployeeDraft, EmployeeValidationError, Gender,
};

fn valid() -> EmployeeCandidate {
    EmployeeCandidate::new("Alice Smith", "alice@co.com", "Female", 30, "Engineering")
}

fn rejects(candidate: &EmployeeCandidate) -> EmployeeValidationError {
    candidate.validate().unwrap_err()
}

#[test]
fn valid_candidate_normalizes_to_draft() {
    let mut candidate = valid();
    candidate.name = Some(json!("  Alice Smith "));
    candidate.age = Some(json!("30"));

    let draft = candidate.validate().unwrap();
    assert_eq!(
        draft,
        EmployeeDraft {
            name: "Alice Smith".to_string(),
            email: "alice@co.com".to_string(),
            gender: Gender::Female,
            age: 30,
            department: "Engineering".to_string(),
        }
    );
}

#[test]
fn any_missing_or_blank_field_reports_generic_presence_error() {
    let blankers: [fn(&mut EmployeeCandidate); 10] = [
        |c| c.name = None,
        |c| c.email = None,
        |c| c.gender = None,
        |c| c.age = None,
        |c| c.department = None,
        |c| c.name = Some(json!("")),
        |c| c.email = Some(json!("   ")),
        |c| c.gender = Some(json!("")),
        |c| c.age = Some(json!("")),
        |c| c.age = Some(json!(null)),
    ];

    for blank in blankers {
        let mut candidate = valid();
        blank(&mut candidate);
        assert_eq!(rejects(&candidate), EmployeeValidationError::MissingFields);
    }

    // Presence wins even when other fields are also invalid.
    let mut candidate = valid();
    candidate.department = None;
    candidate.name = Some(json!("1"));
    candidate.age = Some(json!(200));
    assert_eq!(rejects(&candidate), EmployeeValidationError::MissingFields);
    assert_eq!(
        EmployeeValidationError::MissingFields.to_string(),
        "All fields are required."
    );
}

#[test]
fn rules_are_checked_in_documented_order() {
    let mut candidate = EmployeeCandidate::new("X", "nope", "Other", 5, "Y");
    assert_eq!(rejects(&candidate), EmployeeValidationError::InvalidName);

    candidate.name = Some(json!("Xavier"));
    assert_eq!(rejects(&candidate), EmployeeValidationError::InvalidDepartment);

    candidate.department = Some(json!("Yard"));
    assert_eq!(rejects(&candidate), EmployeeValidationError::InvalidEmail);

    candidate.email = Some(json!("x@y.z"));
    assert_eq!(rejects(&candidate), EmployeeValidationError::InvalidGender);

    candidate.gender = Some(json!("Male"));
    assert_eq!(rejects(&candidate), EmployeeValidationError::AgeOutOfRange);

    candidate.age = Some(json!(18));
    assert!(candidate.validate().is_ok());
}

#[test]
fn name_and_department_length_boundaries() {
    let two = "Al".to_string();
    let fifty = format!("A{}", "b".repeat(49));
    let fifty_one = format!("A{}", "b".repeat(50));
    assert_eq!(fifty.len(), 50);
    assert_eq!(fifty_one.len(), 51);

    for accepted in [&two, &fifty] {
        let mut candidate = valid();
        candidate.name = Some(json!(accepted));
        candidate.department = Some(json!(accepted));
        assert!(candidate.validate().is_ok(), "{accepted} should pass");
    }

    let mut candidate = valid();
    candidate.name = Some(json!("A"));
    assert_eq!(rejects(&candidate), EmployeeValidationError::InvalidName);
    candidate.name = Some(json!(fifty_one));
    assert_eq!(rejects(&candidate), EmployeeValidationError::InvalidName);

    let mut candidate = valid();
    candidate.department = Some(json!("R"));
    assert_eq!(rejects(&candidate), EmployeeValidationError::InvalidDepartment);
    candidate.department = Some(json!(fifty_one));
    assert_eq!(rejects(&candidate), EmployeeValidationError::InvalidDepartment);
}

#[test]
fn name_charset_allows_punctuation_after_leading_letter() {
    for accepted in ["Mary-Jane O'Neil", "J. R. R. Tolkien", "Li"] {
        let mut candidate = valid();
        candidate.name = Some(json!(accepted));
        assert!(candidate.validate().is_ok(), "{accepted} should pass");
    }
    for rejected in ["'Quote", "-Dash", " ", "R2D2", "Zoë", "Anne_Marie"] {
        let mut candidate = valid();
        candidate.name = Some(json!(format!("{rejected}x")));
        assert!(candidate.validate().is_err(), "{rejected}x should fail");
    }
}

#[test]
fn email_shape_rules() {
    for accepted in ["a@b.c", "first.last@sub.example.org", "x+tag@co.io"] {
        let mut candidate = valid();
        candidate.email = Some(json!(accepted));
        assert!(candidate.validate().is_ok(), "{accepted} should pass");
    }
    for rejected in ["ab.c", "a@bc", "a@.c@", "a b@c.d", "@b.c", "a@b.", "a@@b.c"] {
        let mut candidate = valid();
        candidate.email = Some(json!(rejected));
        assert_eq!(
            rejects(&candidate),
            EmployeeValidationError::InvalidEmail,
            "{rejected} should fail"
        );
    }
}

#[test]
fn non_string_values_fail_their_own_rule_in_order() {
    let partial: EmployeeCandidate = serde_json::from_value(json!({ "name": 7 })).unwrap();
    assert_eq!(rejects(&partial), EmployeeValidationError::MissingFields);

    let cases = [
        ("name", json!(12345), EmployeeValidationError::InvalidName),
        ("department", json!(["Sales"]), EmployeeValidationError::InvalidDepartment),
        ("email", json!(true), EmployeeValidationError::InvalidEmail),
        ("gender", json!(1), EmployeeValidationError::InvalidGender),
        ("age", json!({ "years": 30 }), EmployeeValidationError::AgeNotANumber),
    ];
    for (field, value, expected) in cases {
        let mut raw = serde_json::to_value(valid()).unwrap();
        raw[field] = value;
        let candidate: EmployeeCandidate = serde_json::from_value(raw).unwrap();
        assert_eq!(rejects(&candidate), expected, "{field}");
    }

    // An earlier rule still wins over a later non-string field.
    let mut candidate = valid();
    candidate.name = Some(json!("X"));
    candidate.gender = Some(json!(1));
    assert_eq!(rejects(&candidate), EmployeeValidationError::InvalidName);
}

#[test]
fn gender_is_exact_match() {
    for rejected in ["male", "FEMALE", "M", "Other"] {
        let mut candidate = valid();
        candidate.gender = Some(json!(rejected));
        assert_eq!(rejects(&candidate), EmployeeValidationError::InvalidGender);
    }
}

#[test]
fn age_accepted_iff_within_inclusive_range() {
    for age in -5..=100_i64 {
        let mut candidate = valid();
        candidate.age = Some(json!(age));
        let result = candidate.validate();
        if (18..=65).contains(&age) {
            assert_eq!(result.unwrap().age as i64, age);
        } else {
            assert_eq!(result.unwrap_err(), EmployeeValidationError::AgeOutOfRange);
        }
    }
}

#[test]
fn non_numeric_age_is_distinct_from_out_of_range() {
    let mut candidate = valid();
    candidate.age = Some(json!("abc"));
    assert_eq!(rejects(&candidate), EmployeeValidationError::AgeNotANumber);

    candidate.age = Some(json!(["30"]));
    assert_eq!(rejects(&candidate), EmployeeValidationError::AgeNotANumber);

    candidate.age = Some(json!("66"));
    assert_eq!(rejects(&candidate), EmployeeValidationError::AgeOutOfRange);
    assert_eq!(
        EmployeeValidationError::AgeOutOfRange.to_string(),
        "Age must be between 18 and 65."
    );
}

#[test]
fn draft_validate_guards_hand_built_drafts() {
    let mut draft = valid().validate().unwrap();
    assert!(draft.validate().is_ok());

    draft.age = 70;
    assert_eq!(draft.validate(), Err(EmployeeValidationError::AgeOutOfRange));

    draft.age = 40;
    draft.email = "broken".to_string();
    assert_eq!(draft.validate(), Err(EmployeeValidationError::InvalidEmail));
}

#[test]
fn employee_serialization_uses_flat_wire_fields() {
    let employee = Employee::from_draft(7, valid().validate().unwrap());

    let value = serde_json::to_value(&employee).unwrap();
    assert_eq!(
        value,
        json!({
            "id": 7,
            "name": "Alice Smith",
            "email": "alice@co.com",
            "gender": "Female",
            "age": 30,
            "department": "Engineering"
        })
    );
    assert_eq!(employee.draft(), valid().validate().unwrap());
}

#[test]
fn candidate_deserializes_from_partial_json() {
    let candidate: EmployeeCandidate =
        serde_json::from_value(json!({ "name": "Bo Li", "age": "41" })).unwrap();
    assert_eq!(candidate.name, Some(json!("Bo Li")));
    assert_eq!(candidate.email, None);
    assert_eq!(candidate.age, Some(json!("41")));
    assert_eq!(
        candidate.validate(),
        Err(EmployeeValidationError::MissingFields)
    );
}
