//! # Employee Routes
//!
//! - `GET /api/employees`
//! - `POST /api/employees` (object or array)
//! - `PUT /api/employees/:id`
//! - `DELETE /api/employees/:id`
//! - `GET /health`

use crate::error::{ApiError, Operation};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use staffroll_core::{core_version, BulkRejection, Employee, EmployeeCandidate, EmployeeId};

const BULK_CREATED_MESSAGE: &str = "Multiple employees created";
const BODY_SHAPE_MESSAGE: &str = "expected an employee object or an array of employee objects";

/// Build the employee API router.
pub fn employee_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/employees", get(list_employees).post(create_employees))
        .route(
            "/api/employees/:id",
            put(update_employee).delete(delete_employee),
        )
        .with_state(state)
}

/// `POST /api/employees` accepts one candidate or a list of them.
#[derive(Debug)]
enum CreatePayload {
    Many(Vec<EmployeeCandidate>),
    One(EmployeeCandidate),
}

impl CreatePayload {
    fn from_json(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(candidate_from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Many),
            other => candidate_from_json(other).map(Self::One),
        }
    }
}

/// Field values stay raw so type mismatches reach the validator; only the
/// outer shape is checked here.
fn candidate_from_json(value: Value) -> Result<EmployeeCandidate, ApiError> {
    if !value.is_object() {
        return Err(ApiError::InvalidBody(BODY_SHAPE_MESSAGE.to_string()));
    }
    serde_json::from_value(value).map_err(|_| ApiError::InvalidBody(BODY_SHAPE_MESSAGE.to_string()))
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))
}

#[derive(Debug, Serialize)]
struct BulkCreateResponse {
    message: &'static str,
    data: Vec<Employee>,
    rejected: Vec<RejectedItem>,
}

#[derive(Debug, Serialize)]
struct RejectedItem {
    index: usize,
    error: String,
}

impl From<BulkRejection> for RejectedItem {
    fn from(rejection: BulkRejection) -> Self {
        Self {
            index: rejection.index,
            error: rejection.reason.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    success: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: core_version(),
    })
}

async fn list_employees(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = state
        .with_employee_service(Operation::Fetch, |service| service.list_employees())
        .await?;
    Ok(Json(employees))
}

async fn create_employees(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    match CreatePayload::from_json(json_body(payload)?)? {
        CreatePayload::One(candidate) => {
            let employee = state
                .with_employee_service(Operation::Insert, move |service| {
                    service.create_employee(&candidate)
                })
                .await?;
            Ok(Json(employee).into_response())
        }
        CreatePayload::Many(candidates) => {
            let report = state
                .with_employee_service(Operation::Insert, move |service| {
                    service.create_many(&candidates)
                })
                .await?;
            let body = BulkCreateResponse {
                message: BULK_CREATED_MESSAGE,
                data: report.created,
                rejected: report.rejected.into_iter().map(RejectedItem::from).collect(),
            };
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
    }
}

async fn update_employee(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    let candidate = candidate_from_json(json_body(payload)?)?;
    let Some(id) = parse_id(&raw_id) else {
        // Field errors take precedence over an id that cannot exist.
        candidate
            .validate()
            .map_err(|err| ApiError::Validation(err.to_string()))?;
        return Err(ApiError::NotFound);
    };

    let employee = state
        .with_employee_service(Operation::Update, move |service| {
            service.update_employee(id, &candidate)
        })
        .await?;
    Ok(Json(employee))
}

async fn delete_employee(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_id(&raw_id).ok_or(ApiError::NotFound)?;
    state
        .with_employee_service(Operation::Delete, move |service| {
            service.delete_employee(id)
        })
        .await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// Ids that are not integers cannot name a stored employee.
fn parse_id(raw: &str) -> Option<EmployeeId> {
    raw.trim().parse().ok()
}
