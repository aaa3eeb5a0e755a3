//! Student API Handlers
//!
//! HTTP handlers for the student CRUD operations.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::student_dto::*},
    error::AppError,
    models::student::{Student, StudentPatch},
    services::student::StudentFilter,
};

/// 超出请求体上限时保留 413，其余解析失败统一为 400
fn invalid_json(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(rejection.body_text())
    } else {
        AppError::Validation(rejection.body_text())
    }
}

/// Create a new student
///
/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload.map_err(invalid_json)?;
    let student = Student::from_json(body)?;
    debug!("Creating student: {}", student.name);

    let id = state.student_service.create(student).await?;

    Ok((StatusCode::CREATED, Json(CreateStudentResponse { id })))
}

/// List students, optionally filtered by country and minimum age
///
/// GET /api/students?country=&age=
pub async fn list_students(
    State(state): State<AppState>,
    params: Result<Query<ListStudentsParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) =
        params.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let filter = StudentFilter::try_from(params)?;
    debug!("Listing students: {:?}", filter);

    let data = state.student_service.list(&filter).await?;

    Ok(Json(ListStudentsResponse { data }))
}

/// Get a student by ID
///
/// GET /api/students/:id
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting student: {}", id);

    let student = state.student_service.get(&id).await?;

    Ok(Json(student))
}

/// Partially update a student; only the supplied fields are written
///
/// PATCH /api/students/:id
pub async fn patch_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload.map_err(invalid_json)?;
    let patch = StudentPatch::from_json(body)?;
    debug!("Patching student: {}", id);

    state.student_service.patch(&id, &patch).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a student
///
/// DELETE /api/students/:id
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Deleting student: {}", id);

    state.student_service.delete(&id).await?;

    Ok(Json(EmptyResponse {}))
}

/// Service greeting
///
/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Rollcall student registry is running".to_string(),
    })
}
