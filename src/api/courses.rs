//! Course catalog API endpoints.

use axum::extract::{Path, State};

use super::{ApiResponse, ApiResult};
use crate::errors::AppError;
use crate::models::Course;
use crate::AppState;

/// GET /api/courses - List the catalog.
pub async fn list_courses(State(state): State<AppState>) -> ApiResult<Vec<Course>> {
    let courses = state.courses.all().to_vec();
    let count = courses.len();
    Ok(ApiResponse::new(courses).with_count(count))
}

/// GET /api/courses/:id - Get a single course.
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Course> {
    state
        .courses
        .find(&id)
        .cloned()
        .map(ApiResponse::new)
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
}
