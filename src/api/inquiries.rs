//! Inquiry API endpoints.
//!
//! Every successful mutation is announced to notification subscribers.

use axum::extract::{Path, State};
use chrono::Utc;

use super::{ApiResponse, ApiResult};
use crate::errors::{AppError, AppJson};
use crate::models::{
    CreateInquiryRequest, DeletedInquiry, Inquiry, InquiryStatus, NotificationEvent,
    UpdateInquiryStatusRequest,
};
use crate::AppState;

/// GET /api/inquiries - List all inquiries, newest first.
pub async fn list_inquiries(State(state): State<AppState>) -> ApiResult<Vec<Inquiry>> {
    let inquiries = state.inquiries.list().await;
    let count = inquiries.len();

    Ok(ApiResponse::new(inquiries)
        .with_count(count)
        .with_mode(state.inquiries.mode()))
}

/// POST /api/inquiries - Submit a new inquiry.
pub async fn create_inquiry(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateInquiryRequest>,
) -> ApiResult<Inquiry> {
    let inquiry = request.into_inquiry(Utc::now()).ok_or_else(|| {
        AppError::Validation("Please provide all required fields".to_string())
    })?;

    let inquiry = state.inquiries.create(inquiry).await;
    tracing::info!(id = %inquiry.id, course = %inquiry.course, "Inquiry submitted");

    state
        .notifier
        .publish(&NotificationEvent::NewInquiry(inquiry.clone()));

    Ok(ApiResponse::created(inquiry)
        .with_message("Inquiry submitted successfully")
        .with_mode(state.inquiries.mode()))
}

/// PATCH /api/inquiries/:id/status - Change an inquiry's status.
pub async fn update_inquiry_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateInquiryStatusRequest>,
) -> ApiResult<Inquiry> {
    let status = request
        .status
        .as_deref()
        .and_then(InquiryStatus::parse)
        .ok_or_else(|| {
            AppError::Validation(
                "Invalid status. Must be one of: new, pending, completed".to_string(),
            )
        })?;

    let now = Utc::now();
    let inquiry = state
        .inquiries
        .update(&id, |inquiry| inquiry.set_status(status, now))
        .await
        .ok_or_else(inquiry_not_found)?;
    tracing::info!(id = %inquiry.id, status = status.as_str(), "Inquiry status updated");

    state
        .notifier
        .publish(&NotificationEvent::InquiryStatusUpdated(inquiry.clone()));

    Ok(ApiResponse::new(inquiry)
        .with_message("Inquiry status updated successfully")
        .with_mode(state.inquiries.mode()))
}

/// DELETE /api/inquiries/:id - Delete an inquiry.
pub async fn delete_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state
        .inquiries
        .delete(&id)
        .await
        .ok_or_else(inquiry_not_found)?;
    tracing::info!(id = %id, "Inquiry deleted");

    state
        .notifier
        .publish(&NotificationEvent::InquiryDeleted(DeletedInquiry { id }));

    Ok(ApiResponse::message("Inquiry deleted successfully"))
}

fn inquiry_not_found() -> AppError {
    AppError::NotFound("Inquiry not found".to_string())
}
