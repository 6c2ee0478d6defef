//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod courses;
mod health;
mod inquiries;
mod notifications;
mod projects;

pub use courses::*;
pub use health::*;
pub use inquiries::*;
pub use notifications::*;
pub use projects::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::db::StoreMode;

/// Success response envelope.
///
/// Endpoints differ in which optional members they carry; absent members are
/// left out of the JSON entirely.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<StoreMode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 carrying `data`.
    pub fn new(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: None,
            count: None,
            data: Some(data),
            mode: None,
        }
    }

    /// 201 carrying the created record.
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::new(data)
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_mode(mut self, mode: StoreMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

impl ApiResponse<()> {
    /// 200 with only a confirmation message.
    pub fn message(message: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: Some(message),
            count: None,
            data: None,
            mode: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;
