use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Uniform envelope around every non-raw response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status_code: u16,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, status: StatusCode) -> Self {
        Self {
            is_success: true,
            data: Some(data),
            message: None,
            status_code: status.as_u16(),
        }
    }
}

impl ApiResponse<()> {
    /// Successful response that carries only a message.
    pub fn done(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            is_success: true,
            data: None,
            message: Some(message.into()),
            status_code: status.as_u16(),
        }
    }

    pub fn failure(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            is_success: false,
            data: None,
            message: Some(message.into()),
            status_code: status.as_u16(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
