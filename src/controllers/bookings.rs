use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::dto::ConfirmBookingDto;
use crate::response::ApiResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/booking/confirm", post(confirm_booking))
}

// POST /api/booking/confirm
async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: std::result::Result<Json<Option<ConfirmBookingDto>>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let request = request.ok_or_else(|| AppError::Validation("Should Not Be an Empty".to_string()))?;

    let receipt = state.bookings.confirm_booking(&user.subject, request).await?;
    Ok(ApiResponse::success(receipt, StatusCode::CREATED))
}
