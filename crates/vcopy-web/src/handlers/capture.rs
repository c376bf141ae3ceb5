//! 객체 캡처 핸들러.

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::{read_data_field, StatusResponse};
use crate::{error::ApiError, AppState};

/// POST /captureObject
///
/// 잘라낸 객체 이미지를 받아 3배 확대해 저장한다.
pub async fn capture_object(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let payload = read_data_field(multipart).await?;
    info!(bytes = payload.len(), "객체 캡처 요청");

    state.controller.capture_object(&payload).await?;

    Ok(Json(StatusResponse::ok()))
}
