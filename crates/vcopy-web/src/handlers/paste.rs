//! 붙여넣기 핸들러.

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::Json;
use tracing::info;

use vcopy_core::models::paste::PasteOutcome;

use super::{read_data_field, StatusResponse};
use crate::{error::ApiError, AppState};

impl From<PasteOutcome> for StatusResponse {
    fn from(outcome: PasteOutcome) -> Self {
        match outcome {
            PasteOutcome::Pasted { .. } => StatusResponse::ok(),
            PasteOutcome::ScreenNotFound => StatusResponse::status("screen not found"),
            PasteOutcome::DispatchFailed { message, .. } => StatusResponse {
                status: "error sending to canvas",
                error: Some(message),
            },
        }
    }
}

/// POST /paste
///
/// 카메라 뷰를 받아 화면 위치를 찾고 캔버스에 객체를 붙여넣는다.
/// 찾지 못하거나 전송이 실패해도 200으로 상태를 보고한다.
pub async fn paste(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let payload = read_data_field(multipart).await?;
    info!(bytes = payload.len(), "붙여넣기 요청");

    let outcome = state.controller.paste(&payload).await?;

    Ok(Json(outcome.into()))
}
