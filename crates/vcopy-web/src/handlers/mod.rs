//! API 핸들러 모듈.

pub mod banner;
pub mod capture;
pub mod paste;

use axum::extract::multipart::{Multipart, MultipartRejection};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;

/// 업로드 필드 이름
pub const DATA_FIELD: &str = "data";

/// 상태 응답 본문
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn status(status: &'static str) -> Self {
        Self {
            status,
            error: None,
        }
    }

    pub fn ok() -> Self {
        Self::status("ok")
    }
}

/// multipart 본문에서 `data` 필드 바이트 추출
///
/// 필드가 없으면 `missing file param \`data\``, 비어 있으면 `empty image`.
pub async fn read_data_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<u8>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!(%rejection, "multipart 본문 아님");
        ApiError::BadRequest("missing file param `data`".to_string())
    })?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(DATA_FIELD) {
            continue;
        }
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::BadRequest("empty image".to_string()));
        }
        return Ok(bytes.to_vec());
    }

    Err(ApiError::BadRequest("missing file param `data`".to_string()))
}
