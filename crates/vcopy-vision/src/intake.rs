//! 업로드 페이로드 디코딩.

use image::DynamicImage;
use vcopy_core::error::CoreError;

/// 업로드된 바이트를 이미지로 디코딩
///
/// 포맷은 내용으로 판별한다 (PNG, JPEG 등). 빈 페이로드와 디코딩 실패는
/// 모두 `InvalidPayload`.
pub fn decode_payload(payload: &[u8]) -> Result<DynamicImage, CoreError> {
    if payload.is_empty() {
        return Err(CoreError::InvalidPayload("empty image".to_string()));
    }

    let image = image::load_from_memory(payload)
        .map_err(|e| CoreError::InvalidPayload(format!("이미지 디코딩 실패: {e}")))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(CoreError::InvalidPayload("empty image".to_string()));
    }

    Ok(image)
}
