//! NoOp 캔버스 붙여넣기.
//!
//! 요청을 로그로만 남기는 오프라인용 구현.

use async_trait::async_trait;
use tracing::debug;

use vcopy_core::error::CoreError;
use vcopy_core::models::paste::PasteRequest;
use vcopy_core::ports::canvas::CanvasPaster;

/// 모든 요청을 로깅만 하고 성공으로 처리
pub struct NoOpCanvasPaster;

#[async_trait]
impl CanvasPaster for NoOpCanvasPaster {
    async fn paste(&self, request: &PasteRequest) -> Result<(), CoreError> {
        debug!(
            image = %request.image_path.display(),
            name = %request.name,
            x = request.x,
            y = request.y,
            "[NoOp] 캔버스 붙여넣기"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "noop"
    }
}
