//! 캔버스 붙여넣기 포트.
//!
//! 구현: `vcopy-network` crate (`HttpCanvasPaster`),
//! `vcopy-automation` crate (`NoOpCanvasPaster`)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::paste::PasteRequest;

/// 외부 디자인 캔버스 자동화 서비스
///
/// `Err`는 호출자에게 치명적이지 않다: 로그 후 상태 메시지로 보고된다.
#[async_trait]
pub trait CanvasPaster: Send + Sync {
    /// 이미지 경로/이름/좌표/자격증명을 전달하여 붙여넣기 수행
    async fn paste(&self, request: &PasteRequest) -> Result<(), CoreError>;

    /// 서비스 이름 (로그용)
    fn name(&self) -> &str;
}
