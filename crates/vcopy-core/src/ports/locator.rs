//! 뷰 위치 탐색 포트.
//!
//! 구현: `vcopy-vision` crate (`TemplateLocator`, `ViewProjector`)

use image::DynamicImage;

use crate::models::raster::MatchResult;

/// 정규화된 스크린샷 안에서 정규화된 뷰의 위치를 찾는다.
///
/// 결정적이어야 한다: 같은 입력이면 항상 같은 결과.
pub trait ViewLocator: Send + Sync {
    /// 최적 매칭 중심점 (스크린샷 픽셀 공간) 또는 `NotFound`
    fn locate(&self, view: &DynamicImage, screenshot: &DynamicImage) -> MatchResult;

    /// 탐색기 이름 (로그용)
    fn name(&self) -> &str;
}
