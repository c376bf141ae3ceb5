//! 화면 캡처 포트.
//!
//! 구현: `vcopy-vision` crate (`XcapScreenSource`)

use image::DynamicImage;

use crate::error::CoreError;
use crate::models::raster::Dimensions;

/// 캡처된 전체 화면
#[derive(Debug, Clone)]
pub struct CapturedScreen {
    /// 원본 해상도 스크린샷
    pub image: DynamicImage,
    /// 실제 화면 픽셀 크기
    pub size: Dimensions,
}

impl CapturedScreen {
    /// 이미지로부터 생성 (크기는 이미지에서 측정)
    pub fn from_image(image: DynamicImage) -> Result<Self, CoreError> {
        let size = Dimensions::of(&image)?;
        Ok(Self { image, size })
    }
}

/// 화면 캡처 소스: 동기, 유한 시간 작업
///
/// 호출자는 async 컨텍스트에서 `spawn_blocking`으로 감싸 호출한다.
pub trait ScreenSource: Send + Sync {
    /// 현재 화면 전체를 원본 해상도로 캡처
    fn capture(&self) -> Result<CapturedScreen, CoreError>;

    /// 소스 이름 (로그용)
    fn name(&self) -> &str;
}
