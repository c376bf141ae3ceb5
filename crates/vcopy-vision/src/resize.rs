//! 이미지 리사이즈.
//!
//! fast_image_resize 기반 컨볼루션 리사이즈. 같은 입력이면 항상 같은 결과를 낸다.
//! - RGBA: 정규화, 객체 확대 (알파 곱/나눗셈 자동 처리)
//! - Luma: 위치 탐색용 템플릿/피라미드

use fast_image_resize::{images::Image as FirImage, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage, RgbaImage};
use tracing::debug;
use vcopy_core::error::CoreError;

/// 리사이즈 필터
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFilter {
    /// 축소용 (정규화, 템플릿)
    Bilinear,
    /// 확대용 (캡처 객체 3배)
    Lanczos3,
}

impl ResizeFilter {
    fn options(self) -> ResizeOptions {
        let filter = match self {
            ResizeFilter::Bilinear => FilterType::Bilinear,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        };
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(filter))
    }
}

fn check_sizes(src: (u32, u32), dst: (u32, u32)) -> Result<(), CoreError> {
    if src.0 == 0 || src.1 == 0 {
        return Err(CoreError::Image("소스 이미지 크기 0".to_string()));
    }
    if dst.0 == 0 || dst.1 == 0 {
        return Err(CoreError::Image("목표 이미지 크기 0".to_string()));
    }
    Ok(())
}

/// RGBA 리사이즈
///
/// 동일 크기면 복제 반환. 결과는 항상 `ImageRgba8`.
pub fn fast_resize(
    image: &DynamicImage,
    width: u32,
    height: u32,
    filter: ResizeFilter,
) -> Result<DynamicImage, CoreError> {
    let (src_w, src_h) = (image.width(), image.height());

    if src_w == width && src_h == height {
        return Ok(image.clone());
    }
    check_sizes((src_w, src_h), (width, height))?;

    let src_image = FirImage::from_vec_u8(
        src_w,
        src_h,
        image.to_rgba8().into_raw(),
        PixelType::U8x4,
    )
    .map_err(|e| CoreError::Image(format!("소스 이미지 생성 실패: {e}")))?;

    let mut dst_image = FirImage::new(width, height, PixelType::U8x4);

    Resizer::new()
        .resize(&src_image, &mut dst_image, &filter.options())
        .map_err(|e| CoreError::Image(format!("리사이즈 실패: {e}")))?;

    let result = RgbaImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| CoreError::Image("결과 이미지 생성 실패".to_string()))?;

    debug!(
        "리사이즈: {}x{} → {}x{} ({:?})",
        src_w, src_h, width, height, filter
    );

    Ok(DynamicImage::ImageRgba8(result))
}

/// 그레이스케일 리사이즈 (위치 탐색 전용, 로그 없음)
pub fn resize_gray(image: &GrayImage, width: u32, height: u32) -> Result<GrayImage, CoreError> {
    let (src_w, src_h) = image.dimensions();

    if src_w == width && src_h == height {
        return Ok(image.clone());
    }
    check_sizes((src_w, src_h), (width, height))?;

    let src_image = FirImage::from_vec_u8(src_w, src_h, image.as_raw().clone(), PixelType::U8)
        .map_err(|e| CoreError::Image(format!("소스 이미지 생성 실패: {e}")))?;

    let mut dst_image = FirImage::new(width, height, PixelType::U8);

    Resizer::new()
        .resize(&src_image, &mut dst_image, &ResizeFilter::Bilinear.options())
        .map_err(|e| CoreError::Image(format!("리사이즈 실패: {e}")))?;

    GrayImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| CoreError::Image("결과 이미지 생성 실패".to_string()))
}

/// 정수 배율 확대 (너비·높이 모두 정확히 `factor`배)
pub fn upscale(image: &DynamicImage, factor: u32) -> Result<DynamicImage, CoreError> {
    if factor == 0 {
        return Err(CoreError::Image("확대 배율 0".to_string()));
    }
    let width = image
        .width()
        .checked_mul(factor)
        .ok_or_else(|| CoreError::Image("확대 결과 너비 오버플로".to_string()))?;
    let height = image
        .height()
        .checked_mul(factor)
        .ok_or_else(|| CoreError::Image("확대 결과 높이 오버플로".to_string()))?;
    fast_resize(image, width, height, ResizeFilter::Lanczos3)
}
