//! 크기 상한 정규화.
//!
//! 긴 변이 상한을 넘으면 종횡비를 유지하며 축소한다. 확대는 하지 않는다.

use image::DynamicImage;
use vcopy_core::error::CoreError;
use vcopy_core::models::raster::{Dimensions, NormalizedImage};

use crate::resize::{fast_resize, ResizeFilter};

/// 정규화 상한 쌍
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeLimits {
    /// 뷰(카메라 이미지) 긴 변 상한
    pub view_max_size: u32,
    /// 스크린샷 긴 변 상한
    pub screenshot_max_size: u32,
}

impl Default for NormalizeLimits {
    fn default() -> Self {
        Self {
            view_max_size: 700,
            screenshot_max_size: 400,
        }
    }
}

/// 상한 `cap`에 맞춰 축소된 크기와 배율
///
/// 긴 변은 정확히 `cap`, 짧은 변은 반올림 (최소 1).
pub fn fitted_size(source: Dimensions, cap: u32) -> (u32, u32, f64) {
    let max_side = source.max_side();
    if cap == 0 || max_side <= cap {
        return (source.width(), source.height(), 1.0);
    }

    let scale = cap as f64 / max_side as f64;
    let scaled = |side: u32| -> u32 { ((side as f64 * scale).round() as u32).clamp(1, cap) };

    (scaled(source.width()), scaled(source.height()), scale)
}

/// 이미지 정규화
///
/// 긴 변이 `cap` 이하이면 이미지를 그대로 돌려준다 (`scale == 1.0`).
pub fn normalize(image: DynamicImage, cap: u32) -> Result<NormalizedImage, CoreError> {
    if cap == 0 {
        return Err(CoreError::Config("정규화 상한은 0보다 커야 함".to_string()));
    }

    let source = Dimensions::of(&image)?;
    let (width, height, scale) = fitted_size(source, cap);

    if scale == 1.0 {
        return Ok(NormalizedImage {
            image,
            scale,
            source,
        });
    }

    let resized = fast_resize(&image, width, height, ResizeFilter::Bilinear)?;
    Ok(NormalizedImage {
        image: resized,
        scale,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn make_test_image(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, image::Rgba([50, 60, 70, 255])))
    }

    #[test]
    fn small_image_untouched() {
        let img = make_test_image(320, 240);
        let n = normalize(img.clone(), 400).unwrap();
        assert!(n.is_untouched());
        assert_eq!(n.image.to_rgba8().as_raw(), img.to_rgba8().as_raw());
    }

    #[test]
    fn exact_cap_untouched() {
        let n = normalize(make_test_image(400, 100), 400).unwrap();
        assert!(n.is_untouched());
        assert_eq!(n.dimensions().width(), 400);
    }

    #[test]
    fn landscape_view_scaled_to_cap() {
        let n = normalize(make_test_image(1000, 800), 700).unwrap();
        assert_eq!((n.image.width(), n.image.height()), (700, 560));
        assert!((n.scale - 0.7).abs() < 1e-9);
        assert_eq!(n.source.to_string(), "1000x800");
    }

    #[test]
    fn screenshot_scaled_to_cap() {
        let n = normalize(make_test_image(2000, 1500), 400).unwrap();
        assert_eq!((n.image.width(), n.image.height()), (400, 300));
    }

    #[test]
    fn portrait_scaled_by_height() {
        let n = normalize(make_test_image(300, 1200), 400).unwrap();
        assert_eq!((n.image.width(), n.image.height()), (100, 400));
    }

    #[test]
    fn extreme_aspect_keeps_one_pixel() {
        let n = normalize(make_test_image(5000, 3), 400).unwrap();
        assert_eq!((n.image.width(), n.image.height()), (400, 1));
    }

    #[test]
    fn zero_cap_rejected() {
        assert!(normalize(make_test_image(10, 10), 0).is_err());
    }
}
