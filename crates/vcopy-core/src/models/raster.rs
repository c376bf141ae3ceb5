//! 래스터/좌표 모델.
//!
//! 정규화된 이미지, 매칭 결과, 실제 화면 좌표를 정의한다.
//! 매칭 결과의 좌표는 정규화된 스크린샷 공간, `ScreenCoordinate`는
//! 실제(원본 해상도) 화면 공간이며 둘은 리매퍼를 통해서만 변환된다.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 양의 정수 너비/높이 쌍
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    /// 크기 생성: 0 크기는 거부
    pub fn new(width: u32, height: u32) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::Validation {
                field: "dimensions".to_string(),
                message: format!("0 크기 불가: {width}x{height}"),
            });
        }
        Ok(Self { width, height })
    }

    /// 이미지 크기
    pub fn of(image: &DynamicImage) -> Result<Self, CoreError> {
        Self::new(image.width(), image.height())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 긴 변 길이
    pub fn max_side(&self) -> u32 {
        self.width.max(self.height)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 크기 상한 정규화가 적용된 이미지
///
/// `scale`은 원본 대비 적용된 배율 (건드리지 않았으면 1.0).
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// 정규화된 이미지
    pub image: DynamicImage,
    /// 원본 대비 배율 (<= 1.0)
    pub scale: f64,
    /// 원본 크기
    pub source: Dimensions,
}

impl NormalizedImage {
    /// 정규화된 이미지 크기
    pub fn dimensions(&self) -> Dimensions {
        // 정규화 결과는 항상 1px 이상
        Dimensions {
            width: self.image.width().max(1),
            height: self.image.height().max(1),
        }
    }

    /// 배율이 적용되지 않았는지 여부
    pub fn is_untouched(&self) -> bool {
        self.scale == 1.0
    }
}

/// 매칭 중심점 (정규화된 스크린샷 픽셀 공간)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchPoint {
    pub x: u32,
    pub y: u32,
    /// 정규화 상호상관 점수 (-1.0 ~ 1.0)
    pub confidence: f32,
}

/// 위치 탐색 결과
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum MatchResult {
    /// 최적 매칭 영역의 중심점
    Found(MatchPoint),
    /// 임계값 미달 또는 뷰가 스크린샷에 들어가지 않음
    NotFound,
}

impl MatchResult {
    /// 매칭 중심점 (없으면 None)
    pub fn point(&self) -> Option<MatchPoint> {
        match self {
            MatchResult::Found(point) => Some(*point),
            MatchResult::NotFound => None,
        }
    }
}

/// 실제 화면 좌표 (원본 해상도 픽셀 공간)
///
/// 리매퍼만 생성하며, 붙여넣기 서비스로 전달 가능한 유일한 좌표 공간이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenCoordinate {
    pub x: u32,
    pub y: u32,
}

impl std::fmt::Display for ScreenCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
