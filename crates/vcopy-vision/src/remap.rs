//! 정규화 좌표 → 실제 화면 좌표 변환.
//!
//! 축별 비율을 따로 적용한다. 정규화가 종횡비를 유지하므로 두 비율은
//! 반올림 오차 이내로 같아야 하며, 크게 어긋나면 경고만 남긴다.

use tracing::warn;
use vcopy_core::models::raster::{Dimensions, MatchPoint, ScreenCoordinate};

/// 축 비율 불일치 경고 기준 (상대 오차)
const RATIO_MISMATCH_TOLERANCE: f64 = 0.02;

/// (가로 비율, 세로 비율) = 실제 크기 / 정규화 크기
pub fn axis_ratios(normalized: Dimensions, screen: Dimensions) -> (f64, f64) {
    (
        screen.width() as f64 / normalized.width() as f64,
        screen.height() as f64 / normalized.height() as f64,
    )
}

/// 정규화된 스크린샷 공간의 매칭점을 실제 화면 좌표로 변환
///
/// 결과는 항상 화면 범위 `[0, w-1] x [0, h-1]` 안에 있다.
pub fn remap(point: &MatchPoint, normalized: Dimensions, screen: Dimensions) -> ScreenCoordinate {
    let (rx, ry) = axis_ratios(normalized, screen);

    if ((rx - ry) / rx.max(ry)).abs() > RATIO_MISMATCH_TOLERANCE {
        warn!(
            rx,
            ry,
            normalized = %normalized,
            screen = %screen,
            "축 비율 불일치"
        );
    }

    let x = (point.x as f64 * rx).round() as u32;
    let y = (point.y as f64 * ry).round() as u32;

    ScreenCoordinate {
        x: x.min(screen.width() - 1),
        y: y.min(screen.height() - 1),
    }
}

/// 실제 화면 좌표를 정규화 공간으로 되돌림 (반올림)
pub fn to_normalized(coord: ScreenCoordinate, normalized: Dimensions, screen: Dimensions) -> (u32, u32) {
    let (rx, ry) = axis_ratios(normalized, screen);
    let x = (coord.x as f64 / rx).round() as u32;
    let y = (coord.y as f64 / ry).round() as u32;
    (x.min(normalized.width() - 1), y.min(normalized.height() - 1))
}
