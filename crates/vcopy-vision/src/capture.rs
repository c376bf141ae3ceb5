//! 스크린 캡처.
//!
//! xcap 기반. 모니터 인덱스를 지정하지 않으면 주 모니터를 캡처한다.

use image::DynamicImage;
use tracing::debug;
use vcopy_core::error::CoreError;
use vcopy_core::ports::screen::{CapturedScreen, ScreenSource};
use xcap::Monitor;

/// xcap 기반 화면 캡처 소스
pub struct XcapScreenSource {
    monitor_index: Option<usize>,
}

impl XcapScreenSource {
    /// 주 모니터 캡처 소스
    pub fn primary() -> Self {
        Self {
            monitor_index: None,
        }
    }

    /// 특정 모니터 캡처 소스 (`None`이면 주 모니터)
    pub fn with_monitor(monitor_index: Option<usize>) -> Self {
        Self { monitor_index }
    }

    fn select_monitor(&self) -> Result<Monitor, CoreError> {
        let monitors = Monitor::all()
            .map_err(|e| CoreError::ScreenCapture(format!("모니터 목록 조회 실패: {e}")))?;

        match self.monitor_index {
            Some(index) => monitors
                .into_iter()
                .nth(index)
                .ok_or_else(|| CoreError::ScreenCapture(format!("모니터 인덱스 {index} 없음"))),
            None => {
                let mut fallback = None;
                for monitor in monitors {
                    if monitor.is_primary().unwrap_or(false) {
                        return Ok(monitor);
                    }
                    fallback.get_or_insert(monitor);
                }
                fallback
                    .ok_or_else(|| CoreError::ScreenCapture("모니터를 찾을 수 없음".to_string()))
            }
        }
    }
}

impl Default for XcapScreenSource {
    fn default() -> Self {
        Self::primary()
    }
}

impl ScreenSource for XcapScreenSource {
    fn capture(&self) -> Result<CapturedScreen, CoreError> {
        let monitor = self.select_monitor()?;

        let image = monitor
            .capture_image()
            .map_err(|e| CoreError::ScreenCapture(format!("스크린 캡처 실패: {e}")))?;

        debug!(
            monitor = ?self.monitor_index,
            "스크린 캡처 완료: {}x{}",
            image.width(),
            image.height()
        );

        CapturedScreen::from_image(DynamicImage::ImageRgba8(image))
    }

    fn name(&self) -> &str {
        "xcap"
    }
}
