//! 복사/붙여넣기 제어기.
//!
//! 두 파이프라인을 조율한다.
//! - 캡처: 원본 저장 → 디코딩 → 3배 확대 → 슬롯 교체
//! - 붙여넣기: 뷰 디코딩 → 화면 캡처 → 정규화 → 위치 탐색 → 좌표 변환 → 전송
//!
//! 객체 슬롯은 비동기 RwLock으로 보호한다. 캡처는 원본 저장부터 슬롯 교체까지
//! 쓰기 잠금을, 붙여넣기는 슬롯 조회와 전송 동안만 읽기 잠금을 잡는다.
//! 화면 캡처와 위치 탐색은 blocking 풀에서 실행한다.

use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info};

use vcopy_core::error::CoreError;
use vcopy_core::models::object::StoredObject;
use vcopy_core::models::paste::PasteOutcome;
use vcopy_core::models::raster::{Dimensions, MatchResult};
use vcopy_core::ports::locator::ViewLocator;
use vcopy_core::ports::object_store::ObjectStore;
use vcopy_core::ports::screen::ScreenSource;
use vcopy_vision::intake::decode_payload;
use vcopy_vision::normalize::{normalize, NormalizeLimits};
use vcopy_vision::remap::remap;
use vcopy_vision::resize::upscale;

use crate::dispatcher::PasteDispatcher;

/// 캡처 객체 확대 배율
pub const CAPTURE_SCALE: u32 = 3;

/// 위치 탐색 단계 결과
struct Localization {
    result: MatchResult,
    normalized: Dimensions,
    screen: Dimensions,
}

/// 복사/붙여넣기 제어기
pub struct CopyPasteController {
    screen: Arc<dyn ScreenSource>,
    locator: Arc<dyn ViewLocator>,
    store: Arc<dyn ObjectStore>,
    dispatcher: PasteDispatcher,
    limits: NormalizeLimits,
    /// 객체 슬롯 잠금
    object_lock: RwLock<()>,
}

fn join_error(e: tokio::task::JoinError) -> CoreError {
    CoreError::Internal(format!("blocking 태스크 실패: {e}"))
}

impl CopyPasteController {
    pub fn new(
        screen: Arc<dyn ScreenSource>,
        locator: Arc<dyn ViewLocator>,
        store: Arc<dyn ObjectStore>,
        dispatcher: PasteDispatcher,
        limits: NormalizeLimits,
    ) -> Self {
        info!(
            screen = screen.name(),
            locator = locator.name(),
            view_max = limits.view_max_size,
            screenshot_max = limits.screenshot_max_size,
            dispatch_timeout_ms = dispatcher.timeout().as_millis() as u64,
            "복사/붙여넣기 제어기 초기화"
        );
        Self {
            screen,
            locator,
            store,
            dispatcher,
            limits,
            object_lock: RwLock::new(()),
        }
    }

    /// 현재 저장된 객체
    pub async fn current_object(&self) -> Option<StoredObject> {
        let _guard = self.object_lock.read().await;
        self.store.current_object().await
    }

    /// 캡처 파이프라인
    ///
    /// 빈 페이로드는 아무것도 건드리지 않고 `InvalidPayload`.
    pub async fn capture_object(&self, payload: &[u8]) -> Result<StoredObject, CoreError> {
        if payload.is_empty() {
            return Err(CoreError::InvalidPayload("empty image".to_string()));
        }
        let start = Instant::now();

        let _guard = self.object_lock.write().await;

        let original = self.store.save_original(payload).await?;
        debug!(path = %original.display(), "원본 페이로드 저장");

        let bytes = payload.to_vec();
        let scaled: DynamicImage = tokio::task::spawn_blocking(move || {
            let image = decode_payload(&bytes)?;
            upscale(&image, CAPTURE_SCALE)
        })
        .await
        .map_err(join_error)??;

        let object = self.store.replace_object(&scaled).await?;

        info!(
            size = %object.size,
            path = %object.path.display(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "객체 캡처 완료 ({:.2?})",
            start.elapsed()
        );

        Ok(object)
    }

    /// 붙여넣기 파이프라인
    ///
    /// 빈/손상 페이로드는 화면 캡처 전에 `InvalidPayload`.
    /// 뷰를 못 찾거나 전송이 실패해도 `Ok` (결과 상태로 구분).
    pub async fn paste(&self, payload: &[u8]) -> Result<PasteOutcome, CoreError> {
        if payload.is_empty() {
            return Err(CoreError::InvalidPayload("empty image".to_string()));
        }
        let start = Instant::now();

        let bytes = payload.to_vec();
        let view = tokio::task::spawn_blocking(move || decode_payload(&bytes))
            .await
            .map_err(join_error)??;

        let view_path = self.store.save_view(payload).await?;
        debug!(path = %view_path.display(), "뷰 페이로드 저장");

        let localization = self.localize(view).await?;

        let Some(point) = localization.result.point() else {
            info!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                "화면에서 뷰를 찾지 못함 ({:.2?})",
                start.elapsed()
            );
            return Ok(PasteOutcome::ScreenNotFound);
        };

        let coordinate = remap(&point, localization.normalized, localization.screen);
        info!(
            normalized_x = point.x,
            normalized_y = point.y,
            confidence = point.confidence,
            %coordinate,
            "뷰 위치 확인"
        );

        let outcome = {
            let _guard = self.object_lock.read().await;
            let object = self.store.current_object().await;
            self.dispatcher.dispatch(object.as_ref(), coordinate).await
        };

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "붙여넣기 처리 완료 ({:.2?})",
            start.elapsed()
        );

        Ok(outcome)
    }

    /// 화면 캡처 + 정규화 + 위치 탐색 (blocking 풀)
    async fn localize(&self, view: DynamicImage) -> Result<Localization, CoreError> {
        let screen = Arc::clone(&self.screen);
        let locator = Arc::clone(&self.locator);
        let limits = self.limits;

        tokio::task::spawn_blocking(move || {
            let captured = screen.capture()?;
            let screen_size = captured.size;

            let view = normalize(view, limits.view_max_size)?;
            let shot = normalize(captured.image, limits.screenshot_max_size)?;
            debug!(
                view = %view.dimensions(),
                screenshot = %shot.dimensions(),
                screen = %screen_size,
                view_rescaled = !view.is_untouched(),
                screenshot_rescaled = !shot.is_untouched(),
                "정규화 완료"
            );

            let result = locator.locate(&view.image, &shot.image);
            Ok(Localization {
                result,
                normalized: shot.dimensions(),
                screen: screen_size,
            })
        })
        .await
        .map_err(join_error)?
    }
}
