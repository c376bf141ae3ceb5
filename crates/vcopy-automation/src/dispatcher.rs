//! 붙여넣기 디스패처.
//!
//! 저장된 객체 경로, 고유 이름, 화면 좌표, 자격증명을 묶어 캔버스 서비스에
//! 전달한다. 실패(타임아웃 포함)는 에러로 전파하지 않고 결과 상태로 보고한다.

use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use vcopy_core::error::CoreError;
use vcopy_core::models::object::StoredObject;
use vcopy_core::models::paste::{PasteOutcome, PasteRequest};
use vcopy_core::models::raster::ScreenCoordinate;
use vcopy_core::ports::canvas::CanvasPaster;

/// 이름의 타임스탬프 부분 형식
pub const NAME_TIME_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

/// 붙여넣기 이름 생성: `<타임스탬프>-<UUID 앞 8자리>`
pub fn paste_name(now: DateTime<Local>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", now.format(NAME_TIME_FORMAT), &suffix[..8])
}

/// 캔버스 붙여넣기 디스패처
pub struct PasteDispatcher {
    paster: Arc<dyn CanvasPaster>,
    credential: String,
    timeout: Duration,
}

impl PasteDispatcher {
    pub fn new(paster: Arc<dyn CanvasPaster>, credential: impl Into<String>, timeout: Duration) -> Self {
        Self {
            paster,
            credential: credential.into(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 붙여넣기 전송
    ///
    /// 저장된 객체가 없거나 전송이 실패/시간 초과되면 `DispatchFailed`.
    pub async fn dispatch(
        &self,
        object: Option<&StoredObject>,
        coordinate: ScreenCoordinate,
    ) -> PasteOutcome {
        let Some(object) = object else {
            warn!(%coordinate, "붙여넣을 객체 없음: 먼저 객체를 캡처해야 함");
            return PasteOutcome::DispatchFailed {
                coordinate,
                message: "no captured object".to_string(),
            };
        };

        let request = PasteRequest {
            image_path: object.path.clone(),
            name: paste_name(Local::now()),
            x: coordinate.x,
            y: coordinate.y,
            credential: self.credential.clone(),
        };

        let result = match tokio::time::timeout(self.timeout, self.paster.paste(&request)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(CoreError::ExecutionTimeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        };

        match result {
            Ok(()) => {
                info!(
                    paster = self.paster.name(),
                    name = %request.name,
                    %coordinate,
                    "캔버스 붙여넣기 완료"
                );
                PasteOutcome::Pasted {
                    name: request.name,
                    coordinate,
                }
            }
            Err(e) => {
                warn!(
                    paster = self.paster.name(),
                    %coordinate,
                    error = %e,
                    "캔버스 붙여넣기 실패"
                );
                PasteOutcome::DispatchFailed {
                    coordinate,
                    message: e.to_string(),
                }
            }
        }
    }
}
