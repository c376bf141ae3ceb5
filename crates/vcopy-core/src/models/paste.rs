//! 붙여넣기 요청/결과 모델.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::raster::ScreenCoordinate;

/// 캔버스 붙여넣기 서비스로 전달되는 요청
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteRequest {
    /// 붙여넣을 이미지 경로
    pub image_path: PathBuf,
    /// 캔버스 레이어 이름 (충돌 방지용 고유 이름)
    pub name: String,
    /// 실제 화면 좌표
    pub x: u32,
    pub y: u32,
    /// 공유 자격증명
    #[serde(skip_serializing)]
    pub credential: String,
}

/// 붙여넣기 파이프라인 결과
///
/// 세 경우 모두 요청은 정상 완료된 것으로 취급한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PasteOutcome {
    /// 붙여넣기 전송 성공
    Pasted {
        name: String,
        coordinate: ScreenCoordinate,
    },
    /// 뷰를 화면에서 찾지 못함
    ScreenNotFound,
    /// 외부 서비스 전송 실패 (로그 + 응답 메시지)
    DispatchFailed {
        coordinate: ScreenCoordinate,
        message: String,
    },
}
