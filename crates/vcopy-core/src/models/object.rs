//! 캡처 객체 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::raster::Dimensions;

/// 가장 최근에 캡처되어 3배 확대 저장된 객체
///
/// 단일 슬롯: 새 캡처가 이전 객체를 덮어쓴다. 요청 수명과 무관하게 유지된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    /// 확대된 객체 이미지 파일 경로 (절대 경로)
    pub path: PathBuf,
    /// 확대된 객체 크기
    pub size: Dimensions,
    /// 캡처 시각
    pub captured_at: DateTime<Utc>,
}
