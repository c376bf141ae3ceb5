//! 캡처 객체 저장소 포트.
//!
//! 구현: `vcopy-storage` crate (`FileObjectStore`)

use async_trait::async_trait;
use image::DynamicImage;
use std::path::PathBuf;

use crate::error::CoreError;
use crate::models::object::StoredObject;

/// 단일 슬롯 객체 저장소
///
/// 동시성 제어는 호출자(컨트롤러)가 담당한다.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 디코딩 전 원본 페이로드 저장 (진단용)
    async fn save_original(&self, payload: &[u8]) -> Result<PathBuf, CoreError>;

    /// 확대된 객체를 저장하고 슬롯을 교체
    async fn replace_object(&self, scaled: &DynamicImage) -> Result<StoredObject, CoreError>;

    /// 현재 슬롯의 객체 (없으면 None)
    async fn current_object(&self) -> Option<StoredObject>;

    /// 붙여넣기 요청의 뷰 페이로드 저장 (진단용)
    async fn save_view(&self, payload: &[u8]) -> Result<PathBuf, CoreError>;
}
