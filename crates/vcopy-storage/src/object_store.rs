//! 캡처 객체 파일 저장소.
//!
//! 고정된 파일 이름으로 작업 디렉토리에 저장한다.
//! 구조:
//! - `<dir>/captured_object.png`: 디코딩 전 원본 페이로드
//! - `<dir>/scaled_object.png`: 3배 확대 객체 (붙여넣기 대상)
//! - `<dir>/view_image.jpg`: 마지막 붙여넣기 요청의 뷰 페이로드
//!
//! 확대 객체는 임시 파일에 쓴 뒤 rename으로 교체하므로,
//! 읽는 쪽은 이전 파일 또는 새 파일 중 하나만 본다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use vcopy_core::error::CoreError;
use vcopy_core::models::object::StoredObject;
use vcopy_core::models::raster::Dimensions;
use vcopy_core::ports::object_store::ObjectStore;

/// 원본 페이로드 파일 이름
pub const ORIGINAL_FILE: &str = "captured_object.png";

/// 확대 객체 파일 이름
pub const SCALED_FILE: &str = "scaled_object.png";

/// 뷰 페이로드 파일 이름
pub const VIEW_FILE: &str = "view_image.jpg";

const SCALED_TMP_FILE: &str = ".scaled_object.png.tmp";

/// 파일 기반 단일 슬롯 객체 저장소
pub struct FileObjectStore {
    /// 저장 디렉토리 (절대 경로)
    dir: PathBuf,
    /// 현재 객체
    slot: RwLock<Option<StoredObject>>,
}

impl FileObjectStore {
    /// 저장소 열기
    ///
    /// 디렉토리가 없으면 생성한다. 이전 실행의 `scaled_object.png`가 남아 있으면
    /// 읽을 수 있는 이미지인 경우에 한해 현재 객체로 채택한다.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, CoreError> {
        fs::create_dir_all(dir.as_ref())
            .await
            .map_err(|e| CoreError::Internal(format!("객체 디렉토리 생성 실패: {e}")))?;

        let dir = fs::canonicalize(dir.as_ref())
            .await
            .map_err(|e| CoreError::Internal(format!("객체 디렉토리 경로 확인 실패: {e}")))?;

        let existing = Self::adopt_existing(&dir).await;

        info!(
            "객체 저장소 초기화: {} (기존 객체: {})",
            dir.display(),
            existing
                .as_ref()
                .map(|o| o.size.to_string())
                .unwrap_or_else(|| "없음".to_string())
        );

        Ok(Self {
            dir,
            slot: RwLock::new(existing),
        })
    }

    async fn adopt_existing(dir: &Path) -> Option<StoredObject> {
        let path = dir.join(SCALED_FILE);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return None;
        }

        let file = path.clone();
        let dims = tokio::task::spawn_blocking(move || image::image_dimensions(&file)).await;

        let size = match dims {
            Ok(Ok((w, h))) => Dimensions::new(w, h).ok()?,
            Ok(Err(e)) => {
                warn!("기존 객체 파일 무시 ({}): {e}", path.display());
                return None;
            }
            Err(e) => {
                warn!("기존 객체 확인 태스크 실패: {e}");
                return None;
            }
        };

        let captured_at = fs::metadata(&path)
            .await
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Some(StoredObject {
            path,
            size,
            captured_at,
        })
    }

    /// 저장 디렉토리
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn write_file(&self, name: &str, payload: &[u8]) -> Result<PathBuf, CoreError> {
        let path = self.dir.join(name);
        fs::write(&path, payload)
            .await
            .map_err(|e| CoreError::Internal(format!("{name} 저장 실패: {e}")))?;
        debug!("{} 저장 ({}bytes)", name, payload.len());
        Ok(path)
    }
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, CoreError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| CoreError::Image(format!("PNG 인코딩 실패: {e}")))?;
    Ok(buf.into_inner())
}

#[async_trait]
impl ObjectStore for FileObjectStore {
    async fn save_original(&self, payload: &[u8]) -> Result<PathBuf, CoreError> {
        self.write_file(ORIGINAL_FILE, payload).await
    }

    async fn replace_object(&self, scaled: &DynamicImage) -> Result<StoredObject, CoreError> {
        let size = Dimensions::of(scaled)?;

        let image = scaled.clone();
        let encoded = tokio::task::spawn_blocking(move || encode_png(&image))
            .await
            .map_err(|e| CoreError::Internal(format!("PNG 인코딩 태스크 실패: {e}")))??;

        let tmp_path = self.dir.join(SCALED_TMP_FILE);
        let path = self.dir.join(SCALED_FILE);

        fs::write(&tmp_path, &encoded)
            .await
            .map_err(|e| CoreError::Internal(format!("확대 객체 임시 파일 저장 실패: {e}")))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| CoreError::Internal(format!("확대 객체 교체 실패: {e}")))?;

        let object = StoredObject {
            path,
            size,
            captured_at: Utc::now(),
        };

        *self.slot.write().await = Some(object.clone());

        debug!(
            "확대 객체 교체: {} ({}, {}bytes)",
            object.path.display(),
            object.size,
            encoded.len()
        );

        Ok(object)
    }

    async fn current_object(&self) -> Option<StoredObject> {
        self.slot.read().await.clone()
    }

    async fn save_view(&self, payload: &[u8]) -> Result<PathBuf, CoreError> {
        self.write_file(VIEW_FILE, payload).await
    }
}
