//! 애플리케이션 설정 구조체.
//!
//! 리스닝 포트, 정규화 상한(뷰/스크린샷), 매칭 임계값, 캔버스 서비스 접속 정보,
//! 객체 저장 경로를 정의한다. `ConfigManager`가 JSON 파일에서 로드한다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 웹 서버 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 비전(정규화/위치 탐색) 설정
    #[serde(default)]
    pub vision: VisionConfig,
    /// 캔버스 붙여넣기 서비스 설정
    #[serde(default)]
    pub canvas: CanvasConfig,
    /// 객체 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
}

// ============================================================
// 웹 서버 설정
// ============================================================

/// 웹 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 서버 포트 (기본: 8080)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only).
    /// 휴대폰 앱이 LAN으로 접속하므로 기본값은 true.
    #[serde(default = "default_true")]
    pub allow_external: bool,
    /// 업로드 최대 크기 (MB)
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            allow_external: true,
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl WebConfig {
    /// 업로드 최대 크기 (바이트)
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

// ============================================================
// 비전 설정
// ============================================================

/// 비전 설정: 정규화 상한과 매칭 수락 임계값
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// 뷰 이미지 최대 변 길이 (픽셀)
    #[serde(default = "default_view_max_size")]
    pub view_max_size: u32,
    /// 스크린샷 최대 변 길이 (픽셀)
    #[serde(default = "default_screenshot_max_size")]
    pub screenshot_max_size: u32,
    /// NCC 수락 임계값 (0.0 ~ 1.0)
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
    /// 캡처할 모니터 인덱스 (None: 주 모니터)
    #[serde(default)]
    pub monitor_index: Option<usize>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            view_max_size: default_view_max_size(),
            screenshot_max_size: default_screenshot_max_size(),
            match_threshold: default_match_threshold(),
            monitor_index: None,
        }
    }
}

// ============================================================
// 캔버스 서비스 설정
// ============================================================

/// 캔버스 붙여넣기 서비스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// 서비스 기본 URL
    #[serde(default = "default_canvas_base_url")]
    pub base_url: String,
    /// 공유 자격증명 (서비스에 그대로 전달)
    #[serde(default = "default_canvas_password")]
    pub password: String,
    /// 붙여넣기 요청 타임아웃 (밀리초)
    #[serde(default = "default_canvas_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            base_url: default_canvas_base_url(),
            password: default_canvas_password(),
            timeout_ms: default_canvas_timeout_ms(),
        }
    }
}

// ============================================================
// 저장소 설정
// ============================================================

/// 객체 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 캡처 객체 파일 디렉토리 (None: 현재 작업 디렉토리)
    #[serde(default)]
    pub object_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// 실제 사용할 객체 디렉토리
    pub fn resolved_object_dir(&self) -> PathBuf {
        self.object_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            web: WebConfig::default(),
            vision: VisionConfig::default(),
            canvas: CanvasConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    /// 캔버스 요청 타임아웃을 Duration으로 반환
    pub fn canvas_timeout(&self) -> Duration {
        Duration::from_millis(self.canvas.timeout_ms)
    }

    /// 설정값 유효성 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.vision.view_max_size == 0 {
            return Err(validation("vision.view_max_size", "0보다 커야 함"));
        }
        if self.vision.screenshot_max_size == 0 {
            return Err(validation("vision.screenshot_max_size", "0보다 커야 함"));
        }
        let threshold = self.vision.match_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(validation(
                "vision.match_threshold",
                &format!("(0, 1] 범위 밖: {threshold}"),
            ));
        }
        if self.canvas.timeout_ms == 0 {
            return Err(validation("canvas.timeout_ms", "0보다 커야 함"));
        }
        if self.web.max_upload_mb == 0 {
            return Err(validation("web.max_upload_mb", "0보다 커야 함"));
        }
        Ok(())
    }
}

fn validation(field: &str, message: &str) -> CoreError {
    CoreError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn default_true() -> bool {
    true
}
fn default_web_port() -> u16 {
    8080
}
fn default_max_upload_mb() -> usize {
    25
}
fn default_view_max_size() -> u32 {
    700
}
fn default_screenshot_max_size() -> u32 {
    400
}
fn default_match_threshold() -> f32 {
    0.8
}
fn default_canvas_base_url() -> String {
    "http://127.0.0.1:8090".to_string()
}
fn default_canvas_password() -> String {
    "123456".to_string()
}
fn default_canvas_timeout_ms() -> u64 {
    10_000
}
