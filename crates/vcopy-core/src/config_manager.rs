//! 설정 파일 관리.
//!
//! 플랫폼 설정 디렉토리(또는 지정 경로)의 JSON 파일에서 설정을 읽는다.
//! 파일이 없으면 기본 설정으로 만들어 둔다. 실행 중에는 바뀌지 않는다.

use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::CoreError;

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 설정 관리자
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 설정 디렉토리의 `config.json` 사용
    pub fn new() -> Result<Self, CoreError> {
        Self::with_path(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// 지정 경로의 설정 파일 사용
    ///
    /// 파일이 없으면 기본 설정을 기록한다. 누락된 필드는 기본값으로 채운다.
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| {
                CoreError::Config(format!("설정 파일 읽기 실패: {}: {e}", config_path.display()))
            })?;
            let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
                CoreError::Config(format!("설정 파일 파싱 실패: {}: {e}", config_path.display()))
            })?;
            debug!(path = %config_path.display(), "설정 파일 로드");
            config
        } else {
            let config = AppConfig::default_config();
            write_default(&config_path, &config)?;
            info!(path = %config_path.display(), "기본 설정 파일 생성");
            config
        };

        config.validate()?;
        Ok(Self {
            config,
            config_path,
        })
    }

    /// 로드된 설정
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 설정 파일 경로
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 플랫폼별 설정 디렉토리 (`directories` 규칙)
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        ProjectDirs::from("", "", "vcopy")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| CoreError::Config("설정 디렉토리를 결정할 수 없음".to_string()))
    }
}

fn write_default(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CoreError::Config(format!("설정 디렉토리 생성 실패: {}: {e}", parent.display()))
        })?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| CoreError::Config(format!("설정 직렬화 실패: {e}")))?;
    fs::write(path, content)
        .map_err(|e| CoreError::Config(format!("설정 파일 저장 실패: {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_written_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        assert!(config_path.exists());
        assert_eq!(manager.config().web.port, 8080);
        assert_eq!(manager.config().vision.view_max_size, 700);

        let written: AppConfig =
            serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
        assert_eq!(written.canvas.password, "123456");
    }

    #[test]
    fn partial_file_filled_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, r#"{ "web": { "port": 9000 } }"#).unwrap();

        let manager = ConfigManager::with_path(config_path).unwrap();
        assert_eq!(manager.config().web.port, 9000);
        assert_eq!(manager.config().vision.screenshot_max_size, 400);
        assert_eq!(manager.config().canvas.timeout_ms, 10_000);
    }

    #[test]
    fn invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, r#"{ "vision": { "view_max_size": 0 } }"#).unwrap();

        assert!(ConfigManager::with_path(config_path).is_err());
    }

    #[test]
    fn corrupt_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "{ not json").unwrap();

        let err = ConfigManager::with_path(config_path).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
