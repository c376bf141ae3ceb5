//! # vcopy-core
//!
//! vcopy 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (래스터 크기, 매칭 결과, 화면 좌표, 저장 객체)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 로드 (플랫폼 설정 디렉토리)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::models::raster::{MatchPoint, MatchResult, ScreenCoordinate};

    #[test]
    fn match_result_serde_roundtrip() {
        let found = MatchResult::Found(MatchPoint {
            x: 110,
            y: 80,
            confidence: 0.97,
        });
        let json = serde_json::to_string(&found).unwrap();
        assert!(json.contains("\"kind\":\"Found\""));
        let back: MatchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, found);
    }

    #[test]
    fn screen_coordinate_display() {
        let coord = ScreenCoordinate { x: 550, y: 400 };
        assert_eq!(coord.to_string(), "(550, 400)");
    }
}
