//! vcopy 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 실패를 `CoreError`로 매핑해 반환한다.
//! 위치 탐색 실패(`MatchResult::NotFound`)는 정상 결과이므로 여기에 없다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 업로드 페이로드 누락/빈 값/디코딩 불가 (사용자 에러, 400)
    #[error("잘못된 페이로드: {0}")]
    InvalidPayload(String),

    /// 외부 캔버스 붙여넣기 서비스 실패
    #[error("붙여넣기 전송 실패: {0}")]
    Dispatch(String),

    /// 외부 호출 타임아웃
    #[error("실행 타임아웃: {timeout_ms}ms 초과")]
    ExecutionTimeout {
        /// 초과된 타임아웃 시간 (밀리초)
        timeout_ms: u64,
    },

    /// 스크린 캡처 실패
    #[error("스크린 캡처 실패: {0}")]
    ScreenCapture(String),

    /// 이미지 처리(리사이즈/인코딩) 실패
    #[error("이미지 처리 에러: {0}")]
    Image(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 네트워크 에러 (연결 실패 등)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
