//! 캔버스 붙여넣기 HTTP 클라이언트.
//!
//! `CanvasPaster` 포트 구현. 디자인 캔버스 자동화 서비스에
//! `POST {base_url}/paste` JSON 요청을 보낸다. 재시도하지 않는다.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use vcopy_core::error::CoreError;
use vcopy_core::models::paste::PasteRequest;
use vcopy_core::ports::canvas::CanvasPaster;

/// 전송 본문
#[derive(Debug, Serialize)]
struct PastePayload<'a> {
    image_path: String,
    name: &'a str,
    x: u32,
    y: u32,
    password: &'a str,
}

impl<'a> From<&'a PasteRequest> for PastePayload<'a> {
    fn from(request: &'a PasteRequest) -> Self {
        Self {
            image_path: request.image_path.display().to_string(),
            name: &request.name,
            x: request.x,
            y: request.y,
            password: &request.credential,
        }
    }
}

/// reqwest 기반 캔버스 클라이언트
pub struct HttpCanvasPaster {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCanvasPaster {
    /// 새 클라이언트 생성
    ///
    /// `timeout`은 요청 하나의 전체 시간 제한.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 응답 상태 코드 확인
    async fn check_response(resp: reqwest::Response) -> Result<(), CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let text = resp.text().await.unwrap_or_else(|e| {
            tracing::warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });

        Err(CoreError::Dispatch(format!("캔버스 서비스 에러 ({status}): {text}")))
    }
}

#[async_trait]
impl CanvasPaster for HttpCanvasPaster {
    async fn paste(&self, request: &PasteRequest) -> Result<(), CoreError> {
        let url = format!("{}/paste", self.base_url);
        let payload = PastePayload::from(request);

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("캔버스 서비스 연결 실패: {e}")))?;

        Self::check_response(resp).await?;

        debug!(
            name = %request.name,
            x = request.x,
            y = request.y,
            "캔버스 붙여넣기 전송 완료"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}
