//! # vcopy-web
//!
//! 복사/붙여넣기 HTTP 서버.
//! Axum 기반. 휴대폰 앱이 LAN으로 접속해 multipart 업로드로 요청한다.
//!
//! ## 엔드포인트
//! - `GET /`: 생존 확인 배너
//! - `POST /captureObject`: 객체 캡처 (필드 `data`)
//! - `POST /paste`: 뷰 기반 붙여넣기 (필드 `data`)

pub mod error;
pub mod handlers;
pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use vcopy_automation::controller::CopyPasteController;
use vcopy_core::config::WebConfig;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 복사/붙여넣기 제어기 (객체 슬롯 소유)
    pub controller: Arc<CopyPasteController>,
}

/// 라우터 구성 (레이어 포함)
pub fn build_router(state: AppState, config: &WebConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::api_routes())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 복사/붙여넣기 HTTP 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(controller: Arc<CopyPasteController>, config: WebConfig) -> Self {
        Self {
            config,
            state: AppState { controller },
        }
    }

    /// 설정된 주소에 바인드
    ///
    /// 휴대폰 앱이 설정된 포트로 접속하므로 다른 포트로 대체하지 않는다.
    pub async fn bind(&self) -> Result<TcpListener, std::io::Error> {
        let host = if self.config.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };
        let addr: SocketAddr = format!("{}:{}", host, self.config.port)
            .parse()
            .map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("잘못된 주소 {}:{}: {}", host, self.config.port, e),
                )
            })?;

        TcpListener::bind(addr).await.map_err(|e| {
            error!(%addr, error = %e, "포트 바인드 실패");
            e
        })
    }

    /// 서버 실행 (종료 신호까지)
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let listener = self.bind().await?;
        info!("복사/붙여넣기 서버 시작: http://{}", listener.local_addr()?);

        let app = build_router(self.state, &self.config);
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        info!("웹 서버 종료 신호 수신");
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("복사/붙여넣기 서버 종료");
        Ok(())
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use std::io::Cursor;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use vcopy_automation::dispatcher::PasteDispatcher;
    use vcopy_automation::noop::NoOpCanvasPaster;
    use vcopy_core::error::CoreError;
    use vcopy_core::ports::screen::{CapturedScreen, ScreenSource};
    use vcopy_storage::object_store::FileObjectStore;
    use vcopy_vision::normalize::NormalizeLimits;
    use vcopy_vision::projector::ViewProjector;

    struct FlatScreen;

    impl ScreenSource for FlatScreen {
        fn capture(&self) -> Result<CapturedScreen, CoreError> {
            CapturedScreen::from_image(DynamicImage::ImageLuma8(GrayImage::from_pixel(
                64,
                48,
                Luma([10]),
            )))
        }

        fn name(&self) -> &str {
            "flat"
        }
    }

    async fn test_router(config: &WebConfig) -> (Router, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = FileObjectStore::open(temp.path()).await.unwrap();
        let controller = CopyPasteController::new(
            Arc::new(FlatScreen),
            Arc::new(ViewProjector::default()),
            Arc::new(store),
            PasteDispatcher::new(Arc::new(NoOpCanvasPaster), "123456", Duration::from_secs(1)),
            NormalizeLimits::default(),
        );
        let state = AppState {
            controller: Arc::new(controller),
        };
        (build_router(state, config), temp)
    }

    fn multipart_request(uri: &str, field: &str, bytes: &[u8]) -> Request<Body> {
        let boundary = "vcopy-test-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"blob\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn png(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(w, h, Luma([200])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn default_config() {
        let config = WebConfig::default();
        assert_eq!(config.port, 8080);
        assert!(config.allow_external);
    }

    #[tokio::test]
    async fn busy_port_is_an_error() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();
        let config = WebConfig {
            port,
            allow_external: false,
            ..WebConfig::default()
        };

        let temp = TempDir::new().unwrap();
        let store = FileObjectStore::open(temp.path()).await.unwrap();
        let controller = CopyPasteController::new(
            Arc::new(FlatScreen),
            Arc::new(ViewProjector::default()),
            Arc::new(store),
            PasteDispatcher::new(Arc::new(NoOpCanvasPaster), "123456", Duration::from_secs(1)),
            NormalizeLimits::default(),
        );
        let (_tx, rx) = watch::channel(false);

        let err = WebServer::new(Arc::new(controller), config)
            .run(rx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);
    }

    #[tokio::test]
    async fn root_returns_banner() {
        let (router, _temp) = test_router(&WebConfig::default()).await;
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], handlers::banner::BANNER.as_bytes());
    }

    #[tokio::test]
    async fn capture_accepts_png() {
        let (router, temp) = test_router(&WebConfig::default()).await;
        let response = router
            .oneshot(multipart_request("/captureObject", "data", &png(8, 5)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({"status": "ok"}));
        assert_eq!(
            image::image_dimensions(temp.path().join("scaled_object.png")).unwrap(),
            (24, 15)
        );
    }

    #[tokio::test]
    async fn missing_field_rejected() {
        let (router, _temp) = test_router(&WebConfig::default()).await;
        let response = router
            .oneshot(multipart_request("/captureObject", "file", &png(8, 5)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"status": "error", "error": "missing file param `data`"})
        );
    }

    #[tokio::test]
    async fn empty_field_rejected() {
        let (router, temp) = test_router(&WebConfig::default()).await;
        let response = router
            .oneshot(multipart_request("/paste", "data", &[]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"status": "error", "error": "empty image"})
        );
        assert!(!temp.path().join("view_image.jpg").exists());
    }

    #[tokio::test]
    async fn non_multipart_rejected() {
        let (router, _temp) = test_router(&WebConfig::default()).await;
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/paste")
                    .body(Body::from("plain"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn paste_on_flat_screen_not_found() {
        let (router, _temp) = test_router(&WebConfig::default()).await;
        let view = {
            let img = DynamicImage::ImageLuma8(GrayImage::from_fn(40, 30, |x, y| {
                Luma([((x * 31 + y * 17) % 255) as u8])
            }));
            let mut buf = Cursor::new(Vec::new());
            img.write_to(&mut buf, ImageFormat::Png).unwrap();
            buf.into_inner()
        };
        let response = router
            .oneshot(multipart_request("/paste", "data", &view))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"status": "screen not found"})
        );
    }

    #[tokio::test]
    async fn oversized_upload_rejected() {
        let config = WebConfig {
            max_upload_mb: 1,
            ..WebConfig::default()
        };
        let (router, _temp) = test_router(&config).await;
        let payload = vec![0u8; 2 * 1024 * 1024];
        let response = router
            .oneshot(multipart_request("/captureObject", "data", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
