//! HTTP 왕복 통합 테스트.
//!
//! 라우터 → 제어기 → 파일 저장소 → HTTP 캔버스 클라이언트 (mockito 서버).

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use mockito::Matcher;
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use vcopy_automation::controller::CopyPasteController;
use vcopy_automation::dispatcher::PasteDispatcher;
use vcopy_core::config::AppConfig;
use vcopy_core::error::CoreError;
use vcopy_core::ports::screen::{CapturedScreen, ScreenSource};
use vcopy_network::canvas_client::HttpCanvasPaster;
use vcopy_storage::object_store::FileObjectStore;
use vcopy_vision::normalize::NormalizeLimits;
use vcopy_vision::projector::ViewProjector;
use vcopy_web::{build_router, AppState};

struct StillScreen(GrayImage);

impl ScreenSource for StillScreen {
    fn capture(&self) -> Result<CapturedScreen, CoreError> {
        CapturedScreen::from_image(DynamicImage::ImageLuma8(self.0.clone()))
    }

    fn name(&self) -> &str {
        "still"
    }
}

fn desktop() -> GrayImage {
    GrayImage::from_fn(800, 600, |x, y| {
        let mut v = (x / 20).wrapping_mul(2_654_435_761) ^ (y / 20).wrapping_mul(97_531);
        v ^= v >> 15;
        v = v.wrapping_mul(0x2c1b_3c6d);
        v ^= v >> 12;
        Luma([(v & 0xff) as u8])
    })
}

fn png(image: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn multipart(uri: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "vcopy-roundtrip";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"data\"; filename=\"photo\"\r\nContent-Type: application/octet-stream\r\n\r\n"
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

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn router(canvas_url: &str, dir: &TempDir) -> Router {
    let config = AppConfig::default_config();
    let store = FileObjectStore::open(dir.path()).await.unwrap();
    let paster = HttpCanvasPaster::new(canvas_url, Duration::from_secs(2)).unwrap();

    let controller = CopyPasteController::new(
        Arc::new(StillScreen(desktop())),
        Arc::new(ViewProjector::default()),
        Arc::new(store),
        PasteDispatcher::new(Arc::new(paster), "123456", Duration::from_secs(2)),
        NormalizeLimits::default(),
    );

    build_router(
        AppState {
            controller: Arc::new(controller),
        },
        &config.web,
    )
}

/// 캡처 후 붙여넣기 → 캔버스 서비스가 경로/좌표/자격증명 수신
#[tokio::test]
async fn capture_then_paste_reaches_canvas() {
    let mut canvas = mockito::Server::new_async().await;
    let mock = canvas
        .mock("POST", "/paste")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "password": "123456" })),
            Matcher::Regex("scaled_object\\.png".to_string()),
        ]))
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = router(&canvas.url(), &dir).await;

    let object = png(&DynamicImage::ImageLuma8(GrayImage::from_pixel(10, 10, Luma([5]))));
    let response = app
        .clone()
        .oneshot(multipart("/captureObject", &object))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));

    let screen = desktop();
    let view = image::imageops::crop_imm(&screen, 300, 200, 200, 150).to_image();
    let response = app
        .oneshot(multipart("/paste", &png(&DynamicImage::ImageLuma8(view))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));

    mock.assert_async().await;
}

/// 캔버스 서비스 에러 → "error sending to canvas"
#[tokio::test]
async fn canvas_failure_reported_in_status() {
    let mut canvas = mockito::Server::new_async().await;
    let mock = canvas
        .mock("POST", "/paste")
        .with_status(500)
        .with_body("canvas down")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = router(&canvas.url(), &dir).await;

    let object = png(&DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([5]))));
    app.clone()
        .oneshot(multipart("/captureObject", &object))
        .await
        .unwrap();

    let screen = desktop();
    let view = image::imageops::crop_imm(&screen, 100, 100, 240, 180).to_image();
    let response = app
        .oneshot(multipart("/paste", &png(&DynamicImage::ImageLuma8(view))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "error sending to canvas");
    assert!(body["error"].as_str().unwrap().contains("500"));

    mock.assert_async().await;
}
