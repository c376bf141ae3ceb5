//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 생존 확인
        .route("/", get(handlers::banner::banner))
        // 객체 캡처
        .route("/captureObject", post(handlers::capture::capture_object))
        // 붙여넣기
        .route("/paste", post(handlers::paste::paste))
}
