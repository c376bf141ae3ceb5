//! 생존 확인 핸들러.

/// 배너 문자열
pub const BANNER: &str = "Testing Virtual Copy & Paste.";

/// GET /
pub async fn banner() -> &'static str {
    BANNER
}
