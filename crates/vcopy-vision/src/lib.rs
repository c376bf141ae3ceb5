//! # vcopy-vision
//!
//! 이미지 처리 크레이트.
//! 페이로드 디코딩, 크기 정규화, 객체 확대, 화면 캡처,
//! 뷰 위치 탐색(템플릿 매칭 + 배율 탐색), 좌표 변환을 담당한다.

pub mod capture;
pub mod intake;
pub mod locator;
pub mod normalize;
pub mod projector;
pub mod remap;
pub mod resize;
