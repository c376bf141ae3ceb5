//! # vcopy-network
//!
//! 네트워크 어댑터 크레이트.
//! 외부 디자인 캔버스 자동화 서비스로 붙여넣기 요청을 전달한다.

pub mod canvas_client;
