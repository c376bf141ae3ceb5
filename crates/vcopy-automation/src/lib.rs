//! # vcopy-automation
//!
//! 파이프라인 제어 크레이트.
//! 캡처/붙여넣기 파이프라인 조율, 캔버스 붙여넣기 디스패치,
//! 오프라인용 NoOp 붙여넣기 구현을 담당한다.

pub mod controller;
pub mod dispatcher;
pub mod noop;
