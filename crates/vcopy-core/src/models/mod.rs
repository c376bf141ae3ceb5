//! vcopy 도메인 모델.
//!
//! 파이프라인 단계 사이를 오가는 값 타입을 정의한다.

pub mod object;
pub mod paste;
pub mod raster;
