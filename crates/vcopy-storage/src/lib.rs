//! # vcopy-storage
//!
//! 로컬 파일 저장소 어댑터.
//! 캡처 객체 단일 슬롯과 진단용 페이로드 파일을 관리한다.

pub mod object_store;
