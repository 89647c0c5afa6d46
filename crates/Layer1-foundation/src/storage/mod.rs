//! Storage module for Nging
//!
//! - `json`: JSON - 설정/내비게이션/역할 파일 저장/로드

mod json;

// JSON Storage (범용)
pub use json::{split_path, JsonStore, GLOBAL_DIR_NAME, PROJECT_DIR_NAME};
