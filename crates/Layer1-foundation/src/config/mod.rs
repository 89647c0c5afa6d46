//! Config - 설정 관리
//!
//! - `nging.rs` - NgingConfig (파일 위치, 로그 레벨)

mod nging;

pub use nging::{NgingConfig, BEHAVIORS_FILE, NGING_CONFIG_FILE};
