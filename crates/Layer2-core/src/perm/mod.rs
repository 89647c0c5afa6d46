//! # Permission Engine
//!
//! 권한 트리와 세 가지 권한 종류의 파싱/검사
//!
//! - `map`: PermMap (page 경로 트리, command 평면 집합)
//! - `actions`: 저장 전 권한 문자열 정규화 (BuildPermActions)
//! - `behavior`: 타입이 있는 JSON 설정값
//! - `filter`: 메뉴 트리 필터링
//! - `registry`: 시작 시 한 번 만드는 기준 데이터

mod actions;
mod behavior;
mod filter;
mod map;
mod registry;

pub use actions::{build_perm_actions, dedupe_join, split_tokens};
pub use behavior::{
    merge_values, parse_behavior, serialize_behavior_values, Behavior, BehaviorPerm,
    BehaviorPerms, BehaviorDecl, BehaviorValue, Behaviors, CheckedBehavior, Combine, ValueType,
};
pub use filter::{Checker, Filter};
pub use map::PermMap;
pub use registry::{PermissionRegistry, RegistryBuilder};
