//! nging-core: Permission engine for Nging
//!
//! Layer2 - 권한 검사 레이어
//!
//! # 주요 모듈
//!
//! - `perm`: 권한 트리(PermMap), 권한 문자열 정규화, behavior 선언/디코드,
//!   메뉴 필터, 시작 시 한 번 만드는 PermissionRegistry
//! - `role`: 여러 역할의 권한 조합 (CommonPermission, RolePermission)
//!
//! # 사용 예시
//!
//! ```ignore
//! use nging_core::{RegistryBuilder, RolePermission};
//!
//! // 시작 단계: 메뉴와 행동 선언 등록
//! let mut builder = RegistryBuilder::new();
//! builder.add_navigate("left", left_navigate);
//! builder.register_behavior(Behavior::combinable::<ArticleLimit>("article", "Article"))?;
//! let registry = Arc::new(builder.build()?);
//!
//! // 요청 단계: 사용자 역할로 검사
//! let perm = RolePermission::load(Arc::clone(&registry), &role_store, "alice")?;
//! if perm.check("manager/user") {
//!     // ...
//! }
//! let menu = perm.filter_navigate(registry.navigate("left").unwrap());
//! ```

pub mod perm;
pub mod role;

// Re-exports: Permission engine
pub use perm::{
    build_perm_actions, parse_behavior, serialize_behavior_values, Behavior, BehaviorPerms,
    BehaviorDecl, Behaviors, CheckedBehavior, Checker, Combine, Filter, PermMap,
    PermissionRegistry, RegistryBuilder, ValueType,
};

// Re-exports: Role aggregation
pub use role::{
    generate_permission, BehaviorPermission, CommandPermission, CommonPermission, FormValues,
    PagePermission, PermissionHandler, RolePermission,
};
