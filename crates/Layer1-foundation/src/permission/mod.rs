//! Permission data model for Nging
//!
//! - `kind`: 권한 종류 태그 (page / command / behavior)
//! - `role`: 역할과 원본 권한 행, 저장소 경계 (RoleProvider)
//!
//! 권한 계산 자체는 nging-core가 담당한다.

mod kind;
mod role;

pub use kind::{PermissionKind, WILDCARD};
pub use role::{
    JsonRoleStore, RawPermission, RoleFile, RoleProvider, RoleRecord, UserRoles, ROLES_FILE,
};
