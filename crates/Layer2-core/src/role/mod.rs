//! # Role Permission
//!
//! 역할 여러 개의 권한을 하나로 합치고 세 종류(page, command, behavior)를
//! 한 표면으로 검사한다.

mod common;
mod kind;
mod role_permission;

pub use common::CommonPermission;
pub use kind::{
    generate_permission, BehaviorPermission, CommandPermission, FormValues, PagePermission,
    PermissionHandler, BEHAVIOR_FORM_PREFIX, COMMAND_FORM_FIELD, PAGE_FORM_FIELD,
};
pub use role_permission::RolePermission;
