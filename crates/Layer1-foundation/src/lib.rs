//! # nging-foundation
//!
//! Foundation layer for Nging:
//! - Error: 공통 에러 타입 (Error, Result)
//! - Permission: 권한 종류 태그, 역할/원본 권한 행, RoleProvider 경계
//! - Registry: 메뉴/액션 트리 (NavigateItem, NavigateList, Project)
//! - Storage: JsonStore (범용)
//! - Config: NgingConfig
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP layer / nging-perm CLI                            │
//! │                     │                                   │
//! │                     ▼                                   │
//! │   nging-core: RolePermission ── PermissionRegistry      │
//! │                     │                   │               │
//! │          ┌─────────┴─────────┐         │               │
//! │          ▼                   ▼         ▼               │
//! │   RoleProvider (rows)   NavigateList (startup)          │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod permission;
pub mod registry;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{NgingConfig, BEHAVIORS_FILE, NGING_CONFIG_FILE};

// ============================================================================
// Permission (권한 데이터)
// ============================================================================
pub use permission::{
    JsonRoleStore, PermissionKind, RawPermission, RoleFile, RoleProvider, RoleRecord, UserRoles,
    ROLES_FILE, WILDCARD,
};

// ============================================================================
// Registry (내비게이션)
// ============================================================================
pub use registry::{
    join_path, NavigateFile, NavigateItem, NavigateList, NavigateSource, Project, NAVIGATE_FILE,
};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::{split_path, JsonStore, GLOBAL_DIR_NAME, PROJECT_DIR_NAME};
