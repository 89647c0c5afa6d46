//! RolePermission - 현재 사용자의 역할과 합쳐진 권한

use super::common::CommonPermission;
use crate::perm::{CheckedBehavior, Checker, PermissionRegistry};
use nging_foundation::{NavigateList, PermissionKind, Result, RoleProvider, RoleRecord};
use std::sync::Arc;
use tracing::debug;

/// HTTP 계층이 요청마다 만드는 권한 검사 진입점
#[derive(Debug)]
pub struct RolePermission {
    roles: Vec<RoleRecord>,
    common: CommonPermission,
}

impl RolePermission {
    pub fn new(registry: Arc<PermissionRegistry>) -> Self {
        Self {
            roles: Vec::new(),
            common: CommonPermission::new(registry),
        }
    }

    /// 역할 목록으로 초기화. 비활성 역할은 건너뛴다.
    pub fn init(mut self, roles: Vec<RoleRecord>) -> Self {
        self.roles = roles
            .into_iter()
            .filter(|role| {
                if role.disabled {
                    debug!("Skipping disabled role {}", role.name);
                }
                !role.disabled
            })
            .collect();
        self.common.init(&self.roles);
        self
    }

    /// 저장소에서 사용자의 역할을 읽어 초기화
    pub fn load<P>(registry: Arc<PermissionRegistry>, provider: &P, user: &str) -> Result<Self>
    where
        P: RoleProvider + ?Sized,
    {
        let roles = provider.role_list(user)?;
        debug!("Loaded {} roles for {}", roles.len(), user);
        Ok(Self::new(registry).init(roles))
    }

    pub fn roles(&self) -> &[RoleRecord] {
        &self.roles
    }

    pub fn has_role(&self, id: u64) -> bool {
        self.roles.iter().any(|r| r.id == id)
    }

    pub fn combined(&self, kind: PermissionKind) -> &str {
        self.common.combined(kind)
    }

    pub fn common(&self) -> &CommonPermission {
        &self.common
    }

    pub fn check(&self, perm_path: &str) -> bool {
        self.common.check(perm_path)
    }

    pub fn check_cmd(&self, cmd: &str) -> bool {
        self.common.check_cmd(cmd)
    }

    pub fn check_behavior(&self, name: &str) -> CheckedBehavior {
        self.common.check_behavior(name)
    }

    pub fn filter_navigate(&self, nav_list: &NavigateList) -> NavigateList {
        self.common.filter_navigate(nav_list)
    }
}

impl Checker for RolePermission {
    fn check(&self, perm_path: &str) -> bool {
        self.common.check(perm_path)
    }
}
