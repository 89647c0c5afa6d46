//! 역할/권한 행 데이터 모델
//!
//! ORM이 돌려주는 행(row)을 그대로 표현한다. 조회는 `RoleProvider` 뒤에 숨긴다.

use super::kind::PermissionKind;
use crate::storage::{split_path, JsonStore};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// 역할 저장 파일명
pub const ROLES_FILE: &str = "roles.json";

/// 역할 x 종류 한 행의 원본 권한 문자열
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPermission {
    /// `page` | `command` | `behavior`
    #[serde(rename = "type")]
    pub kind: String,

    /// 쉼표 구분 경로 목록 또는 JSON 객체 문자열
    #[serde(default)]
    pub permission: String,
}

impl RawPermission {
    pub fn new(kind: PermissionKind, permission: impl Into<String>) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            permission: permission.into(),
        }
    }

    /// 알 수 없는 종류면 None
    pub fn kind(&self) -> Option<PermissionKind> {
        self.kind.parse().ok()
    }
}

/// 역할 한 개
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub permissions: Vec<RawPermission>,
}

impl RoleRecord {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_permission(mut self, kind: PermissionKind, permission: impl Into<String>) -> Self {
        self.permissions.push(RawPermission::new(kind, permission));
        self
    }

    /// GetPermissions
    pub fn permissions(&self) -> &[RawPermission] {
        &self.permissions
    }

    /// 주어진 종류의 원본 문자열들 (행 순서 유지)
    pub fn permissions_of(&self, kind: PermissionKind) -> impl Iterator<Item = &str> {
        self.permissions
            .iter()
            .filter(move |p| p.kind() == Some(kind))
            .map(|p| p.permission.as_str())
    }
}

/// 현재 사용자의 역할 목록을 가져오는 저장소 경계 (GetRoleList)
pub trait RoleProvider {
    fn role_list(&self, user: &str) -> Result<Vec<RoleRecord>>;
}

/// 사용자 -> 역할 ID 연결
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoles {
    pub username: String,
    #[serde(default)]
    pub role_ids: Vec<u64>,
}

/// roles.json 파일 구조
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFile {
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
    #[serde(default)]
    pub users: Vec<UserRoles>,
}

/// JSON 파일 기반 RoleProvider
#[derive(Debug, Clone)]
pub struct JsonRoleStore {
    data: RoleFile,
}

impl JsonRoleStore {
    pub fn new(data: RoleFile) -> Self {
        Self { data }
    }

    /// JsonStore에서 로드
    pub fn load(store: &JsonStore, filename: &str) -> Result<Self> {
        let data: RoleFile = store.load(filename)?;
        debug!(
            "Loaded {} roles / {} users from {}",
            data.roles.len(),
            data.users.len(),
            store.file_path(filename).display()
        );
        Ok(Self::new(data))
    }

    /// 파일 경로로 로드
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (dir, name) = split_path(path)?;
        Self::load(&JsonStore::new(dir), &name)
    }

    pub fn roles(&self) -> &[RoleRecord] {
        &self.data.roles
    }
}

impl RoleProvider for JsonRoleStore {
    fn role_list(&self, user: &str) -> Result<Vec<RoleRecord>> {
        let entry = self
            .data
            .users
            .iter()
            .find(|u| u.username == user)
            .ok_or_else(|| Error::NotFound(format!("user {}", user)))?;

        let mut roles = Vec::with_capacity(entry.role_ids.len());
        for id in &entry.role_ids {
            match self.data.roles.iter().find(|r| r.id == *id) {
                Some(role) if role.disabled => {
                    debug!("Skipping disabled role {} for {}", role.name, user);
                }
                Some(role) => roles.push(role.clone()),
                None => warn!("User {} references missing role {}", user, id),
            }
        }
        Ok(roles)
    }
}
