//! Workspace - 설정 파일로부터 레지스트리와 역할 저장소 구성
//!
//! 디렉토리 구조:
//! ```text
//! project/
//! ├── .nging/
//! │   ├── nging.json       # 파일 위치, 로그 레벨
//! │   ├── navigate.json    # 메뉴 목록 + 프로젝트
//! │   ├── behaviors.json   # 행동 선언 목록
//! │   └── roles.json       # 역할 + 사용자
//! ```

use anyhow::{Context, Result};
use nging_core::{Behavior, BehaviorDecl, PermissionRegistry, RegistryBuilder, RolePermission};
use nging_foundation::{
    split_path, JsonRoleStore, JsonStore, NavigateFile, NgingConfig, PROJECT_DIR_NAME,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// 로드된 권한 데이터
pub struct Workspace {
    pub registry: Arc<PermissionRegistry>,
    roles_path: PathBuf,
}

impl Workspace {
    /// 설정 로드. `--config`가 있으면 그 디렉토리만 본다.
    pub fn config(config_dir: Option<&Path>) -> Result<(NgingConfig, PathBuf)> {
        match config_dir {
            Some(dir) => {
                let config = NgingConfig::load_dir(dir)
                    .with_context(|| format!("Failed to load config from {}", dir.display()))?;
                Ok((config, dir.to_path_buf()))
            }
            None => {
                let config = NgingConfig::load().context("Failed to load config")?;
                let cwd = std::env::current_dir().context("Failed to read current directory")?;
                Ok((config, cwd.join(PROJECT_DIR_NAME)))
            }
        }
    }

    pub fn load(config: &NgingConfig, base_dir: &Path) -> Result<Self> {
        let navigate_path = config.navigate_path(base_dir);
        let file = load_navigate(&navigate_path)?;
        let mut builder = RegistryBuilder::from_navigate_file(file);

        let behaviors_path = config.behaviors_path(base_dir);
        for decl in load_behaviors(&behaviors_path)? {
            let name = decl.name.clone();
            builder
                .register_behavior(Behavior::from(decl))
                .with_context(|| format!("Invalid behavior declaration {}", name))?;
        }

        let registry = builder.build().context("Failed to build permission registry")?;
        info!("Loaded navigation from {}", navigate_path.display());

        Ok(Self {
            registry: Arc::new(registry),
            roles_path: config.roles_path(base_dir),
        })
    }

    /// 사용자의 역할로 권한 구성
    pub fn permission(&self, user: &str) -> Result<RolePermission> {
        let store = JsonRoleStore::from_path(&self.roles_path)
            .with_context(|| format!("Failed to load roles from {}", self.roles_path.display()))?;
        RolePermission::load(Arc::clone(&self.registry), &store, user)
            .with_context(|| format!("Failed to load roles for {}", user))
    }
}

fn load_navigate(path: &Path) -> Result<NavigateFile> {
    let (dir, name) = split_path(path)?;
    NavigateFile::load(&JsonStore::new(dir), &name)
        .with_context(|| format!("Failed to load navigation from {}", path.display()))
}

/// 행동 선언 파일은 없어도 된다
fn load_behaviors(path: &Path) -> Result<Vec<BehaviorDecl>> {
    let (dir, name) = split_path(path)?;
    let decls: Option<Vec<BehaviorDecl>> = JsonStore::new(dir)
        .load_optional(&name)
        .with_context(|| format!("Failed to load behaviors from {}", path.display()))?;
    match decls {
        Some(decls) => {
            debug!("Loaded {} behavior declarations", decls.len());
            Ok(decls)
        }
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nging_foundation::NGING_CONFIG_FILE;
    use serde_json::json;

    #[test]
    fn test_load_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, value: serde_json::Value| {
            std::fs::write(dir.path().join(name), value.to_string()).unwrap();
        };
        write(
            "nav.json",
            json!({"sources": [{"name": "left", "items": [{"name": "User", "action": "user"}]}]}),
        );
        write(
            "roles.json",
            json!({
                "roles": [{"id": 1, "name": "admin", "permissions": [{"type": "page", "permission": "user"}]}],
                "users": [{"username": "root", "roleIds": [1]}]
            }),
        );
        write(NGING_CONFIG_FILE, json!({"navigateFile": "nav.json"}));

        let (config, base) = Workspace::config(Some(dir.path())).unwrap();
        let workspace = Workspace::load(&config, &base).unwrap();
        assert!(workspace.registry.behaviors().is_empty());

        let perm = workspace.permission("root").unwrap();
        assert!(perm.check("user"));
        assert!(workspace.permission("nobody").is_err());
    }

    #[test]
    fn test_missing_navigate_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = NgingConfig::new();
        assert!(Workspace::load(&config, dir.path()).is_err());
    }

    #[test]
    fn test_malformed_behaviors_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("navigate.json"), r#"{"sources": []}"#).unwrap();
        std::fs::write(dir.path().join("behaviors.json"), "not json").unwrap();

        let err = Workspace::load(&NgingConfig::new(), dir.path())
            .err()
            .expect("malformed behaviors");
        assert!(matches!(
            err.downcast_ref::<nging_foundation::Error>(),
            Some(nging_foundation::Error::Json(_))
        ));
    }
}
