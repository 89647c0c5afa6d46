//! Nging Config - 권한 도구 설정
//!
//! 내비게이션/행동 선언/역할 파일 위치와 로그 레벨을 관리한다.

use crate::registry::NAVIGATE_FILE;
use crate::storage::JsonStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 설정 파일명
pub const NGING_CONFIG_FILE: &str = "nging.json";

/// 기본 행동 선언 파일명
pub const BEHAVIORS_FILE: &str = "behaviors.json";

/// Nging 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NgingConfig {
    /// 내비게이션 트리 파일
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigate_file: Option<PathBuf>,

    /// 행동(behavior) 선언 파일
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behaviors_file: Option<PathBuf>,

    /// 역할 저장 파일
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles_file: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl NgingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Ok(global) = JsonStore::global() {
            if let Some(global_config) = Self::load_optional(&global)? {
                config.merge(global_config);
            }
        }

        // 2. 프로젝트 설정
        if let Ok(project) = JsonStore::current_project() {
            if let Some(project_config) = Self::load_optional(&project)? {
                config.merge(project_config);
            }
        }

        Ok(config)
    }

    /// 특정 디렉토리의 설정만 로드 (없으면 기본값)
    pub fn load_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let store = JsonStore::new(dir);
        Ok(Self::load_optional(&store)?.unwrap_or_default())
    }

    fn load_optional(store: &JsonStore) -> Result<Option<Self>> {
        let config = store.load_optional::<NgingConfig>(NGING_CONFIG_FILE)?;
        if config.is_some() {
            debug!("Loaded config from {}", store.base_dir().display());
        }
        Ok(config.map(|c| c.resolve_relative(store.base_dir())))
    }

    /// 상대 경로를 설정 파일이 있던 디렉토리 기준으로 바꾼다
    fn resolve_relative(mut self, base: &Path) -> Self {
        for slot in [
            &mut self.navigate_file,
            &mut self.behaviors_file,
            &mut self.roles_file,
        ] {
            if let Some(path) = slot.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
        self
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: NgingConfig) {
        if other.navigate_file.is_some() {
            self.navigate_file = other.navigate_file;
        }
        if other.behaviors_file.is_some() {
            self.behaviors_file = other.behaviors_file;
        }
        if other.roles_file.is_some() {
            self.roles_file = other.roles_file;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn navigate_path(&self, fallback_dir: &Path) -> PathBuf {
        self.navigate_file
            .clone()
            .unwrap_or_else(|| fallback_dir.join(NAVIGATE_FILE))
    }

    pub fn behaviors_path(&self, fallback_dir: &Path) -> PathBuf {
        self.behaviors_file
            .clone()
            .unwrap_or_else(|| fallback_dir.join(BEHAVIORS_FILE))
    }

    pub fn roles_path(&self, fallback_dir: &Path) -> PathBuf {
        self.roles_file
            .clone()
            .unwrap_or_else(|| fallback_dir.join(crate::permission::ROLES_FILE))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn navigate_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.navigate_file = Some(path.into());
        self
    }

    pub fn roles_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.roles_file = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = NgingConfig::new().navigate_file("/etc/nav.json");
        base.log_level = Some("warn".into());

        let other = NgingConfig::new().roles_file("/srv/roles.json");
        base.merge(other);

        assert_eq!(base.navigate_file, Some(PathBuf::from("/etc/nav.json")));
        assert_eq!(base.roles_file, Some(PathBuf::from("/srv/roles.json")));
        assert_eq!(base.log_level(), "warn");
    }

    #[test]
    fn test_load_dir_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let written = NgingConfig::new()
            .navigate_file("nav/navigate.json")
            .roles_file("/abs/roles.json");
        std::fs::write(
            dir.path().join(NGING_CONFIG_FILE),
            serde_json::to_string(&written).unwrap(),
        )
        .unwrap();

        let config = NgingConfig::load_dir(dir.path()).unwrap();
        assert_eq!(
            config.navigate_file,
            Some(dir.path().join("nav/navigate.json"))
        );
        assert_eq!(config.roles_file, Some(PathBuf::from("/abs/roles.json")));
        assert_eq!(config.log_level(), "info");
        assert_eq!(
            config.behaviors_path(dir.path()),
            dir.path().join(BEHAVIORS_FILE)
        );
    }

    #[test]
    fn test_load_dir_rejects_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(NGING_CONFIG_FILE), "[1, 2]").unwrap();

        let err = NgingConfig::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }
}
