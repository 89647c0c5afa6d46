//! PermissionRegistry - 프로세스 단위 권한 기준 데이터
//!
//! 시작 단계에서 `RegistryBuilder`로 메뉴 목록, 프로젝트, 행동 선언을 모두
//! 등록한 뒤 `build()`로 한 번 만든다. 만든 뒤에는 읽기 전용이며 `Arc`로
//! 공유해 요청마다 `RolePermission`에 넘긴다.
//!
//! ```ignore
//! let mut builder = RegistryBuilder::new();
//! builder
//!     .add_navigate("left", left_list)
//!     .add_project(Project::new("Caddy", "caddy", "/caddy").nav_list(caddy_list));
//! builder.register_behavior(Behavior::new("quota", "Quota").value_type(ValueType::Uint32))?;
//! let registry = Arc::new(builder.build()?);
//! ```

use super::behavior::{Behavior, Behaviors};
use super::map::PermMap;
use nging_foundation::{NavigateFile, NavigateList, NavigateSource, Project, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// RegistryBuilder
// ============================================================================

/// 등록 단계
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    sources: Vec<NavigateSource>,
    projects: Vec<Project>,
    behaviors: Behaviors,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// navigate.json 내용을 그대로 등록
    pub fn from_navigate_file(file: NavigateFile) -> Self {
        let mut builder = Self::new();
        for source in file.sources {
            builder.add_navigate(source.name, source.items);
        }
        for project in file.projects {
            builder.add_project(project);
        }
        builder
    }

    /// 이름 붙은 메뉴 목록 추가. 같은 이름이면 뒤에 이어 붙인다.
    pub fn add_navigate(&mut self, name: impl Into<String>, list: impl Into<NavigateList>) -> &mut Self {
        let name = name.into();
        let list = list.into();
        match self.sources.iter_mut().find(|s| s.name == name) {
            Some(source) => source.items.extend(&list),
            None => self.sources.push(NavigateSource { name, items: list }),
        }
        self
    }

    pub fn add_project(&mut self, project: Project) -> &mut Self {
        self.projects.push(project);
        self
    }

    pub fn register_behavior(&mut self, behavior: Behavior) -> Result<&mut Self> {
        self.behaviors.register(behavior)?;
        Ok(self)
    }

    /// 기준 트리와 URL 색인을 만든다. 같은 부모 아래 action이 겹치면 에러.
    pub fn build(self) -> Result<PermissionRegistry> {
        let mut tree = PermMap::new();
        for source in &self.sources {
            debug!("Importing navigate source {} ({} items)", source.name, source.items.len());
            tree.try_import(&source.items)?;
        }
        for project in &self.projects {
            debug!("Importing project {} ({} items)", project.ident, project.nav_list.len());
            tree.try_import(&project.nav_list)?;
        }

        let mut url_index = HashMap::new();
        for project in &self.projects {
            let url = project.url.trim_matches('/');
            if !url.is_empty() {
                url_index
                    .entry(url.to_string())
                    .or_insert_with(|| project.ident.clone());
            }
            for path in project.nav_list.full_path("") {
                url_index.entry(path).or_insert_with(|| project.ident.clone());
            }
        }

        info!(
            "Permission registry built: {} sources, {} projects, {} behaviors, {} top-level actions",
            self.sources.len(),
            self.projects.len(),
            self.behaviors.len(),
            tree.len()
        );

        Ok(PermissionRegistry {
            nav_tree: Arc::new(tree),
            sources: self.sources,
            projects: self.projects,
            behaviors: self.behaviors,
            url_index,
        })
    }
}

// ============================================================================
// PermissionRegistry
// ============================================================================

/// 읽기 전용 기준 데이터
#[derive(Debug)]
pub struct PermissionRegistry {
    nav_tree: Arc<PermMap>,
    sources: Vec<NavigateSource>,
    projects: Vec<Project>,
    behaviors: Behaviors,
    url_index: HashMap<String, String>,
}

impl PermissionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// 기준 트리
    pub fn nav_tree(&self) -> &Arc<PermMap> {
        &self.nav_tree
    }

    /// 기준 트리를 참조하는 빈 부여 트리
    pub fn new_perm_map(&self) -> PermMap {
        PermMap::with_cached(Arc::clone(&self.nav_tree))
    }

    pub fn behaviors(&self) -> &Behaviors {
        &self.behaviors
    }

    pub fn navigate(&self, name: &str) -> Option<&NavigateList> {
        self.sources.iter().find(|s| s.name == name).map(|s| &s.items)
    }

    /// 등록 순서의 (이름, 목록)
    pub fn all_navigates(&self) -> impl Iterator<Item = (&str, &NavigateList)> {
        self.sources.iter().map(|s| (s.name.as_str(), &s.items))
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, ident: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.ident == ident)
    }

    /// URL 경로가 속한 프로젝트. 정확히 일치하는 경로, 없으면 가장 긴 상위 경로.
    pub fn project_ident_by_url(&self, url_path: &str) -> Option<&str> {
        let mut path = url_path.trim().trim_matches('/');
        loop {
            if path.is_empty() {
                return None;
            }
            if let Some(ident) = self.url_index.get(path) {
                return Some(ident);
            }
            match path.rfind('/') {
                Some(idx) => path = &path[..idx],
                None => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perm::ValueType;
    use nging_foundation::{Error, NavigateItem};

    fn builder() -> RegistryBuilder {
        let mut b = RegistryBuilder::new();
        b.add_navigate(
            "left",
            vec![NavigateItem::new("Manager", "manager")
                .children(vec![NavigateItem::new("User", "user")])],
        )
        .add_navigate("top", vec![NavigateItem::new("Home", "home").unlimited()])
        .add_project(
            Project::new("Caddy", "caddy", "/caddy").nav_list(vec![NavigateItem::new("Caddy", "caddy")
                .children(vec![
                    NavigateItem::new("Vhost", "vhost"),
                    NavigateItem::new("Add", "vhost_add"),
                ])]),
        );
        b
    }

    #[test]
    fn test_build_imports_all_lists() {
        let registry = builder().build().unwrap();
        let tree = registry.nav_tree();
        assert_eq!(tree.len(), 3);
        assert!(tree.get("caddy").unwrap().get("vhost").is_some());
        assert_eq!(registry.navigate("top").unwrap().len(), 1);
        assert!(registry.navigate("missing").is_none());

        let names: Vec<_> = registry.all_navigates().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["left", "top"]);

        let granted = registry.new_perm_map();
        assert!(granted.check("home"));
        assert!(!granted.check("manager/user"));
    }

    #[test]
    fn test_same_source_name_appends() {
        let mut b = builder();
        b.add_navigate("left", vec![NavigateItem::new("Tool", "tool")]);
        let registry = b.build().unwrap();
        assert_eq!(registry.navigate("left").unwrap().len(), 2);
    }

    #[test]
    fn test_build_rejects_duplicate_actions() {
        let mut b = builder();
        b.add_navigate("extra", vec![NavigateItem::new("Again", "manager")]);
        let err = b.build().unwrap_err();
        assert!(matches!(err, Error::DuplicateAction { ref action, .. } if action == "manager"));
    }

    #[test]
    fn test_project_ident_by_url() {
        let registry = builder().build().unwrap();
        assert_eq!(registry.project_ident_by_url("/caddy/vhost"), Some("caddy"));
        assert_eq!(registry.project_ident_by_url("caddy/vhost/edit/3"), Some("caddy"));
        assert_eq!(registry.project_ident_by_url("/caddy"), Some("caddy"));
        assert_eq!(registry.project_ident_by_url("/manager/user"), None);
        assert_eq!(registry.project_ident_by_url(""), None);
        assert_eq!(registry.project("caddy").unwrap().name, "Caddy");
    }

    #[test]
    fn test_register_behavior() {
        let mut b = builder();
        b.register_behavior(Behavior::new("quota", "Quota").value_type(ValueType::Int))
            .unwrap();
        assert!(b
            .register_behavior(Behavior::new("quota", "Again"))
            .is_err());
        let registry = b.build().unwrap();
        assert!(registry.behaviors().get("quota").is_some());
    }
}
