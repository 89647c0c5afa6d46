//! Navigate - 메뉴/액션 트리 정의
//!
//! 각 기능 모듈이 시작 시 자신의 메뉴 항목을 등록한다. 등록이 끝난 뒤에는
//! 읽기 전용으로 취급되며, 노드는 `Arc`로 공유되어 필터링 결과와 원본이
//! 바뀌지 않은 서브트리를 함께 가리킬 수 있다.

use crate::storage::JsonStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// 내비게이션 파일명
pub const NAVIGATE_FILE: &str = "navigate.json";

fn default_true() -> bool {
    true
}

// ============================================================================
// Item
// ============================================================================

/// 메뉴 항목 (트리 노드)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// 메뉴에 표시할지 여부 (false여도 권한 검사 대상)
    #[serde(default = "default_true")]
    pub display_on_menu: bool,

    /// 표시 이름
    pub name: String,

    /// 경로 세그먼트 (`upload/:type`처럼 `/`를 포함할 수 있다)
    pub action: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target: String,

    /// 권한과 무관하게 항상 허용
    #[serde(default)]
    pub unlimited: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<List>,
}

impl Item {
    pub fn new(name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            display_on_menu: true,
            name: name.into(),
            action: action.into(),
            icon: String::new(),
            target: String::new(),
            unlimited: false,
            children: None,
        }
    }

    pub fn unlimited(mut self) -> Self {
        self.unlimited = true;
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.display_on_menu = false;
        self
    }

    pub fn children(mut self, children: impl Into<List>) -> Self {
        self.children = Some(children.into());
        self
    }

    /// 자식이 없는 말단 항목인지
    pub fn is_leaf(&self) -> bool {
        self.children.as_ref().map_or(true, |c| c.is_empty())
    }

    /// 자식 목록만 바꾼 사본
    pub fn with_children(&self, children: List) -> Self {
        Self {
            children: Some(children),
            ..self.clone()
        }
    }
}

/// `parent/action` 형태로 경로를 잇는다
pub fn join_path(parent: &str, action: &str) -> String {
    if parent.is_empty() {
        action.to_string()
    } else {
        format!("{}/{}", parent, action)
    }
}

// ============================================================================
// List
// ============================================================================

/// 형제 항목 목록 (순서 유지)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct List(Vec<Arc<Item>>);

impl List {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, item: impl Into<Arc<Item>>) {
        self.0.push(item.into());
    }

    /// 다른 목록을 뒤에 붙인다
    pub fn extend(&mut self, other: &List) {
        self.0.extend(other.0.iter().cloned());
    }

    /// 도달 가능한 모든 전체 경로 (전위 순회, 중복 제거 안 함)
    pub fn full_path(&self, parent_path: &str) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths(parent_path, &mut paths);
        paths
    }

    fn collect_paths(&self, parent_path: &str, out: &mut Vec<String>) {
        for item in &self.0 {
            let path = join_path(parent_path, &item.action);
            if let Some(children) = &item.children {
                out.push(path.clone());
                children.collect_paths(&path, out);
            } else {
                out.push(path);
            }
        }
    }

    /// 메뉴 표시용 사본 (`display_on_menu == false` 항목 제외)
    pub fn menu_only(&self) -> List {
        self.0
            .iter()
            .filter(|item| item.display_on_menu)
            .map(|item| match &item.children {
                Some(children) => Arc::new(item.with_children(children.menu_only())),
                None => Arc::clone(item),
            })
            .collect()
    }
}

impl Deref for List {
    type Target = [Arc<Item>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Item>> for List {
    fn from(items: Vec<Item>) -> Self {
        Self(items.into_iter().map(Arc::new).collect())
    }
}

impl From<Vec<Arc<Item>>> for List {
    fn from(items: Vec<Arc<Item>>) -> Self {
        Self(items)
    }
}

impl FromIterator<Arc<Item>> for List {
    fn from_iter<I: IntoIterator<Item = Arc<Item>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Arc<Item>;
    type IntoIter = std::slice::Iter<'a, Arc<Item>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Project
// ============================================================================

/// 메뉴 묶음 (모듈/프로젝트 단위)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub ident: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub nav_list: List,
}

impl Project {
    pub fn new(name: impl Into<String>, ident: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ident: ident.into(),
            url: url.into(),
            nav_list: List::new(),
        }
    }

    pub fn nav_list(mut self, list: impl Into<List>) -> Self {
        self.nav_list = list.into();
        self
    }
}

// ============================================================================
// NavigateFile
// ============================================================================

/// 이름 붙은 메뉴 목록 (예: `top`, `left`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateSource {
    pub name: String,
    #[serde(default)]
    pub items: List,
}

/// navigate.json 파일 구조
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateFile {
    #[serde(default)]
    pub sources: Vec<NavigateSource>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl NavigateFile {
    pub fn load(store: &JsonStore, filename: &str) -> Result<Self> {
        store.load(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> List {
        List::from(vec![Item::new("Manager", "manager").children(vec![
            Item::new("Settings", "settings"),
            Item::new("Upload", "upload/:type").hidden(),
            Item::new("Everyone", "everone").unlimited(),
        ])])
    }

    #[test]
    fn test_full_path_order() {
        let paths = sample().full_path("");
        assert_eq!(
            paths,
            vec![
                "manager",
                "manager/settings",
                "manager/upload/:type",
                "manager/everone",
            ]
        );

        let prefixed = sample().full_path("admin");
        assert_eq!(prefixed[0], "admin/manager");
    }

    #[test]
    fn test_full_path_keeps_duplicates() {
        let mut list = sample();
        list.extend(&sample());
        assert_eq!(list.full_path("").len(), 8);
    }

    #[test]
    fn test_menu_only_hides_items() {
        let list = sample();
        let menu = list.menu_only();
        let children = menu[0].children.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        // 원본은 그대로
        assert_eq!(list[0].children.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_deserialize_defaults() {
        let item: Item =
            serde_json::from_str(r#"{"name":"User","action":"user"}"#).unwrap();
        assert!(item.display_on_menu);
        assert!(!item.unlimited);
        assert!(item.is_leaf());
    }
}
