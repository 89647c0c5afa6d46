//! PermMap - 권한 트리
//!
//! 같은 타입이 두 가지 역할을 한다.
//!
//! - 기준 트리: `import`로 내비게이션 목록을 그대로 옮긴 트리. 각 노드는 원본
//!   `NavigateItem`을 `nav`로 가리킨다.
//! - 부여 트리: 사용자의 권한 문자열을 `parse`로 풀어 만든 트리. 루트가 기준
//!   트리(`cached`)를 들고 있어 복합 세그먼트와 unlimited 판정에 사용한다.
//!
//! `command` 종류는 계층 없이 루트 바로 아래에 토큰을 넣는다 (`parse_cmd`).

use super::actions::split_tokens;
use nging_foundation::{join_path, Error, NavigateItem, NavigateList, Result, WILDCARD};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 권한 트리 노드
#[derive(Debug, Clone, Default)]
pub struct PermMap {
    v: HashMap<String, PermMap>,
    nav: Option<Arc<NavigateItem>>,
    cached: Option<Arc<PermMap>>,
}

impl PermMap {
    /// 빈 기준 트리
    pub fn new() -> Self {
        Self::default()
    }

    /// 기준 트리를 참조하는 빈 부여 트리
    pub fn with_cached(cached: Arc<PermMap>) -> Self {
        Self {
            cached: Some(cached),
            ..Self::default()
        }
    }

    // ========================================================================
    // 조회
    // ========================================================================

    pub fn get(&self, key: &str) -> Option<&PermMap> {
        self.v.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.v.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    pub fn nav(&self) -> Option<&NavigateItem> {
        self.nav.as_deref()
    }

    pub fn cached(&self) -> Option<&PermMap> {
        self.cached.as_deref()
    }

    pub fn is_unlimited(&self) -> bool {
        self.nav.as_ref().is_some_and(|n| n.unlimited)
    }

    pub fn has_wildcard(&self) -> bool {
        self.v.contains_key(WILDCARD)
    }

    /// `key/`로 시작하는 자식이 있는지 (`upload/:type` 같은 복합 action)
    fn has_compound_prefix(&self, key: &str) -> bool {
        self.v.keys().any(|k| {
            k.len() > key.len() && k.starts_with(key) && k.as_bytes()[key.len()] == b'/'
        })
    }

    // ========================================================================
    // Import (기준 트리 구성)
    // ========================================================================

    /// 내비게이션 목록을 가져온다. 같은 부모 아래 action이 겹치면 panic.
    pub fn import(&mut self, list: &NavigateList) -> &mut Self {
        if let Err(e) = self.try_import(list) {
            panic!("{}", e);
        }
        self
    }

    /// `import`와 같지만 중복 action을 에러로 돌려준다
    pub fn try_import(&mut self, list: &NavigateList) -> Result<&mut Self> {
        self.import_at("", list)?;
        Ok(self)
    }

    fn import_at(&mut self, parent: &str, list: &NavigateList) -> Result<()> {
        for nav in list {
            if self.v.contains_key(&nav.action) {
                return Err(Error::duplicate_action(parent, &nav.action));
            }
            let mut item = PermMap {
                nav: Some(Arc::clone(nav)),
                ..Self::default()
            };
            if let Some(children) = &nav.children {
                item.import_at(&join_path(parent, &nav.action), children)?;
            }
            self.v.insert(nav.action.clone(), item);
        }
        Ok(())
    }

    // ========================================================================
    // Parse (부여 트리 구성)
    // ========================================================================

    /// 쉼표로 구분된 권한 경로를 트리로 푼다 (`manager/user,manager/upload/*`)
    pub fn parse(&mut self, perm_actions: &str) -> &mut Self {
        let cached = self.cached.clone();
        for perm in split_tokens(perm_actions) {
            let perm = perm.trim_matches('/');
            if perm.is_empty() {
                continue;
            }
            self.parse_one(perm, cached.as_deref());
        }
        self
    }

    fn parse_one(&mut self, perm: &str, tree: Option<&PermMap>) {
        let mut node: &mut PermMap = self;
        let mut tree = tree;
        let mut pending = String::new();

        for seg in perm.split('/') {
            if seg == WILDCARD {
                // "*"는 마지막 세그먼트
                if !pending.is_empty() {
                    node = node.v.entry(std::mem::take(&mut pending)).or_default();
                }
                node.v.entry(WILDCARD.to_string()).or_default();
                return;
            }

            let key = if pending.is_empty() {
                seg.to_string()
            } else {
                format!("{}/{}", pending, seg)
            };

            match tree.and_then(|t| t.v.get(&key)) {
                Some(auth) => {
                    let child = node.v.entry(key).or_default();
                    child.nav = auth.nav.clone();
                    node = child;
                    tree = Some(auth);
                    pending.clear();
                }
                None if tree.is_some_and(|t| t.has_compound_prefix(&key)) => {
                    pending = key;
                }
                None => {
                    node = node.v.entry(key).or_default();
                    tree = None;
                    pending.clear();
                }
            }
        }

        if !pending.is_empty() {
            node.v.entry(pending).or_default();
        }
    }

    // ========================================================================
    // Check
    // ========================================================================

    /// `a/b/c` 경로 권한 검사
    pub fn check(&self, perm_path: &str) -> bool {
        let path = perm_path.trim().trim_matches('/');
        let Some(nav_tree) = self.cached.as_deref() else {
            // 기준 트리 없음: unlimited 항목만 허용
            return self.check_unlimited(path);
        };
        if self.has_wildcard() {
            return true;
        }
        if path.is_empty() {
            return false;
        }

        let mut granted = Some(self);
        let mut auth = Some(nav_tree);
        let mut pending = String::new();
        let mut has_perm = false;

        for seg in path.split('/') {
            let key = if pending.is_empty() {
                seg.to_string()
            } else {
                format!("{}/{}", pending, seg)
            };

            let auth_child = auth.and_then(|a| a.v.get(&key));
            if auth_child.is_none() && auth.is_some_and(|a| a.has_compound_prefix(&key)) {
                if granted
                    .and_then(|g| g.v.get(&key))
                    .is_some_and(PermMap::has_wildcard)
                {
                    return true;
                }
                pending = key;
                continue;
            }
            pending.clear();

            match granted.and_then(|g| g.v.get(&key)) {
                Some(node) => {
                    if node.has_wildcard() || node.is_unlimited() {
                        return true;
                    }
                    has_perm = true;
                    granted = Some(node);
                }
                None => {
                    if auth_child.is_some_and(PermMap::is_unlimited) {
                        return true;
                    }
                    has_perm = false;
                    granted = None;
                }
            }
            auth = auth_child;
        }

        if !pending.is_empty() {
            // 끝까지 합쳐지지 않은 복합 세그먼트는 문자 그대로 비교
            return granted.and_then(|g| g.v.get(&pending)).is_some();
        }
        has_perm
    }

    /// 기준 트리 자체에서 경로 위의 unlimited 항목만 허용
    fn check_unlimited(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let mut node = self;
        let mut pending = String::new();
        for seg in path.split('/') {
            let key = if pending.is_empty() {
                seg.to_string()
            } else {
                format!("{}/{}", pending, seg)
            };
            match node.v.get(&key) {
                Some(child) => {
                    if child.is_unlimited() {
                        return true;
                    }
                    node = child;
                    pending.clear();
                }
                None if node.has_compound_prefix(&key) => pending = key,
                None => return false,
            }
        }
        false
    }

    // ========================================================================
    // Command (평면 집합)
    // ========================================================================

    /// 쉼표 구분 명령 ID를 루트 바로 아래에 넣는다
    pub fn parse_cmd(&mut self, perm_cmds: &str) -> &mut Self {
        for token in split_tokens(perm_cmds) {
            self.v.entry(token.to_string()).or_default();
        }
        debug!("Parsed {} command permissions", self.v.len());
        self
    }

    /// 계층 없이 집합 포함 여부만 본다
    pub fn check_cmd(&self, cmd: &str) -> bool {
        let cmd = cmd.trim();
        !cmd.is_empty() && (self.v.contains_key(cmd) || self.has_wildcard())
    }
}
