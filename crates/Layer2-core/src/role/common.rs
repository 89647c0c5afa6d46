//! CommonPermission - 여러 역할의 권한을 종류별로 합치고 검사
//!
//! `init`에서 역할 목록을 종류별 한 줄 문자열로 합친다. 검사 구조는 종류마다
//! 처음 쓰일 때 한 번만 만들고 이후에는 재사용한다.

use super::kind::{BehaviorPermission, CommandPermission, PagePermission, PermissionHandler};
use crate::perm::{
    build_perm_actions, dedupe_join, merge_values, split_tokens, BehaviorPerms, CheckedBehavior,
    Checker, Filter, PermMap, PermissionRegistry,
};
use nging_foundation::{NavigateList, PermissionKind, RoleRecord, WILDCARD};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// 역할 묶음 하나의 합쳐진 권한
///
/// 요청/세션 단위로 만들고 공유하지 않는다.
#[derive(Debug)]
pub struct CommonPermission {
    registry: Arc<PermissionRegistry>,
    combined: HashMap<PermissionKind, String>,
    page: OnceLock<PermMap>,
    command: OnceLock<PermMap>,
    behavior: OnceLock<BehaviorPerms>,
}

impl CommonPermission {
    pub fn new(registry: Arc<PermissionRegistry>) -> Self {
        Self {
            registry,
            combined: HashMap::new(),
            page: OnceLock::new(),
            command: OnceLock::new(),
            behavior: OnceLock::new(),
        }
    }

    pub fn registry(&self) -> &PermissionRegistry {
        &self.registry
    }

    // ========================================================================
    // Init (조합)
    // ========================================================================

    /// 역할 순서대로 종류별 원본 문자열을 합친다
    pub fn init(&mut self, roles: &[RoleRecord]) -> &mut Self {
        for kind in PermissionKind::ALL {
            let combined = if kind.is_token_list() {
                combine_tokens(kind, roles)
            } else {
                self.combine_behaviors(roles)
            };
            debug!("Combined {} permission: {:?}", kind, combined);
            self.combined.insert(kind, combined);
        }
        self
    }

    /// 필드 단위 조합. 같은 필드가 다시 나오면 선언의 `combine` 규칙으로 합친다.
    fn combine_behaviors(&self, roles: &[RoleRecord]) -> String {
        let behaviors = self.registry.behaviors();
        let mut acc: Map<String, Value> = Map::new();

        for role in roles {
            for raw in role.permissions_of(PermissionKind::Behavior) {
                if raw.trim().is_empty() {
                    continue;
                }
                let object = match serde_json::from_str::<Map<String, Value>>(raw) {
                    Ok(object) => object,
                    Err(e) => {
                        warn!("Role {}: malformed behavior permission: {}", role.name, e);
                        continue;
                    }
                };
                for (name, value) in object {
                    let merged = match acc.get(&name) {
                        Some(prev) => match behaviors.get(&name) {
                            Some(behavior) => behavior.combine(prev, &value),
                            None => merge_values(prev, &value),
                        },
                        None => value,
                    };
                    acc.insert(name, merged);
                }
            }
        }

        if acc.is_empty() {
            String::new()
        } else {
            Value::Object(acc).to_string()
        }
    }

    /// 합쳐진 원본 문자열
    pub fn combined(&self, kind: PermissionKind) -> &str {
        self.combined.get(&kind).map(String::as_str).unwrap_or_default()
    }

    /// 합쳐진 문자열을 직접 지정 (검사 전에만 의미가 있다)
    pub fn set_combined(&mut self, kind: PermissionKind, raw: impl Into<String>) -> &mut Self {
        self.combined.insert(kind, raw.into());
        self
    }

    // ========================================================================
    // 검사 구조 (한 번만 파싱)
    // ========================================================================

    pub fn page_map(&self) -> &PermMap {
        self.page
            .get_or_init(|| self.parse_kind::<PagePermission>())
    }

    pub fn command_map(&self) -> &PermMap {
        self.command
            .get_or_init(|| self.parse_kind::<CommandPermission>())
    }

    pub fn behavior_perms(&self) -> &BehaviorPerms {
        self.behavior
            .get_or_init(|| self.parse_kind::<BehaviorPermission>())
    }

    fn parse_kind<H: PermissionHandler>(&self) -> H::Parsed {
        debug!("Parsing {} permission", H::KIND);
        H::parse(self.combined(H::KIND), &self.registry)
    }

    // ========================================================================
    // Check
    // ========================================================================

    pub fn check(&self, perm_path: &str) -> bool {
        self.page_map().check(perm_path)
    }

    pub fn check_cmd(&self, cmd: &str) -> bool {
        self.command_map().check_cmd(cmd)
    }

    pub fn check_behavior(&self, name: &str) -> CheckedBehavior {
        self.behavior_perms().check_behavior(name)
    }

    /// 허용된 항목만 남긴 메뉴
    pub fn filter_navigate(&self, nav_list: &NavigateList) -> NavigateList {
        Filter::new(self).filter_navigate(nav_list)
    }
}

impl Checker for CommonPermission {
    fn check(&self, perm_path: &str) -> bool {
        CommonPermission::check(self, perm_path)
    }
}

/// page/command: 토큰 합집합. `*`가 나오면 나머지 역할은 보지 않는다.
fn combine_tokens(kind: PermissionKind, roles: &[RoleRecord]) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    for role in roles {
        for raw in role.permissions_of(kind) {
            for token in split_tokens(raw) {
                if token == WILDCARD {
                    debug!("Role {} grants every {} permission", role.name, kind);
                    return WILDCARD.to_string();
                }
                tokens.push(token);
            }
        }
    }
    match kind {
        PermissionKind::Page => build_perm_actions(tokens.as_slice()),
        _ => dedupe_join(tokens.as_slice()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perm::{Behavior, Combine, RegistryBuilder, ValueType};
    use nging_foundation::NavigateItem;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Article {
        max_per_day: u32,
    }

    impl Combine for Article {
        fn combine(&self, source: &Self) -> Self {
            Self {
                max_per_day: self.max_per_day.max(source.max_per_day),
            }
        }
    }

    fn registry() -> Arc<PermissionRegistry> {
        let mut b = RegistryBuilder::new();
        b.add_navigate(
            "left",
            vec![NavigateItem::new("Manager", "manager").children(vec![
                NavigateItem::new("User", "user"),
                NavigateItem::new("Role", "role"),
                NavigateItem::new("Everyone", "everone").unlimited(),
            ])],
        );
        b.register_behavior(Behavior::combinable::<Article>("article", "Article"))
            .unwrap();
        b.register_behavior(Behavior::new("motd", "Message").value_type(ValueType::String))
            .unwrap();
        Arc::new(b.build().unwrap())
    }

    fn role(id: u64) -> RoleRecord {
        RoleRecord::new(id, format!("role{}", id))
    }

    #[test]
    fn test_page_and_command_union() {
        let roles = vec![
            role(1)
                .with_permission(PermissionKind::Page, "manager/user")
                .with_permission(PermissionKind::Command, "1,2"),
            role(2)
                .with_permission(PermissionKind::Page, "manager/user,manager/role")
                .with_permission(PermissionKind::Command, "2,3"),
        ];
        let mut perm = CommonPermission::new(registry());
        perm.init(&roles);

        assert_eq!(perm.combined(PermissionKind::Page), "manager/user,manager/role");
        assert_eq!(perm.combined(PermissionKind::Command), "1,2,3");
        assert!(perm.check("manager/role"));
        assert!(perm.check("manager/everone"));
        assert!(perm.check("manager"));
        assert!(!perm.check("manager/other"));
        assert!(perm.check_cmd("3"));
        assert!(!perm.check_cmd("4"));
    }

    #[test]
    fn test_wildcard_skips_other_roles() {
        let roles = vec![
            role(1).with_permission(PermissionKind::Page, "manager/user"),
            role(2).with_permission(PermissionKind::Page, "*"),
            role(3).with_permission(PermissionKind::Page, "manager/role"),
        ];
        let mut perm = CommonPermission::new(registry());
        perm.init(&roles);
        assert_eq!(perm.combined(PermissionKind::Page), "*");
        assert!(perm.check("manager/role"));
        assert_eq!(perm.combined(PermissionKind::Command), "");
        assert!(!perm.check_cmd("1"));

        let roles = vec![
            role(1).with_permission(PermissionKind::Command, "1"),
            role(2).with_permission(PermissionKind::Command, "*"),
            role(3).with_permission(PermissionKind::Command, "3"),
        ];
        let mut perm = CommonPermission::new(registry());
        perm.init(&roles);
        assert_eq!(perm.combined(PermissionKind::Command), "*");
        assert!(perm.check_cmd("anything"));
        assert!(perm.check_cmd("3"));
    }

    #[test]
    fn test_behavior_combine_ignores_garbage_row() {
        let roles = vec![
            role(1).with_permission(PermissionKind::Behavior, r#"{"article":{"maxPerDay":9},"motd":"a"}"#),
            role(2).with_permission(PermissionKind::Behavior, r#"{"article":"garbage","motd":{"text":"b"}}"#),
        ];
        let mut perm = CommonPermission::new(registry());
        perm.init(&roles);

        let combined: Value = serde_json::from_str(perm.combined(PermissionKind::Behavior)).unwrap();
        assert_eq!(combined, json!({"article": {"maxPerDay": 9}, "motd": "a"}));

        let article = perm.check_behavior("article");
        assert!(article.is_valid());
        assert_eq!(article.value::<Article>(), Some(&Article { max_per_day: 9 }));
    }

    #[test]
    fn test_behavior_combine() {
        let roles = vec![
            role(1).with_permission(PermissionKind::Behavior, r#"{"article":{"maxPerDay":3},"motd":"a"}"#),
            role(2).with_permission(PermissionKind::Behavior, "{not json"),
            role(3).with_permission(PermissionKind::Behavior, r#"{"article":{"maxPerDay":9},"motd":"b"}"#),
            role(4).with_permission(PermissionKind::Behavior, r#"{"article":{"maxPerDay":5},"other":1}"#),
        ];
        let mut perm = CommonPermission::new(registry());
        perm.init(&roles);

        let combined: Value = serde_json::from_str(perm.combined(PermissionKind::Behavior)).unwrap();
        assert_eq!(
            combined,
            json!({"article": {"maxPerDay": 9}, "motd": "b", "other": 1})
        );

        let article = perm.check_behavior("article");
        assert_eq!(article.value::<Article>(), Some(&Article { max_per_day: 9 }));
        assert_eq!(
            perm.check_behavior("motd").value::<String>().map(String::as_str),
            Some("b")
        );
        assert!(!perm.check_behavior("other").is_valid());
        assert!(!perm.check_behavior("missing").is_valid());
    }

    #[test]
    fn test_parse_is_memoized() {
        let mut perm = CommonPermission::new(registry());
        perm.set_combined(PermissionKind::Page, "manager/user");
        assert!(perm.check("manager/user"));

        perm.set_combined(PermissionKind::Page, "manager/role");
        assert!(perm.check("manager/user"));
        assert!(!perm.check("manager/role"));
    }

    #[test]
    fn test_empty_permission_is_safe() {
        let perm = CommonPermission::new(registry());
        assert!(!perm.check("manager/user"));
        assert!(perm.check("manager/everone"));
        assert!(!perm.check_cmd("1"));
        assert!(!perm.check_behavior("article").is_valid());
        assert_eq!(perm.combined(PermissionKind::Behavior), "");
    }

    #[test]
    fn test_filter_navigate() {
        let registry = registry();
        let mut perm = CommonPermission::new(Arc::clone(&registry));
        perm.init(&[role(1).with_permission(PermissionKind::Page, "manager/role")]);

        let menu = perm.filter_navigate(registry.navigate("left").unwrap());
        let children: Vec<_> = menu[0]
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|i| i.action.as_str())
            .collect();
        assert_eq!(children, vec!["role", "everone"]);
    }
}
