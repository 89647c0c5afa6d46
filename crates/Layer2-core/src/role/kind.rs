//! 권한 종류별 처리 (parse / generate)
//!
//! 세 종류는 닫힌 집합이다. 외부 크레이트가 새 종류를 추가할 수 없도록
//! `PermissionHandler`는 봉인(sealed)되어 있다.

use crate::perm::{
    build_perm_actions, dedupe_join, parse_behavior, serialize_behavior_values, BehaviorPerms,
    PermMap, PermissionRegistry,
};
use nging_foundation::PermissionKind;
use std::collections::HashMap;
use tracing::warn;

/// 제출된 폼 값 (필드명 -> 값 목록)
pub type FormValues = HashMap<String, Vec<String>>;

/// page 종류 폼 필드
pub const PAGE_FORM_FIELD: &str = "permAction[]";
/// command 종류 폼 필드
pub const COMMAND_FORM_FIELD: &str = "permCmd[]";
/// behavior 종류 폼 필드 접두어 (`behavior[name]`)
pub const BEHAVIOR_FORM_PREFIX: &str = "behavior[";

mod sealed {
    pub trait Sealed {}
}

/// 종류별 파싱/생성 규칙
pub trait PermissionHandler: sealed::Sealed {
    const KIND: PermissionKind;

    /// 검사용 구조
    type Parsed;

    /// 합쳐진 원본 문자열을 검사용 구조로 푼다. 실패하면 빈 구조.
    fn parse(raw: &str, registry: &PermissionRegistry) -> Self::Parsed;

    /// 폼 값을 저장용 원본 문자열로 만든다
    fn generate(form: &FormValues, registry: &PermissionRegistry) -> String;
}

// ============================================================================
// Page
// ============================================================================

pub struct PagePermission;

impl sealed::Sealed for PagePermission {}

impl PermissionHandler for PagePermission {
    const KIND: PermissionKind = PermissionKind::Page;
    type Parsed = PermMap;

    fn parse(raw: &str, registry: &PermissionRegistry) -> PermMap {
        let mut map = registry.new_perm_map();
        map.parse(raw);
        map
    }

    fn generate(form: &FormValues, _registry: &PermissionRegistry) -> String {
        form.get(PAGE_FORM_FIELD)
            .map(|values| build_perm_actions(values.as_slice()))
            .unwrap_or_default()
    }
}

// ============================================================================
// Command
// ============================================================================

pub struct CommandPermission;

impl sealed::Sealed for CommandPermission {}

impl PermissionHandler for CommandPermission {
    const KIND: PermissionKind = PermissionKind::Command;
    type Parsed = PermMap;

    fn parse(raw: &str, _registry: &PermissionRegistry) -> PermMap {
        let mut map = PermMap::new();
        map.parse_cmd(raw);
        map
    }

    fn generate(form: &FormValues, _registry: &PermissionRegistry) -> String {
        form.get(COMMAND_FORM_FIELD)
            .map(|values| dedupe_join(values.as_slice()))
            .unwrap_or_default()
    }
}

// ============================================================================
// Behavior
// ============================================================================

pub struct BehaviorPermission;

impl sealed::Sealed for BehaviorPermission {}

impl PermissionHandler for BehaviorPermission {
    const KIND: PermissionKind = PermissionKind::Behavior;
    type Parsed = BehaviorPerms;

    fn parse(raw: &str, registry: &PermissionRegistry) -> BehaviorPerms {
        parse_behavior(raw, registry.behaviors()).unwrap_or_else(|e| {
            warn!("Ignoring behavior permission: {}", e);
            BehaviorPerms::default()
        })
    }

    fn generate(form: &FormValues, registry: &PermissionRegistry) -> String {
        let values: HashMap<String, Vec<String>> = form
            .iter()
            .filter_map(|(field, values)| {
                let name = field.strip_prefix(BEHAVIOR_FORM_PREFIX)?.strip_suffix(']')?;
                Some((name.to_string(), values.clone()))
            })
            .collect();
        serialize_behavior_values(&values, registry.behaviors())
    }
}

/// 종류 태그로 `generate` 선택
pub fn generate_permission(
    kind: PermissionKind,
    form: &FormValues,
    registry: &PermissionRegistry,
) -> String {
    match kind {
        PermissionKind::Page => PagePermission::generate(form, registry),
        PermissionKind::Command => CommandPermission::generate(form, registry),
        PermissionKind::Behavior => BehaviorPermission::generate(form, registry),
    }
}
