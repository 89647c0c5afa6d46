//! 권한 종류 (page / command / behavior)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 전체 허용 와일드카드
pub const WILDCARD: &str = "*";

/// Permission kind
///
/// 저장소에는 `page`, `command`, `behavior` 문자열로 기록된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    /// 메뉴/페이지 경로 (계층 구조)
    Page,
    /// 명령 ID (평면 집합)
    Command,
    /// 타입이 있는 JSON 설정값
    Behavior,
}

impl PermissionKind {
    /// 모든 종류 (조합 순서)
    pub const ALL: [PermissionKind; 3] = [
        PermissionKind::Page,
        PermissionKind::Command,
        PermissionKind::Behavior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKind::Page => "page",
            PermissionKind::Command => "command",
            PermissionKind::Behavior => "behavior",
        }
    }

    /// 쉼표로 구분된 토큰 목록을 저장하는 종류인지
    pub fn is_token_list(&self) -> bool {
        matches!(self, PermissionKind::Page | PermissionKind::Command)
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "page" => Ok(PermissionKind::Page),
            "command" => Ok(PermissionKind::Command),
            "behavior" => Ok(PermissionKind::Behavior),
            other => Err(Error::UnknownKind(other.to_string())),
        }
    }
}
