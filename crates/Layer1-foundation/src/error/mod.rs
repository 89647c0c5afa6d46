//! Error types for Nging
//!
//! 권한 엔진과 주변 계층의 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Nging 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    /// 같은 부모 아래에 동일한 action이 두 번 등록됨
    #[error("The navigate name conflicts under '{parent}': {action}")]
    DuplicateAction { parent: String, action: String },

    // ========================================================================
    // 권한 관련
    // ========================================================================
    #[error("Unknown permission kind: {0}")]
    UnknownKind(String),

    #[error("Registration error: {0}")]
    Registration(String),

    #[error("Decode error: {0}")]
    Decode(String),

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 사용자에게 보여줄 수 있는 에러인지 확인
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::InvalidInput(_) | Error::UnknownKind(_)
        )
    }

    /// Duplicate action 에러 생성 헬퍼
    pub fn duplicate_action(parent: impl Into<String>, action: impl Into<String>) -> Self {
        Error::DuplicateAction {
            parent: parent.into(),
            action: action.into(),
        }
    }
}
