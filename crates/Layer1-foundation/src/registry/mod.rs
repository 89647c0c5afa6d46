//! Registry - 시작 시 등록되는 정의들
//!
//! - `navigate` - 메뉴/액션 트리, 프로젝트, navigate.json 파일 구조

pub mod navigate;

pub use navigate::{
    join_path, Item as NavigateItem, List as NavigateList, NavigateFile, NavigateSource, Project,
    NAVIGATE_FILE,
};
