//! JSON 파일 읽기 전용 저장소
//!
//! 내비게이션, 행동 선언, 역할, 설정 파일은 모두 사람이 직접 편집한다.
//! 이 도구는 읽기만 하고 쓰지 않는다.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::trace;

/// 글로벌 설정 디렉토리 이름 (`~/.config/nging/`)
pub const GLOBAL_DIR_NAME: &str = "nging";

/// 프로젝트 설정 디렉토리 이름 (`.nging/`)
pub const PROJECT_DIR_NAME: &str = ".nging";

/// 한 디렉토리 아래의 JSON 파일을 읽는다
#[derive(Debug, Clone)]
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// `~/.config/nging/`
    pub fn global() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("no user config directory on this platform".into()))?;
        Ok(Self::new(config_dir.join(GLOBAL_DIR_NAME)))
    }

    /// `<root>/.nging/`
    pub fn project(root: impl AsRef<Path>) -> Self {
        Self::new(root.as_ref().join(PROJECT_DIR_NAME))
    }

    pub fn current_project() -> Result<Self> {
        Ok(Self::project(std::env::current_dir()?))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.base_dir.join(filename)
    }

    /// 파일이 없으면 `Error::Io`, 형식이 틀리면 `Error::Json`
    pub fn load<T: DeserializeOwned>(&self, filename: &str) -> Result<T> {
        let path = self.file_path(filename);
        trace!("Reading {}", path.display());
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 파일이 없으면 `None`. 있는데 읽을 수 없으면 에러.
    pub fn load_optional<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        match self.load(filename) {
            Ok(data) => Ok(Some(data)),
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// 파일 경로를 (디렉토리, 파일명)으로 나눈다. 디렉토리가 없으면 `.`
pub fn split_path(path: &Path) -> Result<(PathBuf, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidInput(format!("not a file path: {}", path.display())))?
        .to_string();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((dir, name))
}
