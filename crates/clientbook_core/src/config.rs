//! Store selection for callers that pick a backend at startup.
//!
//! # Invariants
//! - The backend is chosen from the file extension only; nothing is opened
//!   here.

use crate::repo::client_repo::{RepoError, RepoResult};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Which storage strategy backs the client repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Json(PathBuf),
    Yaml(PathBuf),
    Sqlite(PathBuf),
}

impl StoreConfig {
    /// Chooses a backend by extension: `json`, `yaml`/`yml`, `db`/`sqlite`/`sqlite3`.
    pub fn from_path(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json(path.to_path_buf())),
            Some("yaml" | "yml") => Ok(Self::Yaml(path.to_path_buf())),
            Some("db" | "sqlite" | "sqlite3") => Ok(Self::Sqlite(path.to_path_buf())),
            _ => Err(RepoError::InvalidArgument(format!(
                "cannot infer client store from `{}`; expected .json, .yaml, .yml, .db or .sqlite",
                path.display()
            ))),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Json(path) | Self::Yaml(path) | Self::Sqlite(path) => path,
        }
    }

    /// Backend name as used in log lines.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::Yaml(_) => "yaml",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

impl Display for StoreConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.backend_name(), self.path().display())
    }
}

#[cfg(test)]
mod tests {
    use super::StoreConfig;
    use std::path::PathBuf;

    #[test]
    fn from_path_picks_backend_by_extension() {
        assert_eq!(
            StoreConfig::from_path("data/clients.JSON").unwrap(),
            StoreConfig::Json(PathBuf::from("data/clients.JSON"))
        );
        assert_eq!(
            StoreConfig::from_path("clients.yml").unwrap().backend_name(),
            "yaml"
        );
        assert_eq!(
            StoreConfig::from_path("/tmp/shop.sqlite").unwrap().backend_name(),
            "sqlite"
        );
    }

    #[test]
    fn from_path_rejects_unknown_extension() {
        assert!(StoreConfig::from_path("clients.csv").is_err());
        assert!(StoreConfig::from_path("clients").is_err());
    }
}
