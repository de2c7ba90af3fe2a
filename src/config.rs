use std::{
    env,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::errors::AppError;

pub const PROJECT_PATH_ENV: &str = "UNITY_PROJECT_PATH";
pub const PROJECT_MARKER_DIR: &str = "Assets";

#[derive(Debug, Clone)]
pub struct Config {
    pub project_path: Option<PathBuf>,
    pub search_start: Option<PathBuf>,
}

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error(
        "could not find the Unity project root (UNITY_PROJECT_PATH: '{env_value}', current directory: '{search_start}')"
    )]
    ProjectRootNotFound {
        env_value: String,
        search_start: String,
    },
}

/// Project root as resolved once at start-up.
#[derive(Debug, Clone)]
pub enum ProjectRoot {
    Resolved(PathBuf),
    Unresolved(ConfigError),
}

impl ProjectRoot {
    pub fn path(&self) -> Result<&Path, AppError> {
        match self {
            Self::Resolved(path) => Ok(path),
            Self::Unresolved(err) => Err(AppError::configuration(err.to_string())),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let project_path = env::var(PROJECT_PATH_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Self {
            project_path,
            search_start: env::current_dir().ok(),
        }
    }

    pub fn resolve_project_root(&self) -> ProjectRoot {
        if let Some(path) = self
            .project_path
            .as_deref()
            .filter(|path| is_project_root(path))
        {
            return ProjectRoot::Resolved(path.to_path_buf());
        }

        if let Some(found) = self.search_start.as_deref().and_then(find_project_root) {
            return ProjectRoot::Resolved(found);
        }

        ProjectRoot::Unresolved(ConfigError::ProjectRootNotFound {
            env_value: self
                .project_path
                .as_deref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            search_start: self
                .search_start
                .as_deref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
        })
    }
}

pub fn is_project_root(path: &Path) -> bool {
    path.is_dir() && path.join(PROJECT_MARKER_DIR).is_dir()
}

pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| is_project_root(candidate))
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn project_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join(PROJECT_MARKER_DIR)).expect("create Assets");
        dir
    }

    #[test]
    fn env_path_wins_when_it_is_a_project() {
        let project = project_dir();
        let config = Config {
            project_path: Some(project.path().to_path_buf()),
            search_start: None,
        };

        let root = config.resolve_project_root();
        assert_eq!(root.path().expect("resolved"), project.path());
    }

    #[test]
    fn invalid_env_path_falls_back_to_ancestor_search() {
        let project = project_dir();
        let nested = project.path().join("Tools").join("server");
        fs::create_dir_all(&nested).expect("nested dirs");

        let config = Config {
            project_path: Some(PathBuf::from("/definitely/not/a/project")),
            search_start: Some(nested),
        };

        let root = config.resolve_project_root();
        assert_eq!(root.path().expect("resolved"), project.path());
    }

    #[test]
    fn env_path_without_marker_is_rejected() {
        let bare = tempfile::tempdir().expect("tempdir");
        let config = Config {
            project_path: Some(bare.path().to_path_buf()),
            search_start: None,
        };

        let root = config.resolve_project_root();
        assert!(matches!(root, ProjectRoot::Unresolved(_)));
    }

    #[test]
    fn unresolved_root_surfaces_configuration_error() {
        let config = Config {
            project_path: None,
            search_start: None,
        };

        let err = config
            .resolve_project_root()
            .path()
            .map(Path::to_path_buf)
            .expect_err("no project root");
        assert_eq!(err.code(), "project_root_unresolved");
        assert!(err.to_string().contains(PROJECT_PATH_ENV));
    }
}
