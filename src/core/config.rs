//! core::config
//!
//! Per-repository settings schema and loading.
//!
//! Settings are stored as TOML at `<repo>/.git/modelkeep/config.toml`,
//! keeping them next to the repository they describe and out of the
//! version-controlled tree. Missing files load as defaults; writes are
//! atomic (temp file + rename) to prevent corruption.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::paths::METADATA_DIRNAME;
use crate::core::types::CommitIdentity;

/// Directory under `.git` holding modelkeep state.
pub const CONFIG_DIRNAME: &str = "modelkeep";

/// Settings filename inside [`CONFIG_DIRNAME`].
pub const CONFIG_FILENAME: &str = "config.toml";

/// Errors from settings loading and saving.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings at {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize settings: {0}")]
    Serialize(String),

    #[error("failed to write settings at {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-repository settings.
///
/// All fields are optional; accessors apply defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSettings {
    /// Default author name for commits.
    pub user_name: Option<String>,

    /// Default author email for commits.
    pub user_email: Option<String>,

    /// Remote name the repository tracks.
    pub remote: Option<String>,

    /// Branch name the repository tracks.
    pub branch: Option<String>,
}

impl RepoSettings {
    /// Path of the settings file for a repository folder.
    pub fn config_path(repo_folder: &Path) -> PathBuf {
        repo_folder
            .join(METADATA_DIRNAME)
            .join(CONFIG_DIRNAME)
            .join(CONFIG_FILENAME)
    }

    /// Load settings for a repository folder.
    ///
    /// A missing settings file is not an error; defaults are returned.
    pub fn load(repo_folder: &Path) -> Result<Self, ConfigError> {
        let path = Self::config_path(repo_folder);

        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Read { path, source: e }),
        };

        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path,
            message: e.to_string(),
        })
    }

    /// Save settings atomically, creating parent directories as needed.
    ///
    /// Returns the path written.
    pub fn save(&self, repo_folder: &Path) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path(repo_folder);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: path.clone(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        // Write to a temp file in the same directory, then rename over the
        // target so readers never observe a truncated file.
        let temp_path = path.with_extension("toml.tmp");
        let write_err = |source| ConfigError::Write {
            path: temp_path.clone(),
            source,
        };

        let mut file = fs::File::create(&temp_path).map_err(write_err)?;
        file.write_all(contents.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);

        fs::rename(&temp_path, &path).map_err(|e| ConfigError::Write {
            path: path.clone(),
            source: e,
        })?;

        Ok(path)
    }

    /// Remote name, defaulting to `origin`.
    pub fn remote_name(&self) -> &str {
        self.remote.as_deref().unwrap_or("origin")
    }

    /// Branch name, defaulting to `main`.
    pub fn branch_name(&self) -> &str {
        self.branch.as_deref().unwrap_or("main")
    }

    /// The stored commit identity, when both fields are present and valid.
    pub fn identity(&self) -> Option<CommitIdentity> {
        match (&self.user_name, &self.user_email) {
            (Some(name), Some(email)) => CommitIdentity::new(name, email).ok(),
            _ => None,
        }
    }
}
