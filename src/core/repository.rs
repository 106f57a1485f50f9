//! core::repository
//!
//! The repository handle: a local working-tree folder bound 1:1 to a
//! remote URL.
//!
//! # Resource Discipline
//!
//! The handle itself holds no open git resources. Each operation acquires
//! the underlying [`Repo`](crate::git::Repo) fresh through [`ModelRepository::with_repo`]
//! and releases it when the scope ends, on every exit path. This avoids
//! leaking native file handles and guarantees that ref reads observe the
//! latest on-disk state rather than a stale cached view.
//!
//! Operations against one folder must be serialized by the caller; this
//! type performs no internal locking.

use std::path::{Path, PathBuf};

use crate::core::config::{ConfigError, RepoSettings};
use crate::core::paths;
use crate::git::{GitError, Repo};

/// A local working-tree folder bound to one remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRepository {
    folder: PathBuf,
}

impl ModelRepository {
    /// Create a handle for an existing or future repository folder.
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// Create a handle for a remote URL, placing the folder under `parent_dir`
    /// using the derived stable folder name.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::Path;
    /// use modelkeep::core::repository::ModelRepository;
    ///
    /// let repo = ModelRepository::for_remote(Path::new("/work"), "https://host/My-Repo.git");
    /// assert_eq!(repo.folder(), Path::new("/work/my-repo"));
    /// ```
    pub fn for_remote(parent_dir: &Path, remote_url: &str) -> Self {
        Self {
            folder: parent_dir.join(paths::derive_folder_name(remote_url)),
        }
    }

    /// The working-tree folder this handle is bound to.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// The fixed location of the scratch model file.
    pub fn local_model_path(&self) -> PathBuf {
        paths::local_model_path(&self.folder)
    }

    /// The directory holding the decomposed element files.
    pub fn model_tree_dir(&self) -> PathBuf {
        paths::model_tree_dir(&self.folder)
    }

    /// Whether the folder currently holds an initialized repository.
    pub fn is_initialized(&self) -> bool {
        paths::is_repository_folder(&self.folder)
    }

    /// Load the per-repository settings.
    pub fn settings(&self) -> Result<RepoSettings, ConfigError> {
        RepoSettings::load(&self.folder)
    }

    /// Acquire the git handle, run `f`, and release the handle.
    ///
    /// The handle is opened fresh for every call and dropped when `f`
    /// returns, including on error paths.
    pub fn with_repo<T>(
        &self,
        f: impl FnOnce(&Repo) -> Result<T, GitError>,
    ) -> Result<T, GitError> {
        let repo = Repo::open(&self.folder)?;
        f(&repo)
    }
}
