//! git::interface
//!
//! Git interface implementation using git2.
//!
//! The [`Repo`] struct is the only way to interact with a Git repository.
//! No other module imports `git2` directly. This keeps error handling
//! consistent and puts strong types at the boundary.
//!
//! # Resource Model
//!
//! A `Repo` is a scoped resource: opened fresh for each operation and
//! released on drop, on every exit path. Holding one across a whole
//! workflow is deliberately unsupported — refs can move under a long-lived
//! handle (for example through a concurrent fetch), and safety decisions
//! must observe the latest on-disk state.
//!
//! # Error Handling
//!
//! Git failures are categorized into the taxonomy higher layers act on:
//!
//! - [`GitError::RefResolution`]: a required ref cannot be found or parsed;
//!   fatal to the current operation, no retry
//! - [`GitError::RepositoryIo`]: filesystem or object-store failure;
//!   surfaced to the caller, no automatic retry
//! - [`GitError::NothingToCommit`]: benign, reported as a no-op

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{CommitIdentity, Oid, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The folder is not a Git repository.
    #[error("not a git repository: {}", .path.display())]
    NotARepository {
        /// The folder that was opened
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepository,

    /// A required ref cannot be found or parsed.
    #[error("cannot resolve ref: {refname}")]
    RefResolution {
        /// The ref or revspec that failed to resolve
        refname: String,
    },

    /// Filesystem or object-store failure.
    #[error("repository I/O error: {message}")]
    RepositoryIo {
        /// Description of the failure
        message: String,
    },

    /// No staged change to commit.
    #[error("nothing to commit")]
    NothingToCommit,
}

impl GitError {
    /// Map a git2 error, attributing ref-shaped failures to the given spec.
    fn from_git2(err: git2::Error, refname: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound | git2::ErrorCode::InvalidSpec => GitError::RefResolution {
                refname: refname.to_string(),
            },
            _ => GitError::RepositoryIo {
                message: format!("{}: {}", refname, err.message()),
            },
        }
    }

    fn io(err: git2::Error) -> Self {
        GitError::RepositoryIo {
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        GitError::RepositoryIo {
            message: err.to_string(),
        }
    }
}

/// Information about one commit in the local history.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    /// The commit OID
    pub oid: Oid,
    /// First line of the commit message
    pub summary: String,
    /// Full commit message
    pub message: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Author timestamp
    pub author_time: chrono::DateTime<chrono::Utc>,
}

/// The Git interface.
///
/// This is the single point of interaction with Git. It wraps exactly the
/// folder it was opened on — no discovery walk — because a managed
/// repository folder is bound 1:1 to its remote.
pub struct Repo {
    inner: git2::Repository,
}

impl std::fmt::Debug for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repo")
            .field("path", &self.inner.path())
            .finish()
    }
}

impl Repo {
    // =========================================================================
    // Opening and Info
    // =========================================================================

    /// Open the repository at exactly the given folder.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepository`] if the folder holds no repository
    /// - [`GitError::BareRepository`] if it has no working directory
    pub fn open(folder: &Path) -> Result<Self, GitError> {
        let inner = git2::Repository::open(folder).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::NotARepository {
                path: folder.to_path_buf(),
            },
            _ => GitError::RepositoryIo {
                message: e.message().to_string(),
            },
        })?;

        if inner.is_bare() {
            return Err(GitError::BareRepository);
        }

        Ok(Self { inner })
    }

    /// Path to the working directory.
    pub fn work_dir(&self) -> Result<PathBuf, GitError> {
        self.inner
            .workdir()
            .map(Path::to_path_buf)
            .ok_or(GitError::BareRepository)
    }

    /// Path to the metadata (`.git`) directory.
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    // =========================================================================
    // Ref Resolution
    // =========================================================================

    /// Resolve a revspec to a commit OID.
    ///
    /// Supports full refs (`refs/heads/main`), short forms (`origin/main`,
    /// `HEAD`) and relative forms (`HEAD^`).
    pub fn resolve_ref(&self, refspec: &str) -> Result<Oid, GitError> {
        let object = self
            .inner
            .revparse_single(refspec)
            .map_err(|e| GitError::from_git2(e, refspec))?;

        let commit = object
            .peel(git2::ObjectType::Commit)
            .map_err(|e| GitError::from_git2(e, refspec))?;

        Ok(Oid::new(commit.id().to_string())?)
    }

    /// Get the HEAD commit OID.
    pub fn head_oid(&self) -> Result<Oid, GitError> {
        let head = self
            .inner
            .head()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let commit = head
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        Ok(Oid::new(commit.id().to_string())?)
    }

    /// Get the current branch name (shorthand).
    ///
    /// Fails with [`GitError::RefResolution`] when HEAD is detached or unborn.
    pub fn current_branch(&self) -> Result<String, GitError> {
        let head = self
            .inner
            .head()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        if !head.is_branch() {
            return Err(GitError::RefResolution {
                refname: "HEAD".to_string(),
            });
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or(GitError::RefResolution {
                refname: "HEAD".to_string(),
            })
    }

    /// Resolve the configured upstream tracking ref of a local branch.
    ///
    /// Returns the tracking ref's shorthand name (e.g. `origin/main`) and
    /// the commit it points at.
    pub fn upstream_oid(&self, branch: &str) -> Result<(String, Oid), GitError> {
        let local = self
            .inner
            .find_branch(branch, git2::BranchType::Local)
            .map_err(|e| GitError::from_git2(e, &format!("refs/heads/{branch}")))?;

        let upstream = local.upstream().map_err(|_| GitError::RefResolution {
            refname: format!("{branch}@{{upstream}}"),
        })?;

        let name = match upstream.name() {
            Ok(Some(n)) => n.to_string(),
            _ => format!("{branch}@{{upstream}}"),
        };

        let commit = upstream
            .get()
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, &name))?;

        Ok((name, Oid::new(commit.id().to_string())?))
    }

    /// Count commits unique to each side of two commits.
    ///
    /// Returns `(ahead, behind)`: commits reachable from `local` but not
    /// `upstream`, and the reverse.
    pub fn ahead_behind(&self, local: &Oid, upstream: &Oid) -> Result<(usize, usize), GitError> {
        let local_oid = git2::Oid::from_str(local.as_str())
            .map_err(|e| GitError::from_git2(e, local.as_str()))?;
        let upstream_oid = git2::Oid::from_str(upstream.as_str())
            .map_err(|e| GitError::from_git2(e, upstream.as_str()))?;

        self.inner
            .graph_ahead_behind(local_oid, upstream_oid)
            .map_err(GitError::io)
    }

    // =========================================================================
    // Working Tree Status
    // =========================================================================

    /// Check if the index holds staged changes ready to commit.
    pub fn has_staged_changes(&self) -> Result<bool, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);

        let statuses = self.inner.statuses(Some(&mut opts)).map_err(GitError::io)?;

        Ok(statuses.iter().any(|entry| {
            let s = entry.status();
            s.is_index_new()
                || s.is_index_modified()
                || s.is_index_deleted()
                || s.is_index_renamed()
                || s.is_index_typechange()
        }))
    }

    /// Check if the working tree is clean (no staged or unstaged changes).
    ///
    /// Untracked files are not considered.
    pub fn is_worktree_clean(&self) -> Result<bool, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);

        let statuses = self.inner.statuses(Some(&mut opts)).map_err(GitError::io)?;

        Ok(statuses.iter().all(|entry| {
            let s = entry.status();
            !(s.is_index_new()
                || s.is_index_modified()
                || s.is_index_deleted()
                || s.is_index_renamed()
                || s.is_index_typechange()
                || s.is_wt_modified()
                || s.is_wt_deleted()
                || s.is_wt_renamed()
                || s.is_wt_typechange())
        }))
    }

    // =========================================================================
    // History Mutation
    // =========================================================================

    /// Move HEAD to the commit resolved from `refspec` and force the working
    /// tree and index to match it exactly.
    ///
    /// Files absent from the target commit are removed, present files are
    /// overwritten. The abandoned commit object stays reachable in the
    /// object store until garbage collected.
    pub fn reset_hard(&self, refspec: &str) -> Result<(), GitError> {
        let object = self
            .inner
            .revparse_single(refspec)
            .map_err(|e| GitError::from_git2(e, refspec))?;

        let target = object
            .peel(git2::ObjectType::Commit)
            .map_err(|e| GitError::from_git2(e, refspec))?;

        tracing::debug!(refspec, target = %target.id(), "hard reset");

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.force();

        self.inner
            .reset(&target, git2::ResetType::Hard, Some(&mut checkout))
            .map_err(GitError::io)
    }

    /// Stage every change under the working tree, including deletions.
    pub fn stage_all(&self) -> Result<(), GitError> {
        let mut index = self.inner.index().map_err(GitError::io)?;

        index
            .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
            .map_err(GitError::io)?;
        index.update_all(["*"], None).map_err(GitError::io)?;
        index.write().map_err(GitError::io)?;

        Ok(())
    }

    /// Create a commit over the currently staged tree.
    ///
    /// With `amend`, the new commit replaces the tip: the parent list is
    /// copied from the replaced commit and HEAD moves to the new object.
    /// Without it, the new commit appends with the current HEAD as parent
    /// (or no parent on an unborn branch).
    pub fn commit(
        &self,
        identity: &CommitIdentity,
        message: &str,
        amend: bool,
    ) -> Result<Oid, GitError> {
        let signature =
            git2::Signature::now(identity.name(), identity.email()).map_err(GitError::io)?;

        let mut index = self.inner.index().map_err(GitError::io)?;
        let tree_id = index.write_tree().map_err(GitError::io)?;
        let tree = self.inner.find_tree(tree_id).map_err(GitError::io)?;

        let head_commit = match self.inner.head() {
            Ok(head) => head.peel_to_commit().ok(),
            Err(_) => None,
        };

        let new_oid = if amend {
            let head = head_commit.ok_or(GitError::RefResolution {
                refname: "HEAD".to_string(),
            })?;
            head.amend(
                Some("HEAD"),
                Some(&signature),
                Some(&signature),
                None,
                Some(message),
                Some(&tree),
            )
            .map_err(GitError::io)?
        } else {
            let parents: Vec<&git2::Commit> =
                head_commit.as_ref().map(|c| vec![c]).unwrap_or_default();
            self.inner
                .commit(
                    Some("HEAD"),
                    &signature,
                    &signature,
                    message,
                    &tree,
                    &parents,
                )
                .map_err(GitError::io)?
        };

        tracing::debug!(oid = %new_oid, amend, "created commit");

        Ok(Oid::new(new_oid.to_string())?)
    }

    // =========================================================================
    // Blob Operations
    // =========================================================================

    /// Read a blob by OID.
    pub fn read_blob(&self, oid: &Oid) -> Result<Vec<u8>, GitError> {
        let git_oid =
            git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        let blob = self
            .inner
            .find_blob(git_oid)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        Ok(blob.content().to_vec())
    }

    /// Read the blob at a tree-relative path in the HEAD commit.
    pub fn blob_at_head(&self, rel_path: &Path) -> Result<Vec<u8>, GitError> {
        let tree = self
            .inner
            .head()
            .and_then(|h| h.peel_to_tree())
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let spec = rel_path.display().to_string();
        let entry = tree
            .get_path(rel_path)
            .map_err(|e| GitError::from_git2(e, &spec))?;

        let object = entry.to_object(&self.inner).map_err(GitError::io)?;
        let blob = object.into_blob().map_err(|_| GitError::RepositoryIo {
            message: format!("{spec} is not a blob"),
        })?;

        Ok(blob.content().to_vec())
    }

    // =========================================================================
    // History Listing
    // =========================================================================

    /// List the most recent commits reachable from HEAD, newest first.
    pub fn recent_commits(&self, limit: usize) -> Result<Vec<CommitRecord>, GitError> {
        let mut revwalk = self.inner.revwalk().map_err(GitError::io)?;
        revwalk
            .push_head()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let mut records = Vec::new();
        for item in revwalk.take(limit) {
            let oid = item.map_err(GitError::io)?;
            let commit = self.inner.find_commit(oid).map_err(GitError::io)?;
            let author = commit.author();

            let author_time = chrono::DateTime::from_timestamp(author.when().seconds(), 0)
                .unwrap_or(chrono::DateTime::UNIX_EPOCH)
                .with_timezone(&chrono::Utc);

            records.push(CommitRecord {
                oid: Oid::new(oid.to_string())?,
                summary: commit.summary().unwrap_or("").to_string(),
                message: commit.message().unwrap_or("").to_string(),
                author_name: author.name().unwrap_or("").to_string(),
                author_email: author.email().unwrap_or("").to_string(),
                author_time,
            });
        }

        Ok(records)
    }
}
