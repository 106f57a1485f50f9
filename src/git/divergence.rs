//! git::divergence
//!
//! Classification of the local branch tip against its upstream tracking ref.
//!
//! # Snapshot Semantics
//!
//! The relationship is derived state, computed fresh from the two refs each
//! time a safety decision is needed. It is never cached across operations:
//! refs can move between checks (for example through a concurrent fetch),
//! so callers acquire a fresh [`Repo`] handle for every check and act on
//! the result immediately.

use crate::git::{GitError, Repo};

/// Relationship between the local head and its upstream tracking ref.
///
/// # Example
///
/// ```
/// use modelkeep::git::RemoteRelationship;
///
/// assert_eq!(RemoteRelationship::from_counts(0, 0), RemoteRelationship::Same);
/// assert_eq!(RemoteRelationship::from_counts(2, 0), RemoteRelationship::LocalAhead);
/// assert_eq!(RemoteRelationship::from_counts(0, 1), RemoteRelationship::LocalBehind);
/// assert_eq!(RemoteRelationship::from_counts(1, 3), RemoteRelationship::Diverged);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteRelationship {
    /// Local head and upstream point at the same commit.
    Same,

    /// Local head has commits the upstream lacks.
    LocalAhead,

    /// Upstream has commits the local head lacks.
    LocalBehind,

    /// Both sides have commits the other lacks.
    Diverged,
}

impl RemoteRelationship {
    /// Classify from `(ahead, behind)` commit counts.
    pub fn from_counts(ahead: usize, behind: usize) -> Self {
        match (ahead, behind) {
            (0, 0) => RemoteRelationship::Same,
            (_, 0) => RemoteRelationship::LocalAhead,
            (0, _) => RemoteRelationship::LocalBehind,
            _ => RemoteRelationship::Diverged,
        }
    }

    /// Whether the local head commit is already reachable from the upstream.
    ///
    /// A published head must never be rewritten: undoing it locally would
    /// silently diverge from history other users already have.
    pub fn head_is_published(&self) -> bool {
        matches!(
            self,
            RemoteRelationship::Same | RemoteRelationship::LocalBehind
        )
    }

    /// Human-readable description of the relationship.
    pub fn description(&self) -> &'static str {
        match self {
            RemoteRelationship::Same => "up to date with upstream",
            RemoteRelationship::LocalAhead => "ahead of upstream",
            RemoteRelationship::LocalBehind => "behind upstream",
            RemoteRelationship::Diverged => "diverged from upstream",
        }
    }
}

impl std::fmt::Display for RemoteRelationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Compute the relationship between HEAD and its configured upstream.
///
/// Resolves the current branch's head and its configured remote-tracking
/// ref; failure to resolve either surfaces as [`GitError::RefResolution`].
/// Equal commits are `Same`; otherwise the ancestry graph is walked to
/// distinguish ahead, behind, and diverged.
pub fn relationship(repo: &Repo) -> Result<RemoteRelationship, GitError> {
    let branch = repo.current_branch()?;
    let local = repo.head_oid()?;
    let (upstream_name, upstream) = repo.upstream_oid(&branch)?;

    if local == upstream {
        return Ok(RemoteRelationship::Same);
    }

    let (ahead, behind) = repo.ahead_behind(&local, &upstream)?;
    let relationship = RemoteRelationship::from_counts(ahead, behind);

    tracing::debug!(
        %branch,
        upstream = %upstream_name,
        ahead,
        behind,
        %relationship,
        "classified divergence"
    );

    Ok(relationship)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_counts_mapping() {
        assert_eq!(
            RemoteRelationship::from_counts(0, 0),
            RemoteRelationship::Same
        );
        assert_eq!(
            RemoteRelationship::from_counts(3, 0),
            RemoteRelationship::LocalAhead
        );
        assert_eq!(
            RemoteRelationship::from_counts(0, 2),
            RemoteRelationship::LocalBehind
        );
        assert_eq!(
            RemoteRelationship::from_counts(1, 1),
            RemoteRelationship::Diverged
        );
    }

    #[test]
    fn published_states() {
        assert!(RemoteRelationship::Same.head_is_published());
        assert!(RemoteRelationship::LocalBehind.head_is_published());
        assert!(!RemoteRelationship::LocalAhead.head_is_published());
        assert!(!RemoteRelationship::Diverged.head_is_published());
    }

    #[test]
    fn display_formatting() {
        assert_eq!(
            RemoteRelationship::Diverged.to_string(),
            "diverged from upstream"
        );
    }
}
