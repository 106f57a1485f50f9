//! sync::collaborators
//!
//! Trait seams for the collaborators this crate deliberately excludes:
//! the model loader, the model editor, and the user-interaction layer.
//! The embedding application supplies implementations; the coordinator
//! performs no presentation of its own.

use thiserror::Error;

use crate::core::repository::ModelRepository;
use crate::core::types::CommitIdentity;

/// Failure reconstructing the in-memory model from the decomposed tree.
#[derive(Debug, Error)]
#[error("failed to load model: {message}")]
pub struct ModelLoadError {
    message: String,
}

impl ModelLoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Rebuilds the in-memory model from the decomposed tree.
///
/// Implementations must tolerate being called after an external hard
/// reset: the tree may differ arbitrarily from the previously loaded model.
pub trait ModelLoader {
    fn load_model(&mut self, repo: &ModelRepository) -> Result<(), ModelLoadError>;
}

/// Exposes the open model's editing state.
pub trait ModelEditor {
    /// Whether the model for this repository is open with unsaved changes.
    fn is_dirty(&self, repo: &ModelRepository) -> bool;

    /// Ask the user to persist or discard unsaved changes.
    ///
    /// Returns false to abort the workflow with no mutation.
    fn offer_save_or_discard(&mut self, repo: &ModelRepository) -> bool;
}

/// Everything a commit needs from the user.
#[derive(Debug, Clone)]
pub struct CommitInput {
    /// Author identity for the commit.
    pub identity: CommitIdentity,
    /// Commit message.
    pub message: String,
    /// Replace the tip commit instead of appending.
    pub amend: bool,
}

/// Collects confirmations and commit input from the user.
pub trait Interaction {
    /// Ask for explicit confirmation of a destructive action.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Collect identity, message, and amend flag for a commit.
    ///
    /// `None` means the user cancelled.
    fn commit_input(&mut self) -> Option<CommitInput>;
}
