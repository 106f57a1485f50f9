//! sync::coordinator
//!
//! The workflow state machine.
//!
//! # State Machine
//!
//! `Idle → CheckingDivergence → {Blocked, ConfirmPending} → Executing →
//! ReloadingModel → NotifyingListeners → Idle`
//!
//! Every workflow leaves the machine at `Idle` on every exit path. A
//! failure during `Executing` never proceeds to `ReloadingModel`: reloading
//! against a possibly half-written tree would hand the editor an
//! inconsistent model.
//!
//! # Safety Invariant
//!
//! The remote relationship is computed with a fresh repository handle
//! immediately before any destructive call. It is a snapshot of moving
//! refs and is never reused across operations.

use thiserror::Error;

use crate::core::repository::ModelRepository;
use crate::core::types::Oid;
use crate::git::{relationship, GitError, RemoteRelationship};
use crate::sync::collaborators::{Interaction, ModelEditor, ModelLoadError, ModelLoader};
use crate::sync::events::{EventBus, RepoEvent};

const UNDO_PROMPT: &str =
    "Undo the last commit? The commit and its working-tree changes will be discarded.";

const DISCARD_PROMPT: &str =
    "Discard all uncommitted changes? The working tree will be restored to the last commit.";

/// Errors surfaced by workflows.
///
/// Declined confirmations and save-offers are normal outcomes, not errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Reload(#[from] ModelLoadError),
}

/// Observable position of the workflow state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    CheckingDivergence,
    Blocked,
    ConfirmPending,
    Executing,
    ReloadingModel,
    NotifyingListeners,
}

/// Result of the undo-last-commit workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    /// History was rewound one commit and the model reloaded.
    Completed,

    /// The local head is already published; nothing was mutated.
    BlockedPublished(RemoteRelationship),

    /// The user declined the confirmation or the save-offer.
    Declined,
}

/// Result of the commit workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A commit was created or amended.
    Committed(Oid),

    /// No staged change to commit; benign no-op.
    NothingToCommit,

    /// The user cancelled the commit input.
    Declined,
}

/// Result of the discard-working-changes workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardOutcome {
    /// The working tree was restored to HEAD and the model reloaded.
    Completed,

    /// The user declined the confirmation.
    Declined,
}

/// Orchestrates user-facing workflows over one model repository at a time.
///
/// The caller serializes workflows per repository folder; the coordinator
/// performs no internal locking. Listener dispatch is synchronous and must
/// not reenter the coordinator.
pub struct SyncCoordinator {
    loader: Box<dyn ModelLoader>,
    editor: Box<dyn ModelEditor>,
    interaction: Box<dyn Interaction>,
    events: EventBus,
    state: WorkflowState,
}

impl SyncCoordinator {
    /// Build a coordinator from its collaborators and an event bus.
    pub fn new(
        loader: Box<dyn ModelLoader>,
        editor: Box<dyn ModelEditor>,
        interaction: Box<dyn Interaction>,
        events: EventBus,
    ) -> Self {
        Self {
            loader,
            editor,
            interaction,
            events,
            state: WorkflowState::Idle,
        }
    }

    /// Current position of the state machine.
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// The listener bus, for registration and deregistration.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Undo the last local commit.
    ///
    /// Refuses without mutation when the local head is already published
    /// (equal to, or an ancestor of, the upstream tracking head). Otherwise
    /// asks for confirmation, settles unsaved editor changes, rewinds HEAD
    /// one commit with a hard reset, reloads the model from the decomposed
    /// tree, and notifies listeners.
    pub fn undo_last_commit(&mut self, repo: &ModelRepository) -> Result<UndoOutcome, SyncError> {
        let outcome = self.drive_undo(repo);
        // The machine is back at Idle on every exit path
        self.state = WorkflowState::Idle;
        outcome
    }

    fn drive_undo(&mut self, repo: &ModelRepository) -> Result<UndoOutcome, SyncError> {
        self.state = WorkflowState::CheckingDivergence;

        // Computed fresh, immediately before acting. Refs can move between
        // operations, so this snapshot is never reused.
        let rel = repo.with_repo(|r| relationship(r))?;

        if rel.head_is_published() {
            self.state = WorkflowState::Blocked;
            tracing::info!(%rel, "refusing undo: local head is already published");
            return Ok(UndoOutcome::BlockedPublished(rel));
        }

        self.state = WorkflowState::ConfirmPending;
        if !self.interaction.confirm(UNDO_PROMPT) {
            return Ok(UndoOutcome::Declined);
        }

        // Settle unsaved editor changes before touching the tree, so the
        // decomposed files and the in-memory model cannot drift apart.
        if self.editor.is_dirty(repo) && !self.editor.offer_save_or_discard(repo) {
            return Ok(UndoOutcome::Declined);
        }

        self.state = WorkflowState::Executing;
        repo.with_repo(|r| r.reset_hard("HEAD^"))?;

        self.state = WorkflowState::ReloadingModel;
        self.loader.load_model(repo)?;

        self.state = WorkflowState::NotifyingListeners;
        self.events.emit(RepoEvent::HistoryChanged, repo);

        Ok(UndoOutcome::Completed)
    }

    /// Commit the current state of the decomposed tree.
    ///
    /// Collects identity, message, and amend flag from the interaction
    /// layer, stages everything, and commits. An empty stage without amend
    /// is the benign [`CommitOutcome::NothingToCommit`].
    pub fn commit_changes(&mut self, repo: &ModelRepository) -> Result<CommitOutcome, SyncError> {
        let outcome = self.drive_commit(repo);
        self.state = WorkflowState::Idle;
        outcome
    }

    fn drive_commit(&mut self, repo: &ModelRepository) -> Result<CommitOutcome, SyncError> {
        self.state = WorkflowState::ConfirmPending;
        let Some(input) = self.interaction.commit_input() else {
            return Ok(CommitOutcome::Declined);
        };

        self.state = WorkflowState::Executing;
        let committed = repo.with_repo(|r| {
            r.stage_all()?;
            // Amending with an unchanged stage is a legitimate message edit
            if !input.amend && !r.has_staged_changes()? {
                return Err(GitError::NothingToCommit);
            }
            r.commit(&input.identity, &input.message, input.amend)
        });

        match committed {
            Ok(oid) => {
                self.state = WorkflowState::NotifyingListeners;
                self.events.emit(RepoEvent::CommitChanged, repo);
                Ok(CommitOutcome::Committed(oid))
            }
            Err(GitError::NothingToCommit) => {
                tracing::info!("commit requested with no staged changes");
                Ok(CommitOutcome::NothingToCommit)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Discard every uncommitted change in the working tree.
    ///
    /// Confirms, restores the tree to HEAD with a hard reset, reloads the
    /// model, and notifies listeners. Same failure discipline as undo: a
    /// failed reset never proceeds to the reload.
    pub fn discard_working_changes(
        &mut self,
        repo: &ModelRepository,
    ) -> Result<DiscardOutcome, SyncError> {
        let outcome = self.drive_discard(repo);
        self.state = WorkflowState::Idle;
        outcome
    }

    fn drive_discard(&mut self, repo: &ModelRepository) -> Result<DiscardOutcome, SyncError> {
        self.state = WorkflowState::ConfirmPending;
        if !self.interaction.confirm(DISCARD_PROMPT) {
            return Ok(DiscardOutcome::Declined);
        }

        self.state = WorkflowState::Executing;
        repo.with_repo(|r| r.reset_hard("HEAD"))?;

        self.state = WorkflowState::ReloadingModel;
        self.loader.load_model(repo)?;

        self.state = WorkflowState::NotifyingListeners;
        self.events.emit(RepoEvent::HistoryChanged, repo);

        Ok(DiscardOutcome::Completed)
    }
}

impl std::fmt::Debug for SyncCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("state", &self.state)
            .field("events", &self.events)
            .finish()
    }
}
