//! sync
//!
//! Workflow coordination over a model repository.
//!
//! # Modules
//!
//! - [`events`] - Change events and the listener bus
//! - [`collaborators`] - Trait seams for the embedding application
//! - [`coordinator`] - The workflow state machine
//!
//! # Design
//!
//! The coordinator composes the divergence check, history mutation, and
//! model reload into user-facing workflows, enforcing the safety invariant
//! that no destructive operation runs against a stale view of the remote
//! relationship and no reload runs against a half-written tree.

pub mod collaborators;
pub mod coordinator;
pub mod events;

pub use collaborators::{CommitInput, Interaction, ModelEditor, ModelLoadError, ModelLoader};
pub use coordinator::{
    CommitOutcome, DiscardOutcome, SyncCoordinator, SyncError, UndoOutcome, WorkflowState,
};
pub use events::{EventBus, RepoEvent, RepositoryListener};
