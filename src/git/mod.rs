//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to Git. All repository reads and
//! writes flow through [`Repo`]; no other module imports `git2`. Errors are
//! normalized into the typed [`GitError`] taxonomy so higher layers can
//! distinguish a missing ref from a storage failure.
//!
//! # Responsibilities
//!
//! - Repository opening as a scoped resource
//! - Ref resolution and divergence classification
//! - History mutation: staging, commit (with amend), hard reset
//! - Blob reads and line-ending-safe materialization to the working tree
//!
//! # Invariants
//!
//! - Divergence is computed fresh per call; refs can move between checks
//! - No operation here performs network I/O

mod codec;
mod divergence;
mod interface;

pub use codec::{
    materialize_blob, native_eol, normalize_line_endings, write_blob_with_native_eol, CodecError,
};
pub use divergence::{relationship, RemoteRelationship};
pub use interface::{CommitRecord, GitError, Repo};
