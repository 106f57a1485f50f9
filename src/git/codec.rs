//! git::codec
//!
//! Line-ending-safe materialization of version-control blobs to the
//! working tree.
//!
//! Stored objects are platform-neutral; working-tree copies carry the
//! host's native newline. Without this normalization, a tree materialized
//! from a CRLF-origin commit would show spurious diffs on the next export
//! on an LF host (and vice versa). The transform is applied only on the
//! working-tree write path; the object store is never rewritten.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::Oid;
use crate::git::{GitError, Repo};

/// Errors from blob materialization.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Blob bytes are not valid UTF-8 text.
    #[error("blob for {} is not valid UTF-8 text", .path.display())]
    NotText {
        /// Destination path of the failed write
        path: PathBuf,
    },

    /// Filesystem write failure; no partial output is left behind.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Destination path of the failed write
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Underlying git failure while reading the blob.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// The host platform's native line terminator.
pub fn native_eol() -> &'static str {
    if cfg!(windows) {
        "\r\n"
    } else {
        "\n"
    }
}

/// Replace every line terminator (`\r\n` or bare `\n`) with `eol`.
///
/// All other bytes pass through unchanged; a lone `\r` is not a terminator.
///
/// # Example
///
/// ```
/// use modelkeep::git::normalize_line_endings;
///
/// assert_eq!(normalize_line_endings("a\r\nb\nc", "\n"), "a\nb\nc");
/// assert_eq!(normalize_line_endings("a\nb", "\r\n"), "a\r\nb");
/// assert_eq!(normalize_line_endings("bare\rcarriage", "\n"), "bare\rcarriage");
/// ```
pub fn normalize_line_endings(text: &str, eol: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                out.push_str(eol);
            }
            '\n' => out.push_str(eol),
            _ => out.push(c),
        }
    }

    out
}

/// Write blob content to `path` with the host's native line endings.
///
/// The blob is decoded as UTF-8 text, its line terminators normalized to
/// [`native_eol`], and the result written through a temp file in the same
/// directory followed by an atomic rename — concurrent readers never
/// observe truncated output. Creates the file if absent, overwrites it
/// if present.
pub fn write_blob_with_native_eol(path: &Path, blob: &[u8]) -> Result<(), CodecError> {
    let text = std::str::from_utf8(blob).map_err(|_| CodecError::NotText {
        path: path.to_path_buf(),
    })?;

    let normalized = normalize_line_endings(text, native_eol());
    write_atomic(path, normalized.as_bytes())
}

/// Materialize a blob from the object store to a working-tree path.
pub fn materialize_blob(repo: &Repo, oid: &Oid, path: &Path) -> Result<(), CodecError> {
    let bytes = repo.read_blob(oid)?;
    write_blob_with_native_eol(path, &bytes)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CodecError> {
    let write_err = |source| CodecError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    // Temp file in the same directory so the rename stays on one filesystem.
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = std::fs::File::create(&temp_path).map_err(write_err)?;
    file.write_all(bytes).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);

    std::fs::rename(&temp_path, path).map_err(write_err)
}
