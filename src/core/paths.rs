//! core::paths
//!
//! Folder naming and repository layout resolution.
//!
//! # Layout Contract
//!
//! A managed repository is a plain folder containing a `.git` metadata
//! subdirectory. The decomposed model's element files live under
//! `<repo>/model/`, and the scratch copy of the assembled model lives
//! directly inside the metadata folder at `<repo>/.git/local.model`.
//! Keeping the scratch file inside `.git` keeps it out of the version-
//! controlled tree without ignore rules.
//!
//! # Example
//!
//! ```
//! use modelkeep::core::paths;
//!
//! let name = paths::derive_folder_name("https://host/group/My-Repo.git");
//! assert_eq!(name, "my-repo");
//! ```

use std::path::{Path, PathBuf};

/// Name of the version-control metadata folder.
pub const METADATA_DIRNAME: &str = ".git";

/// Fixed filename of the scratch model file inside the metadata folder.
pub const LOCAL_MODEL_FILENAME: &str = "local.model";

/// Fixed subpath under the working tree holding the decomposed element files.
pub const MODEL_TREE_DIRNAME: &str = "model";

/// Derive a stable, filesystem-safe local folder name from a remote URL.
///
/// The URL is trimmed; the segment after the last `/` becomes the candidate
/// name when it is non-empty; one trailing `.git` suffix is stripped when
/// the remainder is non-empty; the result is lowercased and every character
/// outside `[A-Za-z0-9-]` is replaced with `_`.
///
/// The function is pure and idempotent. Distinct URLs can collide on the
/// same name; that is an accepted limitation, not validated here.
///
/// # Example
///
/// ```
/// use modelkeep::core::paths::derive_folder_name;
///
/// assert_eq!(derive_folder_name("https://host/group/My-Repo.git"), "my-repo");
/// assert_eq!(derive_folder_name("git@host:team/Model Store.git"), "model_store");
/// assert_eq!(derive_folder_name(&derive_folder_name("https://host/a/B.git")), "b");
/// ```
pub fn derive_folder_name(remote_url: &str) -> String {
    let mut name = remote_url.trim();

    if let Some((_, tail)) = name.rsplit_once('/') {
        if !tail.is_empty() {
            name = tail;
        }
    }

    if let Some(stem) = name.strip_suffix(".git") {
        if !stem.is_empty() {
            name = stem;
        }
    }

    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Check whether a folder is a managed repository working tree.
///
/// True iff the path exists, is a directory, and contains a `.git`
/// subdirectory that is itself a directory.
pub fn is_repository_folder(folder: &Path) -> bool {
    if !folder.is_dir() {
        return false;
    }
    folder.join(METADATA_DIRNAME).is_dir()
}

/// The fixed location of the scratch model file for a repository folder.
pub fn local_model_path(repo_folder: &Path) -> PathBuf {
    repo_folder.join(METADATA_DIRNAME).join(LOCAL_MODEL_FILENAME)
}

/// The directory holding the decomposed element files for a repository folder.
pub fn model_tree_dir(repo_folder: &Path) -> PathBuf {
    repo_folder.join(MODEL_TREE_DIRNAME)
}

/// Infer the enclosing repository folder for a model's backing file.
///
/// Returns `Some` only when the file is named [`LOCAL_MODEL_FILENAME`], its
/// parent directory is named `.git`, and that parent has a non-empty parent
/// path component. This is a structural inference over the path shape; no
/// filesystem probe is performed.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use modelkeep::core::paths::repository_folder_for_model;
///
/// let file = Path::new("/work/my-repo/.git/local.model");
/// assert_eq!(
///     repository_folder_for_model(file),
///     Some(Path::new("/work/my-repo").to_path_buf())
/// );
/// assert_eq!(repository_folder_for_model(Path::new("/work/other.xml")), None);
/// ```
pub fn repository_folder_for_model(model_file: &Path) -> Option<PathBuf> {
    if model_file.file_name()? != LOCAL_MODEL_FILENAME {
        return None;
    }

    let metadata_dir = model_file.parent()?;
    if metadata_dir.file_name()? != METADATA_DIRNAME {
        return None;
    }

    metadata_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Check whether a model's backing file lives inside a managed repository.
pub fn is_model_inside_repository(model_file: &Path) -> bool {
    repository_folder_for_model(model_file).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod derive_folder_name {
        use super::*;

        #[test]
        fn strips_path_and_git_suffix() {
            assert_eq!(
                derive_folder_name("https://host/group/My-Repo.git"),
                "my-repo"
            );
        }

        #[test]
        fn lowercases() {
            assert_eq!(derive_folder_name("https://host/UPPER.git"), "upper");
        }

        #[test]
        fn replaces_unsafe_characters() {
            assert_eq!(
                derive_folder_name("git@host:team/Model Store.git"),
                "model_store"
            );
            assert_eq!(derive_folder_name("https://host/a.b.c"), "a_b_c");
        }

        #[test]
        fn trims_whitespace() {
            assert_eq!(derive_folder_name("  https://host/repo.git  "), "repo");
        }

        #[test]
        fn keeps_whole_url_when_trailing_slash() {
            // No non-empty segment after the last separator
            let name = derive_folder_name("https://host/repo/");
            assert!(name.chars().all(|c| c.is_ascii_lowercase()
                || c.is_ascii_digit()
                || c == '-'
                || c == '_'));
        }

        #[test]
        fn bare_git_segment_is_not_stripped_to_empty() {
            // Stripping ".git" from ".git" would leave nothing
            assert_eq!(derive_folder_name("https://host/.git"), "_git");
        }

        #[test]
        fn idempotent() {
            for url in [
                "https://host/group/My-Repo.git",
                "git@host:team/Model Store.git",
                "https://host/repo/",
                "weird\\chars*here",
            ] {
                let once = derive_folder_name(url);
                assert_eq!(derive_folder_name(&once), once, "not idempotent: {url}");
            }
        }
    }

    mod is_repository_folder {
        use super::*;

        #[test]
        fn false_for_missing_path() {
            let dir = tempfile::tempdir().unwrap();
            assert!(!is_repository_folder(&dir.path().join("nope")));
        }

        #[test]
        fn false_for_plain_file() {
            let dir = tempfile::tempdir().unwrap();
            let file = dir.path().join("file.txt");
            std::fs::write(&file, "x").unwrap();
            assert!(!is_repository_folder(&file));
        }

        #[test]
        fn false_for_empty_directory() {
            let dir = tempfile::tempdir().unwrap();
            assert!(!is_repository_folder(dir.path()));
        }

        #[test]
        fn false_when_metadata_entry_is_a_file() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join(METADATA_DIRNAME), "gitdir: elsewhere").unwrap();
            assert!(!is_repository_folder(dir.path()));
        }

        #[test]
        fn true_once_metadata_folder_exists() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::create_dir(dir.path().join(METADATA_DIRNAME)).unwrap();
            assert!(is_repository_folder(dir.path()));
        }
    }

    mod repository_folder_for_model {
        use super::*;

        #[test]
        fn resolves_well_shaped_path() {
            let file = Path::new("/work/my-repo/.git/local.model");
            assert_eq!(
                repository_folder_for_model(file),
                Some(PathBuf::from("/work/my-repo"))
            );
            assert!(is_model_inside_repository(file));
        }

        #[test]
        fn rejects_wrong_filename() {
            let file = Path::new("/work/my-repo/.git/other.model");
            assert_eq!(repository_folder_for_model(file), None);
        }

        #[test]
        fn rejects_wrong_parent_dir() {
            let file = Path::new("/work/my-repo/stash/local.model");
            assert_eq!(repository_folder_for_model(file), None);
        }

        #[test]
        fn rejects_missing_grandparent() {
            // A relative ".git/local.model" has no enclosing folder component
            assert_eq!(
                repository_folder_for_model(Path::new(".git/local.model")),
                None
            );
        }

        #[test]
        fn no_filesystem_probe_needed() {
            // The path does not exist on disk; the inference is structural
            let file = Path::new("/definitely/missing/.git/local.model");
            assert_eq!(
                repository_folder_for_model(file),
                Some(PathBuf::from("/definitely/missing"))
            );
        }
    }

    #[test]
    fn fixed_locations() {
        let repo = Path::new("/work/repo");
        assert_eq!(
            local_model_path(repo),
            PathBuf::from("/work/repo/.git/local.model")
        );
        assert_eq!(model_tree_dir(repo), PathBuf::from("/work/repo/model"));
    }
}
