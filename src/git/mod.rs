//! Git operations for fetching sources
//!
//! This module handles:
//! - Cloning repositories (HTTPS, SSH and file://) into the cache
//! - Fetching updates into an existing clone
//! - Resolving refs (branches, tags, SHAs) to commits
//! - Full and path-limited (sparse) checkouts
//!
//! Authentication is delegated entirely to git's native system:
//! - SSH agent and keys from ~/.ssh/
//! - Git credential helpers

mod auth;
mod checkout;
mod clone;
mod error;
mod refs;
mod url;

pub use checkout::{checkout_commit, checkout_paths};
pub use clone::{clone, fetch_origin};
pub use refs::{head_commit, resolve_ref};

use std::path::Path;

use git2::Repository;

use crate::error::{AgntxError, Result};

/// Open an existing repository
pub fn open(path: &Path) -> Result<Repository> {
    Repository::open(path).map_err(|e| AgntxError::GitOpenFailed {
        path: path.display().to_string(),
        reason: e.message().to_string(),
    })
}

/// Best-effort HEAD commit of a local directory that is itself a repository
pub fn local_commit(dir: &Path) -> Option<String> {
    if !dir.join(".git").exists() {
        return None;
    }
    let repo = Repository::open(dir).ok()?;
    head_commit(&repo).ok()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) mod testing {
    //! Throwaway repositories for tests

    use std::path::Path;

    use git2::{Oid, Repository, Signature};

    /// Write `files` into the working tree of `repo` and commit them on HEAD
    pub fn commit_files(repo: &Repository, files: &[(&str, &str)], message: &str) -> Oid {
        let workdir = repo.workdir().expect("workdir").to_path_buf();
        let mut index = repo.index().expect("index");
        for (rel, content) in files {
            let path = workdir.join(rel);
            std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            std::fs::write(&path, content).expect("write");
            index.add_path(Path::new(rel)).expect("add");
        }
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = repo.find_tree(tree_id).expect("tree");
        let sig = Signature::now("Test", "test@test.com").expect("sig");
        let parents: Vec<_> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .expect("commit")
    }

    /// Initialize a repository at `dir` with one commit holding `files`
    pub fn init_repo(dir: &Path, files: &[(&str, &str)]) -> (Repository, Oid) {
        let repo = Repository::init(dir).expect("init");
        let oid = commit_files(&repo, files, "Initial commit");
        (repo, oid)
    }

    pub fn file_url(dir: &Path) -> String {
        format!("file://{}", crate::path_utils::to_forward_slashes(dir))
    }
}
