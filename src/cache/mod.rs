//! Git clone cache
//!
//! Remote sources are cloned once and updated in place on later runs.
//!
//! ## Cache Structure
//!
//! ```text
//! ~/.cache/agntx/            (or $AGNTX_CACHE_DIR)
//! └── repos/
//!     ├── <owner-repo>/      # clone, HEAD detached at the resolved commit
//!     └── <owner-repo>.lock  # held while fetching
//! ```

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::git;
use crate::lock::DirLock;
use crate::source::RepoSpec;

const REPOS_DIR: &str = "repos";

/// A checked-out remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedRepo {
    pub checkout_dir: PathBuf,
    pub commit: String,
}

/// Fetch collaborator: identifier in, local checkout out
pub trait Fetcher {
    fn fetch(&self, spec: &RepoSpec) -> Result<FetchedRepo>;
}

/// [`Fetcher`] backed by libgit2 and an on-disk cache
#[derive(Debug, Clone)]
pub struct GitFetcher {
    cache_dir: PathBuf,
}

impl GitFetcher {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn repo_dir(&self, spec: &RepoSpec) -> PathBuf {
        self.cache_dir.join(REPOS_DIR).join(spec.cache_key())
    }

    fn open_or_clone(&self, spec: &RepoSpec, dir: &Path) -> Result<git2::Repository> {
        if dir.join(".git").is_dir() {
            let updated = git::open(dir).and_then(|repo| {
                git::fetch_origin(&repo, &spec.url)?;
                Ok(repo)
            });
            match updated {
                Ok(repo) => return Ok(repo),
                Err(e) => {
                    tracing::warn!(
                        repo = %spec.slug(),
                        error = %e,
                        "cached clone could not be updated, cloning fresh"
                    );
                    std::fs::remove_dir_all(dir)?;
                }
            }
        } else if dir.exists() {
            std::fs::remove_dir_all(dir)?;
        }

        if let Some(parent) = dir.parent() {
            std::fs::create_dir_all(parent)?;
        }
        git::clone(&spec.url, dir)
    }
}

fn lock_path(repo_dir: &Path) -> PathBuf {
    let mut path = repo_dir.as_os_str().to_os_string();
    path.push(".lock");
    PathBuf::from(path)
}

impl Fetcher for GitFetcher {
    fn fetch(&self, spec: &RepoSpec) -> Result<FetchedRepo> {
        let dir = self.repo_dir(spec);
        let _lock = DirLock::acquire(&lock_path(&dir))?;

        let repo = self.open_or_clone(spec, &dir)?;
        let commit = git::resolve_ref(&repo, spec.git_ref.as_deref())?;

        let sparse = spec.sparse_paths();
        if sparse.is_empty() {
            git::checkout_commit(&repo, &commit)?;
        } else if let Err(e) = git::checkout_paths(&repo, &commit, &sparse) {
            tracing::warn!(
                repo = %spec.slug(),
                paths = ?sparse,
                error = %e,
                "sparse checkout failed, falling back to a full checkout"
            );
            git::checkout_commit(&repo, &commit)?;
        }

        tracing::debug!(repo = %spec.slug(), %commit, dir = %dir.display(), "source ready");
        Ok(FetchedRepo {
            checkout_dir: dir,
            commit,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::git::testing::{commit_files, file_url, init_repo};
    use tempfile::TempDir;

    #[test]
    fn test_fetch_clones_into_cache() {
        let temp = TempDir::new().expect("temp dir");
        let origin = temp.path().join("acme/agents");
        let (_repo, oid) = init_repo(&origin, &[("agents/a.md", "a")]);
        let fetcher = GitFetcher::new(temp.path().join("cache"));
        let spec = RepoSpec::parse(&file_url(&origin)).expect("spec");

        let fetched = fetcher.fetch(&spec).expect("fetch");

        assert_eq!(fetched.commit, oid.to_string());
        assert!(fetched.checkout_dir.ends_with("repos/acme-agents"));
        assert!(fetched.checkout_dir.join("agents/a.md").is_file());
        assert!(!lock_path(&fetched.checkout_dir).exists());
    }

    #[test]
    fn test_fetch_reuses_cache_and_picks_up_new_commits() {
        let temp = TempDir::new().expect("temp dir");
        let origin_dir = temp.path().join("acme/agents");
        let (origin, _) = init_repo(&origin_dir, &[("agents/a.md", "a")]);
        let fetcher = GitFetcher::new(temp.path().join("cache"));
        let spec = RepoSpec::parse(&file_url(&origin_dir)).expect("spec");
        fetcher.fetch(&spec).expect("first fetch");

        let newer = commit_files(&origin, &[("agents/b.md", "b")], "Add b");
        let fetched = fetcher.fetch(&spec).expect("second fetch");

        assert_eq!(fetched.commit, newer.to_string());
        assert!(fetched.checkout_dir.join("agents/b.md").is_file());
    }

    #[test]
    fn test_fetch_pinned_ref() {
        let temp = TempDir::new().expect("temp dir");
        let origin_dir = temp.path().join("acme/agents");
        let (origin, first) = init_repo(&origin_dir, &[("agents/a.md", "v1")]);
        commit_files(&origin, &[("agents/a.md", "v2")], "v2");
        let fetcher = GitFetcher::new(temp.path().join("cache"));
        let spec = RepoSpec::parse(&format!("{}#{first}", file_url(&origin_dir))).expect("spec");

        let fetched = fetcher.fetch(&spec).expect("fetch");

        assert_eq!(fetched.commit, first.to_string());
        let content =
            std::fs::read_to_string(fetched.checkout_dir.join("agents/a.md")).expect("read");
        assert_eq!(content, "v1");
    }

    #[test]
    fn test_fetch_replaces_corrupt_cache_entry() {
        let temp = TempDir::new().expect("temp dir");
        let origin = temp.path().join("acme/agents");
        init_repo(&origin, &[("agents/a.md", "a")]);
        let fetcher = GitFetcher::new(temp.path().join("cache"));
        let spec = RepoSpec::parse(&file_url(&origin)).expect("spec");

        let dir = fetcher.repo_dir(&spec);
        std::fs::create_dir_all(dir.join(".git")).expect("mkdir");
        std::fs::write(dir.join(".git/garbage"), "x").expect("write");

        let fetched = fetcher.fetch(&spec).expect("fetch");
        assert!(fetched.checkout_dir.join("agents/a.md").is_file());
    }
}
