//! Checkout of a resolved commit, optionally limited to some paths

use git2::build::CheckoutBuilder;
use git2::{Oid, Repository};

use crate::error::{AgntxError, Result};

fn checkout(repo: &Repository, sha: &str, paths: &[String]) -> Result<()> {
    let failed = |e: &git2::Error| AgntxError::GitCheckoutFailed {
        sha: sha.to_string(),
        reason: e.message().to_string(),
    };

    let oid = Oid::from_str(sha).map_err(|e| failed(&e))?;
    let commit = repo.find_commit(oid).map_err(|e| failed(&e))?;

    let mut builder = CheckoutBuilder::new();
    builder.force();
    for path in paths {
        builder.path(path.as_str());
        builder.path(format!("{path}/*"));
    }

    repo.checkout_tree(commit.as_object(), Some(&mut builder))
        .map_err(|e| failed(&e))?;
    repo.set_head_detached(commit.id()).map_err(|e| failed(&e))
}

/// Detach HEAD at `sha` and check out the whole tree
pub fn checkout_commit(repo: &Repository, sha: &str) -> Result<()> {
    checkout(repo, sha, &[])
}

/// Detach HEAD at `sha` and check out only `paths` (directories or files)
pub fn checkout_paths(repo: &Repository, sha: &str, paths: &[String]) -> Result<()> {
    checkout(repo, sha, paths)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::git::clone;
    use crate::git::testing::{file_url, init_repo};
    use tempfile::TempDir;

    #[test]
    fn test_checkout_paths_limits_working_tree() {
        let temp = TempDir::new().expect("temp dir");
        let origin = temp.path().join("origin");
        let (_repo, oid) = init_repo(
            &origin,
            &[(".claude/agents/a.md", "a"), ("README.md", "readme")],
        );
        let target = temp.path().join("clone");
        let repo = clone(&file_url(&origin), &target).expect("clone");

        checkout_paths(&repo, &oid.to_string(), &[".claude".to_string()]).expect("checkout");

        assert!(target.join(".claude/agents/a.md").is_file());
        assert!(!target.join("README.md").exists());
    }

    #[test]
    fn test_checkout_commit_full() {
        let temp = TempDir::new().expect("temp dir");
        let origin = temp.path().join("origin");
        let (_repo, oid) = init_repo(&origin, &[("agents/a.md", "a"), ("README.md", "r")]);
        let target = temp.path().join("clone");
        let repo = clone(&file_url(&origin), &target).expect("clone");

        checkout_commit(&repo, &oid.to_string()).expect("checkout");

        assert!(target.join("agents/a.md").is_file());
        assert!(target.join("README.md").is_file());
        assert!(repo.head_detached().expect("head"));
    }

    #[test]
    fn test_checkout_invalid_sha() {
        let temp = TempDir::new().expect("temp dir");
        let (repo, _) = init_repo(temp.path(), &[("a.md", "a")]);
        assert!(checkout_commit(&repo, "0000000000000000000000000000000000000000").is_err());
    }
}
