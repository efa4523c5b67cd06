//! Reference resolution

use git2::{Commit, Oid, Repository};

use crate::error::{AgntxError, Result};

fn ref_failed(git_ref: &str, reason: impl Into<String>) -> AgntxError {
    AgntxError::GitRefResolveFailed {
        git_ref: git_ref.to_string(),
        reason: reason.into(),
    }
}

/// Commit SHA that HEAD points at
pub fn head_commit(repo: &Repository) -> Result<String> {
    repo.head()
        .and_then(|head| head.peel_to_commit())
        .map(|commit| commit.id().to_string())
        .map_err(|e| ref_failed("HEAD", e.message()))
}

/// Resolve a git ref (branch, tag, or SHA) to a full SHA.
///
/// Without a ref, the remote's default branch (`origin/HEAD`) wins over the
/// local HEAD so that a fetched clone moves forward.
pub fn resolve_ref(repo: &Repository, git_ref: Option<&str>) -> Result<String> {
    match git_ref {
        Some(name) => resolve_reference(repo, name).map(|c| c.id().to_string()),
        None => repo
            .find_reference("refs/remotes/origin/HEAD")
            .and_then(|r| r.resolve())
            .and_then(|r| r.peel_to_commit())
            .map(|c| c.id().to_string())
            .or_else(|_| head_commit(repo)),
    }
}

fn resolve_reference<'a>(repo: &'a Repository, refname: &str) -> Result<Commit<'a>> {
    let candidates = [
        format!("refs/remotes/origin/{refname}"),
        format!("refs/tags/{refname}"),
        format!("refs/heads/{refname}"),
        refname.to_string(),
    ];

    for candidate in &candidates {
        if let Ok(commit) = repo
            .find_reference(candidate)
            .and_then(|r| r.peel_to_commit())
        {
            return Ok(commit);
        }
    }

    if let Ok(commit) = Oid::from_str(refname).and_then(|oid| repo.find_commit(oid)) {
        return Ok(commit);
    }

    repo.revparse_single(refname)
        .and_then(|obj| obj.peel_to_commit())
        .map_err(|_| ref_failed(refname, "Could not resolve reference"))
}
