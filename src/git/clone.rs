//! Cloning and fetching

use std::path::Path;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{FetchOptions, RemoteCallbacks, Repository};

use super::auth::setup_auth_callbacks;
use super::error::interpret_git_error;
use super::url::{normalize_file_url, normalize_ssh_url};
use crate::error::{AgntxError, Result};

const ORIGIN: &str = "origin";
const REFSPECS: &[&str] = &[
    "+refs/heads/*:refs/remotes/origin/*",
    "+refs/tags/*:refs/tags/*",
];

fn fetch_options<'a>() -> FetchOptions<'a> {
    let mut callbacks = RemoteCallbacks::new();
    setup_auth_callbacks(&mut callbacks);
    let mut options = FetchOptions::new();
    options.remote_callbacks(callbacks);
    options
}

/// Clone `url` into `target` without populating the working tree.
///
/// The caller picks the commit afterwards and checks it out, either fully or
/// limited to a set of paths.
pub fn clone(url: &str, target: &Path) -> Result<Repository> {
    let normalized = normalize_ssh_url(url);
    let normalized = normalize_file_url(&normalized);

    let mut checkout = CheckoutBuilder::new();
    checkout.dry_run();

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options());
    builder.with_checkout(checkout);

    tracing::debug!(url, target = %target.display(), "cloning");
    builder
        .clone(normalized.as_ref(), target)
        .map_err(|e| AgntxError::GitCloneFailed {
            url: url.to_string(),
            reason: interpret_git_error(&e),
        })
}

/// Fetch all branches and tags from `origin` into an existing clone
pub fn fetch_origin(repo: &Repository, url: &str) -> Result<()> {
    let fetch_failed = |e: &git2::Error| AgntxError::GitFetchFailed {
        url: url.to_string(),
        reason: interpret_git_error(e),
    };

    let mut remote = repo.find_remote(ORIGIN).map_err(|e| fetch_failed(&e))?;
    tracing::debug!(url, "fetching origin");
    remote
        .fetch(REFSPECS, Some(&mut fetch_options()), None)
        .map_err(|e| fetch_failed(&e))
}
