//! Source resolution
//!
//! Turns the user's source argument into a local directory plus provenance:
//! - an existing directory is used in place (`./agents-repo`, `/abs/path`)
//! - anything else is parsed as a [`RepoSpec`] and fetched into the cache
//!
//! ## Module Organization
//!
//! - `git_source.rs`: remote identifier parsing and aliases

pub mod git_source;

pub use git_source::RepoSpec;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::Fetcher;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Git,
    Local,
}

/// Where the installed components came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    pub source_type: SourceType,
    /// The argument exactly as given
    pub input: String,
    pub resolved_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

/// Resolve `input` relative to `cwd`, fetching remote sources via `fetcher`
pub fn resolve(input: &str, cwd: &Path, fetcher: &dyn Fetcher) -> Result<SourceDescriptor> {
    let candidate = cwd.join(input.trim());
    if !input.trim().is_empty() && candidate.is_dir() {
        let resolved = dunce::canonicalize(&candidate).unwrap_or(candidate);
        let commit = crate::git::local_commit(&resolved);
        tracing::debug!(path = %resolved.display(), ?commit, "using local source");
        return Ok(SourceDescriptor {
            source_type: SourceType::Local,
            input: input.to_string(),
            resolved_path: resolved,
            repo: None,
            git_ref: None,
            commit,
        });
    }

    let spec = RepoSpec::parse(input)?;
    let fetched = fetcher.fetch(&spec)?;
    let resolved_path = match spec.alias {
        Some(alias) => fetched.checkout_dir.join(alias.subdir()),
        None => fetched.checkout_dir,
    };

    Ok(SourceDescriptor {
        source_type: SourceType::Git,
        input: input.to_string(),
        resolved_path,
        repo: Some(spec.slug()),
        git_ref: spec.git_ref,
        commit: Some(fetched.commit),
    })
}
