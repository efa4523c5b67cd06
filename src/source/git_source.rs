//! Remote repository identifiers
//!
//! Accepted forms:
//! - `owner/repo`, `owner/repo#ref`, `owner/repo/<alias>` (GitHub shorthand)
//! - `https://host/owner/repo[.git][/<alias>][#ref]`
//! - `git@host:owner/repo.git[#ref]`, `ssh://git@host/owner/repo.git`
//! - `file:///path/to/repo[#ref]`
//!
//! An alias narrows the source root to a well-known subdirectory of the
//! repository, e.g. `owner/repo/claude` reads agents from `.claude/`.

use std::fmt;

use crate::error::{AgntxError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceAlias {
    Claude,
    Cursor,
    Agents,
}

impl SourceAlias {
    pub const ALL: [SourceAlias; 3] = [SourceAlias::Agents, SourceAlias::Claude, SourceAlias::Cursor];

    pub fn parse(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == segment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceAlias::Claude => "claude",
            SourceAlias::Cursor => "cursor",
            SourceAlias::Agents => "agents",
        }
    }

    /// Source-root suffix inside the repository
    pub fn subdir(self) -> &'static str {
        match self {
            SourceAlias::Claude => ".claude",
            SourceAlias::Cursor => ".cursor",
            SourceAlias::Agents => ".agents",
        }
    }

    fn known_list() -> String {
        Self::ALL
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SourceAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed remote identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    /// Clone URL
    pub url: String,
    pub owner: String,
    pub repo: String,
    pub git_ref: Option<String>,
    pub alias: Option<SourceAlias>,
}

impl RepoSpec {
    /// `owner/repo`, used for display and provenance
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Cache directory key (`owner-repo`)
    pub fn cache_key(&self) -> String {
        crate::path_utils::make_path_safe(&self.slug())
    }

    /// Paths a sparse checkout is narrowed to
    pub fn sparse_paths(&self) -> Vec<String> {
        self.alias.map(|a| vec![a.subdir().to_string()]).unwrap_or_default()
    }

    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (main, git_ref) = match trimmed.split_once('#') {
            Some((_, "")) => return Err(invalid(input, "empty ref after '#'")),
            Some((main, r)) => (main, Some(r.to_string())),
            None => (trimmed, None),
        };

        let mut spec = if let Some(rest) = main.strip_prefix("file://") {
            parse_file(input, main, rest)?
        } else if let Some(rest) = main.strip_prefix("https://") {
            parse_https(input, rest)?
        } else if let Some(rest) = main.strip_prefix("ssh://") {
            parse_ssh_url(input, main, rest)?
        } else if main.starts_with("git@") {
            parse_scp(input, main)?
        } else {
            parse_shorthand(input, main)?
        };

        spec.git_ref = git_ref;
        Ok(spec)
    }
}

fn invalid(input: &str, reason: &str) -> AgntxError {
    AgntxError::InvalidSource {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn strip_git_suffix(repo: &str) -> &str {
    repo.strip_suffix(".git").unwrap_or(repo)
}

fn parse_alias(input: &str, segment: Option<&str>) -> Result<Option<SourceAlias>> {
    match segment {
        None => Ok(None),
        Some(seg) => SourceAlias::parse(seg).map(Some).ok_or_else(|| AgntxError::UnknownAlias {
            input: input.to_string(),
            alias: seg.to_string(),
            known: SourceAlias::known_list(),
        }),
    }
}

/// Split `owner/repo[/alias]` into checked parts
fn owner_repo_alias<'a>(input: &str, path: &'a str) -> Result<(&'a str, &'a str, Option<SourceAlias>)> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        [owner, repo] | [owner, repo, _] if is_valid_segment(owner) && is_valid_segment(repo) => {
            let alias = parse_alias(input, segments.get(2).copied())?;
            Ok((owner, repo, alias))
        }
        [_, _, _, _, ..] => Err(AgntxError::UnknownAlias {
            input: input.to_string(),
            alias: segments[2..].join("/"),
            known: SourceAlias::known_list(),
        }),
        _ => Err(invalid(input, "expected owner/repo")),
    }
}

fn parse_shorthand(input: &str, main: &str) -> Result<RepoSpec> {
    if main.contains(':') || main.starts_with('/') || main.starts_with('.') {
        return Err(invalid(input, "not an existing directory and not a repository identifier"));
    }
    let (owner, repo, alias) = owner_repo_alias(input, main)?;
    let repo = strip_git_suffix(repo);
    Ok(RepoSpec {
        url: format!("https://github.com/{owner}/{repo}.git"),
        owner: owner.to_string(),
        repo: repo.to_string(),
        git_ref: None,
        alias,
    })
}

fn parse_https(input: &str, rest: &str) -> Result<RepoSpec> {
    let (host, path) = rest
        .split_once('/')
        .ok_or_else(|| invalid(input, "URL has no repository path"))?;
    if host.is_empty() {
        return Err(invalid(input, "URL has no host"));
    }
    let (owner, repo, alias) = owner_repo_alias(input, path)?;
    Ok(RepoSpec {
        url: format!("https://{host}/{owner}/{repo}"),
        owner: owner.to_string(),
        repo: strip_git_suffix(repo).to_string(),
        git_ref: None,
        alias,
    })
}

fn parse_scp(input: &str, main: &str) -> Result<RepoSpec> {
    let (host, path) = main
        .split_once(':')
        .ok_or_else(|| invalid(input, "expected git@host:owner/repo.git"))?;
    let (owner, repo, alias) = owner_repo_alias(input, path)?;
    Ok(RepoSpec {
        url: format!("{host}:{owner}/{repo}"),
        owner: owner.to_string(),
        repo: strip_git_suffix(repo).to_string(),
        git_ref: None,
        alias,
    })
}

fn parse_ssh_url(input: &str, main: &str, rest: &str) -> Result<RepoSpec> {
    let (_, path) = rest
        .split_once('/')
        .ok_or_else(|| invalid(input, "URL has no repository path"))?;
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let [.., owner, repo] = segments.as_slice() else {
        return Err(invalid(input, "expected ssh://host/owner/repo.git"));
    };
    if !is_valid_segment(owner) || !is_valid_segment(repo) {
        return Err(invalid(input, "expected ssh://host/owner/repo.git"));
    }
    Ok(RepoSpec {
        url: main.to_string(),
        owner: (*owner).to_string(),
        repo: strip_git_suffix(repo).to_string(),
        git_ref: None,
        alias: None,
    })
}

fn parse_file(input: &str, main: &str, rest: &str) -> Result<RepoSpec> {
    let path = rest.replace('\\', "/");
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let (owner, repo) = match segments.as_slice() {
        [.., owner, repo] => (*owner, *repo),
        [repo] => ("local", *repo),
        [] => return Err(invalid(input, "file:// URL has no path")),
    };
    Ok(RepoSpec {
        url: main.to_string(),
        owner: owner.trim_end_matches(':').to_string(),
        repo: strip_git_suffix(repo).to_string(),
        git_ref: None,
        alias: None,
    })
}
