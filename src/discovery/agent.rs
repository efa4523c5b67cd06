//! Agent markdown files
//!
//! An agent is a markdown file with YAML frontmatter. The frontmatter `name`
//! is optional and falls back to the file stem; either way the resulting name
//! must match `^[a-z0-9_-]+$`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::frontmatter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentFile {
    pub path: PathBuf,
    pub source_root: Option<PathBuf>,
    /// Path relative to the tool's agents directory
    pub install_path: Option<PathBuf>,
    pub name: String,
    pub description: Option<String>,
    pub model: Option<String>,
    pub readonly: Option<bool>,
    pub is_background: Option<bool>,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
struct AgentFrontmatter {
    name: Option<String>,
    description: Option<String>,
    model: Option<String>,
    #[serde(alias = "readOnly")]
    readonly: Option<bool>,
    #[serde(alias = "isBackground")]
    is_background: Option<bool>,
}

pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Parse agent content. The error is a human readable reason.
pub fn parse(path: &Path, content: &str) -> Result<AgentFile, String> {
    let (value, _body) =
        frontmatter::split(content)?.ok_or_else(|| "missing YAML frontmatter".to_string())?;

    let fm: AgentFrontmatter =
        serde_yaml::from_value(value).map_err(|e| format!("invalid frontmatter: {e}"))?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = fm.name.map_or(stem, |n| n.trim().to_string());
    if !is_valid_name(&name) {
        return Err(format!(
            "agent name '{name}' must contain only lowercase letters, digits, '-' or '_'"
        ));
    }

    Ok(AgentFile {
        path: path.to_path_buf(),
        source_root: None,
        install_path: path.file_name().map(PathBuf::from),
        name,
        description: fm.description,
        model: fm.model,
        readonly: fm.readonly,
        is_background: fm.is_background,
        content: content.to_string(),
    })
}

/// Read and parse an agent file
pub fn load(path: &Path, source_root: &Path) -> Result<AgentFile, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let mut agent = parse(path, &content)?;
    agent.source_root = Some(source_root.to_path_buf());
    Ok(agent)
}
