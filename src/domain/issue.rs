//! Structural and integrity issues
//!
//! Discovery and runtime validation report problems as values instead of
//! failing. Only error-severity issues affect the exit code by default.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// Agent markdown could not be parsed
    AgentInvalid,
    /// Two agents declare the same frontmatter name
    DuplicateAgentName,
    /// Skill directory without `SKILL.md`
    SkillMissingMarker,
    /// Top-level directory skipped because its name is reserved
    ReservedDirIgnored,
    CanonicalMissing,
    TargetMissing,
    TargetNotSymlink,
    BrokenSymlink,
    /// Canonical copy differs from the recorded source
    Outdated,
}

impl IssueCode {
    pub fn severity(self) -> Severity {
        match self {
            IssueCode::AgentInvalid
            | IssueCode::SkillMissingMarker
            | IssueCode::CanonicalMissing
            | IssueCode::TargetMissing
            | IssueCode::BrokenSymlink => Severity::Error,
            IssueCode::DuplicateAgentName
            | IssueCode::ReservedDirIgnored
            | IssueCode::TargetNotSymlink
            | IssueCode::Outdated => Severity::Warning,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueCode::AgentInvalid => "AGENT_INVALID",
            IssueCode::DuplicateAgentName => "DUPLICATE_AGENT_NAME",
            IssueCode::SkillMissingMarker => "SKILL_MISSING_MARKER",
            IssueCode::ReservedDirIgnored => "RESERVED_DIR_IGNORED",
            IssueCode::CanonicalMissing => "CANONICAL_MISSING",
            IssueCode::TargetMissing => "TARGET_MISSING",
            IssueCode::TargetNotSymlink => "TARGET_NOT_SYMLINK",
            IssueCode::BrokenSymlink => "BROKEN_SYMLINK",
            IssueCode::Outdated => "OUTDATED",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub code: IssueCode,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Issue {
    /// Build an issue with the code's default severity
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: message.into(),
            path: None,
        }
    }

    pub fn at(mut self, path: &std::path::Path) -> Self {
        self.path = Some(path.display().to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Count (errors, warnings)
pub fn tally(issues: &[Issue]) -> (usize, usize) {
    let errors = issues.iter().filter(|i| i.is_error()).count();
    (errors, issues.len() - errors)
}
