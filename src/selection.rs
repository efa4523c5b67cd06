//! Component selection
//!
//! Turns `--agents/--skills/--commands/--files` into the final list of names
//! per kind. Each flag has three states:
//!
//! - absent: the kind is not requested
//! - bare (`--agents`): every discovered name of that kind
//! - with a value (`--agents a,b`): exactly those names, validated up front
//!
//! Without any kind flag an automated run takes everything and an interactive
//! run asks, first for kinds and then for names.

use serde::{Deserialize, Serialize};

use crate::discovery::DiscoveredSource;
use crate::domain::ComponentKind;
use crate::error::{AgntxError, Result};
use crate::prompt::Prompter;

/// Above this many names the picker first asks for a substring filter
pub const FILTER_THRESHOLD: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KindRequest {
    #[default]
    NotRequested,
    All,
    Names(Vec<String>),
}

impl KindRequest {
    /// Interpret an optional flag value. Bare flags arrive as an empty string.
    pub fn from_flag(value: Option<&str>) -> Self {
        match value {
            None => KindRequest::NotRequested,
            Some(v) if v.trim().is_empty() => KindRequest::All,
            Some(v) => KindRequest::Names(split_names(v)),
        }
    }

    pub fn is_requested(&self) -> bool {
        !matches!(self, KindRequest::NotRequested)
    }
}

/// Comma separated names, trimmed and de-duplicated in order
pub fn split_names(csv: &str) -> Vec<String> {
    dedupe(csv.split(',').map(str::trim).filter(|s| !s.is_empty()))
}

fn dedupe<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// Requests for all four kinds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requests {
    pub agents: KindRequest,
    pub skills: KindRequest,
    pub commands: KindRequest,
    pub files: KindRequest,
}

impl Requests {
    pub fn get(&self, kind: ComponentKind) -> &KindRequest {
        match kind {
            ComponentKind::Agents => &self.agents,
            ComponentKind::Skills => &self.skills,
            ComponentKind::Commands => &self.commands,
            ComponentKind::Files => &self.files,
        }
    }

    pub fn any_requested(&self) -> bool {
        ComponentKind::ALL.iter().any(|k| self.get(*k).is_requested())
    }

    /// Request exactly the names in `selection`
    pub fn exact(selection: &Selection) -> Self {
        let names = |kind| KindRequest::Names(selection.names(kind).to_vec());
        Self {
            agents: names(ComponentKind::Agents),
            skills: names(ComponentKind::Skills),
            commands: names(ComponentKind::Commands),
            files: names(ComponentKind::Files),
        }
    }
}

/// Final names per kind, ordered and without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub agents: Vec<String>,
    pub skills: Vec<String>,
    pub commands: Vec<String>,
    pub files: Vec<String>,
}

impl Selection {
    pub fn names(&self, kind: ComponentKind) -> &[String] {
        match kind {
            ComponentKind::Agents => &self.agents,
            ComponentKind::Skills => &self.skills,
            ComponentKind::Commands => &self.commands,
            ComponentKind::Files => &self.files,
        }
    }

    fn names_mut(&mut self, kind: ComponentKind) -> &mut Vec<String> {
        match kind {
            ComponentKind::Agents => &mut self.agents,
            ComponentKind::Skills => &mut self.skills,
            ComponentKind::Commands => &mut self.commands,
            ComponentKind::Files => &mut self.files,
        }
    }

    pub fn total(&self) -> usize {
        ComponentKind::ALL.iter().map(|k| self.names(*k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Everything a source provides
    pub fn everything(discovered: &DiscoveredSource) -> Self {
        let mut selection = Self::default();
        for kind in ComponentKind::ALL {
            *selection.names_mut(kind) = discovered.names(kind).to_vec();
        }
        selection
    }
}

/// Selection plus the warnings produced while resolving it
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    pub selection: Selection,
    pub warnings: Vec<String>,
}

/// Check every explicit name against the discovered source.
///
/// Runs before anything is written so a typo never leaves a partial install.
pub fn validate_explicit(requests: &Requests, discovered: &DiscoveredSource) -> Result<()> {
    for kind in ComponentKind::ALL {
        let KindRequest::Names(names) = requests.get(kind) else {
            continue;
        };
        let available = discovered.names(kind);
        let invalid: Vec<&str> = names
            .iter()
            .filter(|n| !available.contains(n))
            .map(String::as_str)
            .collect();
        if !invalid.is_empty() {
            return Err(AgntxError::InvalidSelection {
                kind: kind.as_str().to_string(),
                invalid: invalid.join(", "),
                available: if available.is_empty() {
                    "none".to_string()
                } else {
                    available.join(", ")
                },
            });
        }
    }
    Ok(())
}

/// Resolve the final selection. `prompter` is `None` for automated runs.
pub fn resolve(
    discovered: &DiscoveredSource,
    requests: &Requests,
    prompter: Option<&dyn Prompter>,
) -> Result<Resolved> {
    validate_explicit(requests, discovered)?;

    let mut resolved = Resolved::default();

    if !requests.any_requested() {
        match prompter {
            None => resolved.selection = Selection::everything(discovered),
            Some(p) => {
                for kind in pick_kinds(discovered, p)? {
                    *resolved.selection.names_mut(kind) =
                        pick_names(kind, discovered.names(kind), p)?;
                }
            }
        }
        return Ok(resolved);
    }

    for kind in ComponentKind::ALL {
        let available = discovered.names(kind);
        let names = match requests.get(kind) {
            KindRequest::NotRequested => continue,
            KindRequest::Names(names) => names.clone(),
            KindRequest::All if available.is_empty() => {
                resolved
                    .warnings
                    .push(format!("No {} found in source", kind.as_str()));
                Vec::new()
            }
            KindRequest::All => available.to_vec(),
        };
        *resolved.selection.names_mut(kind) = names;
    }

    Ok(resolved)
}

fn pick_kinds(discovered: &DiscoveredSource, prompter: &dyn Prompter) -> Result<Vec<ComponentKind>> {
    let offered: Vec<ComponentKind> = ComponentKind::ALL
        .into_iter()
        .filter(|k| !discovered.names(*k).is_empty())
        .collect();
    match offered.as_slice() {
        [] => return Ok(Vec::new()),
        [only] => return Ok(vec![*only]),
        _ => {}
    }

    let labels: Vec<String> = offered
        .iter()
        .map(|k| format!("{} ({})", k.as_str(), discovered.names(*k).len()))
        .collect();
    let all: Vec<usize> = (0..offered.len()).collect();
    let picked = prompter.multi_select("What do you want to install?", &labels, &all)?;
    Ok(picked.into_iter().filter_map(|i| offered.get(i).copied()).collect())
}

fn pick_names(
    kind: ComponentKind,
    available: &[String],
    prompter: &dyn Prompter,
) -> Result<Vec<String>> {
    let mut candidates: Vec<&String> = available.iter().collect();

    if candidates.len() > FILTER_THRESHOLD {
        let query = prompter.input(&format!(
            "{} {} available. Filter by name (empty for all):",
            candidates.len(),
            kind.as_str()
        ))?;
        let query = query.trim().to_lowercase();
        if !query.is_empty() {
            candidates.retain(|n| n.to_lowercase().contains(&query));
        }
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
    }

    let labels: Vec<String> = candidates.iter().map(|n| (*n).clone()).collect();
    let all: Vec<usize> = (0..labels.len()).collect();
    let picked = prompter.multi_select(&format!("Select {}", kind.as_str()), &labels, &all)?;
    Ok(dedupe(
        picked
            .into_iter()
            .filter_map(|i| labels.get(i))
            .map(String::as_str),
    ))
}
