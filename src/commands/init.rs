//! Init command implementation
//!
//! Scaffolds a source layout with one valid example per kind. Existing files
//! are left alone, so running it twice is harmless.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{Context, Outcome};
use crate::cli::InitArgs;
use crate::error::{Result, write_failed};
use crate::installer::file_ops::ensure_parent_dir;
use crate::ui::Reporter;

const EXAMPLE_AGENT: &str = "\
---
name: example-agent
description: Reviews changes for correctness and style. Replace with your own agent.
---

You are a careful reviewer. Read the diff, point out bugs first, then style.
";

const EXAMPLE_SKILL: &str = "\
---
name: example-skill
description: Describe when this skill should be used.
---

# Example skill

Step-by-step instructions for the task this skill covers. Put helper
scripts next to this file and reference them by relative path.
";

const EXAMPLE_COMMAND: &str = "\
---
description: Summarize the current changes
---

Summarize the staged changes in three bullet points: $ARGUMENTS
";

/// Relative path and content of every scaffolded file
pub const SCAFFOLD: [(&str, &str); 3] = [
    ("agents/example-agent.md", EXAMPLE_AGENT),
    ("skills/example-skill/SKILL.md", EXAMPLE_SKILL),
    ("commands/example-command.md", EXAMPLE_COMMAND),
];

#[derive(Debug, Default, Serialize)]
pub struct Scaffolded {
    pub created: Vec<PathBuf>,
    /// Already present, left untouched
    pub kept: Vec<PathBuf>,
}

/// Write the scaffold under `root`
pub fn scaffold(root: &Path) -> Result<Scaffolded> {
    let mut out = Scaffolded::default();
    for (rel, content) in SCAFFOLD {
        let path = root.join(rel);
        if path.exists() {
            out.kept.push(path);
            continue;
        }
        ensure_parent_dir(&path)?;
        std::fs::write(&path, content).map_err(|e| write_failed(&path, &e))?;
        out.created.push(path);
    }
    Ok(out)
}

/// Run init command
pub fn run(ctx: &Context, args: InitArgs) -> Result<Outcome> {
    let reporter = Reporter::new(args.json);
    let root = match args.dir {
        Some(dir) => ctx.workspace.join(dir),
        None => ctx.workspace.clone(),
    };

    let result = scaffold(&root)?;
    for path in &result.created {
        reporter.item(&format!("created {}", path.display()));
    }
    for path in &result.kept {
        reporter.item(&format!("exists  {}", path.display()));
    }
    reporter.success(&format!(
        "Source layout ready in {}. Try: agntx inspect {}",
        root.display(),
        root.display()
    ));
    reporter.emit_json(&result)?;
    Ok(Outcome::Success)
}
