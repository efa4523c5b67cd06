//! Colored status lines
//!
//! Every human-facing line goes through [`Reporter`]. In `--json` mode the
//! reporter stays quiet and the command prints one payload at the end via
//! [`Reporter::emit_json`].

use console::Style;
use serde::Serialize;

use crate::domain::{Issue, Severity};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    json: bool,
}

impl Reporter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn heading(&self, text: &str) {
        if !self.json {
            println!("{}", Style::new().bold().green().apply_to(text));
        }
    }

    pub fn info(&self, text: &str) {
        if !self.json {
            println!("{text}");
        }
    }

    /// Label/value pair, e.g. `  Source: acme/agents`
    pub fn field(&self, label: &str, value: &str) {
        if !self.json {
            println!("  {} {}", Style::new().bold().apply_to(format!("{label}:")), value);
        }
    }

    /// Indented list item
    pub fn item(&self, text: &str) {
        if !self.json {
            println!("    {} {}", Style::new().dim().apply_to("-"), text);
        }
    }

    pub fn success(&self, text: &str) {
        if !self.json {
            println!("{} {}", Style::new().green().bold().apply_to("✓"), text);
        }
    }

    pub fn warn(&self, text: &str) {
        if !self.json {
            eprintln!("{} {}", Style::new().yellow().bold().apply_to("warning:"), text);
        }
    }

    pub fn error(&self, text: &str) {
        if !self.json {
            eprintln!("{} {}", Style::new().red().bold().apply_to("error:"), text);
        }
    }

    pub fn issue(&self, issue: &Issue) {
        if self.json {
            return;
        }
        let code = match issue.severity {
            Severity::Error => Style::new().red().bold(),
            Severity::Warning => Style::new().yellow().bold(),
        }
        .apply_to(format!("[{}]", issue.code));
        println!("  {code} {}", issue.message);
        if let Some(path) = &issue.path {
            println!("      {}", Style::new().dim().apply_to(path));
        }
    }

    /// `3 installed, 1 skipped` style summary line
    pub fn counts(&self, parts: &[(usize, &str)]) {
        if self.json {
            return;
        }
        let line = parts
            .iter()
            .map(|(n, label)| format!("{n} {label}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}", Style::new().bold().apply_to(line));
    }

    /// Print the `--json` payload. No-op for human output.
    pub fn emit_json<T: Serialize>(&self, payload: &T) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(payload)?);
        }
        Ok(())
    }
}
