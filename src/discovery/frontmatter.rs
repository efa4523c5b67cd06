//! YAML frontmatter splitting

use serde_yaml::Value;

/// Split content into YAML frontmatter (between the first `---` line and the
/// next `---` line) and body.
///
/// Returns `Ok(None)` when the content has no opening delimiter, and an error
/// string when the block is unterminated, is not valid YAML, or is not a
/// mapping.
pub fn split(content: &str) -> Result<Option<(Value, String)>, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lines: Vec<&str> = content.lines().collect();
    if lines.first().map(|l| l.trim()) != Some("---") {
        return Ok(None);
    }

    let end_idx = lines[1..]
        .iter()
        .position(|l| l.trim() == "---")
        .ok_or_else(|| "frontmatter block is not terminated by '---'".to_string())?
        + 1;

    let frontmatter_str = lines[1..end_idx].join("\n");
    let body = lines[end_idx + 1..].join("\n");

    if frontmatter_str.trim().is_empty() {
        return Ok(Some((Value::Mapping(serde_yaml::Mapping::new()), body)));
    }

    let value: Value =
        serde_yaml::from_str(&frontmatter_str).map_err(|e| format!("invalid YAML: {e}"))?;
    if !value.is_mapping() {
        return Err("frontmatter must be a mapping of keys to values".to_string());
    }
    Ok(Some((value, body)))
}
