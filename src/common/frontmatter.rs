//! Markdown documents with a YAML frontmatter block.
//!
//! Story files use the layout
//!
//! ```markdown
//! ---
//! key: value
//! ---
//!
//! # Title
//!
//! Body...
//! ```
//!
//! The H1 heading carries the record title and everything after it is the
//! body.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("Invalid frontmatter format: {0}")]
    InvalidFormat(String),
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// A parsed document: typed frontmatter, H1 title and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<T> {
    pub metadata: T,
    pub title: String,
    pub body: String,
}

/// Split raw content into (frontmatter YAML, lines after the closing fence).
fn split_fences(content: &str) -> Result<(String, Vec<&str>), FrontmatterError> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.first() != Some(&"---") {
        return Err(FrontmatterError::InvalidFormat(
            "Content must start with '---'".to_string(),
        ));
    }

    let end_idx = lines
        .iter()
        .skip(1)
        .position(|&line| line == "---")
        .ok_or_else(|| {
            FrontmatterError::InvalidFormat("Missing closing '---' for frontmatter".to_string())
        })?;

    let yaml = lines.get(1..=end_idx).unwrap_or(&[]).join("\n");
    let rest = lines
        .get(end_idx.saturating_add(2)..)
        .unwrap_or(&[])
        .iter()
        .skip_while(|line| line.trim().is_empty())
        .copied()
        .collect();

    Ok((yaml, rest))
}

/// Parse a Markdown document with YAML frontmatter.
///
/// A document without an H1 heading yields an empty title and the whole
/// remainder as body.
pub fn parse_document<T: DeserializeOwned>(content: &str) -> Result<Document<T>, FrontmatterError> {
    let (yaml, rest) = split_fences(content)?;
    let metadata: T = serde_yaml::from_str(&yaml)?;

    let heading = rest.first().and_then(|line| line.strip_prefix("# "));
    let (title, body_lines) = match heading {
        Some(title) => (title.trim().to_string(), rest.get(1..).unwrap_or(&[])),
        None => (String::new(), rest.as_slice()),
    };

    let body = body_lines
        .iter()
        .skip_while(|line| line.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string();

    Ok(Document {
        metadata,
        title,
        body,
    })
}

/// Render a Markdown document with YAML frontmatter.
pub fn render_document<T: Serialize>(
    metadata: &T,
    title: &str,
    body: &str,
) -> Result<String, FrontmatterError> {
    let yaml = serde_yaml::to_string(metadata)?;
    // serde_yaml always ends with a newline
    let yaml = yaml.trim_end();

    if body.is_empty() {
        Ok(format!("---\n{yaml}\n---\n\n# {title}\n"))
    } else {
        Ok(format!("---\n{yaml}\n---\n\n# {title}\n\n{body}\n"))
    }
}
