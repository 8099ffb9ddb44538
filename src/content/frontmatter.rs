//! Front-matter parsing

use serde_yaml::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Why a front-matter block could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FrontMatterError(String);

/// Front-matter data from an article
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,

    /// Keys the loader does not consume
    pub extra: HashMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Content that does not open with a `---` line has no front-matter and
    /// is returned whole as the body.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let trimmed = content.trim_start();

        let (opening, after) = trimmed.split_once('\n').unwrap_or((trimmed, ""));
        if opening.trim_end() != "---" {
            return Ok((FrontMatter::default(), content));
        }

        let mut offset = 0;
        for line in after.split_inclusive('\n') {
            let marker = line.trim_end();
            if marker == "---" || marker == "..." {
                let yaml_content = &after[..offset];
                let remaining = after[offset + line.len()..].trim_start_matches(['\n', '\r']);
                return Ok((Self::from_yaml(yaml_content)?, remaining));
            }
            offset += line.len();
        }

        Err(FrontMatterError(
            "front-matter block is missing its closing `---`".to_string(),
        ))
    }

    fn from_yaml(yaml_content: &str) -> Result<Self, FrontMatterError> {
        if yaml_content.trim().is_empty() {
            return Ok(FrontMatter::default());
        }

        let value: Value =
            serde_yaml::from_str(yaml_content).map_err(|e| FrontMatterError(e.to_string()))?;

        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            // A block holding only comments
            Value::Null => return Ok(FrontMatter::default()),
            _ => {
                return Err(FrontMatterError(
                    "front-matter must be a key-value mapping".to_string(),
                ))
            }
        };

        let mut fm = FrontMatter::default();
        for (key, value) in mapping {
            let Some(key) = scalar_to_string(key) else {
                continue;
            };
            match key.as_str() {
                "title" => fm.title = scalar_field(&key, value)?,
                "date" => fm.date = scalar_field(&key, value)?,
                _ => {
                    fm.extra.insert(key, value);
                }
            }
        }

        Ok(fm)
    }
}

/// Stringify a recognized field; null counts as absent
fn scalar_field(key: &str, value: Value) -> Result<Option<String>, FrontMatterError> {
    match value {
        Value::Null => Ok(None),
        Value::Sequence(_) | Value::Mapping(_) => Err(FrontMatterError(format!(
            "`{}` must be a single value",
            key
        ))),
        other => Ok(scalar_to_string(other)),
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
