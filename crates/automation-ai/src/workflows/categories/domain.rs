use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::validation::{normalize_optional, required_text, ValidationError};

pub const CATEGORY_NAME_MAX_CHARS: usize = 100;
pub const DEFAULT_COLOR: &str = "#007bff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryId(pub u64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared label for grouping processes. Categories are not owner scoped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    /// Assessments carry no category link, so this is always zero.
    pub process_count: usize,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn view(&self) -> CategoryView {
        CategoryView {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            color: self.color.clone(),
            process_count: 0,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}

impl CategoryInput {
    pub fn validate(self) -> Result<CategoryDraft, ValidationError> {
        let name = required_text("name", self.name, CATEGORY_NAME_MAX_CHARS)?;
        let color = match normalize_optional(self.color) {
            None => DEFAULT_COLOR.to_string(),
            Some(color) if is_hex_color(&color) => color.to_ascii_lowercase(),
            Some(_) => {
                return Err(ValidationError::invalid(
                    "color",
                    "must be a hex colour like #1a2b3c",
                ))
            }
        };
        Ok(CategoryDraft {
            name,
            description: normalize_optional(self.description),
            color,
        })
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|ch| ch.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_defaults_and_normalises() {
        let draft = CategoryInput {
            name: Some("Finance".to_string()),
            ..CategoryInput::default()
        }
        .validate()
        .expect("valid");
        assert_eq!(draft.color, DEFAULT_COLOR);

        let draft = CategoryInput {
            name: Some("HR".to_string()),
            color: Some("#AABBCC".to_string()),
            ..CategoryInput::default()
        }
        .validate()
        .expect("valid");
        assert_eq!(draft.color, "#aabbcc");
    }

    #[test]
    fn malformed_colours_are_rejected() {
        for color in ["007bff", "#07bff", "#00zzff", "#007bff0"] {
            let error = CategoryInput {
                name: Some("Ops".to_string()),
                color: Some(color.to_string()),
                ..CategoryInput::default()
            }
            .validate()
            .expect_err("bad colour");
            assert_eq!(error.field().as_deref(), Some("color"));
        }
    }
}
