//! Note defaults and the content type vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Title given to notes created without one.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

/// What a note body holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Text,
    Drawing,
    Mixed,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Drawing => "drawing",
            ContentType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ContentType::Text),
            "drawing" => Ok(ContentType::Drawing),
            "mixed" => Ok(ContentType::Mixed),
            other => Err(CoreError::Validation(format!(
                "Invalid content type '{other}'. Must be one of: text, drawing, mixed"
            ))),
        }
    }
}

impl TryFrom<String> for ContentType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Resolve the title for a new note. Missing or blank titles get the default.
pub fn title_or_default(title: Option<&str>) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => DEFAULT_NOTE_TITLE.to_string(),
    }
}
