//! Notebook defaults and validation.

use crate::error::CoreError;

/// Accent color given to notebooks created without one.
pub const DEFAULT_NOTEBOOK_COLOR: &str = "#007AFF";

/// Glyph given to notebooks created without one.
pub const DEFAULT_NOTEBOOK_ICON: &str = "📁";

/// Maximum length of a notebook name in characters.
pub const MAX_NOTEBOOK_NAME_LENGTH: usize = 200;

/// Trim a notebook name and check it is present and within bounds.
pub fn normalize_notebook_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Notebook name is required".to_string()));
    }
    if trimmed.chars().count() > MAX_NOTEBOOK_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Notebook name exceeds maximum length of {MAX_NOTEBOOK_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Resolve the color for a new notebook. Blank values fall back to the default.
pub fn color_or_default(color: Option<&str>) -> String {
    non_blank(color).unwrap_or(DEFAULT_NOTEBOOK_COLOR).to_string()
}

/// Resolve the icon for a new notebook. Blank values fall back to the default.
pub fn icon_or_default(icon: Option<&str>) -> String {
    non_blank(icon).unwrap_or(DEFAULT_NOTEBOOK_ICON).to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
