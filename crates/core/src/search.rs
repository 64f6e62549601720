//! Note search helpers.
//!
//! Search is a case-insensitive substring match over a note's title, body
//! and OCR text. These helpers are shared by the in-memory matcher and the
//! SQL `ILIKE` pattern builder so both backends agree on what matches.

/// Trim a raw query. Returns `None` when nothing searchable remains.
pub fn normalize_query(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Lowercased needle for [`matches_any`].
pub fn fold_case(query: &str) -> String {
    query.to_lowercase()
}

/// Whether any of the given fields contains `needle` (already case-folded).
pub fn matches_any(needle: &str, fields: &[Option<&str>]) -> bool {
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Build an `ILIKE` pattern that matches `query` literally anywhere in a column.
///
/// `%`, `_` and the escape character `\` are escaped so user input never acts
/// as a wildcard.
pub fn ilike_contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Interpret an optional result cap. Absent or non-positive means "no cap".
pub fn effective_limit(limit: Option<i64>) -> Option<usize> {
    limit
        .filter(|&n| n > 0)
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
}
