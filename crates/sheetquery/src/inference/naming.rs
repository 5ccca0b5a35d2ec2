//! Column and relation name sanitization.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of a cleaned column name.
pub const MAX_NAME_LEN: usize = 50;

/// Placeholder labels produced for header cells that had no text,
/// e.g. `Unnamed: 3` or `Unnamed: 0_level_1`.
static PLACEHOLDER_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Unnamed:\s*\d+(_level_\d+)?$").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

/// Generate a fresh column name with a random 32-bit hex suffix.
pub fn generate_name() -> String {
    format!("Column_{:08x}", fastrand::u32(..))
}

/// Returns true if the label is an auto-numbered placeholder.
pub fn is_placeholder(label: &str) -> bool {
    PLACEHOLDER_LABEL.is_match(label.trim())
}

/// Returns true if `name` is a non-empty `[A-Za-z0-9_]+` identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Trim, drop every character that is not ASCII alphanumeric, `_` or
/// whitespace, and collapse whitespace runs to a single `_`.
///
/// This is the one sanitizer shared by column names and relation names.
pub fn sanitize(raw: &str) -> String {
    let kept: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    WHITESPACE_RUN.replace_all(&kept, "_").into_owned()
}

/// Clean a raw column label into a storable column name.
///
/// Missing, blank and placeholder labels get a generated name. The result is
/// never empty, at most [`MAX_NAME_LEN`] characters, and matches
/// `[A-Za-z0-9_]+`. Distinct labels that differ only in stripped punctuation
/// map to the same name; [`dedupe_names`] resolves that within a sheet.
pub fn clean_name(raw: Option<&str>) -> String {
    let label = match raw {
        Some(label) if !label.trim().is_empty() && !is_placeholder(label) => label,
        _ => return generate_name(),
    };

    let mut cleaned = sanitize(label);
    cleaned.truncate(MAX_NAME_LEN);

    if cleaned.is_empty() {
        generate_name()
    } else {
        cleaned
    }
}

/// Relation name for one sheet of an upload.
///
/// Spaces and hyphens become `_`; anything else outside `[A-Za-z0-9_]` is
/// stripped by [`sanitize`].
pub fn table_name_for(upload_id: &str, sheet_name: &str) -> String {
    let joined = format!("{}_{}", upload_id, sheet_name).replace([' ', '-'], "_");
    sanitize(&joined)
}

/// Make names unique within one sheet by appending `_2`, `_3`, ...
///
/// Comparison is case-insensitive because SQL column names are.
pub fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(names.len());

    for name in names {
        if seen.insert(name.to_ascii_lowercase()) {
            result.push(name);
            continue;
        }

        let mut n = 2usize;
        loop {
            let suffix = format!("_{}", n);
            let mut base = name.clone();
            base.truncate(MAX_NAME_LEN - suffix.len());
            let candidate = format!("{}{}", base, suffix);
            if seen.insert(candidate.to_ascii_lowercase()) {
                result.push(candidate);
                break;
            }
            n += 1;
        }
    }

    result
}
