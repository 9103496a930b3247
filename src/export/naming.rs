use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::error::{MediaError, MediaResult};

static REGEX_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

static REGEX_RESERVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("Invalid regex"));

/// Make user text usable as a file name: whitespace runs become `_`, then path and
/// shell-reserved characters (`\ / : * ? " < > |`) are removed.
pub fn sanitize_filename(name: &str) -> String {
    let underscored = REGEX_WHITESPACE.replace_all(name, "_");
    REGEX_RESERVED.replace_all(&underscored, "").into_owned()
}

/// Normalize an archive entry name to `/`-separated relative segments.
///
/// `.` segments and empty segments are dropped; absolute names and `..` are rejected.
pub fn normalize_entry_name(name: &str) -> MediaResult<String> {
    let s = name.replace('\\', "/");
    if s.starts_with('/') {
        return Err(MediaError::validation(format!(
            "archive entry '{name}' must be relative"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(MediaError::validation(format!(
                "archive entry '{name}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(MediaError::validation("archive entry must contain a file name"));
    }
    Ok(out.join("/"))
}

/// Split `name` into `(stem, extension-with-dot)` at the last `.` of its final path segment.
///
/// A leading dot (`.env`) is part of the stem.
pub fn split_extension(name: &str) -> (&str, &str) {
    let seg_start = name.rfind('/').map_or(0, |i| i + 1);
    match name[seg_start..].rfind('.') {
        Some(i) if i > 0 => name.split_at(seg_start + i),
        _ => (name, ""),
    }
}

/// Names already emitted by one export call.
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    /// Fresh registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `name`, or the first free `stem_<n><ext>` with `n` counting from 1.
    pub fn claim(&mut self, name: &str) -> MediaResult<String> {
        if self.used.insert(name.to_string()) {
            return Ok(name.to_string());
        }
        let (stem, ext) = split_extension(name);
        for n in 1..=u32::MAX {
            let candidate = format!("{stem}_{n}{ext}");
            if self.used.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
        Err(MediaError::NameCollisionExhausted(name.to_string()))
    }

    /// Number of reserved names.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// `true` before the first claim.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/naming.rs"]
mod tests;
