use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{MediaError, MediaResult};

static REGEX_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

static REGEX_NOT_NAME_SAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\-_]").expect("Invalid regex"));

static REGEX_CAMEL_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+(.)").expect("Invalid regex"));

static REGEX_LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("Invalid regex"));

static REGEX_SPACE_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("Invalid regex"));

/// Case conversion applied after find/replace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Casing {
    /// Leave as is.
    #[default]
    None,
    /// `MY FILE`
    Upper,
    /// `my file`
    Lower,
    /// `myFile`
    Camel,
    /// `my-file`
    Kebab,
}

impl Casing {
    /// Apply the conversion to `name`.
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::None => name.to_string(),
            Self::Upper => name.to_uppercase(),
            Self::Lower => name.to_lowercase(),
            Self::Camel => REGEX_CAMEL_BREAK
                .replace_all(&name.to_lowercase(), |caps: &regex::Captures<'_>| {
                    caps[1].to_uppercase()
                })
                .into_owned(),
            Self::Kebab => {
                let split = REGEX_LOWER_UPPER.replace_all(name, "$1-$2");
                REGEX_SPACE_UNDERSCORE
                    .replace_all(&split, "-")
                    .to_lowercase()
            }
        }
    }
}

/// Sequential numbering appended as `_<zero-padded start + index>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Numbering {
    /// Number given to the item at index 0.
    pub start: i64,
    /// Minimum digit count.
    pub pad: usize,
}

impl Default for Numbering {
    fn default() -> Self {
        Self { start: 1, pad: 3 }
    }
}

impl Numbering {
    /// Suffix for the item at `index`, including the leading `_`.
    pub fn suffix(&self, index: usize) -> String {
        let n = self.start.saturating_add(index as i64).to_string();
        format!("_{n:0>width$}", width = self.pad)
    }
}

/// A complete rename configuration. Replaced wholesale on every edit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameRules {
    /// Prepended after every other step but the extension.
    pub prefix: String,
    /// Appended after numbering.
    pub suffix: String,
    /// Literal substring to replace; empty disables find/replace.
    pub find: String,
    /// Replacement for every occurrence of `find`.
    pub replace: String,
    /// Case conversion.
    pub casing: Casing,
    /// Collapse whitespace to `_` and drop characters outside `[A-Za-z0-9-_]`.
    pub clean_name: bool,
    /// Optional numbering.
    pub numbering: Option<Numbering>,
    /// Replacement extension, with or without the leading dot; empty means keep the original.
    pub extension_override: Option<String>,
}

impl RenameRules {
    /// Reject numbering widths that could not be rendered sensibly.
    pub fn validate(&self) -> MediaResult<()> {
        if let Some(n) = &self.numbering
            && n.pad > 64
        {
            return Err(MediaError::validation(format!(
                "numbering pad must be <= 64, got {}",
                n.pad
            )));
        }
        Ok(())
    }

    /// Effective extension: the override (dot-normalized) when set, else `original`.
    pub fn extension<'a>(&'a self, original: &'a str) -> std::borrow::Cow<'a, str> {
        match self.extension_override.as_deref() {
            Some(ext) if !ext.is_empty() => {
                if ext.starts_with('.') {
                    std::borrow::Cow::Borrowed(ext)
                } else {
                    std::borrow::Cow::Owned(format!(".{ext}"))
                }
            }
            _ => std::borrow::Cow::Borrowed(original),
        }
    }
}

/// Whitespace runs to `_`, then strip everything outside `[A-Za-z0-9-_]`.
pub fn clean_name(name: &str) -> String {
    let underscored = REGEX_WHITESPACE.replace_all(name, "_");
    REGEX_NOT_NAME_SAFE.replace_all(&underscored, "").into_owned()
}

/// Derive the new full file name for `base` + `extension` at list position `index`.
///
/// Steps run in a fixed order: clean, find/replace, casing, numbering, prefix/suffix,
/// extension override. `extension` includes its leading dot (or is empty).
pub fn transform(base: &str, extension: &str, rules: &RenameRules, index: usize) -> String {
    let mut name = if rules.clean_name {
        clean_name(base)
    } else {
        base.to_string()
    };

    if !rules.find.is_empty() {
        name = name.replace(&rules.find, &rules.replace);
    }

    name = rules.casing.apply(&name);

    if let Some(n) = &rules.numbering {
        name.push_str(&n.suffix(index));
    }

    format!(
        "{}{name}{}{}",
        rules.prefix,
        rules.suffix,
        rules.extension(extension)
    )
}

#[cfg(test)]
#[path = "../../tests/unit/rename/rules.rs"]
mod tests;
