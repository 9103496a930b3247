use std::sync::Arc;

use crate::assets::decode::AssetInput;
use crate::export::packager::ExportEntry;
use crate::foundation::error::MediaResult;
use crate::rename::rules::{RenameRules, transform};

/// Archive name for renamed files.
pub const RENAME_ARCHIVE: &str = "renamed_files.zip";

/// A file queued for renaming.
#[derive(Clone, Debug)]
pub struct RenameItem {
    /// Insertion ordinal; drives numbering and never changes.
    pub ordinal: usize,
    /// Name before the last `.`.
    pub original_base: String,
    /// Last `.` and everything after it, or empty.
    pub extension: String,
    /// Unmodified payload.
    pub bytes: Arc<Vec<u8>>,
    /// Derived name under the current rules.
    pub new_name: String,
}

/// Split `file_name` at its last `.` into `(base, extension-with-dot)`.
pub fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(i) => file_name.split_at(i),
        None => (file_name, ""),
    }
}

/// Derive every item's new name from scratch under `rules`.
pub fn derive_all(items: &[RenameItem], rules: &RenameRules) -> Vec<String> {
    items
        .iter()
        .map(|it| transform(&it.original_base, &it.extension, rules, it.ordinal))
        .collect()
}

/// Ordered rename working set.
#[derive(Debug, Default)]
pub struct RenameBatch {
    items: Vec<RenameItem>,
    rules: RenameRules,
    next_ordinal: usize,
}

impl RenameBatch {
    /// Empty batch with all rules disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append inputs; every input kind is accepted.
    pub fn add(&mut self, inputs: impl IntoIterator<Item = AssetInput>) {
        for input in inputs {
            let (base, ext) = split_name(&input.name);
            let ordinal = self.next_ordinal;
            self.next_ordinal += 1;
            let new_name = transform(base, ext, &self.rules, ordinal);
            self.items.push(RenameItem {
                ordinal,
                original_base: base.to_string(),
                extension: ext.to_string(),
                bytes: input.bytes,
                new_name,
            });
        }
    }

    /// Remove the item with `ordinal`; remaining items keep their numbering.
    pub fn remove(&mut self, ordinal: usize) -> bool {
        let before = self.items.len();
        self.items.retain(|it| it.ordinal != ordinal);
        self.items.len() != before
    }

    /// Drop every item and restart numbering.
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_ordinal = 0;
    }

    /// Replace the rule set and re-derive every name.
    pub fn set_rules(&mut self, rules: RenameRules) -> MediaResult<()> {
        rules.validate()?;
        let names = derive_all(&self.items, &rules);
        for (item, name) in self.items.iter_mut().zip(names) {
            item.new_name = name;
        }
        self.rules = rules;
        Ok(())
    }

    /// Current rules.
    pub fn rules(&self) -> &RenameRules {
        &self.rules
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[RenameItem] {
        &self.items
    }

    /// `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// One entry per item, carrying its derived name and untouched bytes.
    pub fn export_entries(&self) -> Vec<ExportEntry> {
        self.items
            .iter()
            .map(|it| ExportEntry::shared(it.new_name.clone(), Arc::clone(&it.bytes)))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rename/pipeline.rs"]
mod tests;
