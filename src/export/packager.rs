use std::collections::HashSet;
use std::sync::Arc;

use crate::encode::archive::{ArchiveSink, ZipArchiveSink};
use crate::export::naming::{NameRegistry, normalize_entry_name};
use crate::foundation::error::MediaResult;

/// One named payload headed for export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportEntry {
    /// Logical name; `/` separates archive directories.
    pub name: String,
    /// Payload, never modified by the packager.
    pub bytes: Arc<Vec<u8>>,
}

impl ExportEntry {
    /// Entry owning `bytes`.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// Entry sharing an existing payload.
    pub fn shared(name: impl Into<String>, bytes: Arc<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Result of an export call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutput {
    /// A single file emitted directly.
    File(ExportEntry),
    /// A serialized archive.
    Archive {
        /// Archive file name.
        name: String,
        /// Archive bytes.
        bytes: Vec<u8>,
        /// Resolved file entry names, in order.
        entries: Vec<String>,
    },
}

impl ExportOutput {
    /// File name to write the output under.
    pub fn file_name(&self) -> &str {
        match self {
            Self::File(e) => &e.name,
            Self::Archive { name, .. } => name,
        }
    }

    /// Bytes to write.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::File(e) => &e.bytes,
            Self::Archive { bytes, .. } => bytes,
        }
    }
}

/// Assigns collision-free names and assembles archives.
#[derive(Clone, Debug)]
pub struct ExportPackager {
    archive_name: String,
}

impl ExportPackager {
    /// Packager producing archives called `archive_name`.
    pub fn new(archive_name: impl Into<String>) -> Self {
        Self {
            archive_name: archive_name.into(),
        }
    }

    /// Archive file name.
    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    /// Normalize and de-duplicate names within one call, preserving order.
    pub fn resolve(entries: Vec<ExportEntry>) -> MediaResult<Vec<ExportEntry>> {
        let mut registry = NameRegistry::new();
        entries
            .into_iter()
            .map(|e| {
                let name = registry.claim(&normalize_entry_name(&e.name)?)?;
                Ok(ExportEntry { name, bytes: e.bytes })
            })
            .collect()
    }

    /// Emit one entry directly, bypassing any archive.
    pub fn single(entry: ExportEntry) -> MediaResult<ExportOutput> {
        let name = normalize_entry_name(&entry.name)?;
        Ok(ExportOutput::File(ExportEntry {
            name,
            bytes: entry.bytes,
        }))
    }

    /// Stream resolved entries into `sink`, adding each parent directory once.
    ///
    /// Returns the resolved file names in emission order.
    #[tracing::instrument(skip(self, entries, sink), fields(archive = %self.archive_name, n = entries.len()))]
    pub fn write_to(
        &self,
        entries: Vec<ExportEntry>,
        sink: &mut dyn ArchiveSink,
    ) -> MediaResult<Vec<String>> {
        let resolved = Self::resolve(entries)?;
        sink.begin(&self.archive_name)?;
        let mut dirs = HashSet::<String>::new();
        let mut names = Vec::with_capacity(resolved.len());
        for e in &resolved {
            let mut end = 0;
            while let Some(i) = e.name[end..].find('/') {
                end += i + 1;
                let dir = &e.name[..end];
                if dirs.insert(dir.to_string()) {
                    sink.add_directory(dir)?;
                }
            }
            sink.add_file(&e.name, &e.bytes)?;
            names.push(e.name.clone());
        }
        Ok(names)
    }

    /// Zip `entries`. `Ok(None)` when there is nothing to export.
    pub fn package(&self, entries: Vec<ExportEntry>) -> MediaResult<Option<ExportOutput>> {
        if entries.is_empty() {
            return Ok(None);
        }
        let mut sink = ZipArchiveSink::new();
        let names = self.write_to(entries, &mut sink)?;
        let bytes = sink.finish()?;
        tracing::info!(archive = %self.archive_name, entries = names.len(), bytes = bytes.len(), "packaged archive");
        Ok(Some(ExportOutput::Archive {
            name: self.archive_name.clone(),
            bytes,
            entries: names,
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/packager.rs"]
mod tests;
