use std::io::{Cursor, Write};

use crate::foundation::error::{MediaError, MediaResult};

/// Consumer of resolved archive entries.
///
/// Ordering contract: `begin` once, then directories and files in emission order, then
/// `finish` once. A directory is always added before the first file inside it.
pub trait ArchiveSink {
    /// Called once before any entry.
    fn begin(&mut self, archive_name: &str) -> MediaResult<()>;
    /// Add a directory entry; `name` ends with `/`.
    fn add_directory(&mut self, name: &str) -> MediaResult<()>;
    /// Add a file entry with its payload, unmodified.
    fn add_file(&mut self, name: &str, bytes: &[u8]) -> MediaResult<()>;
    /// Close the archive and return its serialized bytes.
    fn finish(&mut self) -> MediaResult<Vec<u8>>;
}

/// Zip archive built in memory.
#[derive(Default)]
pub struct ZipArchiveSink {
    writer: Option<zip::ZipWriter<Cursor<Vec<u8>>>>,
}

impl ZipArchiveSink {
    /// Create an idle sink; `begin` starts a fresh archive.
    pub fn new() -> Self {
        Self::default()
    }

    fn writer(&mut self) -> MediaResult<&mut zip::ZipWriter<Cursor<Vec<u8>>>> {
        self.writer
            .as_mut()
            .ok_or_else(|| MediaError::archive("zip sink used before begin()"))
    }
}

impl ArchiveSink for ZipArchiveSink {
    fn begin(&mut self, _archive_name: &str) -> MediaResult<()> {
        self.writer = Some(zip::ZipWriter::new(Cursor::new(Vec::new())));
        Ok(())
    }

    fn add_directory(&mut self, name: &str) -> MediaResult<()> {
        let opts = zip::write::SimpleFileOptions::default();
        self.writer()?.add_directory(name, opts)?;
        Ok(())
    }

    fn add_file(&mut self, name: &str, bytes: &[u8]) -> MediaResult<()> {
        let opts = zip::write::SimpleFileOptions::default();
        let w = self.writer()?;
        w.start_file(name, opts)?;
        w.write_all(bytes)?;
        Ok(())
    }

    fn finish(&mut self) -> MediaResult<Vec<u8>> {
        let w = self
            .writer
            .take()
            .ok_or_else(|| MediaError::archive("zip sink finished before begin()"))?;
        Ok(w.finish()?.into_inner())
    }
}

/// One recorded archive entry; `bytes` is `None` for directories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveRecord {
    /// Entry name.
    pub name: String,
    /// File payload.
    pub bytes: Option<Vec<u8>>,
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryArchive {
    name: Option<String>,
    records: Vec<ArchiveRecord>,
    finished: bool,
}

impl InMemoryArchive {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Archive name captured in `begin`, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Recorded entries in emission order.
    pub fn records(&self) -> &[ArchiveRecord] {
        &self.records
    }

    /// File entries only.
    pub fn files(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.records
            .iter()
            .filter_map(|r| r.bytes.as_deref().map(|b| (r.name.as_str(), b)))
    }

    /// `true` once `finish` ran.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ArchiveSink for InMemoryArchive {
    fn begin(&mut self, archive_name: &str) -> MediaResult<()> {
        self.name = Some(archive_name.to_string());
        self.records.clear();
        self.finished = false;
        Ok(())
    }

    fn add_directory(&mut self, name: &str) -> MediaResult<()> {
        self.records.push(ArchiveRecord {
            name: name.to_string(),
            bytes: None,
        });
        Ok(())
    }

    fn add_file(&mut self, name: &str, bytes: &[u8]) -> MediaResult<()> {
        self.records.push(ArchiveRecord {
            name: name.to_string(),
            bytes: Some(bytes.to_vec()),
        });
        Ok(())
    }

    fn finish(&mut self) -> MediaResult<Vec<u8>> {
        self.finished = true;
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/archive.rs"]
mod tests;
