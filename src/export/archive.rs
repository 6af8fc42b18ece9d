//! Archive container writer

use std::io::{Seek, Write};

use tracing::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::GenerationError;
use super::parts::ArchivePart;

/// Writes archive parts into a zip container.
///
/// Entries are written in the order they are added. Dropping the writer
/// without calling [`ArchiveWriter::finish`] still closes the container, but
/// any error raised while doing so is lost.
pub struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    entries: Vec<String>,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            entries: Vec::new(),
        }
    }

    /// Render a part and write it as one entry
    pub fn add_part(&mut self, part: &dyn ArchivePart) -> Result<(), GenerationError> {
        let content = part.render()?;
        self.add_entry(&part.entry_name(), content.as_bytes())
    }

    /// Write raw bytes under the given entry name
    pub fn add_entry(&mut self, name: &str, content: &[u8]) -> Result<(), GenerationError> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip.start_file(name, options)?;
        self.zip.write_all(content)?;
        debug!("Wrote archive entry {} ({} bytes)", name, content.len());
        self.entries.push(name.to_string());
        Ok(())
    }

    /// Names of the entries written so far, in write order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Write the central directory and hand back the underlying writer
    pub fn finish(self) -> Result<W, GenerationError> {
        Ok(self.zip.finish()?)
    }
}
