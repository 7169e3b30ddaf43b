use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::capture::domain::sample_writer::SampleWriter;
use crate::sampling::face_sample::FaceSample;

/// Appends samples to a text file, one comma-separated line per sample.
///
/// The file is opened on construction and released when the writer is
/// dropped; buffered lines are flushed on drop as well.
pub struct CsvSampleWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl CsvSampleWriter {
    /// Creates or truncates `path`.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        Self::open(path, false)
    }

    /// Opens `path` for appending, creating it if needed.
    pub fn append_to(path: &Path) -> std::io::Result<Self> {
        Self::open(path, true)
    }

    fn open(path: &Path, append: bool) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl SampleWriter for CsvSampleWriter {
    fn append(&mut self, sample: &FaceSample) -> Result<(), Box<dyn std::error::Error>> {
        self.writer.write_all(sample.to_csv_line().as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        log::debug!("Sample {} appended to {}", self.written, self.path.display());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for CsvSampleWriter {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            log::warn!("Failed to flush {}: {e}", self.path.display());
        }
    }
}
