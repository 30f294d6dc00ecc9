//! Split files: one sink per split, counting the bytes it writes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use datagen_core::{Record, RecordSchema};
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

pub mod csv;
pub mod ndjson;

/// On-disk encoding of split files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Ndjson,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Ndjson => "ndjson",
            Self::Csv => "csv",
        }
    }
}

/// Destination for the records of one split.
pub trait RecordSink {
    fn write(&mut self, record: &Record) -> Result<(), GenerationError>;

    /// Flush and return the total number of bytes written.
    fn finish(&mut self) -> Result<u64, GenerationError>;
}

/// Create `path` and open a sink of the requested format on it.
pub fn open_sink(
    format: OutputFormat,
    path: &Path,
    schema: &RecordSchema,
) -> Result<Box<dyn RecordSink>, GenerationError> {
    let writer = CountingWriter::new(BufWriter::new(File::create(path)?));
    Ok(match format {
        OutputFormat::Ndjson => Box::new(ndjson::NdjsonSink::new(writer)),
        OutputFormat::Csv => Box::new(csv::CsvSink::new(writer, schema)?),
    })
}

pub struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
