//! CSV output for extracted section rows
//!
//! One sink owns one output file. Rows arrive through a rendezvous channel and
//! are written in arrival order.

use crate::extractor::{Row, HEADERS};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use thiserror::Error;

/// Errors that can occur while writing the CSV output
#[derive(Error, Debug)]
pub enum SinkError {
    /// The output file could not be created
    #[error("Failed to create {path}: {source}", path = .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be serialized or written
    #[error("Failed to write {path}: {source}", path = .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Buffered rows could not be flushed to disk
    #[error("Failed to flush {path}: {source}", path = .path.display())]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Path of the CSV file written for a document
///
/// # Parameters
/// * `output_dir` - Directory the CSV files go to
/// * `name` - Output name derived from the input (e.g. "rfc5280.md")
pub fn output_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{}.csv", name))
}

/// Writer for one CSV output file
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Create (or truncate) the output file and write the header row
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path).map_err(|source| SinkError::Create {
            path: path.to_path_buf(),
            source,
        })?;

        // The header is written by hand so that a document without rows
        // still gets one
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        let mut sink = Self {
            path: path.to_path_buf(),
            writer,
        };
        sink.writer
            .write_record(HEADERS)
            .map_err(|source| sink.write_error(source))?;

        Ok(sink)
    }

    /// Write a single row
    pub fn write_row(&mut self, row: &Row) -> Result<(), SinkError> {
        self.writer
            .serialize(row)
            .map_err(|source| self.write_error(source))
    }

    /// Flush buffered records and close the file
    pub fn finish(mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(|source| SinkError::Flush {
            path: self.path.clone(),
            source,
        })
    }

    fn write_error(&self, source: csv::Error) -> SinkError {
        SinkError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

/// Write every row received on `rows` until the sending side closes
///
/// # Parameters
/// * `rows` - Receiving end of the rendezvous channel
/// * `path` - Output CSV file
///
/// # Returns
/// * `Ok(usize)` - Number of rows written
/// * `Err(SinkError)` - The file could not be created or written; the
///   receiver is dropped, which fails the producer's next send
pub fn drain(rows: Receiver<Row>, path: &Path) -> Result<usize, SinkError> {
    let mut sink = CsvSink::create(path)?;
    let mut written = 0;

    for row in rows {
        sink.write_row(&row)?;
        written += 1;
    }

    sink.finish()?;
    log::info!("Wrote {} rows to {}", written, path.display());

    Ok(written)
}
