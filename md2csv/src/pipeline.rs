//! Per-document conversion pipeline
//!
//! Each document goes through three steps:
//! 1. **Load**: read the file or fetch the URL
//! 2. **Extract**: walk the parsed markdown and emit section rows
//! 3. **Write**: a sink thread writes rows to CSV as they are emitted
//!
//! Extraction and writing run concurrently, connected by a rendezvous channel:
//! the extractor blocks on every row until the sink has taken it.

use crate::extractor::{ExtractError, Row, SectionExtractor, SkipList};
use crate::sink::{self, SinkError};
use crate::source::{Document, Input, SourceError};
use std::path::PathBuf;
use std::sync::mpsc::sync_channel;
use std::thread;
use thiserror::Error;

/// Errors that can occur while converting one document
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("CSV writer thread panicked")]
    SinkPanicked,
}

/// Settings for converting documents
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory the CSV files are written to
    pub output_dir: PathBuf,

    /// Titles whose sections are left out
    pub skip_list: SkipList,

    /// Print walking progress to stdout
    pub progress: bool,
}

/// Result of converting one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    /// CSV file that was written
    pub output: PathBuf,

    /// Number of data rows written
    pub rows: usize,
}

/// Load an input and convert it to CSV
///
/// # Parameters
/// * `input` - File path or URL to convert
/// * `options` - Output directory, skip list and progress settings
///
/// # Returns
/// * `Ok(ConvertSummary)` - The CSV file was written completely
/// * `Err(ConvertError)` - Loading, extraction or writing failed
pub fn convert_input(
    input: &Input,
    options: &ConvertOptions,
) -> Result<ConvertSummary, ConvertError> {
    let document = input.load()?;
    convert_document(&document, options)
}

/// Convert an already loaded document to CSV
///
/// The sink thread is started before the walk begins and is joined before
/// returning, so the file is flushed and closed once this returns.
pub fn convert_document(
    document: &Document,
    options: &ConvertOptions,
) -> Result<ConvertSummary, ConvertError> {
    let output = sink::output_path(&options.output_dir, &document.name);
    let (tx, rx) = sync_channel::<Row>(0);

    let rows = thread::scope(|scope| -> Result<usize, ConvertError> {
        let output = &output;
        let writer = scope.spawn(move || sink::drain(rx, output));

        if options.progress {
            println!("Walking {}", document.name);
        }

        // The sender moves into the closure, so the channel closes as soon
        // as the extractor is done with it
        let extracted = SectionExtractor::new(&options.skip_list, move |row| {
            tx.send(row).map_err(|_| ExtractError::SinkClosed)
        })
        .with_progress(options.progress)
        .run(&document.markdown);

        if options.progress {
            println!("Done walking {}", document.name);
        }

        // A failed sink is the cause of any SinkClosed from the extractor
        let written = writer.join().map_err(|_| ConvertError::SinkPanicked)??;
        let emitted = extracted?;
        debug_assert_eq!(emitted, written);

        Ok(written)
    })?;

    Ok(ConvertSummary { output, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(output_dir: PathBuf) -> ConvertOptions {
        ConvertOptions {
            output_dir,
            skip_list: SkipList::default(),
            progress: false,
        }
    }

    fn document(markdown: &str) -> Document {
        Document {
            name: "sample.md".to_string(),
            markdown: markdown.to_string(),
        }
    }

    #[test]
    fn test_convert_document_writes_csv() {
        // Arrange: Two-section document
        let dir = tempfile::tempdir().unwrap();
        let doc = document("# 1 Overview\n\nSome text.\n\n## 1.1 Details\n\nMore text.\n");

        // Act: Convert it
        let summary = convert_document(&doc, &options(dir.path().to_path_buf())).unwrap();

        // Assert: Header plus one line per row
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.output, dir.path().join("sample.md.csv"));
        let csv = std::fs::read_to_string(&summary.output).unwrap();
        assert_eq!(
            csv,
            "Category,Name,Title,Description,Notes\n\
             Overview,1,Overview,Some text.,\n\
             Overview,1.1,Details,More text.,\n"
        );
    }

    #[test]
    fn test_convert_is_idempotent() {
        // Arrange: Same document converted into two directories
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let doc = document("# 1 A\n\nx\ny\n\n## 1.1 B\n\n- one\n- two\n\n# 2 References\n\nz\n");

        // Act: Convert twice
        let a = convert_document(&doc, &options(first.path().to_path_buf())).unwrap();
        let b = convert_document(&doc, &options(second.path().to_path_buf())).unwrap();

        // Assert: Byte-for-byte identical output
        assert_eq!(
            std::fs::read(&a.output).unwrap(),
            std::fs::read(&b.output).unwrap()
        );
    }

    #[test]
    fn test_unwritable_output_reports_sink_error() {
        // Arrange: Output directory that does not exist
        let dir = tempfile::tempdir().unwrap();
        let doc = document("# 1 A\n\nx\n\n# 2 B\n\ny\n");

        // Act: Convert
        let result = convert_document(&doc, &options(dir.path().join("missing")));

        // Assert: The sink's error, not the extractor's SinkClosed
        assert!(matches!(
            result,
            Err(ConvertError::Sink(SinkError::Create { .. }))
        ));
    }

    #[test]
    fn test_convert_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = Input::File(dir.path().join("absent.md"));

        let result = convert_input(&input, &options(dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConvertError::Source(_))));
    }
}
