//! Append-only results store for threshold sweeps.
//!
//! Each completed estimate becomes one [`ResultRow`]. The CSV sink writes the
//! header only into an empty file and flushes after every row, so an
//! interrupted sweep keeps the rows it already produced.

use std::{
    fs::{File, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use ranking_core::Estimate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Column names written at the top of an empty store.
pub const COLUMNS: [&str; 5] = ["Alpha", "Beta", "n", "NumIterations", "AvgValue"];

/// One estimate as persisted in the results store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Lower threshold.
    #[serde(rename = "Alpha")]
    pub alpha: f64,
    /// Upper threshold.
    #[serde(rename = "Beta")]
    pub beta: f64,
    /// Vertices on each side.
    pub n: usize,
    /// Trials behind the estimate.
    #[serde(rename = "NumIterations")]
    pub num_iterations: usize,
    /// Estimated competitive ratio.
    #[serde(rename = "AvgValue")]
    pub avg_value: f64,
}

impl From<&Estimate> for ResultRow {
    fn from(estimate: &Estimate) -> Self {
        Self {
            alpha: estimate.alpha(),
            beta: estimate.beta(),
            n: estimate.n(),
            num_iterations: estimate.trials(),
            avg_value: estimate.ratio(),
        }
    }
}

/// Errors raised while persisting sweep results.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be opened or created.
    #[error("failed to open results store `{path}`: {source}")]
    Open {
        /// Location of the store.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// A header or row could not be encoded or written.
    #[error("failed to write to results store `{path}`: {source}")]
    Write {
        /// Location of the store.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: csv::Error,
    },
    /// Flushing or inspecting the store failed.
    #[error("I/O failure on results store `{path}`: {source}")]
    Io {
        /// Location of the store.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
}

/// Destination for sweep results.
pub trait ResultSink {
    /// Writes the column header if the store holds nothing yet.
    ///
    /// Returns `true` when a header was written. Calling it again is a no-op.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the store cannot be inspected or written.
    fn ensure_header(&mut self) -> Result<bool, StoreError>;

    /// Appends one row and makes it durable before returning.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the row cannot be written or flushed.
    fn append(&mut self, row: &ResultRow) -> Result<(), StoreError>;
}

/// CSV-backed [`ResultSink`] that appends to an existing file.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use ranking_cli::store::{CsvResultSink, ResultRow, ResultSink};
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("results.csv");
/// let mut sink = CsvResultSink::open(&path)?;
/// assert!(sink.ensure_header()?);
/// sink.append(&ResultRow {
///     alpha: 0.3,
///     beta: 0.7,
///     n: 100,
///     num_iterations: 10,
///     avg_value: 0.8,
/// })?;
/// let text = std::fs::read_to_string(&path)?;
/// assert_eq!(text, "Alpha,Beta,n,NumIterations,AvgValue\n0.3,0.7,100,10,0.8\n");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CsvResultSink {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvResultSink {
    /// Opens `path` for appending, creating it when missing.
    ///
    /// # Errors
    /// Returns [`StoreError::Open`] when the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| StoreError::Open {
                path: path.clone(),
                source,
            })?;
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        Ok(Self { path, writer })
    }

    /// Location of the CSV file.
    #[rustfmt::skip]
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    fn is_empty(&self) -> Result<bool, StoreError> {
        let metadata = self.writer.get_ref().metadata().map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(metadata.len() == 0)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.writer.flush().map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn write_error(&self, source: csv::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl ResultSink for CsvResultSink {
    fn ensure_header(&mut self) -> Result<bool, StoreError> {
        // Rows are flushed eagerly, so the on-disk length reflects every write.
        if !self.is_empty()? {
            return Ok(false);
        }
        self.writer
            .write_record(COLUMNS)
            .map_err(|source| self.write_error(source))?;
        self.flush()?;
        debug!(path = %self.path.display(), "wrote results header");
        Ok(true)
    }

    fn append(&mut self, row: &ResultRow) -> Result<(), StoreError> {
        self.writer
            .serialize(row)
            .map_err(|source| self.write_error(source))?;
        self.flush()
    }
}
