//! CSV output.

use crate::reddit::thing::Post;
use crate::sink::{Sink, WriteError};
use csv::Writer;
use log::info;
use std::path::{Path, PathBuf};

/// Name of the CSV file written to the output directory.
pub const FILENAME: &str = "reddit_posts.csv";

/// Column headings, in order.
pub const HEADERS: [&str; 3] = ["Title", "URL", "Score"];

/// Writes posts to a CSV file with a `Title,URL,Score` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Creates a sink that writes to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a sink that writes [`FILENAME`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(FILENAME))
    }

    fn csv_error(&self, source: csv::Error) -> WriteError {
        WriteError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

impl Sink for CsvSink {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, posts: &[Post]) -> Result<(), WriteError> {
        let mut writer = Writer::from_path(&self.path).map_err(|err| self.csv_error(err))?;

        writer
            .write_record(HEADERS)
            .map_err(|err| self.csv_error(err))?;
        for post in posts {
            let score = post.score().to_string();
            writer
                .write_record([post.title(), post.url(), score.as_str()])
                .map_err(|err| self.csv_error(err))?;
        }

        writer.flush().map_err(|source| WriteError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!("wrote {} posts to {}", posts.len(), self.path.display());
        Ok(())
    }
}
