// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Output files that filtered posts are written to.

pub mod csv;
pub mod pdf;

use crate::reddit::thing::Post;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use self::csv::CsvSink;
pub use self::pdf::PdfSink;

/// Somewhere posts can be written.
///
/// Each sink owns a single file, which it creates (or truncates), writes,
/// and closes within one call to [`Sink::write()`].
pub trait Sink {
    /// The file this sink writes to.
    fn path(&self) -> &Path;

    /// Writes `posts`, in order, replacing anything already at
    /// [`Sink::path()`].
    fn write(&self, posts: &[Post]) -> Result<(), WriteError>;
}

/// Indicates a sink could not write its file.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The file could not be created, written, or flushed.
    #[error("Could not write {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    /// The CSV encoder failed.
    #[error("Could not write {}: {source}", path.display())]
    Csv { path: PathBuf, source: ::csv::Error },

    /// The PDF document could not be assembled or serialized.
    #[error("Could not write {}: {source}", path.display())]
    Pdf {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl WriteError {
    /// The file that could not be written.
    pub fn path(&self) -> &Path {
        match self {
            WriteError::Io { path, .. } => path,
            WriteError::Csv { path, .. } => path,
            WriteError::Pdf { path, .. } => path,
        }
    }
}
