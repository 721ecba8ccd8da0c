//! Error types for the TER library.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when reading or writing terrain files.
#[derive(Error, Debug)]
pub enum TerError {
    /// The input file could not be opened for reading.
    #[error("Unable to open terrain file: {0}")]
    Open(#[source] std::io::Error),

    /// The output file could not be created.
    #[error("Unable to open output file: {0}")]
    Create(#[source] std::io::Error),

    /// IO error while writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The first 16 bytes are not the `TERRAGENTERRAIN ` magic.
    #[error("This is not a Terragen terrain file")]
    NotTerrain,

    /// The stream ended in the middle of a payload.
    #[error("Truncated data: stream ended while reading {context} at byte {offset}")]
    TruncatedData { context: String, offset: u64 },

    /// A tag outside the known set was found. The format carries no chunk
    /// lengths, so there is no way to skip it.
    #[error("Unknown tag {tag:?} at byte {offset}")]
    UnknownTag { tag: String, offset: u64 },

    /// A full decode reached `EOF ` without an `ALTW` chunk.
    #[error("File has no elevation data (no ALTW chunk)")]
    MissingElevations,

    /// A full decode was requested without a destination buffer.
    #[error("Full decode requires a destination buffer")]
    MissingBuffer,

    /// The sample buffer cannot hold the grid at the given stride.
    #[error("Buffer too small: need {needed} samples, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// A buffer descriptor with a stride of zero.
    #[error("Invalid stride: must be at least 1")]
    InvalidStride,

    /// The grid cannot be described by the format's 16-bit point counts.
    #[error("Dimensions too large: {points_x}x{points_y} (max 65535 points per axis)")]
    DimensionsTooLarge { points_x: u32, points_y: u32 },

    /// The grid has no points to write.
    #[error("Grid is empty: {points_x}x{points_y}")]
    EmptyGrid { points_x: u32, points_y: u32 },

    /// Any of the above, attributed to a file.
    #[error("{}: {}", .path.display(), .source)]
    File {
        path: PathBuf,
        #[source]
        source: Box<TerError>,
    },
}

impl TerError {
    /// Attach a filename to this error.
    pub fn in_file<P: AsRef<Path>>(self, path: P) -> Self {
        TerError::File {
            path: path.as_ref().to_path_buf(),
            source: Box::new(self),
        }
    }

    /// The filename this error is attributed to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            TerError::File { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The underlying error, with any filename wrapper removed.
    pub fn kind(&self) -> &TerError {
        match self {
            TerError::File { source, .. } => source.kind(),
            other => other,
        }
    }
}

/// Result type alias using [`TerError`].
pub type Result<T> = std::result::Result<T, TerError>;
