use std::io;

use thiserror::Error;

use crate::types::{ChunkId, ClassId, SequenceId};

/// Error type for manifest indexing, byte acquisition, and decode failures.
///
/// Every failure in this layer is fatal and labeled: errors name the
/// offending file, line, path, or value so a bad manifest entry can be fixed
/// without re-running under a debugger. Retry policy, if any, belongs to the
/// layer above.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The manifest file could not be opened.
    #[error("could not open manifest '{path}' for reading: {source}")]
    ManifestOpen {
        /// Manifest path as given.
        path: String,
        /// Underlying open failure.
        source: io::Error,
    },
    /// A manifest line did not have a usable column layout.
    #[error("invalid manifest line {line} in '{path}': expected 2 or 3 tab-delimited columns")]
    MalformedLine {
        /// Manifest path as given.
        path: String,
        /// One-based line number.
        line: usize,
    },
    /// The class column of a manifest line was not an unsigned integer.
    #[error("cannot parse class id '{value}' on line {line} in '{path}'")]
    ClassIdParse {
        /// Offending column text.
        value: String,
        /// One-based line number.
        line: usize,
        /// Manifest path as given.
        path: String,
    },
    /// A class id was not below the configured label dimension.
    #[error(
        "image '{path}' has invalid class id {class_id}; expected label dimension is {label_dimension} (line {line} in '{manifest}')"
    )]
    ClassIdOutOfRange {
        /// Image path from the manifest line.
        path: String,
        /// Out-of-range class id.
        class_id: ClassId,
        /// Configured number of classes.
        label_dimension: usize,
        /// One-based line number.
        line: usize,
        /// Manifest path as given.
        manifest: String,
    },
    /// The chunk id space was exhausted.
    #[error("maximum number of chunks exceeded")]
    ChunkIdOverflow,
    /// A container path was seen but archive support is compiled out.
    #[error("container path '{path}' requires archive support; rebuild with the 'zip' feature")]
    ContainerUnsupported {
        /// Full container path from the manifest.
        path: String,
    },
    /// An archive could not be opened, indexed, or read.
    #[error("archive '{container}': {reason}")]
    Archive {
        /// Container path.
        container: String,
        /// What went wrong.
        reason: String,
    },
    /// Raw bytes could not be decoded as an image.
    #[error("cannot decode image '{path}': {reason}")]
    ImageDecode {
        /// Image path from the manifest.
        path: String,
        /// Decoder message.
        reason: String,
    },
    /// A chunk id outside the chunk table was requested.
    #[error("unknown chunk id {chunk_id}")]
    UnknownChunk {
        /// Requested id.
        chunk_id: ChunkId,
    },
    /// A sequence was requested from a chunk that does not contain it.
    #[error("sequence {sequence_id} does not belong to chunk {chunk_id}")]
    SequenceOutOfChunk {
        /// Requested sequence id.
        sequence_id: SequenceId,
        /// Chunk the request went to.
        chunk_id: ChunkId,
    },
    /// The label dimension does not fit the sparse index type.
    #[error("label dimension {dimension} exceeds the maximum representable index {max}")]
    LabelDimension {
        /// Requested dimension.
        dimension: usize,
        /// Largest representable index.
        max: u64,
    },
    /// The precision string was neither `float` nor `double`.
    #[error("unsupported precision '{0}' (expected 'float' or 'double')")]
    UnsupportedPrecision(String),
    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}
