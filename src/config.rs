use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{chunking, streams, views};
use crate::errors::DatasetError;

/// Numeric width used for decoded pixel values and sparse label values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
}

impl FromStr for Precision {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float" => Ok(Precision::F32),
            "double" => Ok(Precision::F64),
            other => Err(DatasetError::UnsupportedPrecision(other.to_string())),
        }
    }
}

/// Configuration for opening an [`ImageDataset`](crate::ImageDataset).
///
/// Construct with [`DatasetConfig::new`] and refine with the `with_*`
/// builders. Only the label dimension is mandatory; everything else has a
/// working default.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Decode every image to a single luminance channel instead of RGB.
    pub grayscale: bool,
    /// Expand each manifest line into ten crop-view sequences instead of one.
    pub multi_view: bool,
    /// Element width for decoded floating-point pixels and label values.
    pub precision: Precision,
    /// Number of classes; every manifest class id must be strictly below it.
    pub label_dimension: usize,
    /// Upper bound on samples per chunk. A multi-view line never splits
    /// across chunks, so a chunk may exceed this by at most one line.
    pub max_chunk_samples: usize,
    /// Acquire plain-file bytes through a memory map instead of buffered reads.
    pub mmap: bool,
    /// Diagnostic verbosity; values above 1 log an indexing summary.
    pub verbosity: usize,
    /// Name reported for the dense feature stream.
    pub feature_stream_name: String,
    /// Name reported for the sparse label stream.
    pub label_stream_name: String,
}

impl DatasetConfig {
    /// Creates a configuration for a corpus with `label_dimension` classes.
    pub fn new(label_dimension: usize) -> Self {
        Self {
            grayscale: false,
            multi_view: false,
            precision: Precision::F32,
            label_dimension,
            max_chunk_samples: chunking::DEFAULT_MAX_CHUNK_SAMPLES,
            mmap: false,
            verbosity: 0,
            feature_stream_name: streams::DEFAULT_FEATURE_STREAM_NAME.to_string(),
            label_stream_name: streams::DEFAULT_LABEL_STREAM_NAME.to_string(),
        }
    }

    /// Sets single-channel decoding.
    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    /// Sets ten-crop multi-view expansion.
    pub fn with_multi_view(mut self, multi_view: bool) -> Self {
        self.multi_view = multi_view;
        self
    }

    /// Sets the numeric precision.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the per-chunk sample bound.
    pub fn with_max_chunk_samples(mut self, max_chunk_samples: usize) -> Self {
        self.max_chunk_samples = max_chunk_samples;
        self
    }

    /// Selects memory-mapped plain-file transport.
    pub fn with_mmap(mut self, mmap: bool) -> Self {
        self.mmap = mmap;
        self
    }

    /// Sets diagnostic verbosity.
    pub fn with_verbosity(mut self, verbosity: usize) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Sets the reported stream names.
    pub fn with_stream_names(
        mut self,
        feature_stream_name: impl Into<String>,
        label_stream_name: impl Into<String>,
    ) -> Self {
        self.feature_stream_name = feature_stream_name.into();
        self.label_stream_name = label_stream_name.into();
        self
    }

    /// Number of sequences spawned per manifest line under this configuration.
    pub fn items_per_line(&self) -> usize {
        if self.multi_view {
            views::MULTI_VIEW_ITEMS_PER_LINE
        } else {
            views::SINGLE_VIEW_ITEMS_PER_LINE
        }
    }
}
