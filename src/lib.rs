#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Chunk materialization and per-sequence decode.
pub mod chunk;
/// Dataset configuration and numeric precision.
pub mod config;
/// Shared constants for chunking, manifests, views, and streams.
pub mod constants;
/// Corpus membership and string-key interning.
pub mod corpus;
/// Immutable sequence and chunk descriptors.
pub mod data;
/// The dataset facade.
pub mod dataset;
/// Image decoding into dense pixel tensors.
pub mod decode;
mod errors;
/// Manifest parsing and index construction.
pub mod indexing;
/// Sparse one-hot label generation.
pub mod labels;
/// Stream table metadata.
pub mod streams;
/// Byte transports for plain files, memory maps, and archives.
pub mod transport;
/// Core type aliases.
pub mod types;

pub use chunk::{Chunk, DenseSample};
pub use config::{DatasetConfig, Precision};
pub use corpus::{CorpusDescriptor, StringRegistry};
pub use data::{ChunkDescriptor, KeyId, SequenceDescriptor};
pub use dataset::ImageDataset;
pub use decode::{DecodedImage, ElementKind, PixelBuffer};
pub use errors::DatasetError;
pub use indexing::IndexTables;
pub use labels::{LabelGenerator, LabelValue, SparseLabel};
pub use streams::{StorageKind, StreamInfo};
pub use transport::{ByteReader, FileByteReader, ImageBytes, MmapByteReader, ReaderRegistry};
#[cfg(feature = "zip")]
pub use transport::ZipByteReader;
pub use types::{ChunkId, ClassId, LabelIndex, SamplePath, SequenceId, SequenceKey};
