use std::path::Path;
use std::sync::Arc;

use crate::chunk::Chunk;
use crate::config::DatasetConfig;
use crate::corpus::CorpusDescriptor;
use crate::data::{ChunkDescriptor, KeyId, SequenceDescriptor};
use crate::errors::DatasetError;
use crate::indexing::{self, IndexTables};
use crate::labels::LabelGenerator;
use crate::streams::{self, StreamInfo};
use crate::transport::ReaderRegistry;
use crate::types::ChunkId;

pub(crate) struct DatasetInner {
    pub(crate) config: DatasetConfig,
    pub(crate) corpus: Arc<CorpusDescriptor>,
    pub(crate) tables: IndexTables,
    pub(crate) registry: ReaderRegistry,
    pub(crate) label_generator: LabelGenerator,
    pub(crate) streams: Vec<StreamInfo>,
}

impl std::fmt::Debug for DatasetInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetInner")
            .field("sequences", &self.tables.sequences.len())
            .field("chunks", &self.tables.chunks.len())
            .finish()
    }
}

/// An indexed image corpus.
///
/// Opening a dataset performs the single indexing pass over the manifest;
/// everything after that is immutable and cheap to share. Clones are shallow
/// handles over the same index.
#[derive(Clone, Debug)]
pub struct ImageDataset {
    inner: Arc<DatasetInner>,
}

impl ImageDataset {
    /// Indexes the manifest at `manifest_path` and returns the dataset.
    pub fn open(
        manifest_path: impl AsRef<Path>,
        config: DatasetConfig,
        corpus: Arc<CorpusDescriptor>,
    ) -> Result<Self, DatasetError> {
        let label_generator = LabelGenerator::new(config.label_dimension, config.precision)?;
        let mut registry = ReaderRegistry::with_default_transport(config.mmap);
        let tables = indexing::build_index(manifest_path.as_ref(), &config, &corpus, &mut registry)?;
        let streams = streams::stream_table(&config);
        Ok(Self {
            inner: Arc::new(DatasetInner {
                config,
                corpus,
                tables,
                registry,
                label_generator,
                streams,
            }),
        })
    }

    /// Static description of the exposed streams.
    pub fn streams(&self) -> &[StreamInfo] {
        &self.inner.streams
    }

    /// Descriptions of every chunk, in id order.
    pub fn chunk_descriptions(&self) -> &[ChunkDescriptor] {
        &self.inner.tables.chunks
    }

    /// Total number of indexed sequences.
    pub fn total_sequences(&self) -> usize {
        self.inner.tables.sequences.len()
    }

    /// Descriptors of the sequences belonging to one chunk.
    pub fn sequences_for_chunk(
        &self,
        chunk_id: ChunkId,
    ) -> Result<&[SequenceDescriptor], DatasetError> {
        let chunk = self
            .inner
            .tables
            .chunks
            .get(chunk_id as usize)
            .ok_or(DatasetError::UnknownChunk { chunk_id })?;
        Ok(&self.inner.tables.sequences[chunk.start_index..chunk.start_index + chunk.num_sequences])
    }

    /// Materializes one chunk, reading the raw bytes of all its sequences.
    pub fn get_chunk(&self, chunk_id: ChunkId) -> Result<Arc<Chunk>, DatasetError> {
        let descriptor = *self
            .inner
            .tables
            .chunks
            .get(chunk_id as usize)
            .ok_or(DatasetError::UnknownChunk { chunk_id })?;
        Chunk::materialize(Arc::clone(&self.inner), descriptor)
    }

    /// Looks up a sequence by its external key identity.
    ///
    /// Keys that fanned out to several sequences resolve to the first one.
    pub fn sequence_by_key(&self, key: &KeyId) -> Option<&SequenceDescriptor> {
        if key.sample != 0 {
            return None;
        }
        self.inner
            .tables
            .key_to_sequence
            .get(&key.sequence)
            .map(|&index| &self.inner.tables.sequences[index])
    }

    /// Looks up a sequence by the original manifest key string.
    pub fn sequence_by_key_name(&self, name: &str) -> Option<&SequenceDescriptor> {
        let sequence = self.inner.corpus.lookup(name)?;
        self.sequence_by_key(&KeyId::new(sequence))
    }
}
