use std::sync::Arc;

use crate::data::ChunkDescriptor;
use crate::dataset::DatasetInner;
use crate::decode::{self, DecodedImage, ElementKind, PixelBuffer};
use crate::errors::DatasetError;
use crate::labels::SparseLabel;
use crate::transport::ImageBytes;
use crate::types::SequenceId;

/// One materialized chunk: the raw bytes of every sequence in its range.
///
/// Materialization front-loads all byte acquisition so decode never touches
/// storage. Chunks are handed out as `Arc` and each produced sample holds one
/// back, so raw bytes stay alive as long as any sample does.
#[derive(Debug)]
pub struct Chunk {
    inner: Arc<DatasetInner>,
    descriptor: ChunkDescriptor,
    data: Vec<ImageBytes>,
}

impl Chunk {
    pub(crate) fn materialize(
        inner: Arc<DatasetInner>,
        descriptor: ChunkDescriptor,
    ) -> Result<Arc<Self>, DatasetError> {
        let mut data = Vec::with_capacity(descriptor.num_samples);
        let end = descriptor.start_index + descriptor.num_sequences;
        for sequence in &inner.tables.sequences[descriptor.start_index..end] {
            data.push(inner.registry.read_image(sequence.id, &sequence.path)?);
        }
        Ok(Arc::new(Self {
            inner,
            descriptor,
            data,
        }))
    }

    /// Description of this chunk.
    pub fn descriptor(&self) -> ChunkDescriptor {
        self.descriptor
    }

    /// Decodes one sequence of this chunk into a dense sample and its label.
    pub fn get_sequence(
        self: &Arc<Self>,
        sequence_id: SequenceId,
    ) -> Result<(DenseSample, SparseLabel), DatasetError> {
        let local = sequence_id
            .checked_sub(self.descriptor.start_index)
            .filter(|local| *local < self.descriptor.num_sequences)
            .ok_or(DatasetError::SequenceOutOfChunk {
                sequence_id,
                chunk_id: self.descriptor.id,
            })?;
        // Sequence ids equal their table positions by construction.
        let descriptor = &self.inner.tables.sequences[sequence_id];
        let raw = self.data[local].clone();
        let image = decode::decode_image(
            &raw,
            self.inner.config.grayscale,
            self.inner.config.precision,
            &descriptor.path,
        )?;
        let label = self.inner.label_generator.create_label_for(descriptor.class_id);
        Ok((
            DenseSample {
                chunk: Arc::clone(self),
                sequence_id,
                raw,
                image,
            },
            label,
        ))
    }
}

/// A decoded sample that keeps its chunk alive.
#[derive(Debug)]
pub struct DenseSample {
    chunk: Arc<Chunk>,
    sequence_id: SequenceId,
    raw: ImageBytes,
    image: DecodedImage,
}

impl DenseSample {
    /// Global id of the decoded sequence.
    pub fn sequence_id(&self) -> SequenceId {
        self.sequence_id
    }

    /// Shape as (width, height, channels).
    pub fn shape(&self) -> (u32, u32, u32) {
        self.image.shape()
    }

    /// Element type of the pixel buffer.
    pub fn element(&self) -> ElementKind {
        self.image.element
    }

    /// Decoded pixel values.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.image.pixels
    }

    /// Undecoded bytes the sample was produced from.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// The chunk this sample belongs to.
    pub fn chunk(&self) -> &Arc<Chunk> {
        &self.chunk
    }
}
