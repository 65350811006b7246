use serde::{Deserialize, Serialize};

use crate::types::{ChunkId, ClassId, SamplePath, SequenceId, SequenceKey};

/// External identity of one sequence: a registry key plus a sub-sample index.
///
/// Image corpora carry one sample per key, so `sample` is always 0 here; the
/// field exists so the identity shape matches multi-sample producers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyId {
    /// Registry id of the manifest key.
    pub sequence: SequenceKey,
    /// Sub-sample index within the key; 0 for image corpora.
    pub sample: usize,
}

impl KeyId {
    /// Key identity for the sole sample of `sequence`.
    pub fn new(sequence: SequenceKey) -> Self {
        Self {
            sequence,
            sample: 0,
        }
    }
}

/// Immutable description of one indexed sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceDescriptor {
    /// Global sequence id; equals this descriptor's position in the sequence table.
    pub id: SequenceId,
    /// Chunk the sequence was assigned to.
    pub chunk_id: ChunkId,
    /// Storage location of the raw image bytes.
    pub path: SamplePath,
    /// Zero-based class index from the manifest.
    pub class_id: ClassId,
    /// External key identity.
    pub key: KeyId,
}

/// Immutable description of one chunk of consecutive sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDescriptor {
    /// Chunk id; equals this descriptor's position in the chunk table.
    pub id: ChunkId,
    /// Global id of the chunk's first sequence.
    pub start_index: usize,
    /// Number of samples in the chunk.
    pub num_samples: usize,
    /// Number of sequences in the chunk; equal to `num_samples` here.
    pub num_sequences: usize,
}
