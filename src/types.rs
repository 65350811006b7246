/// Dense, monotonically assigned global sample id.
/// Ids are contiguous per chunk in construction order.
pub type SequenceId = usize;
/// Identifier of a bounded chunk of sequences, assigned sequentially from 0.
pub type ChunkId = u32;
/// Zero-based class index parsed from the manifest; always below the label dimension.
pub type ClassId = u64;
/// Registry-resolved integer identifying an external string sequence key.
pub type SequenceKey = u64;
/// Index element type used by sparse one-hot labels.
/// The label dimension must stay representable in this type.
pub type LabelIndex = u32;
/// Storage location string for one sample.
/// Examples: `images/cat.jpg`, `train.zip@/n01440764/img_0001.JPEG`
pub type SamplePath = String;
