use serde::{Deserialize, Serialize};

use crate::config::{DatasetConfig, Precision};
use crate::constants::streams;
use crate::decode::ElementKind;

/// Storage layout of a stream's samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    /// Contiguous dense values.
    Dense,
    /// Sparse column-compressed values.
    SparseCsc,
}

/// Static description of one exposed stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Position of the stream in the stream table.
    pub id: usize,
    /// Consumer-facing stream name.
    pub name: String,
    /// Storage layout of the stream's samples.
    pub storage: StorageKind,
    /// Element type, when fixed up front. The feature stream's element
    /// depends on each image's bit depth and is only known per sample.
    pub element: Option<ElementKind>,
    /// Dense sample dimension, when fixed up front.
    pub sample_dimension: Option<usize>,
}

/// Builds the two-stream table exposed by a dataset: dense decoded images
/// followed by sparse one-hot labels.
pub fn stream_table(config: &DatasetConfig) -> Vec<StreamInfo> {
    let label_element = match config.precision {
        Precision::F32 => ElementKind::F32,
        Precision::F64 => ElementKind::F64,
    };
    vec![
        StreamInfo {
            id: streams::FEATURE_STREAM_ID,
            name: config.feature_stream_name.clone(),
            storage: StorageKind::Dense,
            element: None,
            sample_dimension: None,
        },
        StreamInfo {
            id: streams::LABEL_STREAM_ID,
            name: config.label_stream_name.clone(),
            storage: StorageKind::SparseCsc,
            element: Some(label_element),
            sample_dimension: Some(config.label_dimension),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_exposes_dense_features_then_sparse_labels() {
        let table = stream_table(&DatasetConfig::new(1000));
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].id, streams::FEATURE_STREAM_ID);
        assert_eq!(table[0].storage, StorageKind::Dense);
        assert_eq!(table[0].element, None);
        assert_eq!(table[1].id, streams::LABEL_STREAM_ID);
        assert_eq!(table[1].storage, StorageKind::SparseCsc);
        assert_eq!(table[1].sample_dimension, Some(1000));
    }

    #[test]
    fn label_element_follows_precision() {
        let table = stream_table(&DatasetConfig::new(2).with_precision(Precision::F64));
        assert_eq!(table[1].element, Some(ElementKind::F64));
    }

    #[test]
    fn stream_names_come_from_config() {
        let table = stream_table(&DatasetConfig::new(2).with_stream_names("image", "target"));
        assert_eq!(table[0].name, "image");
        assert_eq!(table[1].name, "target");
    }
}
