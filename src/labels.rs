use crate::config::Precision;
use crate::errors::DatasetError;
use crate::types::{ClassId, LabelIndex};

/// Scalar label value in the configured precision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LabelValue {
    /// 32-bit value.
    F32(f32),
    /// 64-bit value.
    F64(f64),
}

/// Sparse one-hot label: a single non-zero index within a dense dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SparseLabel {
    /// Dense dimension of the label space.
    pub dimension: usize,
    /// Index of the sole non-zero element.
    pub index: LabelIndex,
    /// Value at that index; always 1.0 for one-hot labels.
    pub value: LabelValue,
}

impl SparseLabel {
    /// Expands the label to a dense `f64` vector. Intended for tests and
    /// diagnostics; training consumers should stay sparse.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dimension];
        dense[self.index as usize] = match self.value {
            LabelValue::F32(v) => f64::from(v),
            LabelValue::F64(v) => v,
        };
        dense
    }
}

/// Produces sparse one-hot labels for validated class ids.
///
/// Construction checks once that every index in the label space fits the
/// sparse index type, so per-sample generation is infallible.
#[derive(Clone, Copy, Debug)]
pub struct LabelGenerator {
    dimension: usize,
    precision: Precision,
}

impl LabelGenerator {
    /// Creates a generator for a `dimension`-class label space.
    pub fn new(dimension: usize, precision: Precision) -> Result<Self, DatasetError> {
        if dimension > LabelIndex::MAX as usize {
            return Err(DatasetError::LabelDimension {
                dimension,
                max: u64::from(LabelIndex::MAX),
            });
        }
        Ok(Self {
            dimension,
            precision,
        })
    }

    /// Dense dimension of the label space.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Builds the one-hot label for `class_id`.
    ///
    /// Callers must have range-checked the class id during indexing.
    pub fn create_label_for(&self, class_id: ClassId) -> SparseLabel {
        debug_assert!((class_id as usize) < self.dimension);
        let value = match self.precision {
            Precision::F32 => LabelValue::F32(1.0),
            Precision::F64 => LabelValue::F64(1.0),
        };
        SparseLabel {
            dimension: self.dimension,
            index: class_id as LabelIndex,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_label_has_unit_value_at_class_index() {
        let generator = LabelGenerator::new(4, Precision::F32).unwrap();
        let label = generator.create_label_for(2);
        assert_eq!(label.dimension, 4);
        assert_eq!(label.index, 2);
        assert_eq!(label.value, LabelValue::F32(1.0));
        assert_eq!(label.to_dense(), vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn double_precision_labels_carry_f64_values() {
        let generator = LabelGenerator::new(2, Precision::F64).unwrap();
        let label = generator.create_label_for(0);
        assert_eq!(label.value, LabelValue::F64(1.0));
    }

    #[test]
    fn oversized_dimension_is_rejected() {
        let err = LabelGenerator::new(LabelIndex::MAX as usize + 1, Precision::F32).unwrap_err();
        assert!(matches!(err, DatasetError::LabelDimension { .. }));
    }

    #[test]
    fn max_representable_dimension_is_accepted() {
        assert!(LabelGenerator::new(LabelIndex::MAX as usize, Precision::F32).is_ok());
    }
}
