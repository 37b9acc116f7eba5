//! Typed tensor descriptors exchanged with the inference engine
//!
//! The engine boundary accepts a feed keyed by model input name and returns a
//! feed keyed by output name. Descriptors are engine-agnostic; the engine
//! adapter converts them to runtime values.

use std::collections::HashMap;

/// Tensor payload, one variant per element type the model accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    F32(Vec<f32>),
    I64(Vec<i64>),
    Text(Vec<String>),
}

/// Shaped, typed buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorValue {
    pub shape: Vec<i64>,
    pub data: TensorData,
}

impl TensorValue {
    /// Single float32 element with shape [1, 1].
    pub fn scalar_f32(value: f32) -> Self {
        Self {
            shape: vec![1, 1],
            data: TensorData::F32(vec![value]),
        }
    }

    /// Single int64 element with shape [1, 1].
    pub fn scalar_i64(value: i64) -> Self {
        Self {
            shape: vec![1, 1],
            data: TensorData::I64(vec![value]),
        }
    }

    /// Single string element with shape [1, 1].
    pub fn scalar_text(value: String) -> Self {
        Self {
            shape: vec![1, 1],
            data: TensorData::Text(vec![value]),
        }
    }

    /// One row of float32 values with shape [1, N].
    pub fn row_f32(values: Vec<f32>) -> Self {
        Self {
            shape: vec![1, values.len() as i64],
            data: TensorData::F32(values),
        }
    }

    /// Number of elements in the payload.
    pub fn len(&self) -> usize {
        match &self.data {
            TensorData::F32(d) => d.len(),
            TensorData::I64(d) => d.len(),
            TensorData::Text(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Model inputs keyed by declared input name.
pub type TensorFeed = HashMap<String, TensorValue>;

/// Model outputs keyed by declared output name.
pub type OutputFeed = HashMap<String, TensorValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_constructors() {
        let v = TensorValue::scalar_f32(3.5);
        assert_eq!(v.shape, vec![1, 1]);
        assert_eq!(v.data, TensorData::F32(vec![3.5]));

        let v = TensorValue::scalar_i64(1);
        assert_eq!(v.data, TensorData::I64(vec![1]));

        let v = TensorValue::scalar_text("PC".to_string());
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn test_row_shape() {
        let v = TensorValue::row_f32(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.shape, vec![1, 3]);
        assert_eq!(v.len(), 3);
    }
}
