//! Decoding of raw model output into a risk category

use crate::error::{Error, Result};
use crate::types::prediction::RiskCategory;
use crate::types::tensor::{TensorData, TensorValue};

/// Decoder from the model's primary output tensor to a risk category.
///
/// The label table is fixed: `{0: Low, 1: Moderate, 2: High, 3: Severe}`.
/// Anything outside it is `UnmappedLabel`, never a defaulted category.
pub struct ResultMapper;

impl ResultMapper {
    pub fn new() -> Self {
        Self
    }

    /// Extract the single output value, cast it to a label index and look it
    /// up in the category table.
    pub fn decode(&self, output: &TensorValue) -> Result<(i64, RiskCategory)> {
        let index = self.label_index(output)?;
        let category =
            RiskCategory::from_index(index).ok_or(Error::UnmappedLabel(index))?;
        Ok((index, category))
    }

    fn label_index(&self, output: &TensorValue) -> Result<i64> {
        match &output.data {
            TensorData::I64(data) => data
                .first()
                .copied()
                .ok_or_else(|| Error::Inference("empty label output".to_string())),
            TensorData::F32(data) => {
                let raw = data
                    .first()
                    .copied()
                    .ok_or_else(|| Error::Inference("empty label output".to_string()))?;
                if !raw.is_finite() {
                    return Err(Error::Inference(format!(
                        "non-finite label value {}",
                        raw
                    )));
                }
                Ok(raw.round() as i64)
            }
            TensorData::Text(data) => {
                let raw = data
                    .first()
                    .ok_or_else(|| Error::Inference("empty label output".to_string()))?;
                raw.trim().parse().map_err(|_| {
                    Error::Inference(format!("label output {:?} is not an integer", raw))
                })
            }
        }
    }
}

impl Default for ResultMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_labels() {
        let mapper = ResultMapper::new();
        let expected = [
            RiskCategory::Low,
            RiskCategory::Moderate,
            RiskCategory::High,
            RiskCategory::Severe,
        ];

        for (index, category) in expected.iter().enumerate() {
            let output = TensorValue::scalar_i64(index as i64);
            let (decoded_index, decoded) = mapper.decode(&output).unwrap();
            assert_eq!(decoded_index, index as i64);
            assert_eq!(decoded, *category);
        }
    }

    #[test]
    fn test_unmapped_label_never_defaults() {
        let mapper = ResultMapper::new();

        for index in [-1_i64, 4, 99] {
            let err = mapper.decode(&TensorValue::scalar_i64(index)).unwrap_err();
            match err {
                Error::UnmappedLabel(reported) => assert_eq!(reported, index),
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_float_output_is_rounded() {
        let mapper = ResultMapper::new();

        let (index, category) = mapper.decode(&TensorValue::scalar_f32(2.2)).unwrap();
        assert_eq!(index, 2);
        assert_eq!(category, RiskCategory::High);

        let (index, _) = mapper.decode(&TensorValue::scalar_f32(2.6)).unwrap();
        assert_eq!(index, 3);
    }

    #[test]
    fn test_empty_output_is_an_inference_error() {
        let mapper = ResultMapper::new();
        let empty = TensorValue {
            shape: vec![1, 0],
            data: TensorData::I64(vec![]),
        };
        assert!(matches!(
            mapper.decode(&empty).unwrap_err(),
            Error::Inference(_)
        ));
    }

    #[test]
    fn test_text_output_parses_integer() {
        let mapper = ResultMapper::new();
        let output = TensorValue::scalar_text("1".to_string());
        let (_, category) = mapper.decode(&output).unwrap();
        assert_eq!(category, RiskCategory::Moderate);

        let junk = TensorValue::scalar_text("Moderate".to_string());
        assert!(matches!(
            mapper.decode(&junk).unwrap_err(),
            Error::Inference(_)
        ));
    }
}
