//! Feature encoding for model inference
//!
//! Turns a fully-validated input record into the tensor feed the loaded model
//! declares. The layout is selected at load time from the introspected input
//! schema, never hardcoded: some deployments expose one named input per
//! feature, others a single aggregate float vector.

use crate::error::{Error, Result};
use crate::schema::{FeatureCatalog, FeatureKind};
use crate::types::record::{InputRecord, RawValue};
use crate::types::tensor::{TensorFeed, TensorValue};

/// How the loaded model expects its inputs laid out.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodingLayout {
    /// One [1, 1] input tensor per feature, keyed by feature name.
    PerFeature,
    /// A single [1, N] float32 vector holding all features in catalog order.
    Aggregate { input_name: String },
}

/// Encoder from validated records to tensor feeds.
///
/// Precondition: the record passed `validate_all` with every field Valid. The
/// encoder does not re-validate; a record that breaks the contract surfaces as
/// an internal error, never as a silently garbage tensor.
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a validated record into the feed the model declares.
    pub fn encode(
        &self,
        catalog: &FeatureCatalog,
        record: &InputRecord,
        layout: &EncodingLayout,
    ) -> Result<TensorFeed> {
        match layout {
            EncodingLayout::PerFeature => self.encode_per_feature(catalog, record),
            EncodingLayout::Aggregate { input_name } => {
                self.encode_aggregate(catalog, record, input_name)
            }
        }
    }

    fn encode_per_feature(
        &self,
        catalog: &FeatureCatalog,
        record: &InputRecord,
    ) -> Result<TensorFeed> {
        let mut feed = TensorFeed::with_capacity(catalog.len());

        for spec in catalog.specs() {
            let value = match &spec.kind {
                FeatureKind::Numeric { .. } => {
                    TensorValue::scalar_f32(self.numeric_value(record, &spec.name)? as f32)
                }
                // Raw selected string; the model's category vocabulary decides
                // what it means, unknown strings are its concern here.
                FeatureKind::Categorical { .. } => {
                    TensorValue::scalar_text(self.text_value(record, &spec.name)?)
                }
                FeatureKind::Boolean => {
                    TensorValue::scalar_i64(if self.flag_value(record, &spec.name) {
                        1
                    } else {
                        0
                    })
                }
            };
            feed.insert(spec.name.clone(), value);
        }

        Ok(feed)
    }

    fn encode_aggregate(
        &self,
        catalog: &FeatureCatalog,
        record: &InputRecord,
        input_name: &str,
    ) -> Result<TensorFeed> {
        let mut row = Vec::with_capacity(catalog.len());

        for spec in catalog.specs() {
            let value = match &spec.kind {
                FeatureKind::Numeric { .. } => self.numeric_value(record, &spec.name)? as f32,
                // Aggregate models consume the position of the selected choice
                // in the spec's declared vocabulary.
                FeatureKind::Categorical { choices } => {
                    let selected = self.text_value(record, &spec.name)?;
                    let index = choices.iter().position(|c| *c == selected).ok_or_else(|| {
                        Error::UnknownChoice {
                            field: spec.name.clone(),
                            value: selected.clone(),
                        }
                    })?;
                    index as f32
                }
                FeatureKind::Boolean => {
                    if self.flag_value(record, &spec.name) {
                        1.0
                    } else {
                        0.0
                    }
                }
            };
            row.push(value);
        }

        let mut feed = TensorFeed::with_capacity(1);
        feed.insert(input_name.to_string(), TensorValue::row_f32(row));
        Ok(feed)
    }

    fn numeric_value(&self, record: &InputRecord, name: &str) -> Result<f64> {
        let text = self.text_value(record, name)?;
        text.trim().parse().map_err(|_| {
            Error::Internal(format!(
                "field {:?} not parseable as a number; encode called on unvalidated record",
                name
            ))
        })
    }

    fn text_value(&self, record: &InputRecord, name: &str) -> Result<String> {
        match record.get(name) {
            Some(RawValue::Text(t)) => Ok(t.clone()),
            _ => Err(Error::Internal(format!(
                "field {:?} missing; encode called on unvalidated record",
                name
            ))),
        }
    }

    fn flag_value(&self, record: &InputRecord, name: &str) -> bool {
        matches!(record.get(name), Some(RawValue::Flag(true)))
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FeatureCatalog;
    use crate::types::tensor::TensorData;

    fn valid_record() -> InputRecord {
        let mut record = InputRecord::new();
        record.set_text("age", "20");
        record.set_text("daily_gaming_hours", "5");
        record.set_text("sleep_hours", "6");
        record.set_text("weight_change_kg", "2");
        record.set_text("exercise_hours_weekly", "3");
        record.set_text("social_isolation_score", "4");
        record.set_text("face_to_face_social_hours_weekly", "10");
        record.set_text("monthly_game_spending_usd", "50");
        record.set_text("years_gaming", "8");
        record.set_text("gender", "Male");
        record.set_text("game_genre", "RPG");
        record.set_text("gaming_platform", "PC");
        record.set_text("sleep_quality", "Fair");
        record.set_text("sleep_disruption_frequency", "Sometimes");
        record.set_text("academic_work_performance", "Stable");
        record.set_text("mood_state", "Stable");
        record.set_text("mood_swing_frequency", "Rarely");
        record.set_flag("withdrawal_symptoms", false);
        record.set_flag("loss_of_other_interests", true);
        record.set_flag("continued_despite_problems", false);
        record.set_flag("eye_strain", true);
        record.set_flag("back_neck_pain", false);
        record
    }

    #[test]
    fn test_per_feature_layout() {
        let catalog = FeatureCatalog::standard().unwrap();
        let encoder = FeatureEncoder::new();

        let feed = encoder
            .encode(&catalog, &valid_record(), &EncodingLayout::PerFeature)
            .unwrap();

        assert_eq!(feed.len(), catalog.len());

        let age = feed.get("age").unwrap();
        assert_eq!(age.shape, vec![1, 1]);
        assert_eq!(age.data, TensorData::F32(vec![20.0]));

        let gender = feed.get("gender").unwrap();
        assert_eq!(gender.data, TensorData::Text(vec!["Male".to_string()]));

        let interests = feed.get("loss_of_other_interests").unwrap();
        assert_eq!(interests.data, TensorData::I64(vec![1]));
        let withdrawal = feed.get("withdrawal_symptoms").unwrap();
        assert_eq!(withdrawal.data, TensorData::I64(vec![0]));
    }

    #[test]
    fn test_aggregate_layout() {
        let catalog = FeatureCatalog::standard().unwrap();
        let encoder = FeatureEncoder::new();
        let layout = EncodingLayout::Aggregate {
            input_name: "float_input".to_string(),
        };

        let feed = encoder.encode(&catalog, &valid_record(), &layout).unwrap();

        assert_eq!(feed.len(), 1);
        let row = feed.get("float_input").unwrap();
        assert_eq!(row.shape, vec![1, catalog.len() as i64]);

        match &row.data {
            TensorData::F32(values) => {
                assert_eq!(values.len(), catalog.len());
                // Catalog order: numerics first
                assert_eq!(values[0], 20.0); // age
                assert_eq!(values[1], 5.0); // daily_gaming_hours
                                            // gender "Male" is choice index 0, game_genre "RPG" is index 2
                assert_eq!(values[9], 0.0);
                assert_eq!(values[10], 2.0);
                // last boolean, back_neck_pain unchecked
                assert_eq!(values[21], 0.0);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_aggregate_unknown_choice() {
        let catalog = FeatureCatalog::standard().unwrap();
        let encoder = FeatureEncoder::new();
        let layout = EncodingLayout::Aggregate {
            input_name: "float_input".to_string(),
        };

        let mut record = valid_record();
        record.set_text("gender", "Unspecified");

        let err = encoder.encode(&catalog, &record, &layout).unwrap_err();
        match err {
            crate::error::Error::UnknownChoice { field, value } => {
                assert_eq!(field, "gender");
                assert_eq!(value, "Unspecified");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_contract_violation_is_an_error() {
        let catalog = FeatureCatalog::standard().unwrap();
        let encoder = FeatureEncoder::new();

        let mut record = valid_record();
        record.set_text("age", "not a number");

        let err = encoder
            .encode(&catalog, &record, &EncodingLayout::PerFeature)
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Internal(_)));
    }
}
