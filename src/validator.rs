//! Per-field validation of raw questionnaire values
//!
//! Pure checks against the feature catalog. Every field is evaluated on every
//! pass so the caller can render the complete outcome inline; validation never
//! stops at the first failure.

use crate::schema::{FeatureCatalog, FeatureKind, FeatureSpec};
use crate::types::record::{InputRecord, RawValue};
use std::collections::BTreeMap;

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidReason {
    /// Empty, missing or unparseable entry
    Required,
    /// No option selected for a categorical field
    NotSelected,
    /// Parsed value outside the inclusive bounds
    OutOfRange { min: f64, max: f64 },
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidReason::Required => write!(f, "This field is required."),
            InvalidReason::NotSelected => write!(f, "Please select an option."),
            InvalidReason::OutOfRange { min, max } => {
                write!(f, "Must be between {} and {}.", min, max)
            }
        }
    }
}

/// Validation status of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldStatus {
    Valid,
    Invalid(InvalidReason),
}

impl FieldStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldStatus::Valid)
    }
}

/// Full per-field outcome, one entry per catalog feature.
pub type ValidationOutcome = BTreeMap<String, FieldStatus>;

/// True iff every entry in the outcome is Valid.
pub fn all_valid(outcome: &ValidationOutcome) -> bool {
    outcome.values().all(FieldStatus::is_valid)
}

/// Stateless per-field validator.
pub struct FieldValidator;

impl FieldValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate one raw value against its spec.
    pub fn validate(&self, spec: &FeatureSpec, raw: Option<&RawValue>) -> FieldStatus {
        match &spec.kind {
            FeatureKind::Numeric { rule } => {
                let text = match raw {
                    Some(RawValue::Text(t)) => t.trim(),
                    _ => return FieldStatus::Invalid(InvalidReason::Required),
                };
                if text.is_empty() {
                    return FieldStatus::Invalid(InvalidReason::Required);
                }
                let value: f64 = match text.parse() {
                    Ok(v) => v,
                    Err(_) => return FieldStatus::Invalid(InvalidReason::Required),
                };
                if !value.is_finite() || !rule.contains(value) {
                    return FieldStatus::Invalid(InvalidReason::OutOfRange {
                        min: rule.min,
                        max: rule.max,
                    });
                }
                FieldStatus::Valid
            }
            FeatureKind::Categorical { .. } => match raw {
                Some(RawValue::Text(t)) if !t.trim().is_empty() => FieldStatus::Valid,
                _ => FieldStatus::Invalid(InvalidReason::NotSelected),
            },
            // Absence is a valid "false"
            FeatureKind::Boolean => FieldStatus::Valid,
        }
    }

    /// Validate every catalog feature against the record. The outcome always
    /// has one entry per feature regardless of how many fail.
    pub fn validate_all(&self, catalog: &FeatureCatalog, record: &InputRecord) -> ValidationOutcome {
        catalog
            .specs()
            .iter()
            .map(|spec| {
                let status = self.validate(spec, record.get(&spec.name));
                (spec.name.clone(), status)
            })
            .collect()
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FeatureSpec;

    fn numeric_spec() -> FeatureSpec {
        FeatureSpec::numeric("age", "Age", 5.0, 60.0)
    }

    #[test]
    fn test_numeric_boundaries_inclusive() {
        let validator = FieldValidator::new();
        let spec = numeric_spec();

        let min = RawValue::Text("5".to_string());
        let max = RawValue::Text("60".to_string());
        assert_eq!(validator.validate(&spec, Some(&min)), FieldStatus::Valid);
        assert_eq!(validator.validate(&spec, Some(&max)), FieldStatus::Valid);

        let below = RawValue::Text("4.9".to_string());
        let above = RawValue::Text("60.1".to_string());
        assert_eq!(
            validator.validate(&spec, Some(&below)),
            FieldStatus::Invalid(InvalidReason::OutOfRange {
                min: 5.0,
                max: 60.0
            })
        );
        assert_eq!(
            validator.validate(&spec, Some(&above)),
            FieldStatus::Invalid(InvalidReason::OutOfRange {
                min: 5.0,
                max: 60.0
            })
        );
    }

    #[test]
    fn test_numeric_required() {
        let validator = FieldValidator::new();
        let spec = numeric_spec();

        assert_eq!(
            validator.validate(&spec, None),
            FieldStatus::Invalid(InvalidReason::Required)
        );
        let empty = RawValue::Text("".to_string());
        let junk = RawValue::Text("abc".to_string());
        assert_eq!(
            validator.validate(&spec, Some(&empty)),
            FieldStatus::Invalid(InvalidReason::Required)
        );
        assert_eq!(
            validator.validate(&spec, Some(&junk)),
            FieldStatus::Invalid(InvalidReason::Required)
        );
    }

    #[test]
    fn test_categorical_required() {
        let validator = FieldValidator::new();
        let spec = FeatureSpec::categorical("gender", "Gender", &["Male", "Female", "Other"]);

        let selected = RawValue::Text("Male".to_string());
        assert_eq!(
            validator.validate(&spec, Some(&selected)),
            FieldStatus::Valid
        );

        let unselected = RawValue::Text("".to_string());
        assert_eq!(
            validator.validate(&spec, Some(&unselected)),
            FieldStatus::Invalid(InvalidReason::NotSelected)
        );
        assert_eq!(
            validator.validate(&spec, None),
            FieldStatus::Invalid(InvalidReason::NotSelected)
        );
    }

    #[test]
    fn test_boolean_always_valid() {
        let validator = FieldValidator::new();
        let spec = FeatureSpec::boolean("eye_strain", "Eye strain");

        assert_eq!(validator.validate(&spec, None), FieldStatus::Valid);
        let checked = RawValue::Flag(true);
        assert_eq!(validator.validate(&spec, Some(&checked)), FieldStatus::Valid);
    }

    #[test]
    fn test_validate_all_covers_every_field() {
        let validator = FieldValidator::new();
        let catalog = crate::schema::FeatureCatalog::standard().unwrap();

        // Completely empty record still yields one entry per feature
        let outcome = validator.validate_all(&catalog, &InputRecord::new());
        assert_eq!(outcome.len(), catalog.len());
        assert!(!all_valid(&outcome));

        // Booleans are valid even in an empty record
        assert_eq!(outcome.get("eye_strain"), Some(&FieldStatus::Valid));
        assert_eq!(
            outcome.get("age"),
            Some(&FieldStatus::Invalid(InvalidReason::Required))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            InvalidReason::Required.to_string(),
            "This field is required."
        );
        assert_eq!(
            InvalidReason::NotSelected.to_string(),
            "Please select an option."
        );
        assert_eq!(
            InvalidReason::OutOfRange {
                min: 5.0,
                max: 60.0
            }
            .to_string(),
            "Must be between 5 and 60."
        );
    }
}
