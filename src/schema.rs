//! Questionnaire feature catalog
//!
//! The ordered set of features the screening model was trained on. The
//! catalog is fixed configuration built once at startup; it must line up with
//! the input schema introspected from the loaded model.

use crate::error::{Error, Result};

/// Inclusive numeric bounds for a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeRule {
    pub min: f64,
    pub max: f64,
}

impl RangeRule {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True iff the value lies within the inclusive bounds.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Closed set of feature kinds, one encoding rule per variant.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureKind {
    /// Free numeric entry; the rule is required, so a numeric feature without
    /// bounds cannot be constructed.
    Numeric { rule: RangeRule },
    /// Selection from a fixed vocabulary.
    Categorical { choices: Vec<String> },
    /// Checkbox; absence means false.
    Boolean,
}

/// One questionnaire field: wire name, human label, kind.
#[derive(Debug, Clone)]
pub struct FeatureSpec {
    pub name: String,
    pub label: String,
    pub kind: FeatureKind,
}

impl FeatureSpec {
    pub fn numeric(name: &str, label: &str, min: f64, max: f64) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FeatureKind::Numeric {
                rule: RangeRule::new(min, max),
            },
        }
    }

    pub fn categorical(name: &str, label: &str, choices: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FeatureKind::Categorical {
                choices: choices.iter().map(|c| c.to_string()).collect(),
            },
        }
    }

    pub fn boolean(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FeatureKind::Boolean,
        }
    }
}

/// Ordered, validated feature set. Order is significant: the aggregate
/// encoding layout concatenates features in catalog order.
#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    specs: Vec<FeatureSpec>,
}

impl FeatureCatalog {
    /// Build a catalog, enforcing the configuration-completeness invariants:
    /// non-empty, unique names, sane numeric bounds, non-empty vocabularies.
    pub fn new(specs: Vec<FeatureSpec>) -> Result<Self> {
        if specs.is_empty() {
            return Err(Error::Internal("feature catalog is empty".to_string()));
        }

        let mut seen = std::collections::HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.name.clone()) {
                return Err(Error::Internal(format!(
                    "duplicate feature name {:?} in catalog",
                    spec.name
                )));
            }
            match &spec.kind {
                FeatureKind::Numeric { rule } => {
                    if rule.min > rule.max {
                        return Err(Error::Internal(format!(
                            "feature {:?} has inverted bounds [{}, {}]",
                            spec.name, rule.min, rule.max
                        )));
                    }
                }
                FeatureKind::Categorical { choices } => {
                    if choices.is_empty() {
                        return Err(Error::Internal(format!(
                            "feature {:?} has an empty vocabulary",
                            spec.name
                        )));
                    }
                }
                FeatureKind::Boolean => {}
            }
        }

        Ok(Self { specs })
    }

    /// The catalog for the gaming disorder screening questionnaire, matching
    /// the columns the model was trained on.
    pub fn standard() -> Result<Self> {
        Self::new(vec![
            FeatureSpec::numeric("age", "Age", 5.0, 60.0),
            FeatureSpec::numeric("daily_gaming_hours", "Daily gaming hours", 0.1, 24.0),
            FeatureSpec::numeric("sleep_hours", "Sleep hours", 3.0, 9.0),
            FeatureSpec::numeric("weight_change_kg", "Weight change", 0.0, 9.0),
            FeatureSpec::numeric("exercise_hours_weekly", "Exercise hours", 0.0, 12.0),
            FeatureSpec::numeric("social_isolation_score", "Social isolation score", 1.0, 10.0),
            FeatureSpec::numeric(
                "face_to_face_social_hours_weekly",
                "Social hours",
                0.0,
                17.0,
            ),
            FeatureSpec::numeric("monthly_game_spending_usd", "Monthly spending", 0.0, 500.0),
            FeatureSpec::numeric("years_gaming", "Years gaming", 1.0, 20.0),
            FeatureSpec::categorical("gender", "Gender", &["Male", "Female", "Other"]),
            FeatureSpec::categorical(
                "game_genre",
                "Game genre",
                &[
                    "Action", "Adventure", "RPG", "Strategy", "Sports", "Shooter", "MOBA",
                    "Casual",
                ],
            ),
            FeatureSpec::categorical(
                "gaming_platform",
                "Gaming platform",
                &["PC", "Console", "Mobile", "Mixed"],
            ),
            FeatureSpec::categorical(
                "sleep_quality",
                "Sleep quality",
                &["Poor", "Fair", "Good", "Excellent"],
            ),
            FeatureSpec::categorical(
                "sleep_disruption_frequency",
                "Sleep disruption frequency",
                &["Never", "Rarely", "Sometimes", "Often", "Always"],
            ),
            FeatureSpec::categorical(
                "academic_work_performance",
                "Academic/work performance",
                &["Declining", "Stable", "Improving"],
            ),
            FeatureSpec::categorical(
                "mood_state",
                "Mood state",
                &["Stable", "Irritable", "Anxious", "Depressed"],
            ),
            FeatureSpec::categorical(
                "mood_swing_frequency",
                "Mood swing frequency",
                &["Never", "Rarely", "Sometimes", "Often", "Always"],
            ),
            FeatureSpec::boolean("withdrawal_symptoms", "Withdrawal symptoms"),
            FeatureSpec::boolean("loss_of_other_interests", "Loss of other interests"),
            FeatureSpec::boolean("continued_despite_problems", "Continued despite problems"),
            FeatureSpec::boolean("eye_strain", "Eye strain"),
            FeatureSpec::boolean("back_neck_pain", "Back/neck pain"),
        ])
    }

    pub fn specs(&self) -> &[FeatureSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Feature names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.specs.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FeatureSpec> {
        self.specs.iter().find(|s| s.name == name)
    }
}
