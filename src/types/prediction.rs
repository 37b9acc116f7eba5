//! Prediction result data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk category classification, fixed four-way table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
    Severe,
}

impl RiskCategory {
    /// Map a raw label index to a category. Out-of-range indices return None;
    /// callers must surface them, never clamp.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(RiskCategory::Low),
            1 => Some(RiskCategory::Moderate),
            2 => Some(RiskCategory::High),
            3 => Some(RiskCategory::Severe),
            _ => None,
        }
    }

    /// The label index this category decodes from.
    pub fn index(&self) -> i64 {
        match self {
            RiskCategory::Low => 0,
            RiskCategory::Moderate => 1,
            RiskCategory::High => 2,
            RiskCategory::Severe => 3,
        }
    }

    /// Presentation color for the result badge.
    pub fn color(&self) -> &'static str {
        match self {
            RiskCategory::Low => "#22c55e",
            RiskCategory::Moderate => "#f59e0b",
            RiskCategory::High => "#f97316",
            RiskCategory::Severe => "#ef4444",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskCategory::Low => "Low",
            RiskCategory::Moderate => "Moderate",
            RiskCategory::High => "High",
            RiskCategory::Severe => "Severe",
        };
        write!(f, "{}", name)
    }
}

/// Decoded prediction for one submission.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceResult {
    /// Unique submission identifier
    pub submission_id: String,

    /// Raw class index emitted by the model
    pub label_index: i64,

    /// Mapped risk category
    pub category: RiskCategory,

    /// Prediction timestamp
    pub timestamp: DateTime<Utc>,
}

impl InferenceResult {
    pub fn new(label_index: i64, category: RiskCategory) -> Self {
        Self {
            submission_id: uuid::Uuid::new_v4().to_string(),
            label_index,
            category,
            timestamp: Utc::now(),
        }
    }

    /// Presentation color for this result.
    pub fn color(&self) -> &'static str {
        self.category.color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for index in 0..4 {
            let category = RiskCategory::from_index(index).unwrap();
            assert_eq!(category.index(), index);
        }
    }

    #[test]
    fn test_out_of_range_index() {
        assert_eq!(RiskCategory::from_index(-1), None);
        assert_eq!(RiskCategory::from_index(4), None);
        assert_eq!(RiskCategory::from_index(i64::MAX), None);
    }

    #[test]
    fn test_colors_match_fixed_table() {
        assert_eq!(RiskCategory::Low.color(), "#22c55e");
        assert_eq!(RiskCategory::Moderate.color(), "#f59e0b");
        assert_eq!(RiskCategory::High.color(), "#f97316");
        assert_eq!(RiskCategory::Severe.color(), "#ef4444");
    }

    #[test]
    fn test_result_serialization() {
        let result = InferenceResult::new(2, RiskCategory::High);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"High\""));
        assert!(json.contains(&result.submission_id));
    }
}
