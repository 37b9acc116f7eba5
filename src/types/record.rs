//! Raw questionnaire submissions
//!
//! One `InputRecord` per user action. Values arrive untyped: text for numeric
//! and categorical fields, a flag for checkboxes. Parsing happens in the
//! validator, never here.

use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;
use std::collections::HashMap;

/// A single raw field value as collected from the form.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Text entry or selected option; empty string means "not provided".
    Text(String),
    /// Checkbox state.
    Flag(bool),
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accept bools, numbers and strings in answer files; numbers are
        // carried as text because the validator owns numeric parsing.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Flag(bool),
            Number(f64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Flag(b) => Ok(RawValue::Flag(b)),
            Wire::Number(n) => {
                if n.is_finite() {
                    Ok(RawValue::Text(format_number(n)))
                } else {
                    Err(D::Error::custom("non-finite number in input record"))
                }
            }
            Wire::Text(s) => Ok(RawValue::Text(s)),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Raw values keyed by feature name, one per submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct InputRecord {
    values: HashMap<String, RawValue>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, name: &str, value: &str) {
        self.values
            .insert(name.to_string(), RawValue::Text(value.to_string()));
    }

    pub fn set_flag(&mut self, name: &str, value: bool) {
        self.values.insert(name.to_string(), RawValue::Flag(value));
    }

    /// Raw value for a feature name; absent fields return None.
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
