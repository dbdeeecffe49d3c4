//! Project Insight payload carried in the marker block

use serde_json::{Map, Value};
use thiserror::Error;

use crate::form::FormState;

pub const KEY_CUSTOMER_NAME: &str = "CustomerName";
pub const KEY_PI_NUMBER: &str = "PINumber";
pub const KEY_PM_NAME: &str = "PMName";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Recognized keys of the payload. Values that are absent, null or blank are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PiData {
    pub customer_name: Option<String>,
    pub pi_number: Option<String>,
    pub pm_name: Option<String>,
}

impl PiData {
    pub fn parse(json: &str) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Object(map) => Ok(Self::from_map(&map)),
            Value::Array(_) => Err(PayloadError::NotAnObject("an array")),
            Value::String(_) => Err(PayloadError::NotAnObject("a string")),
            Value::Number(_) => Err(PayloadError::NotAnObject("a number")),
            Value::Bool(_) => Err(PayloadError::NotAnObject("a boolean")),
            Value::Null => Err(PayloadError::NotAnObject("null")),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            customer_name: text_field(map, KEY_CUSTOMER_NAME),
            pi_number: text_field(map, KEY_PI_NUMBER),
            pm_name: text_field(map, KEY_PM_NAME),
        }
    }

    /// Overwrite the matching form fields with every value present here.
    /// Returns true when at least one field was written.
    pub fn apply_to(&self, form: &mut FormState) -> bool {
        let mut changed = false;
        for (value, field) in [
            (&self.customer_name, &mut form.customer_name),
            (&self.pi_number, &mut form.pi_number),
            (&self.pm_name, &mut form.pm_name),
        ] {
            if let Some(value) = value {
                *field = value.clone();
                changed = true;
            }
        }
        changed
    }

    /// `<customer> - <pi number>` for the activity log
    pub fn summary(&self) -> String {
        format!(
            "{} - {}",
            self.customer_name.as_deref().unwrap_or("None"),
            self.pi_number.as_deref().unwrap_or("None")
        )
    }
}

/// Strings are trimmed; numbers (PI numbers often arrive as integers) are rendered as text.
fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
