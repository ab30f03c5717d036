use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::lenient;
use crate::store::{Fields, Value};

/// One answer to a location quiz. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub email: String,
    pub location_id: String,
    pub correct: bool,
    pub timestamp: DateTime<Utc>,
}

impl QuizAttempt {
    pub fn new(
        email: impl Into<String>,
        location_id: impl Into<String>,
        correct: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            email: email.into(),
            location_id: location_id.into(),
            correct,
            timestamp,
        }
    }

    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("email".to_string(), Value::from(self.email.clone()));
        fields.insert("locationId".to_string(), Value::from(self.location_id.clone()));
        fields.insert("correct".to_string(), Value::Boolean(self.correct));
        fields.insert("timestamp".to_string(), Value::Timestamp(self.timestamp));
        fields
    }
}

/// Body of `POST /api/quizzes`. `correct` may be any JSON value and is
/// coerced with [`truthy`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogQuizAnswer {
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub location_id: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub correct: serde_json::Value,
}

/// Truthiness of a loosely typed value: null, false, 0, NaN and the empty
/// string are false, everything else (including empty arrays and objects)
/// is true.
pub fn truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}
