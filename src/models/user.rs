use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::lenient;
use crate::store::{Fields, Value};

/// User payload accepted by `save_user`.
///
/// Only `email` is required; it becomes the document key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Email address, used as the unique user identifier
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    /// Display name
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    /// Role tag such as "student" or "staff"
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub role: Option<String>,
    /// Client version marker
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub version: Option<String>,
    /// Programme of study
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub programme: Option<String>,
    /// Expected graduation year
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub grad_year: Option<i64>,
    /// Collected stamp identifiers, in collection order
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub stamps: Option<Vec<String>>,
}

impl NewUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    /// Full document written on save. Absent optional fields become null,
    /// an empty programme or a zero graduation year also become null, and
    /// missing stamps become an empty list. Both timestamps are set to `now`.
    pub fn to_fields(&self, now: DateTime<Utc>) -> Fields {
        let programme = self.programme.clone().filter(|p| !p.is_empty());
        let grad_year = self.grad_year.filter(|year| *year != 0);

        let mut fields = Fields::new();
        fields.insert("name".to_string(), Value::from(self.name.clone()));
        fields.insert("email".to_string(), Value::from(self.email.clone()));
        fields.insert("role".to_string(), Value::from(self.role.clone()));
        fields.insert("version".to_string(), Value::from(self.version.clone()));
        fields.insert("programme".to_string(), Value::from(programme));
        fields.insert("gradYear".to_string(), Value::from(grad_year));
        fields.insert(
            "stamps".to_string(),
            Value::from(self.stamps.clone().unwrap_or_default()),
        );
        fields.insert("createdAt".to_string(), Value::Timestamp(now));
        fields.insert("updatedAt".to_string(), Value::Timestamp(now));
        fields
    }
}

/// A stored user merged with its document key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Document key (the email the user was saved under)
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub programme: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub grad_year: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub stamps: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn stamp_count(&self) -> usize {
        self.stamps.len()
    }

    /// Key used for this user in aggregate views: the stored email, or the
    /// document key for documents written without one.
    pub fn identifier(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.id)
    }
}

/// Body of `PUT /api/users/{email}/stamps`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStamps {
    #[serde(deserialize_with = "lenient::string_list")]
    pub stamps: Vec<String>,
}
