use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod routes;
pub mod store;
pub mod validate;


/// A single contact, exactly as it's persisted.
///
/// `id`, `created_at` and `updated_at` are assigned by the store; a client never chooses them.
#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The body of a create or edit request, before validation.
///
/// Every field is optional here so that a missing field is reported alongside any other
/// problems with the submission instead of failing deserialization outright.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ContactInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub age: Option<AgeInput>,
}

/// Browser forms tend to send the age as text, other clients send a number.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum AgeInput {
    Number(f64),
    Text(String),
}

impl ContactInput {
    #[allow(clippy::cast_precision_loss)]
    pub fn new(name: &str, email: &str, phone: &str, age: i64) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
            age: Some(AgeInput::Number(age as f64)),
        }
    }
}

/// The four business fields of a contact once they've passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i64,
}
