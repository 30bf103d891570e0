use crate::FieldErrors;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The uniform wrapper around every `/api/contacts` response body.
///
/// Absent fields are left out of the JSON entirely, so a successful delete serializes as
/// `{"success":true,"message":"Contact deleted successfully"}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Field name to message, present when validation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
    /// Diagnostic detail for server-side failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    fn new(success: bool) -> Self {
        Self {
            success,
            message: None,
            data: None,
            count: None,
            query: None,
            errors: None,
            error: None,
        }
    }

    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::new(true)
        }
    }

    /// A successful response with nothing but a message.
    pub fn done(message: impl Into<String>) -> Self {
        Self::new(true).with_message(message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false).with_message(message)
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_errors(mut self, errors: &FieldErrors) -> Self {
        self.errors = Some(
            errors
                .iter()
                .map(|(field, msg)| (field.to_string(), msg.to_string()))
                .collect(),
        );
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

impl<T> Envelope<Vec<T>> {
    /// A successful response carrying a whole result set and its length.
    pub fn list(rows: Vec<T>) -> Self {
        Self {
            count: Some(rows.len()),
            ..Self::ok(rows)
        }
    }
}

#[test]
fn absent_fields_are_omitted() {
    let json = serde_json::to_value(Envelope::<()>::done("Contact deleted successfully"))
        .expect("envelope should serialize");
    assert_eq!(
        json,
        serde_json::json!({ "success": true, "message": "Contact deleted successfully" })
    );
}

#[test]
fn list_counts_its_rows() {
    let env = Envelope::list(vec![1, 2, 3]).with_query("x");
    assert_eq!(env.count, Some(3));
    assert_eq!(env.data.as_deref(), Some(&[1, 2, 3][..]));
    assert_eq!(env.query.as_deref(), Some("x"));
}
