//! The boundary between the form-filling flow and whatever serves forms.
//!
//! [`FormGateway`] is the only thing a [`FormSession`](crate::session::FormSession)
//! needs from the outside world: fetch a published form, submit a payload.

use serde::{Deserialize, Serialize};
use snapform_core::SnapformResult;
use snapform_db::PublicForm;

use crate::value::FieldValue;

/// One answer inside a [`SubmissionPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseItem {
    pub field_id: String,
    pub value: FieldValue,
}

/// The body of a form submission: `{ email?, responses: [{fieldId, value}] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub responses: Vec<ResponseItem>,
}

impl SubmissionPayload {
    /// Ids of every answered field, in payload order.
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.responses.iter().map(|item| item.field_id.as_str())
    }
}

/// The success body of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub success: bool,
    pub message: String,
    pub response_id: String,
}

impl SubmitReceipt {
    pub fn accepted(response_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message: "Form submitted successfully".to_string(),
            response_id: response_id.into(),
        }
    }
}

/// Fetches published forms and accepts submissions.
#[async_trait::async_trait]
pub trait FormGateway: Send + Sync {
    /// Loads an active form with its ordered fields and theme.
    async fn fetch_form(&self, form_id: &str) -> SnapformResult<PublicForm>;

    /// Submits a payload for `form_id`.
    async fn submit(&self, form_id: &str, payload: &SubmissionPayload) -> SnapformResult<SubmitReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = SubmissionPayload {
            email: None,
            responses: vec![ResponseItem {
                field_id: "x".into(),
                value: FieldValue::List(vec!["A".into(), "B".into()]),
            }],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["responses"][0]["fieldId"], "x");
        assert_eq!(json["responses"][0]["value"][1], "B");
    }

    #[test]
    fn test_payload_parses_mixed_values() {
        let payload: SubmissionPayload = serde_json::from_str(
            r#"{"email": "a@b.com", "responses": [{"fieldId": "y", "value": "hi"},
                {"fieldId": "x", "value": ["A"]}]}"#,
        )
        .unwrap();
        assert_eq!(payload.email.as_deref(), Some("a@b.com"));
        assert_eq!(payload.field_ids().collect::<Vec<_>>(), vec!["y", "x"]);
    }
}
