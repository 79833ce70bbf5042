//! Server-side acceptance of submissions.
//!
//! Checks run in a fixed order and the first failure wins: form status,
//! e-mail format, e-mail presence, one response per e-mail, required
//! fields, unknown fields. The store repeats the one-response check inside
//! its recording transaction.

use std::collections::HashSet;

use snapform_core::{SnapformError, SnapformResult};
use snapform_db::{FormStore, NewResponse, PublicForm};

use crate::gateway::{SubmissionPayload, SubmitReceipt};
use crate::validators::is_valid_email;

pub const FORM_UNAVAILABLE: &str = "Form not found or not active";
pub const MISSING_REQUIRED: &str = "All required fields must be filled";
pub const ALREADY_SUBMITTED: &str = "You have already submitted a response to this form";

/// Checks the form status and the respondent's e-mail.
///
/// Returns the trimmed e-mail, `None` when none was given.
pub fn check_respondent<'a>(
    public: &PublicForm,
    payload: &'a SubmissionPayload,
) -> SnapformResult<Option<&'a str>> {
    let form = &public.form;
    if !form.accepts_responses() {
        return Err(SnapformError::NotFound(FORM_UNAVAILABLE.to_string()));
    }

    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty());
    if let Some(email) = email {
        if !is_valid_email(email) {
            return Err(SnapformError::BadRequest("Invalid email address".to_string()));
        }
    }
    if form.collect_emails && email.is_none() {
        return Err(SnapformError::BadRequest("Email is required for this form".to_string()));
    }
    Ok(email)
}

/// Checks the answers against the form's fields and returns the row to store.
pub fn check_answers(
    public: &PublicForm,
    payload: &SubmissionPayload,
    email: Option<&str>,
) -> SnapformResult<NewResponse> {
    let submitted: HashSet<&str> = payload.field_ids().collect();
    let missing: Vec<String> = public
        .fields
        .iter()
        .filter(|field| field.required && !submitted.contains(field.id.as_str()))
        .map(|field| field.id.clone())
        .collect();
    if !missing.is_empty() {
        return Err(SnapformError::MissingRequiredFields {
            message: MISSING_REQUIRED.to_string(),
            field_ids: missing,
        });
    }

    let known: HashSet<&str> = public.fields.iter().map(|field| field.id.as_str()).collect();
    if let Some(unknown) = payload.field_ids().find(|id| !known.contains(id)) {
        return Err(SnapformError::BadRequest(format!(
            "Field {unknown} does not belong to this form"
        )));
    }

    Ok(NewResponse {
        form_id: public.form.id.clone(),
        email: email.map(str::to_string),
        answers: payload
            .responses
            .iter()
            .map(|item| (item.field_id.clone(), item.value.to_stored()))
            .collect(),
    })
}

/// Checks and records a submission for `form_id`.
pub async fn submit_response(
    store: &dyn FormStore,
    form_id: &str,
    payload: &SubmissionPayload,
) -> SnapformResult<SubmitReceipt> {
    let public = store
        .get_active_form(form_id)
        .await?
        .ok_or_else(|| SnapformError::NotFound(FORM_UNAVAILABLE.to_string()))?;
    let email = check_respondent(&public, payload)?;
    if let (true, Some(email)) = (public.form.limit_one_response_per_user, email) {
        if store.has_response_from(form_id, email).await? {
            return Err(SnapformError::BadRequest(ALREADY_SUBMITTED.to_string()));
        }
    }
    let new = check_answers(&public, payload, email)?;
    let response = store.record_response(new).await?;
    tracing::info!(form_id, response_id = %response.id, "Response recorded");
    Ok(SubmitReceipt::accepted(response.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ResponseItem;
    use crate::value::FieldValue;
    use chrono::Utc;
    use snapform_db::{
        Animation, AnimationSpeed, Field, FieldKind, Form, FormLayout, FormSpacing, FormStatus,
    };

    fn field(id: &str, kind: FieldKind, required: bool) -> Field {
        Field {
            id: id.into(),
            form_id: "f".into(),
            kind,
            label: id.into(),
            placeholder: None,
            required,
            options: vec![],
            order: 0,
        }
    }

    fn check_submission(public: &PublicForm, payload: &SubmissionPayload) -> SnapformResult<NewResponse> {
        let email = check_respondent(public, payload)?;
        check_answers(public, payload, email)
    }

    fn public(status: FormStatus, collect_emails: bool) -> PublicForm {
        let now = Utc::now();
        PublicForm {
            form: Form {
                id: "f".into(),
                name: "Survey".into(),
                description: None,
                status,
                collect_emails,
                limit_one_response_per_user: false,
                show_progress_bar: false,
                shuffle_questions: false,
                theme_id: None,
                primary_color: None,
                secondary_color: None,
                background_color: None,
                font_family: None,
                animation: Animation::None,
                animation_speed: AnimationSpeed::Medium,
                layout: FormLayout::Standard,
                spacing: FormSpacing::Normal,
                border_radius: 8,
                response_count: 0,
                user_id: "u".into(),
                created_at: now,
                updated_at: now,
            },
            fields: vec![
                field("name", FieldKind::Text, true),
                field("tags", FieldKind::Checkbox, false),
            ],
            theme: None,
        }
    }

    fn item(id: &str, value: impl Into<FieldValue>) -> ResponseItem {
        ResponseItem {
            field_id: id.into(),
            value: value.into(),
        }
    }

    #[test]
    fn test_accepts_and_joins_lists() {
        let payload = SubmissionPayload {
            email: None,
            responses: vec![
                item("name", "Ada"),
                item("tags", vec!["A".to_string(), "B".to_string()]),
            ],
        };
        let new = check_submission(&public(FormStatus::Active, false), &payload).unwrap();
        assert_eq!(new.form_id, "f");
        assert_eq!(new.email, None);
        assert_eq!(
            new.answers,
            vec![("name".into(), "Ada".into()), ("tags".into(), "A, B".into())]
        );
    }

    #[test]
    fn test_inactive_form_is_not_found() {
        for status in [FormStatus::Draft, FormStatus::Inactive] {
            let err = check_submission(&public(status, false), &SubmissionPayload::default()).unwrap_err();
            assert_eq!(err.status_code(), 404);
            assert_eq!(err.to_string(), FORM_UNAVAILABLE);
        }
    }

    #[test]
    fn test_email_rules() {
        let mut payload = SubmissionPayload {
            email: Some("not-an-email".into()),
            responses: vec![item("name", "Ada")],
        };
        let err = check_submission(&public(FormStatus::Active, false), &payload).unwrap_err();
        assert_eq!(err.to_string(), "Invalid email address");

        payload.email = Some(String::new());
        let err = check_submission(&public(FormStatus::Active, true), &payload).unwrap_err();
        assert_eq!(err.to_string(), "Email is required for this form");

        payload.email = Some("ada@example.com".into());
        let new = check_submission(&public(FormStatus::Active, true), &payload).unwrap();
        assert_eq!(new.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_missing_required_fields_are_listed() {
        let payload = SubmissionPayload {
            email: None,
            responses: vec![item("tags", Vec::<String>::new())],
        };
        match check_submission(&public(FormStatus::Active, false), &payload) {
            Err(SnapformError::MissingRequiredFields { message, field_ids }) => {
                assert_eq!(message, MISSING_REQUIRED);
                assert_eq!(field_ids, vec!["name".to_string()]);
            }
            other => panic!("expected MissingRequiredFields, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let payload = SubmissionPayload {
            email: None,
            responses: vec![item("name", "Ada"), item("ghost", "boo")],
        };
        let err = check_submission(&public(FormStatus::Active, false), &payload).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("ghost"));
    }
}
