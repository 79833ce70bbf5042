//! A respondent's pass through one published form.
//!
//! [`FormSession`] owns everything the filling screen needs: display-ordered
//! fields, the derived [`FormSchema`] and [`StepPlan`], the current step, and
//! the values typed so far. Schema and plan are recomputed whenever the
//! inputs they derive from change.

use rand::seq::SliceRandom;
use rand::Rng;
use snapform_core::SnapformResult;
use snapform_db::{Field, Form, PublicForm, Theme};

use crate::gateway::{FormGateway, ResponseItem, SubmissionPayload, SubmitReceipt};
use crate::progress;
use crate::schema::{FormSchema, ValidationReport};
use crate::steps::{Layout, NextOutcome, StepNavigator, StepPlan};
use crate::theme::{resolve_style, transition_preset, ResolvedStyle, StyleFallbacks, TransitionPreset};
use crate::value::{FieldKey, FieldValue, FormValues};

/// Shown when a submission fails for a reason the server did not explain.
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Failed to submit the form. Please try again.";

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionView {
    #[default]
    Filling,
    /// The form was submitted; only the thank-you screen remains.
    Confirmation,
}

/// Result of [`FormSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(SubmitReceipt),
    /// Local validation failed; nothing was sent.
    Invalid(ValidationReport),
    /// The gateway refused or failed; the message is user-facing.
    Failed(String),
}

/// Result of [`FormSession::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    Invalid(ValidationReport),
    Finished(SubmitOutcome),
}

#[derive(Debug, Clone)]
pub struct FormSession {
    form: Form,
    fields: Vec<Field>,
    theme: Option<Theme>,
    collect_emails: bool,
    layout: Layout,
    schema: FormSchema,
    plan: StepPlan,
    navigator: StepNavigator,
    values: FormValues,
    view: SessionView,
    last_error: Option<String>,
}

impl FormSession {
    /// Starts a session for `public`.
    ///
    /// Fields are shuffled once with `rng` when the form asks for it, and
    /// otherwise sorted by their `order`.
    pub fn new<R: Rng + ?Sized>(public: PublicForm, rng: &mut R) -> Self {
        let PublicForm { form, mut fields, theme } = public;
        if form.shuffle_questions {
            fields.shuffle(rng);
        } else {
            fields.sort_by_key(|field| field.order);
        }

        let collect_emails = form.collect_emails;
        let layout = Layout::from(form.layout);
        let schema = FormSchema::build(&fields, collect_emails);
        let plan = StepPlan::build(&fields, collect_emails, layout);
        let values = schema.default_values();

        Self {
            form,
            fields,
            theme,
            collect_emails,
            layout,
            schema,
            plan,
            navigator: StepNavigator::new(),
            values,
            view: SessionView::Filling,
            last_error: None,
        }
    }

    /// Fetches `form_id` through `gateway` and starts a session for it.
    pub async fn load<G, R>(gateway: &G, form_id: &str, rng: &mut R) -> SnapformResult<Self>
    where
        G: FormGateway + ?Sized,
        R: Rng + ?Sized,
    {
        let public = gateway.fetch_form(form_id).await?;
        tracing::debug!(form_id, fields = public.fields.len(), "Loaded form");
        Ok(Self::new(public, rng))
    }

    pub const fn form(&self) -> &Form {
        &self.form
    }

    /// Fields in display order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub const fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    pub const fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub const fn plan(&self) -> &StepPlan {
        &self.plan
    }

    pub const fn layout(&self) -> Layout {
        self.layout
    }

    pub const fn collects_emails(&self) -> bool {
        self.collect_emails
    }

    pub const fn current_step(&self) -> usize {
        self.navigator.current()
    }

    pub const fn view(&self) -> SessionView {
        self.view
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, key: &FieldKey) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn set_value(&mut self, key: FieldKey, value: impl Into<FieldValue>) {
        self.values.insert(key, value.into());
    }

    /// Replaces the fields, keeping values whose key still exists.
    pub fn set_fields(&mut self, fields: Vec<Field>) {
        self.fields = fields;
        self.rederive();
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.rederive();
    }

    pub fn set_collect_emails(&mut self, collect_emails: bool) {
        self.collect_emails = collect_emails;
        self.rederive();
    }

    fn rederive(&mut self) {
        self.schema = FormSchema::build(&self.fields, self.collect_emails);
        self.plan = StepPlan::build(&self.fields, self.collect_emails, self.layout);
        self.navigator.clamp_to(&self.plan);

        let mut values = self.schema.default_values();
        for (key, value) in values.iter_mut() {
            if let Some(previous) = self.values.remove(key) {
                *value = previous;
            }
        }
        self.values = values;
    }

    /// Returns `true` if the form shows a progress bar.
    pub const fn shows_progress(&self) -> bool {
        self.form.show_progress_bar
    }

    /// Completion percentage in `0..=100`.
    pub fn progress(&self) -> f64 {
        progress::progress(&self.plan, self.navigator.current(), &self.schema, &self.values)
    }

    /// Validates every key of the form.
    pub fn validate(&self) -> ValidationReport {
        self.schema.validate(&self.values)
    }

    /// Validates the current step and moves forward if it passes.
    pub fn next(&mut self) -> NextOutcome {
        self.navigator.next(&self.plan, &self.schema, &self.values)
    }

    /// Like [`next`](Self::next), but submits once the last step validates.
    pub async fn advance<G: FormGateway + ?Sized>(&mut self, gateway: &G) -> Advance {
        match self.next() {
            NextOutcome::Advanced(index) => Advance::Moved(index),
            NextOutcome::Invalid(report) => Advance::Invalid(report),
            NextOutcome::Submit => Advance::Finished(self.submit(gateway).await),
        }
    }

    pub fn previous(&mut self) {
        self.navigator.previous();
    }

    /// The body sent on submission.
    ///
    /// The e-mail travels outside `responses` and only when collected. Every
    /// field is answered in display order with its value as entered.
    pub fn payload(&self) -> SubmissionPayload {
        let email = if self.collect_emails {
            Some(match self.values.get(&FieldKey::Email) {
                Some(FieldValue::Text(email)) => email.clone(),
                Some(other) => other.to_stored(),
                None => String::new(),
            })
        } else {
            None
        };

        let responses = self
            .fields
            .iter()
            .map(|field| {
                let key = FieldKey::field(&field.id);
                let value = self.values.get(&key).cloned().unwrap_or_else(|| {
                    self.schema
                        .rule(&key)
                        .map_or_else(FieldValue::empty_text, |rule| rule.default_value())
                });
                ResponseItem {
                    field_id: field.id.clone(),
                    value,
                }
            })
            .collect();

        SubmissionPayload { email, responses }
    }

    /// Validates the whole form and hands it to `gateway`.
    ///
    /// Values and step position survive a failed attempt.
    pub async fn submit<G: FormGateway + ?Sized>(&mut self, gateway: &G) -> SubmitOutcome {
        let report = self.validate();
        if !report.is_valid() {
            return SubmitOutcome::Invalid(report);
        }

        match gateway.submit(&self.form.id, &self.payload()).await {
            Ok(receipt) => {
                tracing::info!(form_id = %self.form.id, response_id = %receipt.response_id, "Form submitted");
                self.view = SessionView::Confirmation;
                self.last_error = None;
                SubmitOutcome::Submitted(receipt)
            }
            Err(err) => {
                tracing::warn!(form_id = %self.form.id, error = %err, "Submission failed");
                let message = if err.is_server_error() {
                    SUBMIT_FALLBACK_MESSAGE.to_string()
                } else {
                    err.to_string()
                };
                self.last_error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Colors, radius and spacing to render with.
    pub fn style(&self) -> ResolvedStyle {
        resolve_style(self.theme.as_ref(), &StyleFallbacks::from(&self.form))
    }

    /// Enter/exit animation between steps.
    pub fn transition(&self) -> TransitionPreset {
        transition_preset(self.form.animation, self.form.animation_speed)
    }
}
