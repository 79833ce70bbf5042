//! Grouping of fields into steps, and navigation between them.

use snapform_db::{Field, FormLayout};

use crate::schema::{FormSchema, ValidationReport};
use crate::value::{FieldKey, FormValues};

/// How the form-filling flow presents fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Every field (and the e-mail prompt) on a single screen.
    #[default]
    Standard,
    /// One field per screen.
    Step,
}

impl From<FormLayout> for Layout {
    fn from(layout: FormLayout) -> Self {
        match layout {
            FormLayout::Step => Self::Step,
            FormLayout::Standard | FormLayout::Card | FormLayout::Conversational => Self::Standard,
        }
    }
}

/// One thing shown inside a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepItem {
    /// The synthetic respondent e-mail prompt.
    EmailPrompt,
    Field(Field),
}

impl StepItem {
    /// Order of the synthetic e-mail prompt; it precedes every real field.
    pub const EMAIL_ORDER: i64 = -1;

    pub fn key(&self) -> FieldKey {
        match self {
            Self::EmailPrompt => FieldKey::Email,
            Self::Field(field) => FieldKey::field(&field.id),
        }
    }

    pub const fn order(&self) -> i64 {
        match self {
            Self::EmailPrompt => Self::EMAIL_ORDER,
            Self::Field(field) => field.order,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::EmailPrompt => "Email address",
            Self::Field(field) => &field.label,
        }
    }
}

/// A group of items shown together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Step {
    pub items: Vec<StepItem>,
}

impl Step {
    /// Value keys that belong to this step.
    pub fn keys(&self) -> Vec<FieldKey> {
        self.items.iter().map(StepItem::key).collect()
    }
}

/// The ordered steps of a form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepPlan {
    layout: Layout,
    steps: Vec<Step>,
}

impl StepPlan {
    /// Plans `fields` (already in display order) for `layout`.
    ///
    /// A form without fields has no steps, even when it collects e-mails.
    pub fn build(fields: &[Field], collect_emails: bool, layout: Layout) -> Self {
        if fields.is_empty() {
            return Self {
                layout,
                steps: Vec::new(),
            };
        }
        let email = collect_emails.then_some(StepItem::EmailPrompt);
        let items = email
            .into_iter()
            .chain(fields.iter().cloned().map(StepItem::Field));

        let steps = match layout {
            Layout::Standard => {
                vec![Step {
                    items: items.collect(),
                }]
            }
            Layout::Step => items.map(|item| Step { items: vec![item] }).collect(),
        };
        Self { layout, steps }
    }

    pub const fn layout(&self) -> Layout {
        self.layout
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the last step, or 0 for an empty plan.
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Result of a "next" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    /// Moved to the given step.
    Advanced(usize),
    /// The current step failed validation; the index is unchanged.
    Invalid(ValidationReport),
    /// The last step validated; the whole form should be submitted.
    Submit,
}

/// Zero-based position in a [`StepPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepNavigator {
    current: usize,
}

impl StepNavigator {
    pub const fn new() -> Self {
        Self { current: 0 }
    }

    pub const fn current(&self) -> usize {
        self.current
    }

    /// Brings the index back into `[0, plan.len() - 1]` after a re-plan.
    pub fn clamp_to(&mut self, plan: &StepPlan) {
        self.current = self.current.min(plan.last_index());
    }

    pub const fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self, plan: &StepPlan) -> bool {
        self.current >= plan.last_index()
    }

    /// Validates the keys of the current step, then advances or asks for submission.
    pub fn next(&mut self, plan: &StepPlan, schema: &FormSchema, values: &FormValues) -> NextOutcome {
        let keys = plan.step(self.current).map(Step::keys).unwrap_or_default();
        let report = schema.validate_keys(values, &keys);
        if !report.is_valid() {
            return NextOutcome::Invalid(report);
        }
        if self.is_last(plan) {
            NextOutcome::Submit
        } else {
            self.current += 1;
            NextOutcome::Advanced(self.current)
        }
    }

    /// Moves back one step, stopping at the first.
    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }
}
