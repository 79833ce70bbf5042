//! Validation schema derived from a form's field definitions.
//!
//! [`FormSchema::build`] maps every field to exactly one [`FieldRule`], plus a
//! rule for the respondent's e-mail when the form collects e-mails. The schema
//! is a pure function of its inputs and is rebuilt whenever the fields or the
//! e-mail setting change.
//!
//! ```
//! use snapform_forms::schema::FormSchema;
//! use snapform_forms::value::{FieldKey, FormValues};
//!
//! let schema = FormSchema::build(&[], true);
//! let report = schema.validate(&FormValues::new());
//! assert!(report.error(&FieldKey::Email).is_some());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use snapform_db::{Field, FieldKind};

use crate::validators::{is_numeric, is_valid_email};
use crate::value::{FieldKey, FieldValue, FormValues};

/// Message shown when the respondent e-mail is missing or malformed.
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// The check applied to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// A string; `required` rejects empty or absent values.
    Text { required: bool },
    /// A string that must look like an e-mail address when non-empty.
    Email { required: bool },
    /// A string that must parse as a number when non-empty.
    Number { required: bool },
    /// A list of selected options. Never required.
    Choices,
}

impl FieldRule {
    /// The rule for a field of the given kind.
    pub const fn for_kind(kind: FieldKind, required: bool) -> Self {
        match kind {
            FieldKind::Email => Self::Email { required },
            FieldKind::Number => Self::Number { required },
            FieldKind::Checkbox => Self::Choices,
            FieldKind::Text
            | FieldKind::Textarea
            | FieldKind::Date
            | FieldKind::Select
            | FieldKind::Radio => Self::Text { required },
        }
    }

    /// The initial value for this rule: `[]` for choices, `""` otherwise.
    pub const fn default_value(self) -> FieldValue {
        match self {
            Self::Choices => FieldValue::empty_list(),
            _ => FieldValue::empty_text(),
        }
    }

    const fn is_required(self) -> bool {
        match self {
            Self::Text { required } | Self::Email { required } | Self::Number { required } => {
                required
            }
            Self::Choices => false,
        }
    }
}

/// Why a value failed its rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldErrorKind {
    Required,
    InvalidEmail,
    InvalidNumber,
    WrongType,
}

/// A failed check with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One entry of a [`FormSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub key: FieldKey,
    pub label: String,
    pub rule: FieldRule,
}

impl SchemaEntry {
    /// Checks `value` against this entry's rule.
    pub fn check(&self, value: Option<&FieldValue>) -> Result<(), FieldError> {
        let error = |kind: FieldErrorKind, message: String| Err(FieldError { kind, message });

        let text = match (self.rule, value) {
            (FieldRule::Choices, None | Some(FieldValue::List(_))) => return Ok(()),
            (FieldRule::Choices, Some(FieldValue::Text(_))) => {
                return error(
                    FieldErrorKind::WrongType,
                    format!("{} must be a list of options", self.label),
                );
            }
            (_, Some(FieldValue::List(_))) => {
                return error(FieldErrorKind::WrongType, format!("{} must be text", self.label));
            }
            (_, Some(FieldValue::Text(s))) => s.as_str(),
            (_, None) => "",
        };

        if text.is_empty() {
            if !self.rule.is_required() {
                return Ok(());
            }
            return match (self.rule, &self.key) {
                (_, FieldKey::Email) => error(FieldErrorKind::Required, EMAIL_MESSAGE.to_string()),
                _ => error(FieldErrorKind::Required, format!("{} is required", self.label)),
            };
        }

        match self.rule {
            FieldRule::Email { .. } if !is_valid_email(text) => {
                let message = match self.key {
                    FieldKey::Email => EMAIL_MESSAGE.to_string(),
                    FieldKey::Field(_) => format!("{} must be a valid email address", self.label),
                };
                error(FieldErrorKind::InvalidEmail, message)
            }
            FieldRule::Number { .. } if !is_numeric(text) => error(
                FieldErrorKind::InvalidNumber,
                format!("{} must be a valid number", self.label),
            ),
            _ => Ok(()),
        }
    }
}

/// Errors of a validation pass, keyed by field key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<FieldKey, FieldError>,
}

impl ValidationReport {
    /// Returns `true` if no key failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, key: &FieldKey) -> Option<&FieldError> {
        self.errors.get(key)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &FieldError)> {
        self.errors.iter()
    }

    /// Keys that failed, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.errors.keys()
    }
}

/// The per-key rules of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSchema {
    entries: Vec<SchemaEntry>,
}

impl FormSchema {
    /// Builds the schema for `fields`, adding the e-mail rule first when
    /// `collect_emails` is set.
    pub fn build(fields: &[Field], collect_emails: bool) -> Self {
        let email = collect_emails.then(|| SchemaEntry {
            key: FieldKey::Email,
            label: "Email".to_string(),
            rule: FieldRule::Email { required: true },
        });
        let entries = email
            .into_iter()
            .chain(fields.iter().map(|field| SchemaEntry {
                key: FieldKey::field(&field.id),
                label: field.label.clone(),
                rule: FieldRule::for_kind(field.kind, field.required),
            }))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    pub fn entry(&self, key: &FieldKey) -> Option<&SchemaEntry> {
        self.entries.iter().find(|entry| &entry.key == key)
    }

    pub fn rule(&self, key: &FieldKey) -> Option<FieldRule> {
        self.entry(key).map(|entry| entry.rule)
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.entries.iter().map(|entry| &entry.key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Initial values: `""` for text-like keys, `[]` for choice lists.
    pub fn default_values(&self) -> FormValues {
        self.entries
            .iter()
            .map(|entry| (entry.key.clone(), entry.rule.default_value()))
            .collect()
    }

    /// Validates every key of the schema.
    pub fn validate(&self, values: &FormValues) -> ValidationReport {
        self.check_entries(values, self.entries.iter())
    }

    /// Validates only `keys`; keys unknown to the schema are ignored.
    pub fn validate_keys(&self, values: &FormValues, keys: &[FieldKey]) -> ValidationReport {
        self.check_entries(
            values,
            self.entries.iter().filter(|entry| keys.contains(&entry.key)),
        )
    }

    fn check_entries<'a>(
        &self,
        values: &FormValues,
        entries: impl Iterator<Item = &'a SchemaEntry>,
    ) -> ValidationReport {
        let errors = entries
            .filter_map(|entry| {
                entry
                    .check(values.get(&entry.key))
                    .err()
                    .map(|error| (entry.key.clone(), error))
            })
            .collect();
        ValidationReport { errors }
    }
}
