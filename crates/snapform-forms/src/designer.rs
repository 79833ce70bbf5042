//! The form designer's working copy.
//!
//! A [`FormDraft`] is edited in memory and turned into a [`NewForm`] or a
//! [`FormUpdate`] on save. Field `order` always equals the field's position.

use snapform_core::ValidationError;
use snapform_db::{
    FieldAction, FieldChange, FieldKind, FormUpdate, FormWithFields, NewField, NewForm,
};

pub const NAME_TOO_SHORT: &str = "Form name must be at least 3 characters";
pub const LABEL_REQUIRED: &str = "Field label is required";
pub const OPTIONS_REQUIRED: &str = "Choice fields need at least one option";

/// A field being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftField {
    /// Stored id; `None` until the field has been saved.
    pub id: Option<String>,
    pub kind: FieldKind,
    pub label: String,
    pub placeholder: Option<String>,
    pub required: bool,
    pub options: Vec<String>,
    pub order: i64,
}

impl DraftField {
    /// A blank field of `kind`. Choice kinds start with one empty option.
    pub fn blank(kind: FieldKind) -> Self {
        Self {
            id: None,
            kind,
            label: String::new(),
            placeholder: None,
            required: false,
            options: if kind.is_choice() {
                vec![String::new()]
            } else {
                Vec::new()
            },
            order: 0,
        }
    }

    /// Changes the kind, seeding an empty option when switching to a choice kind.
    pub fn set_kind(&mut self, kind: FieldKind) {
        self.kind = kind;
        if kind.is_choice() && self.options.is_empty() {
            self.options.push(String::new());
        }
    }

    pub fn add_option(&mut self) {
        self.options.push(String::new());
    }

    pub fn set_option(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.options.get_mut(index) {
            Some(option) => {
                *option = value.into();
                true
            }
            None => false,
        }
    }

    /// Removes an option unless it is the last one.
    pub fn remove_option(&mut self, index: usize) -> bool {
        if self.options.len() <= 1 || index >= self.options.len() {
            return false;
        }
        self.options.remove(index);
        true
    }

    fn to_new_field(&self) -> NewField {
        NewField {
            kind: self.kind,
            label: self.label.clone(),
            placeholder: self.placeholder.clone(),
            required: self.required,
            options: self.options.clone(),
        }
    }
}

/// Why a draft edit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    OutOfRange(usize),
    /// A form keeps at least one field.
    LastField,
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange(index) => write!(f, "No field at position {index}"),
            Self::LastField => write!(f, "A form must have at least one field"),
        }
    }
}

impl std::error::Error for DraftError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    pub name: String,
    pub description: Option<String>,
    fields: Vec<DraftField>,
    removed: Vec<String>,
}

impl FormDraft {
    /// A new draft with a single blank text field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: vec![DraftField::blank(FieldKind::Text)],
            removed: Vec::new(),
        }
    }

    /// Opens a stored form for editing.
    pub fn from_form(form: &FormWithFields) -> Self {
        let mut fields: Vec<DraftField> = form
            .fields
            .iter()
            .map(|field| DraftField {
                id: Some(field.id.clone()),
                kind: field.kind,
                label: field.label.clone(),
                placeholder: field.placeholder.clone(),
                required: field.required,
                options: field.options.clone(),
                order: field.order,
            })
            .collect();
        fields.sort_by_key(|field| field.order);
        let mut draft = Self {
            name: form.form.name.clone(),
            description: form.form.description.clone(),
            fields,
            removed: Vec::new(),
        };
        draft.renumber();
        draft
    }

    pub fn fields(&self) -> &[DraftField] {
        &self.fields
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut DraftField> {
        self.fields.get_mut(index)
    }

    /// Appends a blank field and returns its position.
    pub fn add_field(&mut self, kind: FieldKind) -> usize {
        self.fields.push(DraftField::blank(kind));
        self.renumber();
        self.fields.len() - 1
    }

    /// Applies `edit` to the field at `index`.
    pub fn update_field<F>(&mut self, index: usize, edit: F) -> Result<(), DraftError>
    where
        F: FnOnce(&mut DraftField),
    {
        let field = self
            .fields
            .get_mut(index)
            .ok_or(DraftError::OutOfRange(index))?;
        edit(field);
        self.renumber();
        Ok(())
    }

    pub fn remove_field(&mut self, index: usize) -> Result<DraftField, DraftError> {
        if index >= self.fields.len() {
            return Err(DraftError::OutOfRange(index));
        }
        if self.fields.len() == 1 {
            return Err(DraftError::LastField);
        }
        let field = self.fields.remove(index);
        if let Some(id) = &field.id {
            self.removed.push(id.clone());
        }
        self.renumber();
        Ok(field)
    }

    /// Moves the field at `from` to position `to`, shifting the ones between.
    pub fn move_field(&mut self, from: usize, to: usize) -> Result<(), DraftError> {
        let len = self.fields.len();
        if from >= len {
            return Err(DraftError::OutOfRange(from));
        }
        if to >= len {
            return Err(DraftError::OutOfRange(to));
        }
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        self.renumber();
        Ok(())
    }

    fn renumber(&mut self) {
        for (order, field) in (0_i64..).zip(self.fields.iter_mut()) {
            field.order = order;
        }
    }

    /// Checks the draft before saving.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_name(&mut errors, &self.name);
        for (index, field) in self.fields.iter().enumerate() {
            check_label(&mut errors, index, &field.label);
            if field.kind.is_choice() && !field.options.iter().any(|o| !o.trim().is_empty()) {
                errors.push(format!("fields[{index}].options"), OPTIONS_REQUIRED);
            }
        }
        errors.into_result()
    }

    /// The create request for this draft.
    pub fn to_new_form(&self) -> NewForm {
        let mut form = NewForm::named(
            self.name.trim(),
            self.fields.iter().map(DraftField::to_new_field).collect(),
        );
        form.description.clone_from(&self.description);
        form
    }

    /// The update request for this draft: saved fields are updated, new ones
    /// created, removed ones deleted.
    pub fn to_update(&self) -> FormUpdate {
        let mut changes: Vec<FieldChange> = self
            .fields
            .iter()
            .map(|field| FieldChange {
                id: field.id.clone(),
                kind: field.kind,
                label: field.label.clone(),
                placeholder: field.placeholder.clone(),
                required: field.required,
                options: field.options.clone(),
                order: Some(field.order),
                action: if field.id.is_some() {
                    FieldAction::Update
                } else {
                    FieldAction::Create
                },
            })
            .collect();
        changes.extend(self.removed.iter().map(|id| FieldChange {
            id: Some(id.clone()),
            kind: FieldKind::Text,
            label: String::new(),
            placeholder: None,
            required: false,
            options: Vec::new(),
            order: None,
            action: FieldAction::Delete,
        }));

        FormUpdate {
            name: Some(self.name.trim().to_string()),
            description: self.description.clone(),
            fields: changes,
            ..FormUpdate::default()
        }
    }
}

fn check_name(errors: &mut ValidationError, name: &str) {
    if name.trim().chars().count() < 3 {
        errors.push("name", NAME_TOO_SHORT);
    }
}

fn check_label(errors: &mut ValidationError, index: usize, label: &str) {
    if label.trim().is_empty() {
        errors.push(format!("fields[{index}].label"), LABEL_REQUIRED);
    }
}

/// Validates a create request as received by the API.
pub fn validate_new_form(form: &NewForm) -> Result<(), ValidationError> {
    let mut errors = ValidationError::default();
    check_name(&mut errors, &form.name);
    for (index, field) in form.fields.iter().enumerate() {
        check_label(&mut errors, index, &field.label);
    }
    errors.into_result()
}

/// Validates an update request; deleted fields need only an id.
pub fn validate_form_update(update: &FormUpdate) -> Result<(), ValidationError> {
    let mut errors = ValidationError::default();
    if let Some(name) = &update.name {
        check_name(&mut errors, name);
    }
    for (index, change) in update.fields.iter().enumerate() {
        if change.action != FieldAction::Delete {
            check_label(&mut errors, index, &change.label);
        }
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(draft: &mut FormDraft, labels: &[&str]) {
        for (i, label) in labels.iter().enumerate() {
            if i > 0 {
                draft.add_field(FieldKind::Text);
            }
            draft.update_field(i, |f| f.label = (*label).to_string()).unwrap();
        }
    }

    fn labels(draft: &FormDraft) -> Vec<&str> {
        draft.fields().iter().map(|f| f.label.as_str()).collect()
    }

    fn orders(draft: &FormDraft) -> Vec<i64> {
        draft.fields().iter().map(|f| f.order).collect()
    }

    #[test]
    fn test_new_draft_has_one_field() {
        let draft = FormDraft::new("Feedback");
        assert_eq!(draft.fields().len(), 1);
        assert_eq!(draft.fields()[0].kind, FieldKind::Text);
    }

    #[test]
    fn test_move_field_renumbers() {
        let mut draft = FormDraft::new("Feedback");
        labelled(&mut draft, &["a", "b", "c", "d"]);
        draft.move_field(0, 2).unwrap();
        assert_eq!(labels(&draft), vec!["b", "c", "a", "d"]);
        assert_eq!(orders(&draft), vec![0, 1, 2, 3]);

        draft.move_field(3, 0).unwrap();
        assert_eq!(labels(&draft), vec!["d", "b", "c", "a"]);
        assert_eq!(draft.move_field(0, 4), Err(DraftError::OutOfRange(4)));
    }

    #[test]
    fn test_remove_keeps_last_field() {
        let mut draft = FormDraft::new("Feedback");
        labelled(&mut draft, &["a", "b"]);
        let removed = draft.remove_field(0).unwrap();
        assert_eq!(removed.label, "a");
        assert_eq!(orders(&draft), vec![0]);
        assert_eq!(draft.remove_field(0), Err(DraftError::LastField));
    }

    #[test]
    fn test_choice_kind_seeds_option() {
        let mut draft = FormDraft::new("Feedback");
        let index = draft.add_field(FieldKind::Radio);
        assert_eq!(draft.fields()[index].options, vec![String::new()]);

        let field = draft.field_mut(0).unwrap();
        field.set_kind(FieldKind::Select);
        assert_eq!(field.options.len(), 1);
        assert!(!field.remove_option(0));
        field.add_option();
        assert!(field.set_option(1, "Blue"));
        assert!(field.remove_option(0));
        assert_eq!(field.options, vec!["Blue".to_string()]);
    }

    #[test]
    fn test_validate_draft() {
        let mut draft = FormDraft::new("Fe");
        draft.add_field(FieldKind::Checkbox);
        let err = draft.validate().unwrap_err();
        assert_eq!(err.field_errors["name"], vec![NAME_TOO_SHORT]);
        assert_eq!(err.field_errors["fields[0].label"], vec![LABEL_REQUIRED]);
        assert_eq!(err.field_errors["fields[1].options"], vec![OPTIONS_REQUIRED]);

        draft.name = "Feedback".into();
        draft.update_field(0, |f| f.label = "Name".into()).unwrap();
        draft
            .update_field(1, |f| {
                f.label = "Colors".into();
                f.set_option(0, "Red");
            })
            .unwrap();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_to_new_form() {
        let mut draft = FormDraft::new("  Feedback ");
        labelled(&mut draft, &["Name", "Age"]);
        draft.update_field(1, |f| f.set_kind(FieldKind::Number)).unwrap();
        let form = draft.to_new_form();
        assert_eq!(form.name, "Feedback");
        assert_eq!(form.fields.len(), 2);
        assert_eq!(form.fields[1].kind, FieldKind::Number);
        assert!(validate_new_form(&form).is_ok());
    }

    #[test]
    fn test_to_update_tracks_removals() {
        let mut draft = FormDraft::new("Feedback");
        labelled(&mut draft, &["a", "b"]);
        draft.fields[0].id = Some("saved-a".into());
        draft.fields[1].id = Some("saved-b".into());
        draft.remove_field(1).unwrap();
        draft.add_field(FieldKind::Email);
        draft.update_field(1, |f| f.label = "Email".into()).unwrap();

        let update = draft.to_update();
        let actions: Vec<(Option<&str>, FieldAction)> = update
            .fields
            .iter()
            .map(|c| (c.id.as_deref(), c.action))
            .collect();
        assert_eq!(
            actions,
            vec![
                (Some("saved-a"), FieldAction::Update),
                (None, FieldAction::Create),
                (Some("saved-b"), FieldAction::Delete),
            ]
        );
        assert_eq!(update.fields[1].order, Some(1));
        assert!(validate_form_update(&update).is_ok());
    }

    #[test]
    fn test_validate_form_update_ignores_deleted_labels() {
        let update = FormUpdate {
            name: Some("ab".into()),
            fields: vec![FieldChange {
                id: None,
                kind: FieldKind::Text,
                label: " ".into(),
                placeholder: None,
                required: false,
                options: vec![],
                order: None,
                action: FieldAction::Create,
            }],
            ..FormUpdate::default()
        };
        let err = validate_form_update(&update).unwrap_err();
        assert_eq!(err.field_errors.len(), 2);
    }
}
