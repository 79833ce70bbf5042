//! The data-access interface and its input types.
//!
//! [`FormStore`] is the seam between the HTTP layer and persistence. Every
//! owner-scoped lookup takes the acting user's id and returns `None` when the
//! row does not exist *or* belongs to someone else, so handlers cannot leak the
//! existence of other tenants' forms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use snapform_core::SnapformResult;

use crate::models::{
    Animation, AnimationSpeed, FieldKind, Form, FormBasic, FormLayout, FormSpacing, FormStatus,
    FormSummary, FormWithFields, PublicForm, Response, ResponseRecord, Theme, User,
};

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Creates a page request, flooring both values at 1.
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Number of rows to skip, saturating for out-of-range pages.
    pub const fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// A single page large enough to hold every row.
    pub const fn all() -> Self {
        Self {
            page: 1,
            limit: i64::MAX as usize,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// One page of rows plus the total row count across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOf<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Fields required to register an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
}

/// A field definition as submitted by the designer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewField {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

/// A form definition as submitted by the designer.
///
/// Field `order` is assigned from the position in `fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewForm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: FormStatus,
    #[serde(default)]
    pub collect_emails: bool,
    #[serde(default)]
    pub limit_one_response_per_user: bool,
    #[serde(default)]
    pub show_progress_bar: bool,
    #[serde(default)]
    pub shuffle_questions: bool,
    #[serde(default, alias = "theme")]
    pub theme_id: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default = "default_animation")]
    pub animation: Animation,
    #[serde(default = "default_animation_speed")]
    pub animation_speed: AnimationSpeed,
    #[serde(default = "default_layout")]
    pub layout: FormLayout,
    #[serde(default = "default_spacing")]
    pub spacing: FormSpacing,
    #[serde(default = "default_border_radius")]
    pub border_radius: i64,
    #[serde(default)]
    pub fields: Vec<NewField>,
}

impl NewForm {
    /// A draft with the given name and fields and every option at its default.
    pub fn named(name: impl Into<String>, fields: Vec<NewField>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: FormStatus::Draft,
            collect_emails: false,
            limit_one_response_per_user: false,
            show_progress_bar: false,
            shuffle_questions: false,
            theme_id: None,
            primary_color: None,
            secondary_color: None,
            background_color: None,
            font_family: None,
            animation: default_animation(),
            animation_speed: default_animation_speed(),
            layout: default_layout(),
            spacing: default_spacing(),
            border_radius: default_border_radius(),
            fields,
        }
    }
}

const fn default_animation() -> Animation {
    Animation::None
}

const fn default_animation_speed() -> AnimationSpeed {
    AnimationSpeed::Medium
}

const fn default_layout() -> FormLayout {
    FormLayout::Standard
}

const fn default_spacing() -> FormSpacing {
    FormSpacing::Normal
}

const fn default_border_radius() -> i64 {
    8
}

/// What to do with one entry of [`FormUpdate::fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldAction {
    #[default]
    Create,
    Update,
    Delete,
}

/// One field operation inside a form update.
///
/// `update` and `delete` require `id`; entries without an action create a
/// new field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default, rename = "_action")]
    pub action: FieldAction,
}

/// A partial update of a form. Absent keys are left untouched.
///
/// `themeId: null` clears the theme, which is why `theme_id` is a double option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<FormStatus>,
    pub collect_emails: Option<bool>,
    pub limit_one_response_per_user: Option<bool>,
    pub show_progress_bar: Option<bool>,
    pub shuffle_questions: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub theme_id: Option<Option<String>>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub font_family: Option<String>,
    pub animation: Option<Animation>,
    pub animation_speed: Option<AnimationSpeed>,
    pub layout: Option<FormLayout>,
    pub spacing: Option<FormSpacing>,
    pub border_radius: Option<i64>,
    #[serde(default)]
    pub fields: Vec<FieldChange>,
}

impl FormUpdate {
    /// Copies every present scalar value onto `form`.
    pub fn apply_to(&self, form: &mut Form) {
        if let Some(name) = &self.name {
            form.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            form.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            form.status = status;
        }
        if let Some(v) = self.collect_emails {
            form.collect_emails = v;
        }
        if let Some(v) = self.limit_one_response_per_user {
            form.limit_one_response_per_user = v;
        }
        if let Some(v) = self.show_progress_bar {
            form.show_progress_bar = v;
        }
        if let Some(v) = self.shuffle_questions {
            form.shuffle_questions = v;
        }
        if let Some(theme_id) = &self.theme_id {
            form.theme_id.clone_from(theme_id);
        }
        if let Some(v) = &self.primary_color {
            form.primary_color = Some(v.clone());
        }
        if let Some(v) = &self.secondary_color {
            form.secondary_color = Some(v.clone());
        }
        if let Some(v) = &self.background_color {
            form.background_color = Some(v.clone());
        }
        if let Some(v) = &self.font_family {
            form.font_family = Some(v.clone());
        }
        if let Some(v) = self.animation {
            form.animation = v;
        }
        if let Some(v) = self.animation_speed {
            form.animation_speed = v;
        }
        if let Some(v) = self.layout {
            form.layout = v;
        }
        if let Some(v) = self.spacing {
            form.spacing = v;
        }
        if let Some(v) = self.border_radius {
            form.border_radius = v;
        }
    }
}

/// Distinguishes a missing key (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A submission ready to be written.
///
/// `answers` holds `(field_id, value)` pairs with list values already joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResponse {
    pub form_id: String,
    pub email: Option<String>,
    pub answers: Vec<(String, String)>,
}

/// A theme definition as submitted by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTheme {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    #[serde(default)]
    pub accent_color: Option<String>,
    pub text_color: String,
    pub font_family: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default = "default_theme_animation")]
    pub default_animation: Animation,
    #[serde(default = "default_layout")]
    pub default_layout: FormLayout,
    #[serde(default = "default_spacing")]
    pub default_spacing: FormSpacing,
    #[serde(default = "default_border_radius")]
    pub border_radius: i64,
}

const fn default_theme_animation() -> Animation {
    Animation::Fade
}

/// A partial update of a theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub accent_color: Option<String>,
    pub text_color: Option<String>,
    pub font_family: Option<String>,
    pub is_public: Option<bool>,
    pub default_animation: Option<Animation>,
    pub default_layout: Option<FormLayout>,
    pub default_spacing: Option<FormSpacing>,
    pub border_radius: Option<i64>,
}

impl ThemeUpdate {
    /// Copies every present value onto `theme`.
    pub fn apply_to(&self, theme: &mut Theme) {
        if let Some(v) = &self.name {
            theme.name.clone_from(v);
        }
        if let Some(v) = &self.description {
            theme.description = Some(v.clone());
        }
        if let Some(v) = &self.primary_color {
            theme.primary_color.clone_from(v);
        }
        if let Some(v) = &self.secondary_color {
            theme.secondary_color.clone_from(v);
        }
        if let Some(v) = &self.background_color {
            theme.background_color.clone_from(v);
        }
        if let Some(v) = &self.accent_color {
            theme.accent_color = Some(v.clone());
        }
        if let Some(v) = &self.text_color {
            theme.text_color.clone_from(v);
        }
        if let Some(v) = &self.font_family {
            theme.font_family.clone_from(v);
        }
        if let Some(v) = self.is_public {
            theme.is_public = v;
        }
        if let Some(v) = self.default_animation {
            theme.default_animation = v;
        }
        if let Some(v) = self.default_layout {
            theme.default_layout = v;
        }
        if let Some(v) = self.default_spacing {
            theme.default_spacing = v;
        }
        if let Some(v) = self.border_radius {
            theme.border_radius = v;
        }
    }
}

/// Persistence operations used by the HTTP layer and the CLI.
#[async_trait::async_trait]
pub trait FormStore: Send + Sync {
    // ── Users ────────────────────────────────────────────────────────

    /// Inserts a user. A taken e-mail yields `Conflict`.
    async fn create_user(&self, new: NewUser) -> SnapformResult<User>;

    async fn find_user_by_email(&self, email: &str) -> SnapformResult<Option<User>>;

    async fn get_user(&self, user_id: &str) -> SnapformResult<Option<User>>;

    /// Sets name and e-mail. A taken e-mail yields `Conflict`.
    async fn update_user_profile(
        &self,
        user_id: &str,
        name: Option<String>,
        email: String,
    ) -> SnapformResult<Option<User>>;

    async fn set_password_hash(&self, user_id: &str, password_hash: String) -> SnapformResult<()>;

    // ── Sessions ─────────────────────────────────────────────────────

    async fn create_session(
        &self,
        token_hash: String,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> SnapformResult<()>;

    /// Returns the user of an unexpired session.
    async fn session_user(&self, token_hash: &str, now: DateTime<Utc>) -> SnapformResult<Option<User>>;

    async fn delete_session(&self, token_hash: &str) -> SnapformResult<()>;

    // ── Forms ────────────────────────────────────────────────────────

    /// Inserts a form and its fields in one transaction.
    async fn create_form(&self, user_id: &str, new: NewForm) -> SnapformResult<FormWithFields>;

    /// Lists the user's forms, most recently updated first.
    async fn list_forms(
        &self,
        user_id: &str,
        status: Option<FormStatus>,
        page: PageRequest,
    ) -> SnapformResult<PageOf<FormSummary>>;

    async fn get_form(&self, user_id: &str, form_id: &str) -> SnapformResult<Option<FormWithFields>>;

    /// Applies scalar changes and field operations in one transaction.
    async fn update_form(
        &self,
        user_id: &str,
        form_id: &str,
        update: FormUpdate,
    ) -> SnapformResult<Option<FormWithFields>>;

    /// Deletes a form with its fields and responses. Returns `false` if not found.
    async fn delete_form(&self, user_id: &str, form_id: &str) -> SnapformResult<bool>;

    /// Sets the status to `ACTIVE`.
    async fn publish_form(&self, user_id: &str, form_id: &str) -> SnapformResult<Option<Form>>;

    /// Copies a form and its fields as a new draft named `"<name> (Copy)"`.
    async fn duplicate_form(&self, user_id: &str, form_id: &str) -> SnapformResult<Option<FormWithFields>>;

    /// Loads an `ACTIVE` form with ordered fields and its theme.
    async fn get_active_form(&self, form_id: &str) -> SnapformResult<Option<PublicForm>>;

    /// Loads name, description and theme of a form in any status.
    async fn get_form_basic(&self, form_id: &str) -> SnapformResult<Option<FormBasic>>;

    // ── Responses ────────────────────────────────────────────────────

    /// Records a submission atomically.
    ///
    /// Inside one transaction: the form must be `ACTIVE` (else `NotFound`);
    /// with `limit_one_response_per_user` a second response for the same
    /// e-mail is rejected with `BadRequest`; the response and its answers are
    /// inserted and `response_count` is incremented.
    async fn record_response(&self, new: NewResponse) -> SnapformResult<Response>;

    /// Whether `email` has already responded to the form.
    async fn has_response_from(&self, form_id: &str, email: &str) -> SnapformResult<bool>;

    /// Lists a form's responses newest first, answers keyed by field label.
    async fn list_responses(
        &self,
        form_id: &str,
        page: PageRequest,
    ) -> SnapformResult<PageOf<ResponseRecord>>;

    // ── Themes ───────────────────────────────────────────────────────

    /// Lists the user's themes, plus public ones when `include_public` is set.
    async fn list_themes(
        &self,
        user_id: &str,
        include_public: bool,
        page: PageRequest,
    ) -> SnapformResult<PageOf<Theme>>;

    /// Every public theme followed by the user's private ones.
    async fn available_themes(&self, user_id: &str) -> SnapformResult<Vec<Theme>>;

    async fn create_theme(&self, user_id: &str, new: NewTheme) -> SnapformResult<Theme>;

    async fn get_theme(&self, theme_id: &str) -> SnapformResult<Option<Theme>>;

    async fn update_theme(&self, theme_id: &str, update: ThemeUpdate) -> SnapformResult<Option<Theme>>;

    async fn delete_theme(&self, theme_id: &str) -> SnapformResult<bool>;

    async fn count_forms_using_theme(&self, theme_id: &str) -> SnapformResult<usize>;

    /// Inserts or refreshes the built-in public themes. Returns how many were written.
    async fn seed_system_themes(&self) -> SnapformResult<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(0, 0), PageRequest::new(1, 1));
    }

    #[test]
    fn test_page_request_offset_saturates() {
        assert_eq!(PageRequest::new(usize::MAX, 20).offset(), usize::MAX);
        assert_eq!(PageRequest::new(2, usize::MAX).offset(), usize::MAX);
    }

    #[test]
    fn test_new_form_defaults_from_json() {
        let json = r#"{"name": "Survey", "theme": "system_default",
            "fields": [{"type": "text", "label": "Name", "required": true}]}"#;
        let form: NewForm = serde_json::from_str(json).unwrap();
        assert_eq!(form.status, FormStatus::Draft);
        assert_eq!(form.theme_id.as_deref(), Some("system_default"));
        assert_eq!(form.animation, Animation::None);
        assert_eq!(form.border_radius, 8);
        assert_eq!(form.fields[0].kind, FieldKind::Text);
        assert!(form.fields[0].options.is_empty());
    }

    #[test]
    fn test_field_change_defaults_to_create() {
        let change: FieldChange =
            serde_json::from_str(r#"{"type": "EMAIL", "label": "Mail"}"#).unwrap();
        assert_eq!(change.action, FieldAction::Create);
        let change: FieldChange =
            serde_json::from_str(r#"{"id": "f1", "type": "EMAIL", "label": "", "_action": "delete"}"#)
                .unwrap();
        assert_eq!(change.action, FieldAction::Delete);
    }

    #[test]
    fn test_form_update_theme_null_vs_absent() {
        let absent: FormUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.theme_id, None);
        let cleared: FormUpdate = serde_json::from_str(r#"{"themeId": null}"#).unwrap();
        assert_eq!(cleared.theme_id, Some(None));
        let set: FormUpdate = serde_json::from_str(r#"{"themeId": "t1"}"#).unwrap();
        assert_eq!(set.theme_id, Some(Some("t1".to_string())));
    }

    #[test]
    fn test_form_update_apply_to() {
        let now = Utc::now();
        let mut form = Form {
            id: "f".into(),
            name: "Old".into(),
            description: None,
            status: FormStatus::Draft,
            collect_emails: false,
            limit_one_response_per_user: false,
            show_progress_bar: false,
            shuffle_questions: false,
            theme_id: Some("t1".into()),
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
        };
        let update: FormUpdate = serde_json::from_str(
            r#"{"name": "New", "collectEmails": true, "themeId": null, "layout": "STEP"}"#,
        )
        .unwrap();
        update.apply_to(&mut form);
        assert_eq!(form.name, "New");
        assert!(form.collect_emails);
        assert_eq!(form.theme_id, None);
        assert_eq!(form.layout, FormLayout::Step);
        assert_eq!(form.status, FormStatus::Draft);
    }

    #[test]
    fn test_new_theme_defaults() {
        let json = r##"{"name": "Ocean", "primaryColor": "#00f", "secondaryColor": "#00a",
            "backgroundColor": "#fff", "textColor": "#000", "fontFamily": "Inter"}"##;
        let theme: NewTheme = serde_json::from_str(json).unwrap();
        assert_eq!(theme.default_animation, Animation::Fade);
        assert_eq!(theme.default_spacing, FormSpacing::Normal);
        assert!(!theme.is_public);
    }
}
