//! Persistent data model: users, themes, forms, fields, and responses.
//!
//! All ids are UUID v4 strings except system themes, whose ids are
//! `system_<name>`. JSON keys are camelCase to match the public API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a keyword does not name any variant of an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeyword {
    /// The enum that was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for UnknownKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownKeyword {}

/// Declares a keyword enum stored and serialized as an upper-case string.
///
/// Parsing is case-insensitive and accepts extra aliases per variant.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident : $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the canonical upper-case keyword.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownKeyword;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let upper = s.trim().to_ascii_uppercase();
                match upper.as_str() {
                    $( $text $(| $alias)* => Ok(Self::$variant), )+
                    _ => Err(UnknownKeyword { kind: $label, value: s.to_string() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

keyword_enum! {
    /// Lifecycle state of a form. Responses are accepted only while `Active`.
    FormStatus: "form status" {
        Draft => "DRAFT",
        Active => "ACTIVE",
        Inactive => "INACTIVE",
    }
}

impl Default for FormStatus {
    fn default() -> Self {
        Self::Draft
    }
}

keyword_enum! {
    /// The input type of a form field.
    FieldKind: "field type" {
        Text => "TEXT",
        Email => "EMAIL",
        Number => "NUMBER",
        Textarea => "TEXTAREA",
        Select => "SELECT",
        Radio => "RADIO",
        Checkbox => "CHECKBOX",
        Date => "DATE",
    }
}

impl FieldKind {
    /// Returns `true` for kinds whose answers come from `options`.
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }

    /// Returns `true` for kinds that collect several values at once.
    pub const fn is_multi_value(self) -> bool {
        matches!(self, Self::Checkbox)
    }
}

keyword_enum! {
    /// Entrance animation applied to form content.
    Animation: "animation" {
        None => "NONE",
        Fade => "FADE",
        Slide => "SLIDE",
        Zoom => "ZOOM",
        Bounce => "BOUNCE",
        Scale => "SCALE",
    }
}

keyword_enum! {
    /// Playback speed of the entrance animation.
    AnimationSpeed: "animation speed" {
        Slow => "SLOW",
        Medium => "MEDIUM",
        Fast => "FAST",
    }
}

keyword_enum! {
    /// How fields are laid out when filling a form.
    FormLayout: "layout" {
        Standard => "STANDARD",
        Card => "CARD",
        Conversational => "CONVERSATIONAL",
        /// One field per screen with next/previous navigation.
        Step => "STEP",
    }
}

keyword_enum! {
    /// Vertical spacing between fields.
    FormSpacing: "spacing" {
        Compact => "COMPACT" | "TIGHT",
        Normal => "NORMAL" | "MEDIUM",
        Relaxed => "RELAXED" | "WIDE",
    }
}

impl Animation {
    /// Parses a stored keyword, treating anything unrecognized as `None`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::None)
    }
}

impl AnimationSpeed {
    /// Parses a stored keyword, treating anything unrecognized as `Medium`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Medium)
    }
}

impl FormLayout {
    /// Parses a stored keyword, treating anything unrecognized as `Standard`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Standard)
    }
}

impl FormSpacing {
    /// Parses a stored keyword, treating anything unrecognized as `Normal`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Normal)
    }
}

/// A registered account. The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A reusable visual style bundle.
///
/// System themes have no owner and are always public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub accent_color: Option<String>,
    pub text_color: String,
    pub font_family: String,
    pub is_public: bool,
    pub default_animation: Animation,
    pub default_layout: FormLayout,
    pub default_spacing: FormSpacing,
    pub border_radius: i64,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Theme {
    /// Returns `true` if `user_id` may read this theme.
    pub fn is_visible_to(&self, user_id: Option<&str>) -> bool {
        self.is_public || (user_id.is_some() && self.user_id.as_deref() == user_id)
    }

    /// Returns `true` if `user_id` owns this theme.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

/// A user-authored form and its display/behavior settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: FormStatus,
    pub collect_emails: bool,
    pub limit_one_response_per_user: bool,
    pub show_progress_bar: bool,
    pub shuffle_questions: bool,
    pub theme_id: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub font_family: Option<String>,
    pub animation: Animation,
    pub animation_speed: AnimationSpeed,
    pub layout: FormLayout,
    pub spacing: FormSpacing,
    pub border_radius: i64,
    pub response_count: i64,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// Returns `true` if the form currently accepts responses.
    pub fn accepts_responses(&self) -> bool {
        self.status == FormStatus::Active
    }
}

/// One input definition within a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub form_id: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    pub placeholder: Option<String>,
    pub required: bool,
    pub options: Vec<String>,
    pub order: i64,
}

/// A form together with its fields, sorted by `order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormWithFields {
    #[serde(flatten)]
    pub form: Form,
    pub fields: Vec<Field>,
}

/// A published form as served to respondents: form, ordered fields, and theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicForm {
    #[serde(flatten)]
    pub form: Form,
    pub fields: Vec<Field>,
    pub theme: Option<Theme>,
}

/// The row shape of the dashboard form list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: FormStatus,
    pub response_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Form> for FormSummary {
    fn from(form: &Form) -> Self {
        Self {
            id: form.id.clone(),
            name: form.name.clone(),
            description: form.description.clone(),
            status: form.status,
            response_count: form.response_count,
            created_at: form.created_at,
            updated_at: form.updated_at,
        }
    }
}

/// Name, description, and theme of a form, regardless of status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormBasic {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub theme: Option<Theme>,
}

/// One end-user submission against a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: String,
    pub form_id: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

/// A stored answer to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResponse {
    pub id: String,
    pub field_id: String,
    pub response_id: String,
    pub value: String,
}

/// A stored answer as shown in the response viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub field_id: String,
}

/// Answers keyed by field label, in field order.
pub type AnswerMap = IndexMap<String, AnswerRecord>;

/// A response with its answers keyed by field label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub id: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
    pub fields: AnswerMap,
}
