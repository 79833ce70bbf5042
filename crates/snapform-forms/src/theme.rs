//! Effective visual style of a form, and theme validation.
//!
//! Every color resolves in the same order: the form's theme, then the form's
//! own stored value, then a built-in default. Empty strings count as unset.

use serde::Serialize;
use snapform_core::ValidationError;
use snapform_db::{Animation, AnimationSpeed, Form, FormSpacing, NewTheme, Theme, ThemeUpdate};

use crate::validators::is_hex_color;

pub const DEFAULT_PRIMARY_COLOR: &str = "#3b82f6";
pub const DEFAULT_SECONDARY_COLOR: &str = "#e5e7eb";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#fff";
pub const DEFAULT_TEXT_COLOR: &str = "#000";
pub const DEFAULT_BORDER_COLOR: &str = "#e2e8f0";
pub const DEFAULT_FONT_FAMILY: &str = "inherit";
pub const DEFAULT_BORDER_RADIUS: i64 = 4;
pub const MAX_BORDER_RADIUS: i64 = 32;

/// Form-level values consulted when the theme leaves a property unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleFallbacks {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub font_family: Option<String>,
    pub border_radius: Option<i64>,
    pub spacing: Option<FormSpacing>,
}

impl From<&Form> for StyleFallbacks {
    fn from(form: &Form) -> Self {
        Self {
            primary_color: form.primary_color.clone(),
            secondary_color: form.secondary_color.clone(),
            background_color: form.background_color.clone(),
            font_family: form.font_family.clone(),
            border_radius: Some(form.border_radius),
            spacing: Some(form.spacing),
        }
    }
}

/// The resolved values used to render a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub border_color: String,
    pub font_family: String,
    pub border_radius: i64,
    /// Radius for elements nested inside a rounded container.
    pub nested_radius: i64,
    /// Vertical gap between fields, in pixels.
    pub field_gap_px: u32,
}

fn pick(theme: Option<&str>, form: Option<&str>, default: &str) -> String {
    theme
        .filter(|v| !v.is_empty())
        .or_else(|| form.filter(|v| !v.is_empty()))
        .unwrap_or(default)
        .to_string()
}

/// Radius for nested elements: two pixels tighter, never negative.
pub fn nested_radius(radius: i64) -> i64 {
    (radius - 2).max(0)
}

/// Vertical gap in pixels for a spacing keyword.
pub const fn spacing_gap_px(spacing: FormSpacing) -> u32 {
    match spacing {
        FormSpacing::Compact => 12,
        FormSpacing::Normal => 24,
        FormSpacing::Relaxed => 32,
    }
}

/// Resolves the style of a form from its theme and its own fallbacks.
pub fn resolve_style(theme: Option<&Theme>, form: &StyleFallbacks) -> ResolvedStyle {
    let border_radius = theme
        .map(|t| t.border_radius)
        .or(form.border_radius)
        .unwrap_or(DEFAULT_BORDER_RADIUS);
    let spacing = form.spacing.unwrap_or(FormSpacing::Normal);

    ResolvedStyle {
        primary_color: pick(
            theme.map(|t| t.primary_color.as_str()),
            form.primary_color.as_deref(),
            DEFAULT_PRIMARY_COLOR,
        ),
        secondary_color: pick(
            theme.map(|t| t.secondary_color.as_str()),
            form.secondary_color.as_deref(),
            DEFAULT_SECONDARY_COLOR,
        ),
        background_color: pick(
            theme.map(|t| t.background_color.as_str()),
            form.background_color.as_deref(),
            DEFAULT_BACKGROUND_COLOR,
        ),
        text_color: pick(theme.map(|t| t.text_color.as_str()), None, DEFAULT_TEXT_COLOR),
        border_color: pick(
            theme.and_then(|t| t.accent_color.as_deref()),
            None,
            DEFAULT_BORDER_COLOR,
        ),
        font_family: pick(
            theme.map(|t| t.font_family.as_str()),
            form.font_family.as_deref(),
            DEFAULT_FONT_FAMILY,
        ),
        border_radius,
        nested_radius: nested_radius(border_radius),
        field_gap_px: spacing_gap_px(spacing),
    }
}

// ============================================================
// Transitions
// ============================================================

/// A snapshot of animated properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionFrame {
    pub opacity: f64,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl MotionFrame {
    /// Fully visible, untransformed.
    pub const REST: Self = Self {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };

    const fn hidden() -> Self {
        Self {
            opacity: 0.0,
            ..Self::REST
        }
    }
}

/// How a transition interpolates between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Easing {
    Tween,
    Spring { stiffness: f64, damping: f64 },
}

/// Enter/exit animation for form content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPreset {
    pub animation: Animation,
    pub initial: MotionFrame,
    pub animate: MotionFrame,
    pub exit: MotionFrame,
    pub duration_secs: f64,
    pub easing: Easing,
}

impl TransitionPreset {
    /// Returns `true` if the preset animates nothing.
    pub fn is_noop(&self) -> bool {
        self.animation == Animation::None
    }
}

/// Duration in seconds of an animation at the given speed.
pub const fn speed_secs(speed: AnimationSpeed) -> f64 {
    match speed {
        AnimationSpeed::Slow => 0.8,
        AnimationSpeed::Medium => 0.5,
        AnimationSpeed::Fast => 0.3,
    }
}

/// Builds the preset for an animation and speed.
pub fn transition_preset(animation: Animation, speed: AnimationSpeed) -> TransitionPreset {
    let duration_secs = speed_secs(speed);
    let hidden = MotionFrame::hidden();
    let (initial, exit, easing) = match animation {
        Animation::None => (MotionFrame::REST, MotionFrame::REST, Easing::Tween),
        Animation::Fade => (hidden, hidden, Easing::Tween),
        Animation::Slide => (
            MotionFrame { x: 50.0, ..hidden },
            MotionFrame { x: -50.0, ..hidden },
            Easing::Tween,
        ),
        Animation::Scale => {
            let frame = MotionFrame { scale: 0.9, ..hidden };
            (frame, frame, Easing::Tween)
        }
        Animation::Zoom => {
            let frame = MotionFrame { scale: 0.7, ..hidden };
            (frame, frame, Easing::Tween)
        }
        Animation::Bounce => {
            let frame = MotionFrame { y: 20.0, ..hidden };
            (
                frame,
                frame,
                Easing::Spring {
                    stiffness: 300.0,
                    damping: 15.0,
                },
            )
        }
    };
    TransitionPreset {
        animation,
        initial,
        animate: MotionFrame::REST,
        exit,
        duration_secs,
        easing,
    }
}

/// Builds a preset from raw keywords, case-insensitively.
///
/// Unknown animations yield the no-op preset; unknown speeds mean medium.
pub fn transition_from_keywords(animation: &str, speed: &str) -> TransitionPreset {
    transition_preset(
        Animation::parse_lenient(animation),
        AnimationSpeed::parse_lenient(speed),
    )
}

// ============================================================
// Validation
// ============================================================

const INVALID_HEX: &str = "Invalid hex color";

fn check_name(errors: &mut ValidationError, name: &str) {
    if name.trim().chars().count() < 3 {
        errors.push("name", "Theme name must be at least 3 characters");
    }
}

fn check_color(errors: &mut ValidationError, field: &str, value: &str) {
    if !is_hex_color(value) {
        errors.push(field, INVALID_HEX);
    }
}

fn check_radius(errors: &mut ValidationError, radius: i64) {
    if !(0..=MAX_BORDER_RADIUS).contains(&radius) {
        errors.push(
            "borderRadius",
            format!("Border radius must be between 0 and {MAX_BORDER_RADIUS}"),
        );
    }
}

/// Validates a theme before it is created.
pub fn validate_new_theme(theme: &NewTheme) -> Result<(), ValidationError> {
    let mut errors = ValidationError::default();
    check_name(&mut errors, &theme.name);
    check_color(&mut errors, "primaryColor", &theme.primary_color);
    check_color(&mut errors, "secondaryColor", &theme.secondary_color);
    check_color(&mut errors, "backgroundColor", &theme.background_color);
    check_color(&mut errors, "textColor", &theme.text_color);
    if let Some(accent) = &theme.accent_color {
        check_color(&mut errors, "accentColor", accent);
    }
    check_radius(&mut errors, theme.border_radius);
    errors.into_result()
}

/// Validates the present values of a theme update.
pub fn validate_theme_update(update: &ThemeUpdate) -> Result<(), ValidationError> {
    let mut errors = ValidationError::default();
    if let Some(name) = &update.name {
        check_name(&mut errors, name);
    }
    let colors = [
        ("primaryColor", &update.primary_color),
        ("secondaryColor", &update.secondary_color),
        ("backgroundColor", &update.background_color),
        ("accentColor", &update.accent_color),
        ("textColor", &update.text_color),
    ];
    for (field, value) in colors {
        if let Some(value) = value {
            check_color(&mut errors, field, value);
        }
    }
    if let Some(radius) = update.border_radius {
        check_radius(&mut errors, radius);
    }
    errors.into_result()
}
