//! Built-in public themes.

use crate::models::{Animation, FormLayout, FormSpacing};

/// The static definition of a system theme.
#[derive(Debug, Clone, Copy)]
pub struct SystemTheme {
    pub name: &'static str,
    pub description: &'static str,
    pub primary_color: &'static str,
    pub secondary_color: &'static str,
    pub background_color: &'static str,
    pub accent_color: &'static str,
    pub text_color: &'static str,
    pub font_family: &'static str,
    pub animation: Animation,
    pub layout: FormLayout,
    pub spacing: FormSpacing,
    pub border_radius: i64,
}

impl SystemTheme {
    /// Stable id derived from the name, e.g. `system_dark_mode`.
    pub fn id(&self) -> String {
        let slug: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        format!("system_{slug}")
    }
}

pub const SYSTEM_THEMES: &[SystemTheme] = &[
    SystemTheme {
        name: "Default",
        description: "A clean, professional theme with a blue accent",
        primary_color: "#0070f3",
        secondary_color: "#0070f3",
        background_color: "#ffffff",
        accent_color: "#0070f3",
        text_color: "#333333",
        font_family: "Inter, sans-serif",
        animation: Animation::Fade,
        layout: FormLayout::Standard,
        spacing: FormSpacing::Normal,
        border_radius: 8,
    },
    SystemTheme {
        name: "Dark Mode",
        description: "A sleek dark theme that reduces eye strain",
        primary_color: "#7c3aed",
        secondary_color: "#4c1d95",
        background_color: "#1f2937",
        accent_color: "#8b5cf6",
        text_color: "#f9fafb",
        font_family: "Inter, sans-serif",
        animation: Animation::Fade,
        layout: FormLayout::Standard,
        spacing: FormSpacing::Normal,
        border_radius: 8,
    },
    SystemTheme {
        name: "Vibrant",
        description: "A bold, colorful theme with vibrant accents",
        primary_color: "#f43f5e",
        secondary_color: "#db2777",
        background_color: "#fffbeb",
        accent_color: "#fb923c",
        text_color: "#1e293b",
        font_family: "Poppins, sans-serif",
        animation: Animation::Slide,
        layout: FormLayout::Card,
        spacing: FormSpacing::Normal,
        border_radius: 12,
    },
    SystemTheme {
        name: "Minimal",
        description: "A minimalist theme with subtle design elements",
        primary_color: "#475569",
        secondary_color: "#334155",
        background_color: "#f8fafc",
        accent_color: "#94a3b8",
        text_color: "#1e293b",
        font_family: "DM Sans, sans-serif",
        animation: Animation::None,
        layout: FormLayout::Standard,
        spacing: FormSpacing::Compact,
        border_radius: 4,
    },
    SystemTheme {
        name: "Nature",
        description: "A calming theme inspired by natural elements",
        primary_color: "#059669",
        secondary_color: "#047857",
        background_color: "#f0fdf4",
        accent_color: "#10b981",
        text_color: "#1e293b",
        font_family: "Source Sans Pro, sans-serif",
        animation: Animation::Fade,
        layout: FormLayout::Standard,
        spacing: FormSpacing::Relaxed,
        border_radius: 8,
    },
    SystemTheme {
        name: "Corporate",
        description: "A professional theme ideal for business forms",
        primary_color: "#1e40af",
        secondary_color: "#1e3a8a",
        background_color: "#ffffff",
        accent_color: "#3b82f6",
        text_color: "#0f172a",
        font_family: "Roboto, sans-serif",
        animation: Animation::Fade,
        layout: FormLayout::Standard,
        spacing: FormSpacing::Normal,
        border_radius: 4,
    },
    SystemTheme {
        name: "Playful",
        description: "A fun, engaging theme with playful animations",
        primary_color: "#6d28d9",
        secondary_color: "#5b21b6",
        background_color: "#f5f3ff",
        accent_color: "#a78bfa",
        text_color: "#4b5563",
        font_family: "Nunito, sans-serif",
        animation: Animation::Bounce,
        layout: FormLayout::Conversational,
        spacing: FormSpacing::Normal,
        border_radius: 16,
    },
    SystemTheme {
        name: "Modern",
        description: "A contemporary theme with clean lines and bold accents",
        primary_color: "#06b6d4",
        secondary_color: "#0e7490",
        background_color: "#ecfeff",
        accent_color: "#22d3ee",
        text_color: "#0f172a",
        font_family: "Montserrat, sans-serif",
        animation: Animation::Slide,
        layout: FormLayout::Card,
        spacing: FormSpacing::Normal,
        border_radius: 8,
    },
];
