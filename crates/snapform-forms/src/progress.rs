//! Completion percentage shown in the progress bar.

use crate::schema::FormSchema;
use crate::steps::{Layout, StepPlan};
use crate::value::FormValues;

/// Percentage (0..=100) of schema keys that hold a non-empty value.
pub fn filled_percentage(schema: &FormSchema, values: &FormValues) -> f64 {
    let total = schema.len();
    if total == 0 {
        return 0.0;
    }
    let filled = schema
        .keys()
        .filter(|key| values.get(*key).is_some_and(|v| v.is_filled()))
        .count();
    ratio(filled, total)
}

/// Percentage reached when standing on step `current` of `total`.
pub fn step_percentage(current: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ratio(current + 1, total)
}

/// Progress for the plan's layout: filled keys for standard, position for step.
pub fn progress(plan: &StepPlan, current: usize, schema: &FormSchema, values: &FormValues) -> f64 {
    match plan.layout() {
        Layout::Standard => filled_percentage(schema, values),
        Layout::Step => step_percentage(current, plan.len()),
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, total: usize) -> f64 {
    part as f64 / total as f64 * 100.0
}
