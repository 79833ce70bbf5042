//! # snapform-forms
//!
//! The form-filling core of snapform, independent of HTTP and storage engines.
//!
//! ## Modules
//!
//! - [`value`] - Value keys and answer values
//! - [`validators`] - E-mail, number, and hex color checks
//! - [`schema`] - Validation schema derived from field definitions
//! - [`steps`] - Step planning and navigation
//! - [`progress`] - Completion percentage
//! - [`gateway`] - The [`FormGateway`] boundary and submission payloads
//! - [`session`] - [`FormSession`], a respondent's pass through a form
//! - [`intake`] - Server-side acceptance of submissions
//! - [`theme`] - Style resolution, transitions, and theme validation
//! - [`designer`] - The designer's editable [`FormDraft`]
//! - [`export`] - CSV export of responses

pub mod designer;
pub mod export;
pub mod gateway;
pub mod intake;
pub mod progress;
pub mod schema;
pub mod session;
pub mod steps;
pub mod theme;
pub mod validators;
pub mod value;

pub use designer::FormDraft;
pub use gateway::{FormGateway, ResponseItem, SubmissionPayload, SubmitReceipt};
pub use schema::{FieldRule, FormSchema, ValidationReport};
pub use session::{FormSession, SessionView, SubmitOutcome};
pub use steps::{Layout, NextOutcome, StepNavigator, StepPlan};
pub use theme::{resolve_style, ResolvedStyle, TransitionPreset};
pub use value::{FieldKey, FieldValue, FormValues};
