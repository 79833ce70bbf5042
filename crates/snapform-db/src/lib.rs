//! # snapform-db
//!
//! The persistent data model and data access for snapform.
//!
//! ## Modules
//!
//! - [`models`] - Users, themes, forms, fields, responses, and their API shapes
//! - [`store`] - The [`FormStore`] trait and its input types
//! - [`sqlite`] - [`SqliteStore`], the `rusqlite` implementation
//! - [`schema`] - Table DDL applied by `migrate`
//! - [`seed`] - Built-in public themes

pub mod models;
pub mod schema;
pub mod seed;
pub mod sqlite;
pub mod store;

pub use models::{
    Animation, AnimationSpeed, AnswerMap, AnswerRecord, Field, FieldKind, FieldResponse, Form,
    FormBasic, FormLayout, FormSpacing, FormStatus, FormSummary, FormWithFields, PublicForm,
    Response, ResponseRecord, Theme, User,
};
pub use sqlite::SqliteStore;
pub use store::{
    FieldAction, FieldChange, FormStore, FormUpdate, NewField, NewForm, NewResponse, NewTheme,
    NewUser, PageOf, PageRequest, ThemeUpdate,
};
