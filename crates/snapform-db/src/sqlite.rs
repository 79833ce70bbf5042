//! SQLite implementation of [`FormStore`] using `rusqlite`.
//!
//! The connection lives behind an async mutex and every call runs inside
//! `tokio::task::spawn_blocking`, so the runtime never blocks on disk I/O.
//!
//! Features:
//! - WAL journal mode and enforced foreign keys
//! - In-memory databases via the `:memory:` path (used throughout the tests)
//! - Multi-statement writes (form create/update/duplicate, response recording)
//!   wrapped in a single transaction

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use snapform_core::{SnapformError, SnapformResult};
use tokio::sync::Mutex;

use crate::models::{
    Animation, AnimationSpeed, AnswerMap, AnswerRecord, Field, FieldKind, Form, FormBasic, FormLayout,
    FormSpacing, FormStatus, FormSummary, FormWithFields, PublicForm, Response, ResponseRecord,
    Theme, User,
};
use crate::schema::SCHEMA;
use crate::seed::SYSTEM_THEMES;
use crate::store::{
    FieldAction, FormStore, FormUpdate, NewForm, NewResponse, NewTheme, NewUser, PageOf,
    PageRequest, ThemeUpdate,
};

const USER_COLUMNS: &str =
    "users.id, users.name, users.email, users.password_hash, users.created_at, users.updated_at";

const FORM_COLUMNS: &str = "id, name, description, status, collect_emails, \
    limit_one_response_per_user, show_progress_bar, shuffle_questions, theme_id, primary_color, \
    secondary_color, background_color, font_family, animation, animation_speed, layout, spacing, \
    border_radius, response_count, user_id, created_at, updated_at";

const FIELD_COLUMNS: &str = "id, form_id, kind, label, placeholder, required, options, sort_order";

const THEME_COLUMNS: &str = "id, name, description, primary_color, secondary_color, \
    background_color, accent_color, text_color, font_family, is_public, default_animation, \
    default_layout, default_spacing, border_radius, user_id, created_at, updated_at";

/// A SQLite-backed [`FormStore`].
pub struct SqliteStore {
    /// The path to the database file (or ":memory:").
    path: PathBuf,
    /// The connection, guarded by an async mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens a database at the given path; `:memory:` creates an in-memory one.
    ///
    /// Tables are not created here; call [`SqliteStore::migrate`].
    pub fn open(path: impl Into<PathBuf>) -> SnapformResult<Self> {
        let path = path.into();
        let conn = if path.to_str() == Some(":memory:") {
            Connection::open_in_memory()
        } else {
            Connection::open(&path)
        }
        .map_err(|e| SnapformError::DatabaseError(format!("SQLite open failed: {e}")))?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| SnapformError::DatabaseError(format!("Failed to set pragmas: {e}")))?;

        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory database.
    pub fn memory() -> SnapformResult<Self> {
        Self::open(":memory:")
    }

    /// Returns the database file path.
    pub const fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Creates any missing tables and indexes.
    pub async fn migrate(&self) -> SnapformResult<()> {
        self.run(|conn| {
            for stmt in SCHEMA {
                conn.execute_batch(stmt).map_err(db_error)?;
            }
            Ok(())
        })
        .await?;
        tracing::debug!(path = %self.path.display(), "schema is up to date");
        Ok(())
    }

    /// Runs `f` against the connection on the blocking thread pool.
    async fn run<T, F>(&self, f: F) -> SnapformResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> SnapformResult<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            f(&mut conn)
        })
        .await
        .map_err(|e| SnapformError::DatabaseError(format!("Task join error: {e}")))?
    }
}

// ============================================================
// Row mapping
// ============================================================

fn db_error(e: rusqlite::Error) -> SnapformError {
    match e {
        rusqlite::Error::SqliteFailure(err, msg)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            SnapformError::IntegrityError(msg.unwrap_or_else(|| err.to_string()))
        }
        other => SnapformError::DatabaseError(format!("{other}")),
    }
}

fn is_constraint_violation(e: &SnapformError) -> bool {
    matches!(e, SnapformError::IntegrityError(_))
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn get_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn get_keyword<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_error(idx, e))
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: get_ts(row, 4)?,
        updated_at: get_ts(row, 5)?,
    })
}

fn form_from_row(row: &Row<'_>) -> rusqlite::Result<Form> {
    Ok(Form {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        status: get_keyword::<FormStatus>(row, 3)?,
        collect_emails: row.get(4)?,
        limit_one_response_per_user: row.get(5)?,
        show_progress_bar: row.get(6)?,
        shuffle_questions: row.get(7)?,
        theme_id: row.get(8)?,
        primary_color: row.get(9)?,
        secondary_color: row.get(10)?,
        background_color: row.get(11)?,
        font_family: row.get(12)?,
        animation: Animation::parse_lenient(&row.get::<_, String>(13)?),
        animation_speed: AnimationSpeed::parse_lenient(&row.get::<_, String>(14)?),
        layout: FormLayout::parse_lenient(&row.get::<_, String>(15)?),
        spacing: FormSpacing::parse_lenient(&row.get::<_, String>(16)?),
        border_radius: row.get(17)?,
        response_count: row.get(18)?,
        user_id: row.get(19)?,
        created_at: get_ts(row, 20)?,
        updated_at: get_ts(row, 21)?,
    })
}

fn field_from_row(row: &Row<'_>) -> rusqlite::Result<Field> {
    let options: String = row.get(6)?;
    Ok(Field {
        id: row.get(0)?,
        form_id: row.get(1)?,
        kind: get_keyword::<FieldKind>(row, 2)?,
        label: row.get(3)?,
        placeholder: row.get(4)?,
        required: row.get(5)?,
        options: serde_json::from_str(&options).map_err(|e| conversion_error(6, e))?,
        order: row.get(7)?,
    })
}

fn theme_from_row(row: &Row<'_>) -> rusqlite::Result<Theme> {
    Ok(Theme {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        primary_color: row.get(3)?,
        secondary_color: row.get(4)?,
        background_color: row.get(5)?,
        accent_color: row.get(6)?,
        text_color: row.get(7)?,
        font_family: row.get(8)?,
        is_public: row.get(9)?,
        default_animation: Animation::parse_lenient(&row.get::<_, String>(10)?),
        default_layout: FormLayout::parse_lenient(&row.get::<_, String>(11)?),
        default_spacing: FormSpacing::parse_lenient(&row.get::<_, String>(12)?),
        border_radius: row.get(13)?,
        user_id: row.get(14)?,
        created_at: get_ts(row, 15)?,
        updated_at: get_ts(row, 16)?,
    })
}

fn sql_limit(page: PageRequest) -> (i64, i64) {
    (
        i64::try_from(page.limit).unwrap_or(i64::MAX),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}

fn count(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> SnapformResult<usize> {
    let n: i64 = conn.query_row(sql, params, |row| row.get(0)).map_err(db_error)?;
    Ok(usize::try_from(n).unwrap_or(0))
}

// ============================================================
// Shared statements
// ============================================================

fn fetch_user(conn: &Connection, user_id: &str) -> SnapformResult<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE users.id = ?1"),
        params![user_id],
        user_from_row,
    )
    .optional()
    .map_err(db_error)
}

fn fetch_form(conn: &Connection, form_id: &str, owner: Option<&str>) -> SnapformResult<Option<Form>> {
    conn.query_row(
        &format!(
            "SELECT {FORM_COLUMNS} FROM forms WHERE id = ?1 AND (?2 IS NULL OR user_id = ?2)"
        ),
        params![form_id, owner],
        form_from_row,
    )
    .optional()
    .map_err(db_error)
}

fn fetch_fields(conn: &Connection, form_id: &str) -> SnapformResult<Vec<Field>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {FIELD_COLUMNS} FROM fields WHERE form_id = ?1 ORDER BY sort_order, rowid"
        ))
        .map_err(db_error)?;
    let rows = stmt
        .query_map(params![form_id], field_from_row)
        .map_err(db_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(db_error)
}

fn fetch_theme(conn: &Connection, theme_id: &str) -> SnapformResult<Option<Theme>> {
    conn.query_row(
        &format!("SELECT {THEME_COLUMNS} FROM themes WHERE id = ?1"),
        params![theme_id],
        theme_from_row,
    )
    .optional()
    .map_err(db_error)
}

fn fetch_form_theme(conn: &Connection, form: &Form) -> SnapformResult<Option<Theme>> {
    match &form.theme_id {
        Some(theme_id) => fetch_theme(conn, theme_id),
        None => Ok(None),
    }
}

fn query_themes(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> SnapformResult<Vec<Theme>> {
    let mut stmt = conn.prepare(sql).map_err(db_error)?;
    let rows = stmt.query_map(params, theme_from_row).map_err(db_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(db_error)
}

fn with_fields(conn: &Connection, form: Form) -> SnapformResult<FormWithFields> {
    let fields = fetch_fields(conn, &form.id)?;
    Ok(FormWithFields { form, fields })
}

fn options_json(options: &[String]) -> SnapformResult<String> {
    Ok(serde_json::to_string(options)?)
}

fn insert_form(conn: &Connection, form: &Form) -> SnapformResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO forms ({FORM_COLUMNS}) VALUES \
             (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, \
              ?19, ?20, ?21, ?22)"
        ),
        params![
            form.id,
            form.name,
            form.description,
            form.status.as_str(),
            form.collect_emails,
            form.limit_one_response_per_user,
            form.show_progress_bar,
            form.shuffle_questions,
            form.theme_id,
            form.primary_color,
            form.secondary_color,
            form.background_color,
            form.font_family,
            form.animation.as_str(),
            form.animation_speed.as_str(),
            form.layout.as_str(),
            form.spacing.as_str(),
            form.border_radius,
            form.response_count,
            form.user_id,
            format_ts(&form.created_at),
            format_ts(&form.updated_at),
        ],
    )
    .map_err(db_error)?;
    Ok(())
}

fn save_form(conn: &Connection, form: &Form) -> SnapformResult<()> {
    conn.execute(
        "UPDATE forms SET name = ?2, description = ?3, status = ?4, collect_emails = ?5, \
         limit_one_response_per_user = ?6, show_progress_bar = ?7, shuffle_questions = ?8, \
         theme_id = ?9, primary_color = ?10, secondary_color = ?11, background_color = ?12, \
         font_family = ?13, animation = ?14, animation_speed = ?15, layout = ?16, spacing = ?17, \
         border_radius = ?18, updated_at = ?19 WHERE id = ?1",
        params![
            form.id,
            form.name,
            form.description,
            form.status.as_str(),
            form.collect_emails,
            form.limit_one_response_per_user,
            form.show_progress_bar,
            form.shuffle_questions,
            form.theme_id,
            form.primary_color,
            form.secondary_color,
            form.background_color,
            form.font_family,
            form.animation.as_str(),
            form.animation_speed.as_str(),
            form.layout.as_str(),
            form.spacing.as_str(),
            form.border_radius,
            format_ts(&form.updated_at),
        ],
    )
    .map_err(db_error)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn insert_field(
    conn: &Connection,
    form_id: &str,
    kind: FieldKind,
    label: &str,
    placeholder: Option<&str>,
    required: bool,
    options: &[String],
    order: i64,
) -> SnapformResult<()> {
    conn.execute(
        &format!("INSERT INTO fields ({FIELD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
        params![
            uuid::Uuid::new_v4().to_string(),
            form_id,
            kind.as_str(),
            label,
            placeholder,
            required,
            options_json(options)?,
            order,
        ],
    )
    .map_err(db_error)?;
    Ok(())
}

fn next_field_order(conn: &Connection, form_id: &str) -> SnapformResult<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM fields WHERE form_id = ?1",
        params![form_id],
        |row| row.get(0),
    )
    .map_err(db_error)
}

fn apply_field_changes(conn: &Connection, form_id: &str, update: &FormUpdate) -> SnapformResult<()> {
    for change in &update.fields {
        match (change.action, change.id.as_deref()) {
            (FieldAction::Delete, Some(field_id)) => {
                conn.execute(
                    "DELETE FROM fields WHERE id = ?1 AND form_id = ?2",
                    params![field_id, form_id],
                )
                .map_err(db_error)?;
            }
            (FieldAction::Update, Some(field_id)) => {
                conn.execute(
                    "UPDATE fields SET kind = ?3, label = ?4, placeholder = ?5, required = ?6, \
                     options = ?7, sort_order = COALESCE(?8, sort_order) \
                     WHERE id = ?1 AND form_id = ?2",
                    params![
                        field_id,
                        form_id,
                        change.kind.as_str(),
                        change.label,
                        change.placeholder,
                        change.required,
                        options_json(&change.options)?,
                        change.order,
                    ],
                )
                .map_err(db_error)?;
            }
            (FieldAction::Create, _) => {
                let order = match change.order {
                    Some(order) => order,
                    None => next_field_order(conn, form_id)?,
                };
                insert_field(
                    conn,
                    form_id,
                    change.kind,
                    &change.label,
                    change.placeholder.as_deref(),
                    change.required,
                    &change.options,
                    order,
                )?;
            }
            (action, None) => {
                tracing::warn!(?action, form_id, "ignoring field change without an id");
            }
        }
    }
    Ok(())
}

fn insert_theme(conn: &Connection, theme: &Theme) -> SnapformResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO themes ({THEME_COLUMNS}) VALUES \
             (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
        ),
        params![
            theme.id,
            theme.name,
            theme.description,
            theme.primary_color,
            theme.secondary_color,
            theme.background_color,
            theme.accent_color,
            theme.text_color,
            theme.font_family,
            theme.is_public,
            theme.default_animation.as_str(),
            theme.default_layout.as_str(),
            theme.default_spacing.as_str(),
            theme.border_radius,
            theme.user_id,
            format_ts(&theme.created_at),
            format_ts(&theme.updated_at),
        ],
    )
    .map_err(db_error)?;
    Ok(())
}

fn response_exists(conn: &Connection, form_id: &str, email: &str) -> SnapformResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM responses WHERE form_id = ?1 AND email = ?2)",
        params![form_id, email],
        |row| row.get(0),
    )
    .map_err(db_error)
}

fn answers_of(conn: &Connection, response_id: &str) -> SnapformResult<AnswerMap> {
    let mut stmt = conn
        .prepare(
            "SELECT f.label, fr.value, f.kind, f.id FROM field_responses fr \
             JOIN fields f ON f.id = fr.field_id \
             WHERE fr.response_id = ?1 ORDER BY f.sort_order, fr.rowid",
        )
        .map_err(db_error)?;
    let rows = stmt
        .query_map(params![response_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                AnswerRecord {
                    value: row.get(1)?,
                    kind: get_keyword::<FieldKind>(row, 2)?,
                    field_id: row.get(3)?,
                },
            ))
        })
        .map_err(db_error)?;
    rows.collect::<Result<AnswerMap, _>>().map_err(db_error)
}

// ============================================================
// FormStore
// ============================================================

#[async_trait::async_trait]
impl FormStore for SqliteStore {
    async fn create_user(&self, new: NewUser) -> SnapformResult<User> {
        self.run(move |conn| {
            let ts = now();
            let user = User {
                id: uuid::Uuid::new_v4().to_string(),
                name: new.name,
                email: new.email,
                password_hash: new.password_hash,
                created_at: ts,
                updated_at: ts,
            };
            conn.execute(
                "INSERT INTO users (id, name, email, password_hash, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.id,
                    user.name,
                    user.email,
                    user.password_hash,
                    format_ts(&user.created_at),
                    format_ts(&user.updated_at),
                ],
            )
            .map_err(db_error)
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    SnapformError::Conflict("User with this email already exists".to_string())
                } else {
                    e
                }
            })?;
            Ok(user)
        })
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> SnapformResult<Option<User>> {
        let email = email.to_string();
        self.run(move |conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE users.email = ?1"),
                params![email],
                user_from_row,
            )
            .optional()
            .map_err(db_error)
        })
        .await
    }

    async fn get_user(&self, user_id: &str) -> SnapformResult<Option<User>> {
        let user_id = user_id.to_string();
        self.run(move |conn| fetch_user(conn, &user_id)).await
    }

    async fn update_user_profile(
        &self,
        user_id: &str,
        name: Option<String>,
        email: String,
    ) -> SnapformResult<Option<User>> {
        let user_id = user_id.to_string();
        self.run(move |conn| {
            let taken: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1 AND id <> ?2)",
                    params![email, user_id],
                    |row| row.get(0),
                )
                .map_err(db_error)?;
            if taken {
                return Err(SnapformError::Conflict("Email already in use".to_string()));
            }
            let changed = conn
                .execute(
                    "UPDATE users SET name = ?2, email = ?3, updated_at = ?4 WHERE id = ?1",
                    params![user_id, name, email, format_ts(&now())],
                )
                .map_err(db_error)?;
            if changed == 0 {
                return Ok(None);
            }
            fetch_user(conn, &user_id)
        })
        .await
    }

    async fn set_password_hash(&self, user_id: &str, password_hash: String) -> SnapformResult<()> {
        let user_id = user_id.to_string();
        self.run(move |conn| {
            conn.execute(
                "UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE id = ?1",
                params![user_id, password_hash, format_ts(&now())],
            )
            .map_err(db_error)?;
            Ok(())
        })
        .await
    }

    async fn create_session(
        &self,
        token_hash: String,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> SnapformResult<()> {
        let user_id = user_id.to_string();
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (?1, ?2, ?3)",
                params![token_hash, user_id, format_ts(&expires_at)],
            )
            .map_err(db_error)?;
            Ok(())
        })
        .await
    }

    async fn session_user(&self, token_hash: &str, now: DateTime<Utc>) -> SnapformResult<Option<User>> {
        let token_hash = token_hash.to_string();
        self.run(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {USER_COLUMNS} FROM sessions \
                     JOIN users ON users.id = sessions.user_id \
                     WHERE sessions.token_hash = ?1 AND sessions.expires_at > ?2"
                ),
                params![token_hash, format_ts(&now)],
                user_from_row,
            )
            .optional()
            .map_err(db_error)
        })
        .await
    }

    async fn delete_session(&self, token_hash: &str) -> SnapformResult<()> {
        let token_hash = token_hash.to_string();
        self.run(move |conn| {
            conn.execute("DELETE FROM sessions WHERE token_hash = ?1", params![token_hash])
                .map_err(db_error)?;
            Ok(())
        })
        .await
    }

    async fn create_form(&self, user_id: &str, new: NewForm) -> SnapformResult<FormWithFields> {
        let user_id = user_id.to_string();
        self.run(move |conn| {
            let ts = now();
            let form = Form {
                id: uuid::Uuid::new_v4().to_string(),
                name: new.name,
                description: new.description,
                status: new.status,
                collect_emails: new.collect_emails,
                limit_one_response_per_user: new.limit_one_response_per_user,
                show_progress_bar: new.show_progress_bar,
                shuffle_questions: new.shuffle_questions,
                theme_id: new.theme_id,
                primary_color: new.primary_color,
                secondary_color: new.secondary_color,
                background_color: new.background_color,
                font_family: new.font_family,
                animation: new.animation,
                animation_speed: new.animation_speed,
                layout: new.layout,
                spacing: new.spacing,
                border_radius: new.border_radius,
                response_count: 0,
                user_id,
                created_at: ts,
                updated_at: ts,
            };

            let tx = conn.transaction().map_err(db_error)?;
            insert_form(&tx, &form)?;
            for (order, field) in (0_i64..).zip(&new.fields) {
                insert_field(
                    &tx,
                    &form.id,
                    field.kind,
                    &field.label,
                    field.placeholder.as_deref(),
                    field.required,
                    &field.options,
                    order,
                )?;
            }
            tx.commit().map_err(db_error)?;

            tracing::info!(form_id = %form.id, fields = new.fields.len(), "form created");
            with_fields(conn, form)
        })
        .await
    }

    async fn list_forms(
        &self,
        user_id: &str,
        status: Option<FormStatus>,
        page: PageRequest,
    ) -> SnapformResult<PageOf<FormSummary>> {
        let user_id = user_id.to_string();
        self.run(move |conn| {
            let status = status.map(FormStatus::as_str);
            let total = count(
                conn,
                "SELECT COUNT(*) FROM forms WHERE user_id = ?1 AND (?2 IS NULL OR status = ?2)",
                params![user_id, status],
            )?;
            let (limit, offset) = sql_limit(page);
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {FORM_COLUMNS} FROM forms \
                     WHERE user_id = ?1 AND (?2 IS NULL OR status = ?2) \
                     ORDER BY updated_at DESC, rowid DESC LIMIT ?3 OFFSET ?4"
                ))
                .map_err(db_error)?;
            let rows = stmt
                .query_map(params![user_id, status, limit, offset], |row| {
                    form_from_row(row).map(|form| FormSummary::from(&form))
                })
                .map_err(db_error)?;
            let items = rows.collect::<Result<Vec<_>, _>>().map_err(db_error)?;
            Ok(PageOf { items, total })
        })
        .await
    }

    async fn get_form(&self, user_id: &str, form_id: &str) -> SnapformResult<Option<FormWithFields>> {
        let (user_id, form_id) = (user_id.to_string(), form_id.to_string());
        self.run(move |conn| {
            fetch_form(conn, &form_id, Some(user_id.as_str()))?
                .map(|form| with_fields(conn, form))
                .transpose()
        })
        .await
    }

    async fn update_form(
        &self,
        user_id: &str,
        form_id: &str,
        update: FormUpdate,
    ) -> SnapformResult<Option<FormWithFields>> {
        let (user_id, form_id) = (user_id.to_string(), form_id.to_string());
        self.run(move |conn| {
            let tx = conn.transaction().map_err(db_error)?;
            let Some(mut form) = fetch_form(&tx, &form_id, Some(user_id.as_str()))? else {
                return Ok(None);
            };
            update.apply_to(&mut form);
            form.updated_at = now();
            save_form(&tx, &form)?;
            apply_field_changes(&tx, &form_id, &update)?;
            tx.commit().map_err(db_error)?;

            tracing::info!(form_id = %form_id, changes = update.fields.len(), "form updated");
            with_fields(conn, form).map(Some)
        })
        .await
    }

    async fn delete_form(&self, user_id: &str, form_id: &str) -> SnapformResult<bool> {
        let (user_id, form_id) = (user_id.to_string(), form_id.to_string());
        self.run(move |conn| {
            let deleted = conn
                .execute(
                    "DELETE FROM forms WHERE id = ?1 AND user_id = ?2",
                    params![form_id, user_id],
                )
                .map_err(db_error)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn publish_form(&self, user_id: &str, form_id: &str) -> SnapformResult<Option<Form>> {
        let (user_id, form_id) = (user_id.to_string(), form_id.to_string());
        self.run(move |conn| {
            let changed = conn
                .execute(
                    "UPDATE forms SET status = ?3, updated_at = ?4 WHERE id = ?1 AND user_id = ?2",
                    params![
                        form_id,
                        user_id,
                        FormStatus::Active.as_str(),
                        format_ts(&now())
                    ],
                )
                .map_err(db_error)?;
            if changed == 0 {
                return Ok(None);
            }
            fetch_form(conn, &form_id, Some(user_id.as_str()))
        })
        .await
    }

    async fn duplicate_form(
        &self,
        user_id: &str,
        form_id: &str,
    ) -> SnapformResult<Option<FormWithFields>> {
        let (user_id, form_id) = (user_id.to_string(), form_id.to_string());
        self.run(move |conn| {
            let tx = conn.transaction().map_err(db_error)?;
            let Some(source) = fetch_form(&tx, &form_id, Some(user_id.as_str()))? else {
                return Ok(None);
            };
            let fields = fetch_fields(&tx, &source.id)?;

            let ts = now();
            let copy = Form {
                id: uuid::Uuid::new_v4().to_string(),
                name: format!("{} (Copy)", source.name),
                status: FormStatus::Draft,
                response_count: 0,
                created_at: ts,
                updated_at: ts,
                ..source
            };
            insert_form(&tx, &copy)?;
            for field in &fields {
                insert_field(
                    &tx,
                    &copy.id,
                    field.kind,
                    &field.label,
                    field.placeholder.as_deref(),
                    field.required,
                    &field.options,
                    field.order,
                )?;
            }
            tx.commit().map_err(db_error)?;

            tracing::info!(source = %form_id, form_id = %copy.id, "form duplicated");
            with_fields(conn, copy).map(Some)
        })
        .await
    }

    async fn get_active_form(&self, form_id: &str) -> SnapformResult<Option<PublicForm>> {
        let form_id = form_id.to_string();
        self.run(move |conn| {
            let Some(form) = fetch_form(conn, &form_id, None)? else {
                return Ok(None);
            };
            if !form.accepts_responses() {
                return Ok(None);
            }
            let fields = fetch_fields(conn, &form.id)?;
            let theme = fetch_form_theme(conn, &form)?;
            Ok(Some(PublicForm { form, fields, theme }))
        })
        .await
    }

    async fn get_form_basic(&self, form_id: &str) -> SnapformResult<Option<FormBasic>> {
        let form_id = form_id.to_string();
        self.run(move |conn| {
            let Some(form) = fetch_form(conn, &form_id, None)? else {
                return Ok(None);
            };
            let theme = fetch_form_theme(conn, &form)?;
            Ok(Some(FormBasic {
                id: form.id,
                name: form.name,
                description: form.description,
                theme,
            }))
        })
        .await
    }

    async fn record_response(&self, new: NewResponse) -> SnapformResult<Response> {
        self.run(move |conn| {
            let tx = conn.transaction().map_err(db_error)?;
            let form = fetch_form(&tx, &new.form_id, None)?
                .filter(Form::accepts_responses)
                .ok_or_else(|| SnapformError::NotFound("Form not found or not active".to_string()))?;

            if let (true, Some(email)) = (form.limit_one_response_per_user, new.email.as_deref()) {
                if response_exists(&tx, &form.id, email)? {
                    return Err(SnapformError::BadRequest(
                        "You have already submitted a response to this form".to_string(),
                    ));
                }
            }

            let response = Response {
                id: uuid::Uuid::new_v4().to_string(),
                form_id: form.id.clone(),
                email: new.email,
                created_at: now(),
                completed: true,
            };
            tx.execute(
                "INSERT INTO responses (id, form_id, email, created_at, completed) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    response.id,
                    response.form_id,
                    response.email,
                    format_ts(&response.created_at),
                    response.completed,
                ],
            )
            .map_err(db_error)?;

            for (field_id, value) in &new.answers {
                tx.execute(
                    "INSERT INTO field_responses (id, field_id, response_id, value) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![uuid::Uuid::new_v4().to_string(), field_id, response.id, value],
                )
                .map_err(db_error)?;
            }

            tx.execute(
                "UPDATE forms SET response_count = response_count + 1 WHERE id = ?1",
                params![form.id],
            )
            .map_err(db_error)?;
            tx.commit().map_err(db_error)?;

            tracing::info!(
                form_id = %response.form_id,
                response_id = %response.id,
                answers = new.answers.len(),
                "response recorded"
            );
            Ok(response)
        })
        .await
    }

    async fn has_response_from(&self, form_id: &str, email: &str) -> SnapformResult<bool> {
        let form_id = form_id.to_string();
        let email = email.to_string();
        self.run(move |conn| response_exists(conn, &form_id, &email)).await
    }

    async fn list_responses(
        &self,
        form_id: &str,
        page: PageRequest,
    ) -> SnapformResult<PageOf<ResponseRecord>> {
        let form_id = form_id.to_string();
        self.run(move |conn| {
            let total = count(
                conn,
                "SELECT COUNT(*) FROM responses WHERE form_id = ?1",
                params![form_id],
            )?;
            let (limit, offset) = sql_limit(page);
            let responses = {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, form_id, email, created_at, completed FROM responses \
                         WHERE form_id = ?1 ORDER BY created_at DESC, rowid DESC \
                         LIMIT ?2 OFFSET ?3",
                    )
                    .map_err(db_error)?;
                let rows = stmt
                    .query_map(params![form_id, limit, offset], |row| {
                        Ok(Response {
                            id: row.get(0)?,
                            form_id: row.get(1)?,
                            email: row.get(2)?,
                            created_at: get_ts(row, 3)?,
                            completed: row.get(4)?,
                        })
                    })
                    .map_err(db_error)?;
                rows.collect::<Result<Vec<_>, _>>().map_err(db_error)?
            };

            let items = responses
                .into_iter()
                .map(|response| {
                    Ok(ResponseRecord {
                        fields: answers_of(conn, &response.id)?,
                        id: response.id,
                        email: response.email,
                        created_at: response.created_at,
                        completed: response.completed,
                    })
                })
                .collect::<SnapformResult<Vec<_>>>()?;
            Ok(PageOf { items, total })
        })
        .await
    }

    async fn list_themes(
        &self,
        user_id: &str,
        include_public: bool,
        page: PageRequest,
    ) -> SnapformResult<PageOf<Theme>> {
        let user_id = user_id.to_string();
        self.run(move |conn| {
            let filter = "user_id = ?1 OR (?2 AND is_public = 1)";
            let total = count(
                conn,
                &format!("SELECT COUNT(*) FROM themes WHERE {filter}"),
                params![user_id, include_public],
            )?;
            let (limit, offset) = sql_limit(page);
            let items = query_themes(
                conn,
                &format!(
                    "SELECT {THEME_COLUMNS} FROM themes WHERE {filter} \
                     ORDER BY updated_at DESC, rowid DESC LIMIT ?3 OFFSET ?4"
                ),
                params![user_id, include_public, limit, offset],
            )?;
            Ok(PageOf { items, total })
        })
        .await
    }

    async fn available_themes(&self, user_id: &str) -> SnapformResult<Vec<Theme>> {
        let user_id = user_id.to_string();
        self.run(move |conn| {
            let mut themes = query_themes(
                conn,
                &format!(
                    "SELECT {THEME_COLUMNS} FROM themes WHERE is_public = 1 \
                     ORDER BY user_id IS NOT NULL, created_at, rowid"
                ),
                params![],
            )?;
            themes.extend(query_themes(
                conn,
                &format!(
                    "SELECT {THEME_COLUMNS} FROM themes WHERE user_id = ?1 AND is_public = 0 \
                     ORDER BY updated_at DESC, rowid DESC"
                ),
                params![user_id],
            )?);
            Ok(themes)
        })
        .await
    }

    async fn create_theme(&self, user_id: &str, new: NewTheme) -> SnapformResult<Theme> {
        let user_id = user_id.to_string();
        self.run(move |conn| {
            let ts = now();
            let theme = Theme {
                id: uuid::Uuid::new_v4().to_string(),
                name: new.name,
                description: new.description,
                primary_color: new.primary_color,
                secondary_color: new.secondary_color,
                background_color: new.background_color,
                accent_color: new.accent_color,
                text_color: new.text_color,
                font_family: new.font_family,
                is_public: new.is_public,
                default_animation: new.default_animation,
                default_layout: new.default_layout,
                default_spacing: new.default_spacing,
                border_radius: new.border_radius,
                user_id: Some(user_id),
                created_at: ts,
                updated_at: ts,
            };
            insert_theme(conn, &theme)?;
            Ok(theme)
        })
        .await
    }

    async fn get_theme(&self, theme_id: &str) -> SnapformResult<Option<Theme>> {
        let theme_id = theme_id.to_string();
        self.run(move |conn| fetch_theme(conn, &theme_id)).await
    }

    async fn update_theme(&self, theme_id: &str, update: ThemeUpdate) -> SnapformResult<Option<Theme>> {
        let theme_id = theme_id.to_string();
        self.run(move |conn| {
            let Some(mut theme) = fetch_theme(conn, &theme_id)? else {
                return Ok(None);
            };
            update.apply_to(&mut theme);
            theme.updated_at = now();
            conn.execute(
                "UPDATE themes SET name = ?2, description = ?3, primary_color = ?4, \
                 secondary_color = ?5, background_color = ?6, accent_color = ?7, text_color = ?8, \
                 font_family = ?9, is_public = ?10, default_animation = ?11, default_layout = ?12, \
                 default_spacing = ?13, border_radius = ?14, updated_at = ?15 WHERE id = ?1",
                params![
                    theme.id,
                    theme.name,
                    theme.description,
                    theme.primary_color,
                    theme.secondary_color,
                    theme.background_color,
                    theme.accent_color,
                    theme.text_color,
                    theme.font_family,
                    theme.is_public,
                    theme.default_animation.as_str(),
                    theme.default_layout.as_str(),
                    theme.default_spacing.as_str(),
                    theme.border_radius,
                    format_ts(&theme.updated_at),
                ],
            )
            .map_err(db_error)?;
            Ok(Some(theme))
        })
        .await
    }

    async fn delete_theme(&self, theme_id: &str) -> SnapformResult<bool> {
        let theme_id = theme_id.to_string();
        self.run(move |conn| {
            let deleted = conn
                .execute("DELETE FROM themes WHERE id = ?1", params![theme_id])
                .map_err(db_error)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn count_forms_using_theme(&self, theme_id: &str) -> SnapformResult<usize> {
        let theme_id = theme_id.to_string();
        self.run(move |conn| {
            count(
                conn,
                "SELECT COUNT(*) FROM forms WHERE theme_id = ?1",
                params![theme_id],
            )
        })
        .await
    }

    async fn seed_system_themes(&self) -> SnapformResult<usize> {
        self.run(|conn| {
            let ts = format_ts(&now());
            let tx = conn.transaction().map_err(db_error)?;
            for seed in SYSTEM_THEMES {
                tx.execute(
                    &format!(
                        "INSERT INTO themes ({THEME_COLUMNS}) VALUES \
                         (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10, ?11, ?12, ?13, NULL, ?14, ?14) \
                         ON CONFLICT(id) DO UPDATE SET name = excluded.name, \
                         description = excluded.description, primary_color = excluded.primary_color, \
                         secondary_color = excluded.secondary_color, \
                         background_color = excluded.background_color, \
                         accent_color = excluded.accent_color, text_color = excluded.text_color, \
                         font_family = excluded.font_family, is_public = 1, \
                         default_animation = excluded.default_animation, \
                         default_layout = excluded.default_layout, \
                         default_spacing = excluded.default_spacing, \
                         border_radius = excluded.border_radius, updated_at = excluded.updated_at"
                    ),
                    params![
                        seed.id(),
                        seed.name,
                        seed.description,
                        seed.primary_color,
                        seed.secondary_color,
                        seed.background_color,
                        seed.accent_color,
                        seed.text_color,
                        seed.font_family,
                        seed.animation.as_str(),
                        seed.layout.as_str(),
                        seed.spacing.as_str(),
                        seed.border_radius,
                        ts,
                    ],
                )
                .map_err(db_error)?;
            }
            tx.commit().map_err(db_error)?;
            tracing::info!(count = SYSTEM_THEMES.len(), "system themes seeded");
            Ok(SYSTEM_THEMES.len())
        })
        .await
    }
}
