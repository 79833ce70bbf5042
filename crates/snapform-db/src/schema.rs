//! SQLite DDL for the snapform tables.
//!
//! Every statement is idempotent so `migrate` can run on every start.

/// Table and index definitions, in dependency order.
pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        token_hash TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        expires_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS themes (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        primary_color TEXT NOT NULL,
        secondary_color TEXT NOT NULL,
        background_color TEXT NOT NULL,
        accent_color TEXT,
        text_color TEXT NOT NULL,
        font_family TEXT NOT NULL,
        is_public INTEGER NOT NULL DEFAULT 0,
        default_animation TEXT NOT NULL DEFAULT 'FADE',
        default_layout TEXT NOT NULL DEFAULT 'STANDARD',
        default_spacing TEXT NOT NULL DEFAULT 'NORMAL',
        border_radius INTEGER NOT NULL DEFAULT 8,
        user_id TEXT REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS forms (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'DRAFT',
        collect_emails INTEGER NOT NULL DEFAULT 0,
        limit_one_response_per_user INTEGER NOT NULL DEFAULT 0,
        show_progress_bar INTEGER NOT NULL DEFAULT 0,
        shuffle_questions INTEGER NOT NULL DEFAULT 0,
        theme_id TEXT REFERENCES themes(id) ON DELETE SET NULL,
        primary_color TEXT,
        secondary_color TEXT,
        background_color TEXT,
        font_family TEXT,
        animation TEXT NOT NULL DEFAULT 'NONE',
        animation_speed TEXT NOT NULL DEFAULT 'MEDIUM',
        layout TEXT NOT NULL DEFAULT 'STANDARD',
        spacing TEXT NOT NULL DEFAULT 'NORMAL',
        border_radius INTEGER NOT NULL DEFAULT 8,
        response_count INTEGER NOT NULL DEFAULT 0,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS fields (
        id TEXT PRIMARY KEY,
        form_id TEXT NOT NULL REFERENCES forms(id) ON DELETE CASCADE,
        kind TEXT NOT NULL,
        label TEXT NOT NULL,
        placeholder TEXT,
        required INTEGER NOT NULL DEFAULT 0,
        options TEXT NOT NULL DEFAULT '[]',
        sort_order INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS responses (
        id TEXT PRIMARY KEY,
        form_id TEXT NOT NULL REFERENCES forms(id) ON DELETE CASCADE,
        email TEXT,
        created_at TEXT NOT NULL,
        completed INTEGER NOT NULL DEFAULT 1
    )",
    "CREATE TABLE IF NOT EXISTS field_responses (
        id TEXT PRIMARY KEY,
        field_id TEXT NOT NULL REFERENCES fields(id) ON DELETE CASCADE,
        response_id TEXT NOT NULL REFERENCES responses(id) ON DELETE CASCADE,
        value TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_forms_user ON forms(user_id, updated_at)",
    "CREATE INDEX IF NOT EXISTS idx_fields_form ON fields(form_id, sort_order)",
    "CREATE INDEX IF NOT EXISTS idx_responses_form ON responses(form_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_responses_form_email ON responses(form_id, email)",
    "CREATE INDEX IF NOT EXISTS idx_field_responses_response ON field_responses(response_id)",
    "CREATE INDEX IF NOT EXISTS idx_themes_user ON themes(user_id)",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_applies_twice() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        for _ in 0..2 {
            for stmt in SCHEMA {
                conn.execute_batch(stmt).unwrap();
            }
        }
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 7);
    }
}
