//! Shared state handed to every handler.

use std::sync::Arc;

use snapform_auth::AuthService;
use snapform_core::{Settings, SnapformResult};
use snapform_db::{FormStore, PageRequest, SqliteStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FormStore>,
    pub auth: AuthService,
    pub settings: Arc<Settings>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("auth", &self.auth)
            .field("bind_address", &self.settings.bind_address())
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(store: Arc<dyn FormStore>, settings: Settings) -> Self {
        let auth = AuthService::new(store.clone(), settings.session_ttl_hours);
        Self {
            store,
            auth,
            settings: Arc::new(settings),
        }
    }

    /// Replaces the account service, e.g. to swap the password hasher.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthService) -> Self {
        self.auth = auth;
        self
    }

    /// Opens the configured SQLite database, applies the schema, and seeds
    /// system themes when enabled.
    pub async fn open(settings: Settings) -> SnapformResult<Self> {
        let store = SqliteStore::open(&settings.database.path)?;
        store.migrate().await?;
        if settings.database.seed_system_themes {
            let seeded = store.seed_system_themes().await?;
            tracing::debug!(seeded, "System themes ensured");
        }
        Ok(Self::new(Arc::new(store), settings))
    }

    /// Builds a page request from optional query values.
    pub fn page(&self, page: Option<usize>, limit: Option<usize>) -> PageRequest {
        PageRequest::new(page.unwrap_or(1), self.settings.page_size(limit))
    }
}
