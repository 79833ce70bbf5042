//! In-process [`FormGateway`] backed directly by a store.

use std::sync::Arc;

use async_trait::async_trait;
use snapform_core::{SnapformError, SnapformResult};
use snapform_db::{FormStore, PublicForm};
use snapform_forms::intake::submit_response;
use snapform_forms::{FormGateway, SubmissionPayload, SubmitReceipt};

pub const FORM_NOT_AVAILABLE: &str = "Form not found or not available";

/// Serves forms and accepts submissions without going over HTTP.
#[derive(Clone)]
pub struct LocalGateway {
    store: Arc<dyn FormStore>,
}

impl LocalGateway {
    pub fn new(store: Arc<dyn FormStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for LocalGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalGateway").finish_non_exhaustive()
    }
}

#[async_trait]
impl FormGateway for LocalGateway {
    async fn fetch_form(&self, form_id: &str) -> SnapformResult<PublicForm> {
        self.store
            .get_active_form(form_id)
            .await?
            .ok_or_else(|| SnapformError::NotFound(FORM_NOT_AVAILABLE.to_string()))
    }

    async fn submit(&self, form_id: &str, payload: &SubmissionPayload) -> SnapformResult<SubmitReceipt> {
        submit_response(self.store.as_ref(), form_id, payload).await
    }
}
