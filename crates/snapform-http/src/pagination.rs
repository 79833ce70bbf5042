//! Pagination metadata for list endpoints.

use serde::{Deserialize, Serialize};
use snapform_db::PageRequest;

/// `?page=&limit=` query values.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// The `pagination` object returned next to every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub limit: usize,
    pub has_more: bool,
}

impl Pagination {
    pub const fn new(total: usize, page: PageRequest) -> Self {
        let total_pages = total.div_ceil(page.limit);
        Self {
            total,
            total_pages,
            current_page: page.page,
            limit: page.limit,
            has_more: page.page < total_pages,
        }
    }
}
