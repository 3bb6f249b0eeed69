use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters every list endpoint understands. Any other query key is
/// treated as a filter predicate on the field of the same name.
#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    #[param(default = 1, minimum = 1)]
    pub current: Option<u64>,
    #[param(default = 10, minimum = 1)]
    pub page_size: Option<u64>,
    /// Sort key, `-` prefix for descending (e.g. `-updatedAt`).
    pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current: u64,
    pub page_size: u64,
    pub pages: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub meta: PageMeta,
    pub result: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(result: Vec<T>, total: u64, current: u64, page_size: u64) -> Self {
        Self {
            meta: PageMeta {
                current,
                page_size,
                pages: total_pages(total, page_size),
                total,
            },
            result,
        }
    }
}

/// Envelope wrapped around every backend payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackendResponse<T> {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> BackendResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: 200,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Number of pages needed for `total_items`. A zero page size yields zero
/// pages rather than dividing by zero.
pub fn total_pages(total_items: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    }
}
