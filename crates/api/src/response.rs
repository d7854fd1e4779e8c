//! Shared response envelope types for API handlers.
//!
//! Single values are returned as `{ "data": ... }`. Paginated listings
//! serialize [`Page`](devflow_core::pagination::Page) directly, which already
//! carries `data`, `is_next` and `total_count`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: question }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
