// Query string parameters shared by the list endpoints

use serde::Deserialize;
use validator::Validate;

/// Default page size when the client does not send `limit`
pub const DEFAULT_LIMIT: i64 = 10;

/// Offset/limit pagination
///
/// No upper bound is applied to `limit`; callers asking for huge pages get
/// them.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct Pagination {
    #[serde(default)]
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 0, message = "limit must not be negative"))]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }
}
