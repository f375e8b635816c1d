use serde::Deserialize;
use utoipa::IntoParams;

/// `skip`/`limit` query parameters shared by list endpoints.
///
/// `limit` is clamped to `1..=MAX_LIMIT` when read through [`Pagination::limit`],
/// `skip` to `MAX_OFFSET` through [`Pagination::offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Rows to skip
    #[serde(default)]
    #[param(default = 0, minimum = 0)]
    pub skip: u64,
    /// Maximum rows to return
    #[serde(default = "default_limit")]
    #[param(default = 100, minimum = 1, maximum = 1000)]
    pub limit: u64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u64 = 100;
    pub const MAX_LIMIT: u64 = 1000;
    /// Largest offset the database binds as a signed 64-bit integer
    pub const MAX_OFFSET: u64 = i64::MAX as u64;

    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    pub fn offset(&self) -> u64 {
        self.skip.min(Self::MAX_OFFSET)
    }

    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}

fn default_limit() -> u64 {
    Pagination::DEFAULT_LIMIT
}
