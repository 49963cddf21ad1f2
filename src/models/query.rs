use serde::Deserialize;

use crate::error::ServiceError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Sort direction over `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    CreatedAtAsc,
    #[default]
    CreatedAtDesc,
}

impl SortOrder {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "created_at_asc" => Some(Self::CreatedAtAsc),
            "created_at_desc" => Some(Self::CreatedAtDesc),
            _ => None,
        }
    }
}

/// Raw query parameters for listing comment threads, exactly as received.
#[derive(Debug, Default, Deserialize)]
pub struct ListCommentsParams {
    /// Scope the request to the thread rooted at this comment.
    pub parent: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    /// 'created_at_desc' (default) or 'created_at_asc'.
    pub sort: Option<String>,
}

/// Validated, bounded read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub parent_id: Option<i64>,
    pub page: i64,
    pub limit: i64,
    pub sort: SortOrder,
    pub offset: i64,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            parent_id: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: SortOrder::default(),
            offset: 0,
        }
    }
}

impl ListCommentsParams {
    /// Validates the raw parameters and derives the offset.
    /// Blank values count as absent.
    pub fn normalize(&self) -> Result<QueryDescriptor, ServiceError> {
        let mut query = QueryDescriptor::default();

        if let Some(raw) = present(&self.parent) {
            let parent_id = raw.parse::<i64>().map_err(|_| ServiceError::InvalidParentId)?;
            if parent_id < 1 {
                return Err(ServiceError::InvalidParentId);
            }
            query.parent_id = Some(parent_id);
        }

        if let Some(raw) = present(&self.page) {
            query.page = raw
                .parse::<i64>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or(ServiceError::InvalidPage)?;
        }

        if let Some(raw) = present(&self.limit) {
            let limit = raw
                .parse::<i64>()
                .ok()
                .filter(|limit| *limit >= 1)
                .ok_or(ServiceError::InvalidLimit)?;
            query.limit = limit.min(MAX_LIMIT);
        }

        if let Some(raw) = present(&self.sort) {
            query.sort = SortOrder::parse(raw).ok_or(ServiceError::InvalidSort)?;
        }

        query.offset = (query.page - 1)
            .checked_mul(query.limit)
            .ok_or(ServiceError::InvalidPage)?;

        Ok(query)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
