use serde::{Deserialize, Serialize};

/// Default page size when the caller does not ask for one.
pub const DEFAULT_LIMIT: u64 = 20;

/// Hard ceiling on page size. Requests above this are clamped, not rejected.
pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn is_ascending(self) -> bool {
        matches!(self, SortOrder::Asc)
    }
}

/// Pagination parameters, extractable from query params.
///
/// `page` is 1-based. `sort_by` is an *entity field name*; repositories
/// resolve it through the entity's column map and fall back to the default
/// sort field when it is unknown.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            sort_by: None,
            sort_order: SortOrder::Asc,
        }
    }
}

impl PageRequest {
    /// The requested page, never below 1.
    pub fn clamped_page(&self) -> u64 {
        self.page.max(1)
    }

    /// The requested page size, clamped to `[1, MAX_LIMIT]`.
    pub fn clamped_limit(&self) -> u64 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        (self.clamped_page() - 1) * self.clamped_limit()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// `total_pages` is `ceil(total / limit)`, but never below 1: an empty
    /// result set still has one (empty) page.
    pub fn new(items: Vec<T>, request: &PageRequest, total: u64) -> Self {
        let limit = request.clamped_limit();
        let total_pages = (total.div_ceil(limit)).max(1);
        Self {
            items,
            meta: PageMeta {
                total,
                page: request.clamped_page(),
                limit,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_clamping() {
        let low = PageRequest {
            limit: 0,
            ..PageRequest::default()
        };
        assert_eq!(low.clamped_limit(), 1);

        let high = PageRequest {
            limit: 500,
            ..PageRequest::default()
        };
        assert_eq!(high.clamped_limit(), MAX_LIMIT);
    }

    #[test]
    fn test_page_floor_and_offset() {
        let request = PageRequest {
            page: 0,
            limit: 20,
            ..PageRequest::default()
        };
        assert_eq!(request.clamped_page(), 1);
        assert_eq!(request.offset(), 0);

        let third = PageRequest {
            page: 3,
            limit: 25,
            ..PageRequest::default()
        };
        assert_eq!(third.offset(), 50);
    }

    #[test]
    fn test_total_pages() {
        let request = PageRequest {
            limit: 20,
            ..PageRequest::default()
        };
        assert_eq!(Paginated::<u8>::new(vec![], &request, 0).meta.total_pages, 1);
        assert_eq!(Paginated::<u8>::new(vec![], &request, 20).meta.total_pages, 1);
        assert_eq!(Paginated::<u8>::new(vec![], &request, 21).meta.total_pages, 2);
    }

    #[test]
    fn test_query_string_shape() {
        let request: PageRequest =
            serde_json::from_str(r#"{"page": 2, "limit": 50, "sortBy": "name", "sortOrder": "desc"}"#)
                .unwrap();
        assert_eq!(request.page, 2);
        assert_eq!(request.sort_by.as_deref(), Some("name"));
        assert_eq!(request.sort_order, SortOrder::Desc);
    }
}
