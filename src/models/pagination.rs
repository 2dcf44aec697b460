use serde::{Deserialize, Serialize};

/// Pagination block attached to list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl Pagination {
    /// Builds the pagination block for a query result
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// Row offset of the requested page
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Page/limit query parameters with the defaults list endpoints use
///
/// Page numbers are 1-based; out-of-range values are clamped rather than
/// rejected so a stale page link still renders something.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    pub const DEFAULT_LIMIT: i64 = 12;
    pub const MAX_LIMIT: i64 = 100;

    /// Effective (page, limit) after clamping
    pub fn resolve(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        (page, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 1).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
        assert_eq!(Pagination::new(1, 10, 95).total_pages, 10);
    }

    #[test]
    fn test_last_page_size() {
        // 95 rows, 10 per page: the last page holds total - (total_pages-1)*limit
        let p = Pagination::new(10, 10, 95);
        let last_page_size = p.total - (p.total_pages - 1) * p.limit;
        assert_eq!(last_page_size, 5);

        // Evenly divisible totals fill the last page completely
        let p = Pagination::new(9, 10, 90);
        assert_eq!(p.total - (p.total_pages - 1) * p.limit, 10);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Pagination::new(1, 12, 100).offset(), 0);
        assert_eq!(Pagination::new(3, 12, 100).offset(), 24);
    }

    #[test]
    fn test_page_params_clamping() {
        let params = PageParams {
            page: Some(0),
            limit: Some(1000),
        };
        assert_eq!(params.resolve(), (1, PageParams::MAX_LIMIT));

        let params = PageParams {
            page: None,
            limit: None,
        };
        assert_eq!(params.resolve(), (1, PageParams::DEFAULT_LIMIT));
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let json = serde_json::to_value(Pagination::new(2, 10, 25)).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["page"], 2);
    }
}
