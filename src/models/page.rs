use crate::config::PaginationConfig;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Validated page descriptor. `page` and `per_page` are always positive and
/// `per_page` never exceeds the configured maximum, so the derived offset can
/// never go negative and a single request can never ask for an unbounded
/// result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    per_page: i64,
}

impl PageRequest {
    /// Build from raw caller input. Absent values default (page 1, configured
    /// default size); non-positive values are rejected; oversized page sizes
    /// are clamped to the configured maximum.
    pub fn new(
        page: Option<i64>,
        per_page: Option<i64>,
        limits: &PaginationConfig,
    ) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::InvalidArgument(format!(
                "page must be a positive integer, got {}",
                page
            )));
        }

        let per_page = per_page.unwrap_or(limits.default_per_page);
        if per_page < 1 {
            return Err(AppError::InvalidArgument(format!(
                "limit must be a positive integer, got {}",
                per_page
            )));
        }
        let per_page = per_page.min(limits.max_per_page);

        Ok(Self { page, per_page })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page) as u64
    }

    pub fn limit(&self) -> u32 {
        self.per_page as u32
    }
}

/// One page of results plus the totals computed over the whole filtered set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn assemble(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        let per_page = request.per_page() as u64;
        Self {
            items,
            total_count,
            page: request.page(),
            per_page: request.per_page(),
            total_pages: total_count.div_ceil(per_page),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(AppError::InvalidArgument(format!(
                "sort direction must be asc or desc, got {}",
                other
            ))),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> PaginationConfig {
        PaginationConfig {
            default_per_page: 10,
            max_per_page: 100,
        }
    }

    #[test]
    fn defaults_apply_when_absent() {
        let req = PageRequest::new(None, None, &limits()).unwrap();
        assert_eq!(req.page(), 1);
        assert_eq!(req.per_page(), 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn offset_math() {
        let req = PageRequest::new(Some(3), Some(25), &limits()).unwrap();
        assert_eq!(req.offset(), 50);
        assert_eq!(req.limit(), 25);
    }

    #[test]
    fn non_positive_inputs_are_rejected() {
        assert!(PageRequest::new(Some(0), None, &limits()).is_err());
        assert!(PageRequest::new(Some(-1), None, &limits()).is_err());
        assert!(PageRequest::new(None, Some(0), &limits()).is_err());
        assert!(PageRequest::new(None, Some(-5), &limits()).is_err());
    }

    #[test]
    fn per_page_is_clamped_to_the_maximum() {
        let req = PageRequest::new(None, Some(10_000), &limits()).unwrap();
        assert_eq!(req.per_page(), 100);
    }

    #[test]
    fn total_pages_is_the_ceiling() {
        let req = PageRequest::new(Some(2), Some(10), &limits()).unwrap();
        let page = Page::assemble(vec![0u8; 10], 25, req);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_count, 25);

        let exact = Page::assemble(vec![0u8; 10], 20, req);
        assert_eq!(exact.total_pages, 2);

        let empty = Page::<u8>::assemble(vec![], 0, req);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn sort_direction_is_strict() {
        assert_eq!(SortDirection::parse("asc").unwrap(), SortDirection::Asc);
        assert_eq!(SortDirection::parse("desc").unwrap(), SortDirection::Desc);
        assert!(SortDirection::parse("descending").is_err());
    }
}
