use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 10;
/// Large enough for the admin product picker, which asks for `limit=1000`.
pub const MAX_LIMIT: i64 = 1000;

/// Raw `?page=&limit=` query values.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn from_params(p: &PageParams) -> Self {
        let page = p.page.unwrap_or(1).max(1);
        let limit = match p.limit {
            Some(l) if l >= 1 => l.min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: Option<i64>, limit: Option<i64>) -> Page {
        Page::from_params(&PageParams { page, limit })
    }

    #[test]
    fn defaults_to_first_page_of_ten() {
        assert_eq!(page(None, None), Page { page: 1, limit: 10 });
    }

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(page(Some(0), Some(0)), Page { page: 1, limit: 10 });
        assert_eq!(page(Some(-3), Some(-1)), Page { page: 1, limit: 10 });
        assert_eq!(page(Some(2), Some(5000)), Page { page: 2, limit: MAX_LIMIT });
    }

    #[test]
    fn admin_picker_limit_is_not_truncated() {
        assert_eq!(page(None, Some(1000)).limit, 1000);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(page(Some(1), Some(9)).offset(), 0);
        assert_eq!(page(Some(3), Some(9)).offset(), 18);
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        let p = page(Some(1), Some(10));
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
        assert_eq!(p.total_pages(95), 10);
    }
}
