use schemars::JsonSchema;
use serde::Deserialize;

pub const PER_PAGE: u64 = 25;
pub const MAX_PAGES: u64 = 10000;

/// Page selection query string.
#[derive(Deserialize, JsonSchema)]
pub struct Pagination {
    /// 1-based page number. Both `0` and `1` select the first page.
    #[serde(default)]
    page: u64,
}

impl Pagination {
    pub fn limit(&self) -> u64 {
        PER_PAGE
    }

    pub fn offset(&self) -> u64 {
        self.page.min(MAX_PAGES).saturating_sub(1) * PER_PAGE
    }
}

#[cfg(test)]
mod tests {
    use super::{Pagination, MAX_PAGES, PER_PAGE};

    #[test]
    fn offsets() {
        assert_eq!(Pagination { page: 0 }.offset(), 0);
        assert_eq!(Pagination { page: 1 }.offset(), 0);
        assert_eq!(Pagination { page: 3 }.offset(), 2 * PER_PAGE);
        assert_eq!(
            Pagination { page: u64::MAX }.offset(),
            (MAX_PAGES - 1) * PER_PAGE
        );
    }
}
