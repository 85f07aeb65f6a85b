use core::fmt;

use serde::{Deserialize, Serialize};

/// Offset pagination for repository queries. `start` is a row offset so
/// tree continuations can resume mid-page; route handlers convert
/// one-based page numbers through [`Pagination::from_page`].
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    pub start: u32,
    pub count: u8,
}

impl Pagination {
    pub fn from_page(page: u32, limit: u8) -> Self {
        let page = page.max(1);
        Self {
            start: (page - 1).saturating_mul(limit as u32),
            count: limit,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub enum QryOrder {
    DESC,
    ASC,
}

impl fmt::Display for QryOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QryOrder::DESC => write!(f, "DESC"),
            QryOrder::ASC => write!(f, "ASC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_one_starts_at_zero() {
        let p = Pagination::from_page(1, 10);
        assert_eq!(p.start, 0);
        assert_eq!(p.count, 10);
    }

    #[test]
    fn page_zero_is_clamped_to_first_page() {
        let p = Pagination::from_page(0, 10);
        assert_eq!(p.start, 0);
    }

    #[test]
    fn later_pages_offset_by_limit() {
        let p = Pagination::from_page(3, 25);
        assert_eq!(p.start, 50);
    }

    #[test]
    fn huge_page_numbers_saturate_instead_of_wrapping() {
        let p = Pagination::from_page(u32::MAX, 100);
        assert_eq!(p.start, u32::MAX);
    }
}
