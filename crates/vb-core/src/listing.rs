//! Pagination and sort parameters shared by reservation and audit listings.

use serde::{Deserialize, Serialize};

use crate::enums::{SortColumn, SortDirection};

/// Default page size when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on page size.
pub const MAX_PAGE_SIZE: u32 = 200;

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Build a page request, clamping `page` to at least 1 and `page_size`
    /// into `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Row offset: `(page - 1) * page_size`.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page as u64).saturating_sub(1) * self.page_size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// Validated sort order for reservation listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Parse caller-supplied sort parameters against the allow-list.
    ///
    /// An unknown column silently falls back to date ascending, ignoring the
    /// requested direction. Only the fixed SQL fragments from [`SortColumn`]
    /// ever reach a query.
    #[must_use]
    pub fn parse(column: &str, direction: &str) -> Self {
        let column = match column.trim().to_ascii_lowercase().as_str() {
            "date" | "booking_date" => SortColumn::Date,
            "total_charge" | "totalcharge" | "total" => SortColumn::TotalCharge,
            "venue" | "venue_id" => SortColumn::Venue,
            _ => return Self::default(),
        };
        let direction = if direction.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self { column, direction }
    }

    /// `ORDER BY` body, with the row id as a stable tiebreaker.
    #[must_use]
    pub fn order_by(self) -> String {
        let dir = self.direction.as_sql();
        format!("{} {dir}, r.id {dir}", self.column.sql_expr())
    }
}

/// One page of results plus the exact count under the same filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("date", "asc", SortColumn::Date, SortDirection::Asc)]
    #[case("total_charge", "DESC", SortColumn::TotalCharge, SortDirection::Desc)]
    #[case("venue", "desc", SortColumn::Venue, SortDirection::Desc)]
    #[case("venue", "sideways", SortColumn::Venue, SortDirection::Asc)]
    #[case("id; DROP TABLE reservations", "desc", SortColumn::Date, SortDirection::Asc)]
    #[case("", "desc", SortColumn::Date, SortDirection::Asc)]
    fn sort_parse_allow_list(
        #[case] column: &str,
        #[case] direction: &str,
        #[case] expected_column: SortColumn,
        #[case] expected_direction: SortDirection,
    ) {
        let spec = SortSpec::parse(column, direction);
        assert_eq!(spec.column, expected_column);
        assert_eq!(spec.direction, expected_direction);
    }

    #[test]
    fn order_by_uses_fixed_fragments() {
        let spec = SortSpec::parse("total_charge", "desc");
        assert_eq!(
            spec.order_by(),
            "CAST(r.total_charge AS REAL) DESC, r.id DESC"
        );
    }

    #[rstest]
    #[case(0, 10, 1, 10, 0)]
    #[case(2, 10, 2, 10, 10)]
    #[case(3, 0, 3, 1, 2)]
    #[case(1, 10_000, 1, MAX_PAGE_SIZE, 0)]
    fn page_request_clamps(
        #[case] page: u32,
        #[case] size: u32,
        #[case] expected_page: u32,
        #[case] expected_size: u32,
        #[case] expected_offset: u64,
    ) {
        let req = PageRequest::new(page, size);
        assert_eq!(req.page, expected_page);
        assert_eq!(req.page_size, expected_size);
        assert_eq!(req.offset(), expected_offset);
    }
}
