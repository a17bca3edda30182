//! Filtering, searching, summarizing and paginating the joined rows.
//!
//! Every view is recomputed from the full in-memory dataset; there is no index.

use crate::core::ledger::{CustomerRow, PERIOD_COUNT, PaymentStatus};

/// User-selected filter and search text.
///
/// `None` fields match everything. All set predicates must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    /// Required status per period, newest first
    pub statuses: [Option<PaymentStatus>; PERIOD_COUNT],
    /// Required area label (exact match)
    pub area: Option<String>,
    /// Required due amount (exact match)
    pub due: Option<i64>,
    /// Case-insensitive substring matched against id, name, phone and area
    pub search: String,
}

impl ViewFilter {
    /// Returns true when no predicate is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.iter().all(Option::is_none)
            && self.area.is_none()
            && self.due.is_none()
            && self.search.trim().is_empty()
    }

    /// Tests a single row against every predicate.
    #[must_use]
    pub fn matches(&self, row: &CustomerRow) -> bool {
        let statuses_match = self
            .statuses
            .iter()
            .zip(row.statuses.iter())
            .all(|(wanted, actual)| wanted.is_none_or(|w| w == *actual));

        statuses_match
            && self.area.as_deref().is_none_or(|area| row.area == area)
            && self.due.is_none_or(|due| row.due == due)
            && matches_search(row, &self.search)
    }

    /// Applies the filter, preserving input order.
    #[must_use]
    pub fn apply<'a>(&self, rows: &'a [CustomerRow]) -> Vec<&'a CustomerRow> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

fn matches_search(row: &CustomerRow, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [&row.customer_id, &row.name, &row.phone, &row.area]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Aggregate figures over a set of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of rows
    pub total: usize,
    /// Number of rows with no payment, per period
    pub unpaid: [usize; PERIOD_COUNT],
    /// Sum of due amounts
    pub total_due: i64,
}

/// Summarizes a set of rows.
#[must_use]
pub fn summarize<'a, I>(rows: I) -> Summary
where
    I: IntoIterator<Item = &'a CustomerRow>,
{
    rows.into_iter().fold(Summary::default(), |mut acc, row| {
        acc.total += 1;
        for (count, status) in acc.unpaid.iter_mut().zip(row.statuses.iter()) {
            if status.is_unpaid() {
                *count += 1;
            }
        }
        acc.total_due = acc.total_due.saturating_add(row.due);
        acc
    })
}

/// Distinct area labels in first-seen order, for the area dropdown.
#[must_use]
pub fn distinct_areas(rows: &[CustomerRow]) -> Vec<String> {
    let mut areas: Vec<String> = Vec::new();
    for row in rows {
        if !areas.contains(&row.area) {
            areas.push(row.area.clone());
        }
    }
    areas
}

/// Distinct due amounts in first-seen order, for the due dropdown.
#[must_use]
pub fn distinct_dues(rows: &[CustomerRow]) -> Vec<i64> {
    let mut dues: Vec<i64> = Vec::new();
    for row in rows {
        if !dues.contains(&row.due) {
            dues.push(row.due);
        }
    }
    dues
}

/// Finds a row by exact customer identifier.
#[must_use]
pub fn find_row<'a>(rows: &'a [CustomerRow], customer_id: &str) -> Option<&'a CustomerRow> {
    let customer_id = customer_id.trim();
    rows.iter().find(|row| row.customer_id == customer_id)
}

/// One page of a filtered view.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    /// Rows on this page
    pub rows: Vec<&'a CustomerRow>,
    /// Zero-based page index (after clamping)
    pub index: usize,
    /// Total number of pages (at least 1)
    pub page_count: usize,
    /// Total number of rows across all pages
    pub total: usize,
}

impl Page<'_> {
    /// Human-readable label, e.g. `Page 2 of 5`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.index + 1, self.page_count)
    }
}

/// Number of pages needed for `total` rows (at least one).
#[must_use]
pub const fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 || total == 0 {
        return 1;
    }
    total.div_ceil(page_size)
}

/// Slices one page out of a filtered view. Out-of-range indices clamp to the last page.
#[must_use]
pub fn paginate<'a>(rows: &[&'a CustomerRow], index: usize, page_size: usize) -> Page<'a> {
    let page_size = page_size.max(1);
    let pages = page_count(rows.len(), page_size);
    let index = index.min(pages - 1);

    let start = index * page_size;
    let end = (start + page_size).min(rows.len());
    let page_rows = rows.get(start..end).map(<[_]>::to_vec).unwrap_or_default();

    Page {
        rows: page_rows,
        index,
        page_count: pages,
        total: rows.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_empty_filter_returns_all_in_order() {
        let rows = sample_rows();
        let filter = ViewFilter::default();
        assert!(filter.is_empty());

        let view = filter.apply(&rows);
        assert_eq!(view.len(), rows.len());
        for (viewed, original) in view.iter().zip(rows.iter()) {
            assert_eq!(viewed.serial, original.serial);
        }
    }

    #[test]
    fn test_filter_by_period_status() {
        let rows = sample_rows();
        let filter = ViewFilter {
            statuses: [None, Some(PaymentStatus::NoPayment), None],
            ..Default::default()
        };
        let ids: Vec<&str> = filter
            .apply(&rows)
            .iter()
            .map(|r| r.customer_id.as_str())
            .collect();
        assert_eq!(ids, vec!["C-001", "C-002"]);
    }

    #[test]
    fn test_filter_conjunction() {
        let rows = sample_rows();
        let filter = ViewFilter {
            statuses: [Some(PaymentStatus::NoPayment), None, None],
            area: Some("Mirpur".to_string()),
            ..Default::default()
        };
        let view = filter.apply(&rows);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].customer_id, "C-001");
    }

    #[test]
    fn test_filter_by_due() {
        let rows = sample_rows();
        let filter = ViewFilter {
            due: Some(300),
            ..Default::default()
        };
        let view = filter.apply(&rows);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].customer_id, "C-002");
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let rows = sample_rows();
        let filter = ViewFilter {
            search: "KAR".to_string(),
            ..Default::default()
        };
        let view = filter.apply(&rows);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "karim");

        let by_phone = ViewFilter {
            search: "1815".to_string(),
            ..Default::default()
        };
        assert_eq!(by_phone.apply(&rows)[0].customer_id, "C-001");
    }

    #[test]
    fn test_summarize() {
        let rows = sample_rows();
        let summary = summarize(&rows);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.unpaid, [3, 2, 1]);
        assert_eq!(summary.total_due, 1300 + 300 + 500);
    }

    #[test]
    fn test_summarize_saturates_total_due() {
        let mut rows = sample_rows();
        rows[0].due = i64::MAX;
        rows[1].due = i64::MAX;
        let summary = summarize(&rows);
        assert_eq!(summary.total_due, i64::MAX);
    }

    #[test]
    fn test_distinct_options_first_seen_order() {
        let rows = sample_rows();
        assert_eq!(distinct_areas(&rows), vec!["Mirpur", "Uttara", "Banani"]);
        assert_eq!(distinct_dues(&rows), vec![1300, 300, 0, 500]);
    }

    #[test]
    fn test_find_row() {
        let rows = sample_rows();
        assert_eq!(find_row(&rows, " C-002 ").map(|r| r.serial), Some(2));
        assert!(find_row(&rows, "C-404").is_none());
    }

    #[test]
    fn test_paginate() {
        let rows = sample_rows();
        let view: Vec<&CustomerRow> = rows.iter().collect();

        let first = paginate(&view, 0, 3);
        assert_eq!(first.rows.len(), 3);
        assert_eq!(first.page_count, 2);
        assert_eq!(first.label(), "Page 1 of 2");

        let second = paginate(&view, 1, 3);
        assert_eq!(second.rows.len(), 1);
        assert_eq!(second.rows[0].customer_id, "C-004");

        // Out of range clamps to the last page
        let clamped = paginate(&view, 9, 3);
        assert_eq!(clamped.index, 1);
    }

    #[test]
    fn test_paginate_empty_view() {
        let page = paginate(&[], 3, 100);
        assert!(page.rows.is_empty());
        assert_eq!(page.index, 0);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 100), 1);
        assert_eq!(page_count(100, 100), 1);
        assert_eq!(page_count(101, 100), 2);
    }
}
