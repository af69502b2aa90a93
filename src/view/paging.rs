// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Merge, day grouping and the two paging modes of the transaction view.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::view::filter::{self, FilterCriteria};
use crate::view::record::UnifiedViewRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingMode {
    /// No filter active: the page is the one the backend returned.
    Server,
    /// A filter is active: pages are sliced from the filtered in-memory set.
    Client,
}

/// Records keyed by calendar day. Each day keeps the input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayGroups {
    days: BTreeMap<NaiveDate, Vec<UnifiedViewRecord>>,
}

impl DayGroups {
    /// Most recent day first.
    pub fn keys_descending(&self) -> Vec<NaiveDate> {
        self.days.keys().rev().copied().collect()
    }

    pub fn iter_descending(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<UnifiedViewRecord>)> {
        self.days.iter().rev()
    }

    /// Net signed total per day, most recent first.
    pub fn totals(&self) -> Vec<(NaiveDate, Decimal)> {
        self.iter_descending()
            .map(|(day, records)| (*day, records.iter().map(|r| r.signed_amount()).sum()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

pub fn group_by_day(records: &[UnifiedViewRecord]) -> DayGroups {
    let mut days: BTreeMap<NaiveDate, Vec<UnifiedViewRecord>> = BTreeMap::new();
    for record in records {
        days.entry(record.day()).or_default().push(record.clone());
    }
    DayGroups { days }
}

/// Slice for `page` (0-based). Out-of-range pages yield an empty slice.
pub fn paginate<T>(records: &[T], page: usize, size: usize) -> &[T] {
    if size == 0 {
        return &[];
    }
    let Some(start) = page.checked_mul(size) else {
        return &[];
    };
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(records.len());
    &records[start..end]
}

/// At least one page, even for an empty set.
pub fn page_count(total: u64, size: usize) -> usize {
    if size == 0 {
        return 1;
    }
    let pages = total.div_ceil(size as u64);
    usize::try_from(pages).unwrap_or(usize::MAX).max(1)
}

/// Booked and planned records combined, most recent first. Records with
/// equal dates keep booked-before-planned order.
pub fn merge_sorted(
    booked: Vec<UnifiedViewRecord>,
    planned: Vec<UnifiedViewRecord>,
) -> Vec<UnifiedViewRecord> {
    let mut items = booked;
    items.extend(planned);
    items.sort_by(|a, b| b.date.cmp(&a.date));
    items
}

/// Records on one day ordered by ascending amount, as a calendar cell shows them.
pub fn records_on(records: &[UnifiedViewRecord], day: NaiveDate) -> Vec<UnifiedViewRecord> {
    let mut out: Vec<_> = records.iter().filter(|r| r.day() == day).cloned().collect();
    out.sort_by(|a, b| a.amount.cmp(&b.amount));
    out
}

/// What one page of the transaction view shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub mode: PagingMode,
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub records: Vec<UnifiedViewRecord>,
    pub groups: DayGroups,
}

impl Default for PageView {
    fn default() -> Self {
        Self {
            mode: PagingMode::Server,
            page: 0,
            total_pages: 1,
            filtered_count: 0,
            records: Vec::new(),
            groups: DayGroups::default(),
        }
    }
}

/// Filters `items` and cuts the visible page.
///
/// In server mode `page` is the backend page already held in `items` and
/// the page count comes from `server_total`; in client mode both come from
/// the filtered set.
pub fn compute_view(
    items: &[UnifiedViewRecord],
    criteria: &FilterCriteria,
    page: usize,
    page_size: usize,
    server_total: u64,
) -> PageView {
    let filtered = filter::apply(items, criteria);
    let filtered_count = filtered.len();
    let (mode, total_pages, records) = if criteria.is_active() {
        let total = page_count(filtered_count as u64, page_size);
        let slice = paginate(&filtered, page, page_size).to_vec();
        (PagingMode::Client, total, slice)
    } else {
        (PagingMode::Server, page_count(server_total, page_size), filtered)
    };
    let groups = group_by_day(&records);
    PageView {
        mode,
        page,
        total_pages,
        filtered_count,
        records,
        groups,
    }
}
