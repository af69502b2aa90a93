// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::Kind;
use crate::view::record::UnifiedViewRecord;

/// Search and filter state of the transaction view. All clauses are
/// AND-combined; unset clauses do not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub query: String,
    pub kind: Option<Kind>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    /// View-mode toggle: `true` shows only planned records, `false` only
    /// booked ones.
    pub recurring: bool,
}

impl FilterCriteria {
    /// Whether any criterion differs from the default, which switches the
    /// view into client-side paging.
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
            || self.kind.is_some()
            || self.from.is_some()
            || self.to.is_some()
            || self.min.is_some()
            || self.max.is_some()
            || self.recurring
    }

    /// Restricts the date range to a single calendar day.
    pub fn on_day(mut self, day: NaiveDate) -> Self {
        self.from = Some(day);
        self.to = Some(day);
        self
    }
}

pub fn matches(record: &UnifiedViewRecord, criteria: &FilterCriteria) -> bool {
    let q = criteria.query.trim().to_lowercase();
    let text = q.is_empty()
        || record.category.to_lowercase().contains(&q)
        || record.note.to_lowercase().contains(&q);
    let kind = criteria.kind.is_none_or(|k| k == record.kind);
    let day = record.day();
    let date = criteria.from.is_none_or(|from| day >= from)
        && criteria.to.is_none_or(|to| day <= to);
    let amount = criteria.min.is_none_or(|min| record.amount >= min)
        && criteria.max.is_none_or(|max| record.amount <= max);
    let mode = record.is_planned() == criteria.recurring;
    text && kind && date && amount && mode
}

pub fn apply(records: &[UnifiedViewRecord], criteria: &FilterCriteria) -> Vec<UnifiedViewRecord> {
    records
        .iter()
        .filter(|r| matches(r, criteria))
        .cloned()
        .collect()
}
