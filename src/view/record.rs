// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::error::ViewError;
use crate::geo::Coordinates;
use crate::models::Kind;

const PLANNED_PREFIX: &str = "p-";

/// Identifier of a view record, tagged by the source it came from.
///
/// Rendered as `"12"` for booked and `"p-7"` for planned records; parsing
/// the rendered form recovers the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewId {
    Booked(i64),
    Planned(i64),
}

impl ViewId {
    pub fn raw(self) -> i64 {
        match self {
            ViewId::Booked(id) | ViewId::Planned(id) => id,
        }
    }

    pub fn is_planned(self) -> bool {
        matches!(self, ViewId::Planned(_))
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewId::Booked(id) => write!(f, "{}", id),
            ViewId::Planned(id) => write!(f, "{}{}", PLANNED_PREFIX, id),
        }
    }
}

impl FromStr for ViewId {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ViewError::InvalidId(s.to_string());
        match trimmed.strip_prefix(PLANNED_PREFIX) {
            Some(rest) => rest.parse().map(ViewId::Planned).map_err(|_| invalid()),
            None => trimmed.parse().map(ViewId::Booked).map_err(|_| invalid()),
        }
    }
}

impl Serialize for ViewId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// Display shape shared by booked and planned records.
///
/// `amount` is always a non-negative magnitude; `kind` carries the
/// direction. Use [`UnifiedViewRecord::signed_amount`] for totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedViewRecord {
    pub id: ViewId,
    pub kind: Kind,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub category: String,
    pub date: NaiveDateTime,
    pub note: String,
    pub icon: &'static str,
    /// False when the record came from an abbreviated endpoint and must be
    /// fetched by id before editing.
    pub has_full: bool,
    pub auto_book: bool,
    pub coordinates: Option<Coordinates>,
    /// Due date of the planned template; occurrences keep it so that edits
    /// never move the template to the occurrence day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<NaiveDate>,
}

impl UnifiedViewRecord {
    pub fn is_planned(&self) -> bool {
        self.id.is_planned()
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// Expense negative, income positive.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            Kind::Expense => -self.amount,
            Kind::Income => self.amount,
        }
    }
}
