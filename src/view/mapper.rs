// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Parse-at-the-boundary conversion of backend records into view records.
//!
//! A record with an unknown kind code, an unparseable amount or an
//! unparseable date maps to `None` and is left out of the view.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use crate::geo::Coordinates;
use crate::models::{Kind, PlannedTxResponse, TxResponse};
use crate::view::directory::CategoryDirectory;
use crate::view::icons::icon_for;
use crate::view::record::{UnifiedViewRecord, ViewId};
use crate::view::recurrence::RecurringRule;

const FALLBACK_CATEGORY: &str = "General";

/// Parses the timestamp shapes the backend emits. Offset-carrying values are
/// converted to local time; naive values are taken as local already.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

pub fn map_booked(
    tx: &TxResponse,
    directory: &CategoryDirectory,
    has_full: bool,
) -> Option<UnifiedViewRecord> {
    let record = try_map_booked(tx, directory, has_full);
    if record.is_none() {
        warn!(id = tx.id, "dropping malformed booked transaction");
    }
    record
}

fn try_map_booked(
    tx: &TxResponse,
    directory: &CategoryDirectory,
    has_full: bool,
) -> Option<UnifiedViewRecord> {
    let kind = Kind::from_code(&tx.kind)?;
    let amount = tx.amount.as_ref()?.to_decimal()?.abs();
    let date = parse_timestamp(tx.tx_time.as_deref()?)?;
    let category = tx
        .category_id
        .and_then(|id| directory.name_of(id))
        .or(tx.location_name.as_deref().filter(|n| !n.trim().is_empty()))
        .unwrap_or(FALLBACK_CATEGORY)
        .to_string();
    let coordinates = match (tx.latitude, tx.longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };
    Some(UnifiedViewRecord {
        id: ViewId::Booked(tx.id),
        kind,
        amount,
        category_id: tx.category_id,
        icon: icon_for(Some(&category)),
        category,
        date,
        note: tx.note.clone().unwrap_or_default(),
        has_full,
        auto_book: false,
        coordinates,
        anchor: None,
    })
}

pub fn map_planned(plan: &PlannedTxResponse) -> Option<UnifiedViewRecord> {
    let record = try_map_planned(plan);
    if record.is_none() {
        warn!(id = plan.id, "dropping malformed planned transaction");
    }
    record
}

fn try_map_planned(plan: &PlannedTxResponse) -> Option<UnifiedViewRecord> {
    let kind = Kind::from_code(&plan.kind)?;
    let amount = plan.amount.as_ref()?.to_decimal()?.abs();
    let date = parse_timestamp(plan.due_date.as_deref()?)?;
    Some(UnifiedViewRecord {
        id: ViewId::Planned(plan.id),
        kind,
        amount,
        category_id: plan.category_id,
        category: plan.title.clone(),
        date,
        note: String::new(),
        icon: icon_for(Some(&plan.title)),
        has_full: true,
        auto_book: plan.auto_book,
        coordinates: None,
        anchor: Some(date.date()),
    })
}

/// Maps a planned transaction and, when it carries a recurrence rule,
/// expands it into one record per occurrence inside the window.
pub fn expand_planned(
    plan: &PlannedTxResponse,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<UnifiedViewRecord> {
    let Some(base) = map_planned(plan) else {
        return Vec::new();
    };
    let Some(raw_rule) = plan.rule.as_ref() else {
        return vec![base];
    };
    let end_date = match raw_rule.end_date.as_deref() {
        Some(raw) => match parse_timestamp(raw) {
            Some(end) => Some(end.date()),
            None => {
                warn!(id = plan.id, end = raw, "ignoring rule with malformed end date");
                return vec![base];
            }
        },
        None => None,
    };
    let rule = match RecurringRule::new(raw_rule.frequency, raw_rule.interval, end_date) {
        Ok(rule) => rule,
        Err(err) => {
            warn!(id = plan.id, %err, "ignoring invalid recurrence rule");
            return vec![base];
        }
    };
    let time = base.date.time();
    rule.project(base.day(), window_start, window_end)
        .map(|day| UnifiedViewRecord {
            date: day.and_time(time),
            ..base.clone()
        })
        .collect()
}
