// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Edit and create forms behind the transaction modals.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::error::ViewError;
use crate::geo::Coordinates;
use crate::models::{FullTxRequest, Kind, PlannedTxRequest};
use crate::view::record::UnifiedViewRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct TxForm {
    /// `None` for a new transaction.
    pub id: Option<i64>,
    pub kind: Kind,
    pub amount: Option<Decimal>,
    pub category_id: Option<i64>,
    pub timestamp: Option<NaiveDateTime>,
    pub note: String,
    /// The user opted in to tagging the transaction with the device position.
    pub use_geo: bool,
    pub coordinates: Option<Coordinates>,
}

impl TxForm {
    pub fn blank(now: NaiveDateTime) -> Self {
        Self {
            id: None,
            kind: Kind::Expense,
            amount: None,
            category_id: None,
            timestamp: Some(now),
            note: String::new(),
            use_geo: false,
            coordinates: None,
        }
    }

    pub fn from_record(record: &UnifiedViewRecord) -> Self {
        Self {
            id: Some(record.id.raw()),
            kind: record.kind,
            amount: Some(record.amount),
            category_id: record.category_id,
            timestamp: Some(record.date),
            note: record.note.clone(),
            use_geo: record.coordinates.is_some(),
            coordinates: record.coordinates,
        }
    }

    pub fn to_request(&self) -> Result<FullTxRequest, ViewError> {
        let amount = self.amount.ok_or(ViewError::MissingField("amount"))?;
        let category_id = self
            .category_id
            .ok_or(ViewError::MissingField("categoryId"))?;
        let tx_time = self.timestamp.ok_or(ViewError::MissingField("date"))?;
        let coordinates = self.coordinates.filter(|_| self.use_geo);
        Ok(FullTxRequest {
            kind: self.kind,
            amount: amount.abs(),
            category_id,
            tx_time,
            note: self.note.trim().to_string(),
            latitude: coordinates.map(|c| c.latitude),
            longitude: coordinates.map(|c| c.longitude),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanForm {
    pub id: Option<i64>,
    pub kind: Kind,
    pub amount: Option<Decimal>,
    pub category_id: Option<i64>,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub auto_book: bool,
}

impl PlanForm {
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            id: None,
            kind: Kind::Expense,
            amount: None,
            category_id: None,
            title: String::new(),
            due_date: Some(today),
            auto_book: false,
        }
    }

    pub fn from_record(record: &UnifiedViewRecord) -> Self {
        Self {
            id: Some(record.id.raw()),
            kind: record.kind,
            amount: Some(record.amount),
            category_id: record.category_id,
            title: record.category.clone(),
            due_date: Some(record.anchor.unwrap_or_else(|| record.day())),
            auto_book: record.auto_book,
        }
    }

    pub fn to_request(&self) -> Result<PlannedTxRequest, ViewError> {
        let amount = self.amount.ok_or(ViewError::MissingField("amount"))?;
        let category_id = self
            .category_id
            .ok_or(ViewError::MissingField("categoryId"))?;
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ViewError::MissingField("title"));
        }
        let due_date = self.due_date.ok_or(ViewError::MissingField("dueDate"))?;
        Ok(PlannedTxRequest {
            kind: self.kind,
            category_id,
            title: title.to_string(),
            amount: amount.abs(),
            due_date,
            auto_book: self.auto_book,
        })
    }
}
