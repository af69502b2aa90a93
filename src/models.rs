// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Wire shapes exchanged with the finance backend.
//!
//! Response types are loose (amounts may arrive as strings or numbers,
//! kinds as one-letter codes, dates as strings); they are validated once, in
//! [`crate::view::mapper`], and never trusted past that point. List payloads
//! are decoded item by item with [`keep_decodable`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::error::ApiError;
use crate::view::recurrence::Frequency;

/// Uniform envelope every endpoint answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status_code: u16,
    pub data: Option<T>,
}

impl<T> ServiceResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            status_code: 200,
            data: Some(data),
        }
    }

    pub fn rejected(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status_code,
            data: None,
        }
    }

    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> ServiceResponse<U> {
        ServiceResponse {
            success: self.success,
            message: self.message,
            status_code: self.status_code,
            data: self.data.map(f),
        }
    }

    /// Branches on `success` only; `status_code` is informational.
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected {
                status: self.status_code,
                message: self.message,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total: u64,
}

impl<T> Page<T> {
    pub fn map_items<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> Page<U> {
        Page {
            items: f(self.items),
            page: self.page,
            size: self.size,
            total: self.total,
        }
    }
}

/// Decodes list items one by one. An item that does not fit `T` is logged
/// and left out; the rest of the list survives.
pub fn keep_decodable<T: DeserializeOwned>(raw: Vec<serde_json::Value>) -> Vec<T> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(index, %err, "dropping undecodable list item");
                None
            }
        })
        .collect()
}

/// Direction of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Expense,
    Income,
}

impl Kind {
    /// One-letter code used on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Kind::Expense => "E",
            Kind::Income => "I",
        }
    }

    pub fn from_code(code: &str) -> Option<Kind> {
        match code.trim() {
            "E" | "e" => Some(Kind::Expense),
            "I" | "i" => Some(Kind::Income),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Expense => "expense",
            Kind::Income => "income",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "e" => Ok(Kind::Expense),
            "income" | "i" => Ok(Kind::Income),
            other => Err(format!("Unknown kind '{}', expected expense|income", other)),
        }
    }
}

fn kind_code<S: Serializer>(kind: &Kind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.code())
}

/// A number the backend may send as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(serde_json::Number),
    Text(String),
}

impl LooseNumber {
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            LooseNumber::Number(n) => n
                .to_string()
                .parse::<Decimal>()
                .ok()
                .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
            LooseNumber::Text(s) => s.trim().parse::<Decimal>().ok(),
        }
    }
}

impl From<Decimal> for LooseNumber {
    fn from(value: Decimal) -> Self {
        LooseNumber::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Booked transaction as returned by list, recent and by-id endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResponse {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub amount: Option<LooseNumber>,
    pub category_id: Option<i64>,
    pub tx_time: Option<String>,
    pub location_name: Option<String>,
    pub note: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResponse {
    pub frequency: Frequency,
    pub interval: u32,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedTxResponse {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    pub amount: Option<LooseNumber>,
    pub due_date: Option<String>,
    #[serde(default)]
    pub auto_book: bool,
    pub rule: Option<RuleResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullTxRequest {
    #[serde(rename = "type", serialize_with = "kind_code")]
    pub kind: Kind,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category_id: i64,
    pub tx_time: NaiveDateTime,
    pub note: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickTxRequest {
    #[serde(rename = "type", serialize_with = "kind_code")]
    pub kind: Kind,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    pub tx_time: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedTxRequest {
    #[serde(rename = "type", serialize_with = "kind_code")]
    pub kind: Kind,
    pub category_id: i64,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub auto_book: bool,
}

/// Filters accepted by the planned-transaction list endpoint. Unset fields
/// are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannedQuery {
    pub title: Option<String>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
    pub kind: Option<Kind>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub category: Option<String>,
}

impl PlannedQuery {
    pub fn window(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            due_from: Some(from),
            due_to: Some(to),
            ..Self::default()
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("title", title.to_string()));
        }
        if let Some(from) = self.due_from {
            pairs.push(("dueFrom", from.to_string()));
        }
        if let Some(to) = self.due_to {
            pairs.push(("dueTo", to.to_string()));
        }
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.code().to_string()));
        }
        if let Some(min) = self.min {
            pairs.push(("min", min.to_string()));
        }
        if let Some(max) = self.max {
            pairs.push(("max", max.to_string()));
        }
        if let Some(cat) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", cat.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub category_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    #[serde(default)]
    pub user_sub: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amt: Decimal,
    pub target_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amt: Decimal,
    pub target_date: NaiveDate,
}

/// Expense and income totals of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthFlow {
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
}

/// A place money was spent at, with the amount spent there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSpend {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpend {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Expense totals keyed by day (`YYYY-MM-DD`) or month (`YYYY-MM`).
pub type ExpenseSeries = BTreeMap<String, LooseNumber>;

/// Exchange account linked for portfolio tracking. The secret is never read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeLink {
    pub id: i64,
    pub api_key: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketCoin {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub last_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_change_percent: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub quote_volume: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinTrade {
    pub symbol: String,
    pub id: i64,
    pub price: String,
    pub qty: String,
    /// Milliseconds since the epoch.
    pub time: i64,
    pub is_buyer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinHolding {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub free: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub locked: Decimal,
    /// Value in the currency the portfolio was requested in.
    #[serde(rename = "eurValue", with = "rust_decimal::serde::float")]
    pub value: Decimal,
    #[serde(default)]
    pub trades: Vec<CoinTrade>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    #[serde(default)]
    pub top_market_coins: Vec<MarketCoin>,
    #[serde(default)]
    pub my_coins: Vec<CoinHolding>,
    #[serde(rename = "totalEurValue", with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
}
