// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use brokee::api::{ApiResult, FinanceApi};
use brokee::error::ApiError;
use brokee::geo::StaticLocation;
use brokee::models::{
    Budget, Category, CategorySpend, ExchangeLink, ExpenseSeries, FullTxRequest, LocationSpend,
    LooseNumber, MonthFlow, Page, PlannedQuery, PlannedTxRequest, PlannedTxResponse, Portfolio,
    QuickTxRequest, SavingsGoal, SavingsGoalRequest, ServiceResponse, TxResponse,
};
use brokee::view::ViewController;
use chrono::NaiveDate;

/// In-memory backend. Lists come back unfiltered; writes are recorded.
#[derive(Default)]
pub struct FakeApi {
    pub categories: Vec<Category>,
    pub booked: Vec<TxResponse>,
    /// Overrides the reported total; defaults to `booked.len()`.
    pub total: Option<u64>,
    pub planned: Vec<PlannedTxResponse>,
    /// Full payloads served by the by-id endpoint.
    pub details: HashMap<i64, TxResponse>,
    pub fail_booked: bool,
    pub fail_planned: bool,
    pub fail_balance: bool,
    pub fail_recent: bool,
    pub flows: Vec<MonthFlow>,
    pub places: Vec<LocationSpend>,
    pub series: ExpenseSeries,
    pub breakdown: Vec<CategorySpend>,
    pub link: Option<ExchangeLink>,
    pub portfolio: Option<Portfolio>,
    /// When set, every write is answered with `success: false` and this message.
    pub reject_writes: Option<String>,
    pub write_message: String,
    pub calls: Mutex<Vec<String>>,
    pub tx_writes: Mutex<Vec<(Option<i64>, FullTxRequest)>>,
    pub plan_writes: Mutex<Vec<(Option<i64>, PlannedTxRequest)>>,
    pub budget_writes: Mutex<Vec<Budget>>,
    pub goal_writes: Mutex<Vec<SavingsGoalRequest>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn write<T>(&self, data: T) -> ApiResult<T> {
        match &self.reject_writes {
            Some(message) => Ok(ServiceResponse::rejected(400, message.clone())),
            None => Ok(ServiceResponse::ok(self.write_message.clone(), data)),
        }
    }
}

impl FinanceApi for FakeApi {
    async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.log("categories".into());
        Ok(ServiceResponse::ok("", self.categories.clone()))
    }

    async fn transactions_page(&self, page: usize, size: usize) -> ApiResult<Page<TxResponse>> {
        self.log(format!("transactions_page {}", page));
        if self.fail_booked {
            return Err(ApiError::transport("connection refused"));
        }
        let items = self
            .booked
            .iter()
            .skip(page * size)
            .take(size)
            .cloned()
            .collect();
        Ok(ServiceResponse::ok(
            "",
            Page {
                items,
                page: page as u32,
                size: size as u32,
                total: self.total.unwrap_or(self.booked.len() as u64),
            },
        ))
    }

    async fn recent_transactions(&self, limit: usize) -> ApiResult<Vec<TxResponse>> {
        self.log(format!("recent {}", limit));
        if self.fail_recent {
            return Err(ApiError::transport("connection reset"));
        }
        Ok(ServiceResponse::ok(
            "",
            self.booked.iter().take(limit).cloned().collect(),
        ))
    }

    async fn transaction(&self, id: i64) -> ApiResult<TxResponse> {
        self.log(format!("transaction {}", id));
        let found = self
            .details
            .get(&id)
            .or_else(|| self.booked.iter().find(|t| t.id == id));
        Ok(match found {
            Some(tx) => ServiceResponse::ok("", tx.clone()),
            None => ServiceResponse::rejected(404, "Transaction not found"),
        })
    }

    async fn create_transaction(&self, request: &FullTxRequest) -> ApiResult<TxResponse> {
        self.log("create_transaction".into());
        self.tx_writes.lock().unwrap().push((None, request.clone()));
        self.write(TxResponse {
            id: 99,
            ..TxResponse::default()
        })
    }

    async fn quick_add(&self, request: &QuickTxRequest) -> ApiResult<TxResponse> {
        self.log(format!("quick_add {}", request.amount));
        self.write(TxResponse {
            id: 98,
            ..TxResponse::default()
        })
    }

    async fn update_transaction(&self, id: i64, request: &FullTxRequest) -> ApiResult<TxResponse> {
        self.log(format!("update_transaction {}", id));
        self.tx_writes.lock().unwrap().push((Some(id), request.clone()));
        self.write(TxResponse {
            id,
            ..TxResponse::default()
        })
    }

    async fn delete_transaction(&self, id: i64) -> ApiResult<bool> {
        self.log(format!("delete_transaction {}", id));
        self.write(true)
    }

    async fn balance(&self) -> ApiResult<LooseNumber> {
        self.log("balance".into());
        if self.fail_balance {
            return Ok(ServiceResponse::rejected(500, "Balance unavailable"));
        }
        Ok(ServiceResponse::ok("", LooseNumber::Text("1234.50".into())))
    }

    async fn planned_transactions(&self, query: &PlannedQuery) -> ApiResult<Vec<PlannedTxResponse>> {
        let window = match (query.due_from, query.due_to) {
            (Some(from), Some(to)) => format!("{}..{}", from, to),
            _ => "all".to_string(),
        };
        self.log(format!("planned {}", window));
        if self.fail_planned {
            return Err(ApiError::transport("timed out"));
        }
        Ok(ServiceResponse::ok("", self.planned.clone()))
    }

    async fn create_planned(&self, request: &PlannedTxRequest) -> ApiResult<PlannedTxResponse> {
        self.log("create_planned".into());
        self.plan_writes.lock().unwrap().push((None, request.clone()));
        self.write(PlannedTxResponse {
            id: 77,
            ..PlannedTxResponse::default()
        })
    }

    async fn update_planned(
        &self,
        id: i64,
        request: &PlannedTxRequest,
    ) -> ApiResult<PlannedTxResponse> {
        self.log(format!("update_planned {}", id));
        self.plan_writes.lock().unwrap().push((Some(id), request.clone()));
        self.write(PlannedTxResponse {
            id,
            ..PlannedTxResponse::default()
        })
    }

    async fn delete_planned(&self, id: i64) -> ApiResult<bool> {
        self.log(format!("delete_planned {}", id));
        self.write(true)
    }

    async fn budgets(&self, page: usize, size: usize) -> ApiResult<Page<Budget>> {
        self.log(format!("budgets {}", page));
        Ok(ServiceResponse::ok(
            "",
            Page {
                items: Vec::new(),
                page: page as u32,
                size: size as u32,
                total: 0,
            },
        ))
    }

    async fn save_budgets(&self, budgets: &[Budget]) -> ApiResult<Vec<Budget>> {
        self.log("save_budgets".into());
        self.budget_writes.lock().unwrap().extend_from_slice(budgets);
        self.write(budgets.to_vec())
    }

    async fn delete_budgets(&self, category_ids: &[i64]) -> ApiResult<bool> {
        self.log(format!("delete_budgets {:?}", category_ids));
        self.write(true)
    }

    async fn savings_goal(&self) -> ApiResult<SavingsGoal> {
        self.log("savings_goal".into());
        Ok(ServiceResponse::rejected(404, "No savings goal"))
    }

    async fn save_savings_goal(&self, request: &SavingsGoalRequest) -> ApiResult<SavingsGoal> {
        self.log("save_savings_goal".into());
        self.goal_writes.lock().unwrap().push(request.clone());
        self.write(SavingsGoal {
            user_sub: None,
            target_amt: request.target_amt,
            target_date: request.target_date,
        })
    }

    async fn delete_savings_goal(&self) -> ApiResult<bool> {
        self.log("delete_savings_goal".into());
        self.write(true)
    }

    async fn spending_vs_income(&self, year: i32) -> ApiResult<Vec<MonthFlow>> {
        self.log(format!("spending_vs_income {}", year));
        Ok(ServiceResponse::ok("", self.flows.clone()))
    }

    async fn top_locations(&self, limit: usize) -> ApiResult<Vec<LocationSpend>> {
        self.log(format!("top_locations {}", limit));
        Ok(ServiceResponse::ok("", self.places.iter().take(limit).cloned().collect()))
    }

    async fn daily_expenses(&self, days: u32) -> ApiResult<ExpenseSeries> {
        self.log(format!("daily_expenses {}", days));
        Ok(ServiceResponse::ok("", self.series.clone()))
    }

    async fn monthly_expenses(&self, year: i32) -> ApiResult<ExpenseSeries> {
        self.log(format!("monthly_expenses {}", year));
        Ok(ServiceResponse::ok("", self.series.clone()))
    }

    async fn category_breakdown(&self, month: &str) -> ApiResult<Vec<CategorySpend>> {
        self.log(format!("category_breakdown {}", month));
        Ok(ServiceResponse::ok("", self.breakdown.clone()))
    }

    async fn exchange_link(&self) -> ApiResult<ExchangeLink> {
        self.log("exchange_link".into());
        Ok(match &self.link {
            Some(link) => ServiceResponse::ok("", link.clone()),
            None => ServiceResponse::rejected(404, "No Binance account linked"),
        })
    }

    async fn portfolio(&self, currency: &str) -> ApiResult<Portfolio> {
        self.log(format!("portfolio {}", currency));
        Ok(match &self.portfolio {
            Some(p) => ServiceResponse::ok("", p.clone()),
            None => ServiceResponse::rejected(404, "No Binance account linked"),
        })
    }
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn booked(id: i64, kind: &str, amount: &str, when: &str, category_id: Option<i64>) -> TxResponse {
    TxResponse {
        id,
        kind: kind.to_string(),
        amount: Some(LooseNumber::Text(amount.to_string())),
        category_id,
        tx_time: Some(when.to_string()),
        ..TxResponse::default()
    }
}

pub fn planned(id: i64, title: &str, amount: &str, due: &str) -> PlannedTxResponse {
    PlannedTxResponse {
        id,
        kind: "E".to_string(),
        category_id: Some(3),
        title: title.to_string(),
        amount: Some(LooseNumber::Text(amount.to_string())),
        due_date: Some(due.to_string()),
        auto_book: false,
        rule: None,
    }
}

/// The two-record set used across the view tests: booked `1` and planned `p-7`.
pub fn scenario_api() -> FakeApi {
    FakeApi {
        categories: vec![
            Category {
                id: 1,
                name: "Groceries".to_string(),
            },
            Category {
                id: 3,
                name: "Rent".to_string(),
            },
        ],
        booked: vec![booked(1, "E", "45", "2025-07-20T09:15:00", Some(1))],
        planned: vec![planned(7, "Rent", "700", "2025-08-01")],
        write_message: "Saved!".to_string(),
        ..FakeApi::default()
    }
}

pub fn controller(api: FakeApi) -> ViewController<FakeApi, StaticLocation> {
    ViewController::new(api, StaticLocation(None), 10, Duration::from_secs(10))
        .with_reference_date(d(2025, 7, 20))
}
