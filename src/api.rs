// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The backend contract and its HTTP implementation.
//!
//! Every call returns the backend's [`ServiceResponse`] envelope untouched so
//! callers can branch on `success` and surface `message`. `Err` is reserved
//! for transport and decoding failures.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{
    Budget, Category, CategorySpend, ExchangeLink, ExpenseSeries, FullTxRequest, LocationSpend,
    LooseNumber, MonthFlow, Page, PlannedQuery, PlannedTxRequest, PlannedTxResponse, Portfolio,
    QuickTxRequest, SavingsGoal, SavingsGoalRequest, ServiceResponse, TxResponse,
    keep_decodable,
};
use crate::utils::http_client;

pub type ApiResult<T> = Result<ServiceResponse<T>, ApiError>;

pub trait FinanceApi {
    fn categories(&self) -> impl Future<Output = ApiResult<Vec<Category>>> + Send;

    fn transactions_page(
        &self,
        page: usize,
        size: usize,
    ) -> impl Future<Output = ApiResult<Page<TxResponse>>> + Send;

    fn recent_transactions(
        &self,
        limit: usize,
    ) -> impl Future<Output = ApiResult<Vec<TxResponse>>> + Send;

    fn transaction(&self, id: i64) -> impl Future<Output = ApiResult<TxResponse>> + Send;

    fn create_transaction(
        &self,
        request: &FullTxRequest,
    ) -> impl Future<Output = ApiResult<TxResponse>> + Send;

    fn quick_add(
        &self,
        request: &QuickTxRequest,
    ) -> impl Future<Output = ApiResult<TxResponse>> + Send;

    fn update_transaction(
        &self,
        id: i64,
        request: &FullTxRequest,
    ) -> impl Future<Output = ApiResult<TxResponse>> + Send;

    fn delete_transaction(&self, id: i64) -> impl Future<Output = ApiResult<bool>> + Send;

    fn balance(&self) -> impl Future<Output = ApiResult<LooseNumber>> + Send;

    fn planned_transactions(
        &self,
        query: &PlannedQuery,
    ) -> impl Future<Output = ApiResult<Vec<PlannedTxResponse>>> + Send;

    fn create_planned(
        &self,
        request: &PlannedTxRequest,
    ) -> impl Future<Output = ApiResult<PlannedTxResponse>> + Send;

    fn update_planned(
        &self,
        id: i64,
        request: &PlannedTxRequest,
    ) -> impl Future<Output = ApiResult<PlannedTxResponse>> + Send;

    fn delete_planned(&self, id: i64) -> impl Future<Output = ApiResult<bool>> + Send;

    fn budgets(
        &self,
        page: usize,
        size: usize,
    ) -> impl Future<Output = ApiResult<Page<Budget>>> + Send;

    fn save_budgets(
        &self,
        budgets: &[Budget],
    ) -> impl Future<Output = ApiResult<Vec<Budget>>> + Send;

    fn delete_budgets(
        &self,
        category_ids: &[i64],
    ) -> impl Future<Output = ApiResult<bool>> + Send;

    fn savings_goal(&self) -> impl Future<Output = ApiResult<SavingsGoal>> + Send;

    fn save_savings_goal(
        &self,
        request: &SavingsGoalRequest,
    ) -> impl Future<Output = ApiResult<SavingsGoal>> + Send;

    fn delete_savings_goal(&self) -> impl Future<Output = ApiResult<bool>> + Send;

    fn spending_vs_income(
        &self,
        year: i32,
    ) -> impl Future<Output = ApiResult<Vec<MonthFlow>>> + Send;

    fn top_locations(
        &self,
        limit: usize,
    ) -> impl Future<Output = ApiResult<Vec<LocationSpend>>> + Send;

    fn daily_expenses(&self, days: u32) -> impl Future<Output = ApiResult<ExpenseSeries>> + Send;

    fn monthly_expenses(
        &self,
        year: i32,
    ) -> impl Future<Output = ApiResult<ExpenseSeries>> + Send;

    /// `month` is `YYYY-MM`.
    fn category_breakdown(
        &self,
        month: &str,
    ) -> impl Future<Output = ApiResult<Vec<CategorySpend>>> + Send;

    fn exchange_link(&self) -> impl Future<Output = ApiResult<ExchangeLink>> + Send;

    fn portfolio(&self, currency: &str) -> impl Future<Output = ApiResult<Portfolio>> + Send;
}

/// [`FinanceApi`] over the backend's JSON REST interface.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = http_client(Duration::from_secs(config.request_timeout_secs))?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.access_token.clone(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "backend request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch(&self, builder: RequestBuilder) -> Result<(u16, String), ApiError> {
        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.text().await?))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let (status, body) = self.fetch(builder).await?;
        decode_envelope(status, &body)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<Vec<T>> {
        let (status, body) = self.fetch(self.request(Method::GET, path).query(query)).await?;
        decode_list(status, &body)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<Page<T>> {
        let (status, body) = self.fetch(self.request(Method::GET, path).query(query)).await?;
        decode_page(status, &body)
    }

    async fn with_body<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.send(self.request(method, path).json(body)).await
    }
}

/// Decodes an envelope. Error statuses usually still carry one (with
/// `success: false`); only when they do not is the status itself reported.
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<T> {
    match serde_json::from_str::<ServiceResponse<T>>(body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !(200..300).contains(&status) => Err(ApiError::Status {
            status,
            message: body.trim().chars().take(200).collect(),
        }),
        Err(err) => Err(ApiError::Decode {
            message: err.to_string(),
        }),
    }
}

/// Decodes an envelope around a list; malformed items are dropped singly.
pub fn decode_list<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<Vec<T>> {
    Ok(decode_envelope::<Vec<serde_json::Value>>(status, body)?.map_data(keep_decodable))
}

/// Decodes an envelope around a page; malformed items are dropped singly.
pub fn decode_page<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<Page<T>> {
    Ok(decode_envelope::<Page<serde_json::Value>>(status, body)?
        .map_data(|page| page.map_items(keep_decodable)))
}

impl FinanceApi for HttpApi {
    async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.get_list("categories", &[]).await
    }

    async fn transactions_page(&self, page: usize, size: usize) -> ApiResult<Page<TxResponse>> {
        self.get_page(
            "transactions",
            &[("page", page.to_string()), ("size", size.to_string())],
        )
        .await
    }

    async fn recent_transactions(&self, limit: usize) -> ApiResult<Vec<TxResponse>> {
        self.get_list("transactions/recent", &[("limit", limit.to_string())])
            .await
    }

    async fn transaction(&self, id: i64) -> ApiResult<TxResponse> {
        self.get(&format!("transactions/{}", id), &[]).await
    }

    async fn create_transaction(&self, request: &FullTxRequest) -> ApiResult<TxResponse> {
        self.with_body(Method::POST, "transactions", request).await
    }

    async fn quick_add(&self, request: &QuickTxRequest) -> ApiResult<TxResponse> {
        self.with_body(Method::POST, "transactions/quick", request)
            .await
    }

    async fn update_transaction(&self, id: i64, request: &FullTxRequest) -> ApiResult<TxResponse> {
        self.with_body(Method::PATCH, &format!("transactions/{}", id), request)
            .await
    }

    async fn delete_transaction(&self, id: i64) -> ApiResult<bool> {
        self.send(self.request(Method::DELETE, &format!("transactions/{}", id)))
            .await
    }

    async fn balance(&self) -> ApiResult<LooseNumber> {
        self.get("transactions/balance", &[]).await
    }

    async fn planned_transactions(&self, query: &PlannedQuery) -> ApiResult<Vec<PlannedTxResponse>> {
        let pairs = query.to_query_pairs();
        self.get_list("planned-transactions", &pairs).await
    }

    async fn create_planned(&self, request: &PlannedTxRequest) -> ApiResult<PlannedTxResponse> {
        self.with_body(Method::POST, "planned-transactions", request)
            .await
    }

    async fn update_planned(
        &self,
        id: i64,
        request: &PlannedTxRequest,
    ) -> ApiResult<PlannedTxResponse> {
        self.with_body(Method::PUT, &format!("planned-transactions/{}", id), request)
            .await
    }

    async fn delete_planned(&self, id: i64) -> ApiResult<bool> {
        self.send(self.request(Method::DELETE, &format!("planned-transactions/{}", id)))
            .await
    }

    async fn budgets(&self, page: usize, size: usize) -> ApiResult<Page<Budget>> {
        self.get_page(
            "budgets",
            &[("page", page.to_string()), ("size", size.to_string())],
        )
        .await
    }

    async fn save_budgets(&self, budgets: &[Budget]) -> ApiResult<Vec<Budget>> {
        self.with_body(Method::POST, "budgets/bulk", budgets).await
    }

    async fn delete_budgets(&self, category_ids: &[i64]) -> ApiResult<bool> {
        self.with_body(Method::DELETE, "budgets", category_ids)
            .await
    }

    async fn savings_goal(&self) -> ApiResult<SavingsGoal> {
        self.get("savings", &[]).await
    }

    async fn save_savings_goal(&self, request: &SavingsGoalRequest) -> ApiResult<SavingsGoal> {
        self.with_body(Method::POST, "savings", request).await
    }

    async fn delete_savings_goal(&self) -> ApiResult<bool> {
        self.send(self.request(Method::DELETE, "savings")).await
    }

    async fn spending_vs_income(&self, year: i32) -> ApiResult<Vec<MonthFlow>> {
        self.get_list("transactions/spending-vs-income", &[("year", year.to_string())])
            .await
    }

    async fn top_locations(&self, limit: usize) -> ApiResult<Vec<LocationSpend>> {
        self.get_list("transactions/top-locations", &[("limit", limit.to_string())])
            .await
    }

    async fn daily_expenses(&self, days: u32) -> ApiResult<ExpenseSeries> {
        self.get("transactions/graph/daily", &[("days", days.to_string())])
            .await
    }

    async fn monthly_expenses(&self, year: i32) -> ApiResult<ExpenseSeries> {
        self.get("transactions/graph/monthly", &[("year", year.to_string())])
            .await
    }

    async fn category_breakdown(&self, month: &str) -> ApiResult<Vec<CategorySpend>> {
        self.get_list("transactions/category-breakdown", &[("month", month.to_string())])
            .await
    }

    async fn exchange_link(&self) -> ApiResult<ExchangeLink> {
        self.get("binance", &[]).await
    }

    async fn portfolio(&self, currency: &str) -> ApiResult<Portfolio> {
        self.get("binance/portfolio", &[("currency", currency.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_with_envelope_is_still_an_envelope() {
        let body = r#"{"success":false,"message":"Category not found","statusCode":404,"data":null}"#;
        let env: ServiceResponse<TxResponse> = decode_envelope(404, body).unwrap();
        assert!(!env.success);
        assert_eq!(env.message, "Category not found");
    }

    #[test]
    fn error_status_without_envelope() {
        let err = decode_envelope::<bool>(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 502,
                message: "<html>Bad Gateway</html>".to_string()
            }
        );
    }

    #[test]
    fn garbage_on_success_status_is_decode_error() {
        let err = decode_envelope::<bool>(200, "not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn urls_join_cleanly() {
        let cfg = AppConfig {
            api_url: "http://localhost:8080/api/".to_string(),
            ..AppConfig::default()
        };
        let api = HttpApi::new(&cfg).unwrap();
        assert_eq!(api.url("/transactions/3"), "http://localhost:8080/api/transactions/3");
        assert_eq!(api.url("budgets"), "http://localhost:8080/api/budgets");
    }
}
