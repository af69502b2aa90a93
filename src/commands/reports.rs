// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::api::FinanceApi;
use crate::commands::opt;
use crate::commands::transactions::{ViewRow, print_rows};
use crate::geo::Locator;
use crate::models::{CategorySpend, ExpenseSeries, LocationSpend, MonthFlow, PlannedQuery};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use crate::view::ViewController;
use crate::view::mapper::map_planned;

const RECENT_LIMIT: usize = 5;
const UPCOMING_DAYS: u64 = 30;

#[derive(Debug, Serialize)]
pub struct Summary {
    /// `None` when the balance could not be read.
    pub balance: Option<Decimal>,
    pub recent: Vec<ViewRow>,
    pub upcoming: Vec<ViewRow>,
    pub day_totals: Vec<(NaiveDate, Decimal)>,
}

/// Gathers the home overview. Every part degrades to empty on its own.
pub async fn build_summary<A: FinanceApi, L: Locator>(ctl: &mut ViewController<A, L>) -> Summary {
    ctl.fetch_page(0).await;
    let day_totals = ctl.state().view().groups.totals();

    let balance = match ctl.api().balance().await.and_then(|r| r.into_result()) {
        Ok(value) => value.and_then(|v| v.to_decimal()),
        Err(err) => {
            warn!(%err, "balance unavailable");
            None
        }
    };

    let recent = match ctl.recent(RECENT_LIMIT).await {
        Ok(records) => records.iter().map(ViewRow::from).collect(),
        Err(err) => {
            warn!(%err, "recent transactions unavailable");
            Vec::new()
        }
    };

    let today = ctl.today();
    let until = today
        .checked_add_days(Days::new(UPCOMING_DAYS))
        .unwrap_or(today);
    let query = PlannedQuery::window(today, until);
    let upcoming = match ctl
        .api()
        .planned_transactions(&query)
        .await
        .and_then(|r| r.into_result())
    {
        Ok(list) => {
            let mut records: Vec<_> = list
                .unwrap_or_default()
                .iter()
                .filter_map(map_planned)
                .collect();
            records.sort_by_key(|r| r.date);
            records.iter().map(ViewRow::from).collect()
        }
        Err(err) => {
            warn!(%err, "upcoming bills unavailable");
            Vec::new()
        }
    };

    Summary {
        balance,
        recent,
        upcoming,
        day_totals,
    }
}

pub async fn summary<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let summary = build_summary(ctl).await;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    match summary.balance {
        Some(b) => println!("Balance: {}", fmt_money(&b)),
        None => println!("Balance: unavailable"),
    }
    println!("\nRecent");
    print_rows(&summary.recent);
    println!("\nUpcoming ({} days)", UPCOMING_DAYS);
    print_rows(&summary.upcoming);
    let totals = summary
        .day_totals
        .iter()
        .map(|(day, total)| vec![day.to_string(), fmt_money(total)])
        .collect();
    println!("\nPer day");
    println!("{}", pretty_table(&["Day", "Net"], totals));
    Ok(())
}

/// `report` subcommands over the backend's analytics endpoints.
pub async fn handle<A: FinanceApi>(api: &A, today: NaiveDate, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("flow", sub)) => flow(api, today, sub).await?,
        Some(("locations", sub)) => locations(api, sub).await?,
        Some(("daily", sub)) => {
            let days = sub.get_one::<u32>("days").copied().unwrap_or(30);
            let series = api.daily_expenses(days).await?.into_result()?;
            print_series(sub, "Day", &series.unwrap_or_default())?;
        }
        Some(("monthly", sub)) => {
            let year = sub.get_one::<i32>("year").copied().unwrap_or(today.year());
            let series = api.monthly_expenses(year).await?.into_result()?;
            print_series(sub, "Month", &series.unwrap_or_default())?;
        }
        Some(("categories", sub)) => categories(api, today, sub).await?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowRow {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

/// Months in calendar order with income minus expenses.
pub fn flow_rows(flows: &[MonthFlow]) -> Vec<FlowRow> {
    let mut rows: Vec<FlowRow> = flows
        .iter()
        .map(|f| FlowRow {
            month: f.month.clone(),
            income: f.income,
            expenses: f.expenses.abs(),
            net: f.income - f.expenses.abs(),
        })
        .collect();
    rows.sort_by(|a, b| a.month.cmp(&b.month));
    rows
}

async fn flow<A: FinanceApi>(api: &A, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()> {
    let year = sub.get_one::<i32>("year").copied().unwrap_or(today.year());
    let flows = api.spending_vs_income(year).await?.into_result()?;
    let rows = flow_rows(&flows.unwrap_or_default());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.month.clone(),
                    fmt_money(&r.income),
                    fmt_money(&r.expenses),
                    fmt_money(&r.net),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expenses", "Net"], data)
        );
    }
    Ok(())
}

async fn locations<A: FinanceApi>(api: &A, sub: &clap::ArgMatches) -> Result<()> {
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(3);
    let places: Vec<LocationSpend> = api
        .top_locations(limit)
        .await?
        .into_result()?
        .unwrap_or_default();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &places)? {
        let data = places
            .iter()
            .map(|p| {
                vec![
                    p.label.clone(),
                    fmt_money(&p.amount),
                    format!("{:.5}, {:.5}", p.latitude, p.longitude),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Place", "Spent", "Position"], data));
    }
    Ok(())
}

/// Series points in key order. Points whose value is not a number are skipped.
pub fn series_rows(series: &ExpenseSeries) -> Vec<(String, Decimal)> {
    series
        .iter()
        .filter_map(|(key, value)| match value.to_decimal() {
            Some(amount) => Some((key.clone(), amount)),
            None => {
                warn!(key = %key, "skipping non-numeric series point");
                None
            }
        })
        .collect()
}

fn print_series(sub: &clap::ArgMatches, label: &str, series: &ExpenseSeries) -> Result<()> {
    let rows = series_rows(series);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let total: Decimal = rows.iter().map(|(_, v)| *v).sum();
        let data = rows
            .iter()
            .map(|(key, amount)| vec![key.clone(), fmt_money(amount)])
            .collect();
        println!("{}", pretty_table(&[label, "Spent"], data));
        println!("Total: {}", fmt_money(&total));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareRow {
    pub category: String,
    pub amount: Decimal,
    /// Percent of the month's total, one decimal place.
    pub share: Decimal,
}

/// Largest category first, each with its share of the total.
pub fn breakdown_rows(spends: &[CategorySpend]) -> Vec<ShareRow> {
    let total: Decimal = spends.iter().map(|s| s.amount.abs()).sum();
    let mut rows: Vec<ShareRow> = spends
        .iter()
        .map(|s| ShareRow {
            category: s.category.clone(),
            amount: s.amount.abs(),
            share: if total.is_zero() {
                Decimal::ZERO
            } else {
                (s.amount.abs() * Decimal::ONE_HUNDRED / total).round_dp(1)
            },
        })
        .collect();
    rows.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    rows
}

/// Normalises a `YYYY-MM` month key, defaulting to the month of `today`.
pub fn month_key(raw: Option<&str>, today: NaiveDate) -> Result<String> {
    let Some(raw) = raw else {
        return Ok(today.format("%Y-%m").to_string());
    };
    let first = NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", raw))?;
    Ok(first.format("%Y-%m").to_string())
}

async fn categories<A: FinanceApi>(
    api: &A,
    today: NaiveDate,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let month = month_key(opt(sub, "month"), today)?;
    let spends = api
        .category_breakdown(&month)
        .await?
        .into_result()?
        .unwrap_or_default();
    let rows = breakdown_rows(&spends);
    if rows.is_empty() && !sub.get_flag("json") && !sub.get_flag("jsonl") {
        bail!("No spending recorded for {}", month);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .iter()
            .map(|r| vec![r.category.clone(), fmt_money(&r.amount), format!("{}%", r.share)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], data));
    }
    Ok(())
}
