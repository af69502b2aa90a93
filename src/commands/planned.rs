// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::api::FinanceApi;
use crate::commands::{conclude, opt};
use crate::geo::Locator;
use crate::models::PlannedQuery;
use crate::utils::{
    fmt_signed, maybe_print_json, parse_date, parse_decimal, parse_kind, pretty_table,
};
use crate::view::mapper::map_planned;
use crate::view::{Frequency, RecurringRule, ViewController};

pub async fn handle<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(ctl, sub).await?,
        Some(("add", sub)) => add(ctl, sub).await?,
        Some(("project", sub)) => project(sub)?,
        _ => {}
    }
    Ok(())
}

pub fn query_from(sub: &clap::ArgMatches) -> Result<PlannedQuery> {
    Ok(PlannedQuery {
        title: opt(sub, "title").map(str::to_string),
        due_from: opt(sub, "from").map(parse_date).transpose()?,
        due_to: opt(sub, "to").map(parse_date).transpose()?,
        kind: opt(sub, "kind").map(parse_kind).transpose()?,
        min: opt(sub, "min").map(parse_decimal).transpose()?,
        max: opt(sub, "max").map(parse_decimal).transpose()?,
        category: opt(sub, "category").map(str::to_string),
    })
}

#[derive(Debug, Serialize)]
struct PlanRow {
    id: String,
    due: String,
    title: String,
    amount: String,
    auto_book: bool,
}

async fn list<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let query = query_from(sub)?;
    let plans = ctl
        .api()
        .planned_transactions(&query)
        .await?
        .into_result()?
        .unwrap_or_default();
    let mut records: Vec<_> = plans.iter().filter_map(map_planned).collect();
    records.sort_by_key(|r| r.date);
    let rows: Vec<PlanRow> = records
        .iter()
        .map(|r| PlanRow {
            id: r.id.to_string(),
            due: r.day().to_string(),
            title: format!("{} {}", r.icon, r.category),
            amount: fmt_signed(r.kind, &r.amount),
            auto_book: r.auto_book,
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.due.clone(),
                    r.title.clone(),
                    r.amount.clone(),
                    if r.auto_book { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Due", "Title", "Amount", "Auto-book"], data)
        );
    }
    Ok(())
}

async fn add<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let kind = parse_kind(opt(sub, "kind").context("--kind is required")?)?;
    let amount = parse_decimal(opt(sub, "amount").context("--amount is required")?)?;
    let due = parse_date(opt(sub, "due").context("--due is required")?)?;

    ctl.open_new_plan();
    let form = ctl.plan_form_mut().context("plan form did not open")?;
    form.kind = kind;
    form.amount = Some(amount);
    form.category_id = sub.get_one::<i64>("category-id").copied();
    form.title = opt(sub, "title").unwrap_or_default().to_string();
    form.due_date = Some(due);
    form.auto_book = sub.get_flag("auto-book");
    let outcome = ctl.save_new().await;
    conclude(ctl, outcome)
}

/// Dates the rule described by `sub` falls on inside `--from..=--to`.
pub fn projection(sub: &clap::ArgMatches) -> Result<(RecurringRule, Vec<NaiveDate>)> {
    let frequency = opt(sub, "frequency")
        .context("--frequency is required")?
        .parse::<Frequency>()
        .map_err(anyhow::Error::msg)?;
    let interval = sub.get_one::<u32>("interval").copied().unwrap_or(1);
    let until = opt(sub, "until").map(parse_date).transpose()?;
    let rule = RecurringRule::new(frequency, interval, until)?;
    let anchor = parse_date(opt(sub, "anchor").context("--anchor is required")?)?;
    let from = parse_date(opt(sub, "from").context("--from is required")?)?;
    let to = parse_date(opt(sub, "to").context("--to is required")?)?;
    let dates = rule.project(anchor, from, to).collect();
    Ok((rule, dates))
}

fn project(sub: &clap::ArgMatches) -> Result<()> {
    let (rule, dates) = projection(sub)?;
    let shown: Vec<String> = dates.iter().map(NaiveDate::to_string).collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &shown)? {
        let data = dates
            .iter()
            .enumerate()
            .map(|(i, d)| vec![(i + 1).to_string(), d.to_string(), d.format("%a").to_string()])
            .collect();
        println!("{}", pretty_table(&["#", "Date", "Weekday"], data));
        println!("{} occurrence(s), {}", dates.len(), rule.label());
    }
    Ok(())
}
