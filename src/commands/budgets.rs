// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::api::FinanceApi;
use crate::commands::{acknowledged, opt};
use crate::models::Budget;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use crate::view::CategoryDirectory;

pub async fn handle<A: FinanceApi>(
    api: &A,
    directory: &CategoryDirectory,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, directory, sub).await?,
        Some(("set", sub)) => set(api, directory, sub).await?,
        Some(("rm", sub)) => remove(api, sub).await?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BudgetRow {
    pub category_id: i64,
    pub category: String,
    pub amount: String,
}

pub fn budget_rows(budgets: &[Budget], directory: &CategoryDirectory) -> Vec<BudgetRow> {
    let mut rows: Vec<BudgetRow> = budgets
        .iter()
        .map(|b| BudgetRow {
            category_id: b.category_id,
            category: directory
                .name_of(b.category_id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", b.category_id)),
            amount: fmt_money(&b.amount),
        })
        .collect();
    rows.sort_by(|a, b| a.category.cmp(&b.category));
    rows
}

async fn list<A: FinanceApi>(
    api: &A,
    directory: &CategoryDirectory,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let page = sub.get_one::<usize>("page").copied().unwrap_or(0);
    let size = sub.get_one::<usize>("size").copied().unwrap_or(50);
    let data = api.budgets(page, size).await?.into_result()?;
    let budgets = data.map(|p| p.items).unwrap_or_default();
    let rows = budget_rows(&budgets, directory);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let table = rows
            .iter()
            .map(|r| vec![r.category_id.to_string(), r.category.clone(), r.amount.clone()])
            .collect();
        println!("{}", pretty_table(&["Id", "Category", "Budget"], table));
    }
    Ok(())
}

async fn set<A: FinanceApi>(
    api: &A,
    directory: &CategoryDirectory,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let category_id = *sub
        .get_one::<i64>("category-id")
        .context("--category-id is required")?;
    let amount = parse_decimal(opt(sub, "amount").context("--amount is required")?)?;
    let budget = Budget {
        category_id,
        amount: amount.abs(),
    };
    println!("{}", set_budget(api, directory, budget).await?);
    Ok(())
}

/// Saves one category budget and returns the line to print.
pub async fn set_budget<A: FinanceApi>(
    api: &A,
    directory: &CategoryDirectory,
    budget: Budget,
) -> Result<String> {
    let fallback = format!(
        "Budget set for {} = {}",
        directory.name_of(budget.category_id).unwrap_or("category"),
        fmt_money(&budget.amount)
    );
    let envelope = api.save_budgets(std::slice::from_ref(&budget)).await?;
    let (_, message) = acknowledged(envelope, &fallback)?;
    Ok(message)
}

async fn remove<A: FinanceApi>(api: &A, sub: &clap::ArgMatches) -> Result<()> {
    let ids: Vec<i64> = sub
        .get_many::<i64>("category-id")
        .map(|v| v.copied().collect())
        .unwrap_or_default();
    println!("{}", remove_budgets(api, &ids).await?);
    Ok(())
}

pub async fn remove_budgets<A: FinanceApi>(api: &A, ids: &[i64]) -> Result<String> {
    let envelope = api.delete_budgets(ids).await?;
    let (_, message) = acknowledged(envelope, &format!("Removed {} budget(s)", ids.len()))?;
    Ok(message)
}
