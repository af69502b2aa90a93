// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::api::FinanceApi;
use crate::commands::{acknowledged, conclude, load_view, opt};
use crate::geo::Locator;
use crate::models::QuickTxRequest;
use crate::utils::{
    fmt_money, fmt_signed, maybe_print_json, parse_date, parse_datetime, parse_decimal, parse_kind,
    pretty_table,
};
use crate::view::paging::{PageView, records_on};
use crate::view::{FilterCriteria, UnifiedViewRecord, ViewController, ViewId};

pub async fn handle<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(ctl, sub).await?,
        Some(("day", sub)) => day(ctl, sub).await?,
        Some(("show", sub)) => show(ctl, sub).await?,
        Some(("add", sub)) => add(ctl, sub).await?,
        Some(("quick", sub)) => quick(ctl, sub).await?,
        Some(("edit", sub)) => edit(ctl, sub).await?,
        Some(("rm", sub)) => remove(ctl, sub).await?,
        Some(("recent", sub)) => recent(ctl, sub).await?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    pub day: String,
    pub time: String,
    pub id: String,
    pub icon: String,
    pub category: String,
    pub amount: String,
    pub note: String,
    pub planned: bool,
}

impl From<&UnifiedViewRecord> for ViewRow {
    fn from(r: &UnifiedViewRecord) -> Self {
        Self {
            day: r.day().to_string(),
            time: r.date.format("%H:%M").to_string(),
            id: r.id.to_string(),
            icon: r.icon.to_string(),
            category: r.category.clone(),
            amount: fmt_signed(r.kind, &r.amount),
            note: r.note.clone(),
            planned: r.is_planned(),
        }
    }
}

/// Rows of the visible page, most recent day first.
pub fn view_rows(view: &PageView) -> Vec<ViewRow> {
    view.groups
        .iter_descending()
        .flat_map(|(_, records)| records.iter().map(ViewRow::from))
        .collect()
}

pub fn print_rows(rows: &[ViewRow]) {
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.day.clone(),
                r.time.clone(),
                r.id.clone(),
                format!("{} {}", r.icon, r.category),
                r.amount.clone(),
                r.note.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Day", "Time", "Id", "Category", "Amount", "Note"], data)
    );
}

async fn list<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    load_view(ctl, sub).await?;
    let view = ctl.state().view();
    let rows = view_rows(view);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        print_rows(&rows);
        println!(
            "Page {}/{} ({} matching)",
            view.page + 1,
            view.total_pages,
            view.filtered_count
        );
    }
    Ok(())
}

/// Records of the first page that fall on `date`, smallest amount first.
pub async fn day_records<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    date: NaiveDate,
    recurring: bool,
) -> Vec<UnifiedViewRecord> {
    ctl.fetch_page(0).await;
    let criteria = FilterCriteria {
        recurring,
        ..FilterCriteria::default()
    };
    ctl.set_criteria(criteria.on_day(date)).await;
    records_on(&ctl.state().filtered(), date)
}

async fn day<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let date = parse_date(opt(sub, "date").context("--date is required")?)?;
    let records = day_records(ctl, date, sub.get_flag("recurring")).await;
    let rows: Vec<ViewRow> = records.iter().map(ViewRow::from).collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        print_rows(&rows);
        let net: Decimal = records.iter().map(|r| r.signed_amount()).sum();
        println!("{} record(s), net {}", rows.len(), fmt_money(&net));
    }
    Ok(())
}

fn parse_id(sub: &clap::ArgMatches) -> Result<ViewId> {
    let raw = sub.get_one::<String>("id").context("--id is required")?;
    Ok(raw.parse::<ViewId>()?)
}

async fn show<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let record = ctl.locate(parse_id(sub)?).await?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &record)? {
        let coords = record
            .coordinates
            .map(|c| format!("{:.6}, {:.6}", c.latitude, c.longitude))
            .unwrap_or_default();
        let data = vec![
            vec!["Id".to_string(), record.id.to_string()],
            vec!["Kind".to_string(), record.kind.to_string()],
            vec!["Amount".to_string(), fmt_signed(record.kind, &record.amount)],
            vec![
                "Category".to_string(),
                format!("{} {}", record.icon, record.category),
            ],
            vec![
                "Date".to_string(),
                record.date.format("%Y-%m-%d %H:%M").to_string(),
            ],
            vec!["Note".to_string(), record.note.clone()],
            vec!["Location".to_string(), coords],
        ];
        println!("{}", pretty_table(&["Field", "Value"], data));
    }
    ctl.open_view(record);
    Ok(())
}

async fn add<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let kind = parse_kind(opt(sub, "kind").context("--kind is required")?)?;
    let amount = parse_decimal(opt(sub, "amount").context("--amount is required")?)?;
    let category_id = sub.get_one::<i64>("category-id").copied();
    let timestamp = opt(sub, "at").map(parse_datetime).transpose()?;

    ctl.open_new_tx(Local::now().naive_local());
    let form = ctl.tx_form_mut().context("transaction form did not open")?;
    form.kind = kind;
    form.amount = Some(amount);
    form.category_id = category_id;
    if let Some(ts) = timestamp {
        form.timestamp = Some(ts);
    }
    form.note = opt(sub, "note").unwrap_or_default().to_string();
    form.use_geo = sub.get_flag("geo");
    let outcome = ctl.save_new().await;
    conclude(ctl, outcome)
}

async fn quick<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let request = QuickTxRequest {
        kind: parse_kind(opt(sub, "kind").context("--kind is required")?)?,
        amount: parse_decimal(opt(sub, "amount").context("--amount is required")?)?.abs(),
        category_id: sub.get_one::<i64>("category-id").copied(),
        tx_time: Local::now().naive_local(),
    };
    let (created, message) = acknowledged(ctl.api().quick_add(&request).await?, "Added")?;
    match created {
        Some(tx) => println!("{} (id {})", message, tx.id),
        None => println!("{}", message),
    }
    Ok(())
}

async fn edit<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = parse_id(sub)?;
    let record = ctl.locate(id).await?;
    if !ctl.open_edit(&record).await {
        let message = ctl.take_notice().map(|n| n.message).unwrap_or_default();
        bail!(message);
    }

    let kind = opt(sub, "kind").map(parse_kind).transpose()?;
    let amount = opt(sub, "amount").map(parse_decimal).transpose()?;
    let category_id = sub.get_one::<i64>("category-id").copied();

    if id.is_planned() {
        let due = opt(sub, "due").map(parse_date).transpose()?;
        let form = ctl.plan_form_mut().context("plan form did not open")?;
        form.kind = kind.unwrap_or(form.kind);
        form.amount = amount.or(form.amount);
        form.category_id = category_id.or(form.category_id);
        if let Some(title) = opt(sub, "title") {
            form.title = title.to_string();
        }
        form.due_date = due.or(form.due_date);
        if let Some(auto_book) = sub.get_one::<bool>("auto-book") {
            form.auto_book = *auto_book;
        }
    } else {
        let at = opt(sub, "at").map(parse_datetime).transpose()?;
        let form = ctl.tx_form_mut().context("transaction form did not open")?;
        form.kind = kind.unwrap_or(form.kind);
        form.amount = amount.or(form.amount);
        form.category_id = category_id.or(form.category_id);
        form.timestamp = at.or(form.timestamp);
        if let Some(note) = sub.get_one::<String>("note") {
            form.note = note.trim().to_string();
        }
        if sub.get_flag("geo") {
            form.use_geo = true;
        }
    }
    let outcome = ctl.save_edit().await;
    conclude(ctl, outcome)
}

async fn remove<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let record = ctl.locate(parse_id(sub)?).await?;
    ctl.open_delete(record);
    let outcome = ctl.confirm_delete().await;
    conclude(ctl, outcome)
}

async fn recent<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(5);
    let records = ctl.recent(limit).await?;
    let rows: Vec<ViewRow> = records.iter().map(ViewRow::from).collect();
    print_rows(&rows);
    Ok(())
}
