// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::api::FinanceApi;
use crate::commands::opt;
use crate::models::{MarketCoin, Portfolio};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

const DEFAULT_CURRENCY: &str = "EUR";

pub async fn handle<A: FinanceApi>(api: &A, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(api, sub).await?,
        Some(("link", sub)) => link(api, sub).await?,
        _ => {}
    }
    Ok(())
}

/// Upper-cases a three letter currency code.
pub fn currency_code(raw: Option<&str>) -> Result<String> {
    let code = raw.unwrap_or(DEFAULT_CURRENCY);
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        bail!("Invalid currency '{}', expected a code such as EUR", code);
    }
    Ok(code.to_ascii_uppercase())
}

/// Hides all but the last four characters of an exchange key.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingRow {
    pub symbol: String,
    pub quantity: Decimal,
    pub locked: Decimal,
    pub value: Decimal,
    pub trades: usize,
}

/// Holdings by value, largest first.
pub fn holding_rows(portfolio: &Portfolio) -> Vec<HoldingRow> {
    let mut rows: Vec<HoldingRow> = portfolio
        .my_coins
        .iter()
        .map(|c| HoldingRow {
            symbol: c.symbol.clone(),
            quantity: c.free + c.locked,
            locked: c.locked,
            value: c.value,
            trades: c.trades.len(),
        })
        .collect();
    rows.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.symbol.cmp(&b.symbol)));
    rows
}

#[derive(Debug, Serialize)]
struct PortfolioView<'a> {
    currency: &'a str,
    total: Decimal,
    holdings: Vec<HoldingRow>,
    market: &'a [MarketCoin],
}

async fn show<A: FinanceApi>(api: &A, sub: &clap::ArgMatches) -> Result<()> {
    let currency = currency_code(opt(sub, "currency"))?;
    let Some(portfolio) = api.portfolio(&currency).await?.into_result()? else {
        bail!("No portfolio returned; link an exchange account first");
    };
    let view = PortfolioView {
        currency: &currency,
        total: portfolio.total_value,
        holdings: holding_rows(&portfolio),
        market: &portfolio.top_market_coins,
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        return Ok(());
    }

    let data = view
        .holdings
        .iter()
        .map(|h| {
            vec![
                h.symbol.clone(),
                format!("{:.8}", h.quantity.normalize()),
                format!("{:.8}", h.locked.normalize()),
                fmt_money(&h.value),
                h.trades.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Coin", "Qty", "Locked", currency.as_str(), "Trades"], data)
    );
    println!("Total: {} {}", fmt_money(&view.total), currency);

    if !view.market.is_empty() {
        let market = view
            .market
            .iter()
            .map(|c| {
                vec![
                    c.symbol.clone(),
                    c.last_price.normalize().to_string(),
                    format!("{}%", c.price_change_percent.round_dp(2)),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Market", "Last", "24h"], market));
    }
    Ok(())
}

async fn link<A: FinanceApi>(api: &A, sub: &clap::ArgMatches) -> Result<()> {
    match api.exchange_link().await?.into_result()? {
        Some(link) => {
            let masked = mask_key(&link.api_key);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &masked)? {
                println!(
                    "Linked key {} (since {})",
                    masked,
                    link.created_at.as_deref().unwrap_or("unknown")
                );
            }
        }
        None => println!("No exchange account linked"),
    }
    Ok(())
}
