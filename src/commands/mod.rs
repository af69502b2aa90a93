// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use crate::api::FinanceApi;
use crate::error::ViewError;
use crate::geo::Locator;
use crate::models::ServiceResponse;
use crate::utils::{parse_date, parse_decimal, parse_kind};
use crate::view::{FilterCriteria, ViewController};

pub mod budgets;
pub mod categories;
pub mod exporter;
pub mod planned;
pub mod portfolio;
pub mod reports;
pub mod savings;
pub mod transactions;

/// A trimmed, non-empty string option.
pub fn opt<'a>(sub: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    sub.get_one::<String>(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// The backend message, or `fallback` when it sent none.
pub fn non_empty<'a>(message: &'a str, fallback: &'a str) -> &'a str {
    if message.trim().is_empty() {
        fallback
    } else {
        message
    }
}

/// Unwraps an accepted write into its payload and the line to print.
pub fn acknowledged<T>(
    envelope: ServiceResponse<T>,
    fallback: &str,
) -> Result<(Option<T>, String)> {
    let message = envelope.message.clone();
    let data = envelope.into_result()?;
    Ok((data, non_empty(&message, fallback).to_string()))
}

/// Builds the view filter from the shared `--search`/`--kind`/... options.
pub fn criteria_from(sub: &clap::ArgMatches) -> Result<FilterCriteria> {
    Ok(FilterCriteria {
        query: opt(sub, "search").unwrap_or_default().to_string(),
        kind: opt(sub, "kind").map(parse_kind).transpose()?,
        from: opt(sub, "from").map(parse_date).transpose()?,
        to: opt(sub, "to").map(parse_date).transpose()?,
        min: opt(sub, "min").map(parse_decimal).transpose()?,
        max: opt(sub, "max").map(parse_decimal).transpose()?,
        recurring: sub.get_flag("recurring"),
    })
}

/// Fetches and filters the view the way the shared options describe it.
pub async fn load_view<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let criteria = criteria_from(sub)?;
    let page = sub.get_one::<usize>("page").copied().unwrap_or(0);
    if criteria.is_active() {
        ctl.fetch_page(0).await;
        ctl.set_criteria(criteria).await;
        if page > 0 && !ctl.goto_page(page).await {
            bail!(
                "Page {} is out of range ({} page(s) match)",
                page,
                ctl.state().view().total_pages
            );
        }
    } else {
        ctl.fetch_page(page).await;
    }
    Ok(())
}

/// Prints the notice of a finished save or delete, or fails with it.
pub fn conclude<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    outcome: Result<bool, ViewError>,
) -> Result<()> {
    let done = outcome?;
    let message = ctl.take_notice().map(|n| n.message).unwrap_or_default();
    if !done {
        bail!(message);
    }
    println!("{}", message);
    Ok(())
}
