// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::api::FinanceApi;
use crate::commands::{acknowledged, opt};
use crate::models::SavingsGoalRequest;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub async fn handle<A: FinanceApi>(api: &A, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            match api.savings_goal().await?.into_result()? {
                Some(goal) => {
                    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &goal)? {
                        let data = vec![vec![
                            fmt_money(&goal.target_amt),
                            goal.target_date.to_string(),
                        ]];
                        println!("{}", pretty_table(&["Target", "By"], data));
                    }
                }
                None => println!("No savings goal set"),
            }
        }
        Some(("set", sub)) => {
            let request = SavingsGoalRequest {
                target_amt: parse_decimal(opt(sub, "amount").context("--amount is required")?)?
                    .abs(),
                target_date: parse_date(opt(sub, "date").context("--date is required")?)?,
            };
            println!("{}", set_goal(api, &request).await?);
        }
        Some(("rm", _)) => println!("{}", remove_goal(api).await?),
        _ => {}
    }
    Ok(())
}

pub async fn set_goal<A: FinanceApi>(api: &A, request: &SavingsGoalRequest) -> Result<String> {
    let fallback = format!(
        "Savings goal set: {} by {}",
        fmt_money(&request.target_amt),
        request.target_date
    );
    let (_, message) = acknowledged(api.save_savings_goal(request).await?, &fallback)?;
    Ok(message)
}

pub async fn remove_goal<A: FinanceApi>(api: &A) -> Result<String> {
    let (_, message) = acknowledged(api.delete_savings_goal().await?, "Savings goal removed")?;
    Ok(message)
}
