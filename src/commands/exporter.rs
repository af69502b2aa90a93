// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::json;

use crate::api::FinanceApi;
use crate::commands::load_view;
use crate::geo::Locator;
use crate::utils::fmt_money;
use crate::view::{UnifiedViewRecord, ViewController};

pub async fn handle<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("view", sub)) => export_view(ctl, sub).await,
        _ => Ok(()),
    }
}

async fn export_view<A: FinanceApi, L: Locator>(
    ctl: &mut ViewController<A, L>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = sub.get_one::<String>("out").context("--out is required")?;

    load_view(ctl, sub).await?;
    let records = if sub.get_flag("all") {
        ctl.state().filtered()
    } else {
        ctl.state().view().records.clone()
    };
    write_records(&records, &fmt, Path::new(out))?;
    println!("Exported {} record(s) to {}", records.len(), out);
    Ok(())
}

/// Writes view records as `csv` or `json`. Amounts are signed.
pub fn write_records(records: &[UnifiedViewRecord], fmt: &str, out: &Path) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            wtr.write_record(["id", "date", "kind", "amount", "category", "note", "planned"])?;
            for r in records {
                wtr.write_record([
                    r.id.to_string(),
                    r.date.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    r.kind.to_string(),
                    fmt_money(&r.signed_amount()),
                    r.category.clone(),
                    r.note.clone(),
                    r.is_planned().to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = records
                .iter()
                .map(|r| {
                    json!({
                        "id": r.id.to_string(),
                        "date": r.date.format("%Y-%m-%dT%H:%M:%S").to_string(),
                        "kind": r.kind.to_string(),
                        "amount": fmt_money(&r.signed_amount()),
                        "category": r.category,
                        "note": r.note,
                        "planned": r.is_planned(),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Failed to write {}", out.display()))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}
