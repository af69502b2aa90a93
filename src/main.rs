// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use brokee::api::HttpApi;
use brokee::geo::{Coordinates, StaticLocation};
use brokee::view::ViewController;
use brokee::{cli, commands, config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli::build_cli().get_matches();

    let mut cfg = config::load(matches.get_one::<String>("config").map(Path::new))?;
    if let Some(url) = matches.get_one::<String>("api-url") {
        cfg.api_url = url.trim().to_string();
    }
    let position = match (
        matches.get_one::<f64>("lat"),
        matches.get_one::<f64>("lon"),
    ) {
        (Some(&latitude), Some(&longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };

    let api = HttpApi::new(&cfg)?;
    let mut ctl = ViewController::new(
        api,
        StaticLocation(position),
        cfg.page_size,
        Duration::from_secs(cfg.geo_timeout_secs),
    );

    let Some((name, sub)) = matches.subcommand() else {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    };
    ctl.load_categories().await;
    match name {
        "tx" => commands::transactions::handle(&mut ctl, sub).await?,
        "plan" => commands::planned::handle(&mut ctl, sub).await?,
        "category" => commands::categories::handle(ctl.directory(), sub)?,
        "budget" => commands::budgets::handle(ctl.api(), ctl.directory(), sub).await?,
        "savings" => commands::savings::handle(ctl.api(), sub).await?,
        "summary" => commands::reports::summary(&mut ctl, sub).await?,
        "report" => commands::reports::handle(ctl.api(), ctl.today(), sub).await?,
        "portfolio" => commands::portfolio::handle(ctl.api(), sub).await?,
        "export" => commands::exporter::handle(&mut ctl, sub).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
