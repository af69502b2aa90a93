// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::utils::{maybe_print_json, pretty_table};
use crate::view::CategoryDirectory;

#[derive(Debug, Serialize)]
struct CategoryRow<'a> {
    id: i64,
    icon: &'static str,
    name: &'a str,
}

pub fn handle(directory: &CategoryDirectory, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let rows: Vec<CategoryRow> = directory
            .iter()
            .map(|(id, name)| CategoryRow {
                id,
                icon: directory.icon_of(id),
                name,
            })
            .collect();
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
            let data = rows
                .iter()
                .map(|r| vec![r.id.to_string(), r.icon.to_string(), r.name.to_string()])
                .collect();
            println!("{}", pretty_table(&["Id", "Icon", "Category"], data));
        }
    }
    Ok(())
}
