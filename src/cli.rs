// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print JSON").action(ArgAction::SetTrue))
        .arg(arg!(--jsonl "Print one JSON object per line").action(ArgAction::SetTrue))
}

/// Search and filter options shared by every command that shows the view.
fn view_filters(cmd: Command) -> Command {
    cmd.arg(
        arg!(--page <N> "Page index, starting at 0")
            .value_parser(value_parser!(usize))
            .default_value("0"),
    )
    .arg(arg!(--search <TEXT> "Match category or note (case-insensitive)"))
    .arg(arg!(--kind <KIND> "expense or income"))
    .arg(arg!(--from <DATE> "Earliest day, YYYY-MM-DD"))
    .arg(arg!(--to <DATE> "Latest day, YYYY-MM-DD"))
    .arg(arg!(--min <AMOUNT> "Smallest amount"))
    .arg(arg!(--max <AMOUNT> "Largest amount"))
    .arg(arg!(--recurring "Show planned transactions instead of booked ones").action(ArgAction::SetTrue))
}

fn record_id() -> Arg {
    arg!(--id <ID> "Record id; planned records use the p- prefix, e.g. p-7").required(true)
}

fn tx_command() -> Command {
    Command::new("tx")
        .about("Booked and planned transactions in one view")
        .subcommand_required(true)
        .subcommand(json_flags(view_filters(
            Command::new("list").about("Show one page of the view grouped by day"),
        )))
        .subcommand(json_flags(
            Command::new("day")
                .about("Every record on one day of the current page")
                .arg(arg!(--date <DATE> "YYYY-MM-DD").required(true))
                .arg(arg!(--recurring "Planned records instead of booked ones").action(ArgAction::SetTrue)),
        ))
        .subcommand(json_flags(Command::new("show").about("Show a single record").arg(record_id())))
        .subcommand(
            Command::new("add")
                .about("Book a transaction")
                .arg(arg!(--kind <KIND> "expense or income").required(true))
                .arg(arg!(--amount <AMOUNT>).required(true))
                .arg(arg!(--"category-id" <ID>).required(true).value_parser(value_parser!(i64)))
                .arg(arg!(--at <TIMESTAMP> "YYYY-MM-DD[THH:MM[:SS]], defaults to now"))
                .arg(arg!(--note <NOTE>))
                .arg(arg!(--geo "Tag with the device position").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("quick")
                .about("Quick-add with only kind, amount and an optional category")
                .arg(arg!(--kind <KIND> "expense or income").required(true))
                .arg(arg!(--amount <AMOUNT>).required(true))
                .arg(arg!(--"category-id" <ID>).value_parser(value_parser!(i64))),
        )
        .subcommand(
            Command::new("edit")
                .about("Change a booked or planned record; unset options keep their value")
                .arg(record_id())
                .arg(arg!(--kind <KIND>))
                .arg(arg!(--amount <AMOUNT>))
                .arg(arg!(--"category-id" <ID>).value_parser(value_parser!(i64)))
                .arg(arg!(--at <TIMESTAMP> "Booked only"))
                .arg(arg!(--note <NOTE> "Booked only"))
                .arg(arg!(--geo "Booked only: tag with the device position").action(ArgAction::SetTrue))
                .arg(arg!(--title <TITLE> "Planned only"))
                .arg(arg!(--due <DATE> "Planned only"))
                .arg(
                    arg!(--"auto-book" <BOOL> "Planned only")
                        .value_parser(value_parser!(bool)),
                ),
        )
        .subcommand(Command::new("rm").about("Delete a record").arg(record_id()))
        .subcommand(
            Command::new("recent")
                .about("Most recently booked transactions")
                .arg(
                    arg!(--limit <N>)
                        .value_parser(value_parser!(usize))
                        .default_value("5"),
                ),
        )
}

fn plan_command() -> Command {
    Command::new("plan")
        .about("Planned and recurring transactions")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("list")
                .about("List planned transactions")
                .arg(arg!(--from <DATE> "Due on or after"))
                .arg(arg!(--to <DATE> "Due on or before"))
                .arg(arg!(--title <TITLE>))
                .arg(arg!(--kind <KIND>))
                .arg(arg!(--min <AMOUNT>))
                .arg(arg!(--max <AMOUNT>))
                .arg(arg!(--category <NAME>)),
        ))
        .subcommand(
            Command::new("add")
                .about("Plan a transaction")
                .arg(arg!(--kind <KIND>).required(true))
                .arg(arg!(--amount <AMOUNT>).required(true))
                .arg(arg!(--"category-id" <ID>).required(true).value_parser(value_parser!(i64)))
                .arg(arg!(--title <TITLE>).required(true))
                .arg(arg!(--due <DATE>).required(true))
                .arg(arg!(--"auto-book" "Book automatically on the due date").action(ArgAction::SetTrue)),
        )
        .subcommand(json_flags(
            Command::new("project")
                .about("List the dates a recurring rule falls on within a window")
                .arg(arg!(--frequency <FREQ> "daily, weekly or monthly").required(true))
                .arg(
                    arg!(--interval <N>)
                        .value_parser(value_parser!(u32))
                        .default_value("1"),
                )
                .arg(arg!(--anchor <DATE> "First occurrence").required(true))
                .arg(arg!(--from <DATE>).required(true))
                .arg(arg!(--to <DATE>).required(true))
                .arg(arg!(--until <DATE> "Last day the rule is in force")),
        ))
}

fn report_command() -> Command {
    Command::new("report")
        .about("Spending analytics computed by the backend")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("flow")
                .about("Income against expenses per month")
                .arg(arg!(--year <YEAR> "Defaults to this year").value_parser(value_parser!(i32))),
        ))
        .subcommand(json_flags(
            Command::new("locations")
                .about("Places with the most spending")
                .arg(
                    arg!(--limit <N>)
                        .value_parser(value_parser!(usize))
                        .default_value("3"),
                ),
        ))
        .subcommand(json_flags(
            Command::new("daily")
                .about("Expenses per day")
                .arg(
                    arg!(--days <N>)
                        .value_parser(value_parser!(u32))
                        .default_value("30"),
                ),
        ))
        .subcommand(json_flags(
            Command::new("monthly")
                .about("Expenses per month")
                .arg(arg!(--year <YEAR> "Defaults to this year").value_parser(value_parser!(i32))),
        ))
        .subcommand(json_flags(
            Command::new("categories")
                .about("Spending per category in one month")
                .arg(arg!(--month <MONTH> "YYYY-MM, defaults to this month")),
        ))
}

fn portfolio_command() -> Command {
    Command::new("portfolio")
        .about("Linked crypto exchange holdings")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("show")
                .about("Holdings valued in one currency")
                .arg(arg!(--currency <CCY>).default_value("EUR")),
        ))
        .subcommand(json_flags(
            Command::new("link").about("Show the linked exchange key"),
        ))
}

pub fn build_cli() -> Command {
    command!()
        .about("Brokee: transactions, planned bills, budgets and savings from the terminal")
        .arg(arg!(--config <PATH> "Config file instead of the platform default").global(true))
        .arg(arg!(--"api-url" <URL> "Backend base URL").global(true))
        .arg(
            arg!(--lat <LAT> "Device latitude for --geo")
                .value_parser(value_parser!(f64))
                .global(true),
        )
        .arg(
            arg!(--lon <LON> "Device longitude for --geo")
                .value_parser(value_parser!(f64))
                .global(true),
        )
        .subcommand(tx_command())
        .subcommand(plan_command())
        .subcommand(
            Command::new("category")
                .about("Categories")
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("budget")
                .about("Per-category budgets")
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            arg!(--page <N>)
                                .value_parser(value_parser!(usize))
                                .default_value("0"),
                        )
                        .arg(
                            arg!(--size <N>)
                                .value_parser(value_parser!(usize))
                                .default_value("50"),
                        ),
                ))
                .subcommand(
                    Command::new("set")
                        .arg(arg!(--"category-id" <ID>).required(true).value_parser(value_parser!(i64)))
                        .arg(arg!(--amount <AMOUNT>).required(true)),
                )
                .subcommand(
                    Command::new("rm").arg(
                        arg!(--"category-id" <ID>)
                            .required(true)
                            .num_args(1..)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("savings")
                .about("Savings goal")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--date <DATE> "Target date").required(true)),
                )
                .subcommand(Command::new("rm")),
        )
        .subcommand(json_flags(
            Command::new("summary").about("Balance, recent activity and upcoming bills"),
        ))
        .subcommand(report_command())
        .subcommand(portfolio_command())
        .subcommand(
            Command::new("export").about("Export data").subcommand(view_filters(
                Command::new("view")
                    .about("Write the filtered view to a file")
                    .arg(arg!(--format <FMT> "csv or json").default_value("csv"))
                    .arg(arg!(--out <FILE>).required(true))
                    .arg(arg!(--all "Every filtered record instead of one page").action(ArgAction::SetTrue)),
            )),
        )
}
