// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use brokee::cli;
use brokee::commands::{self, budgets, exporter, planned, portfolio, reports, transactions};
use brokee::models::{
    Budget, Category, CategorySpend, CoinHolding, ExpenseSeries, Kind, LooseNumber, MonthFlow,
    Portfolio, ServiceResponse,
};
use brokee::view::filter::FilterCriteria;
use brokee::view::mapper::{map_booked, map_planned};
use brokee::view::paging::{compute_view, merge_sorted};
use brokee::view::{CategoryDirectory, UnifiedViewRecord};
use common::{booked, d, planned as plan};
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::tempdir;

/// Matches of the innermost subcommand.
fn leaf(args: &[&str]) -> clap::ArgMatches {
    let mut m = cli::build_cli().get_matches_from(args);
    while let Some((_, sub)) = m.subcommand() {
        m = sub.clone();
    }
    m
}

fn directory() -> CategoryDirectory {
    CategoryDirectory::new([
        Category {
            id: 1,
            name: "Groceries".to_string(),
        },
        Category {
            id: 2,
            name: "Salary".to_string(),
        },
    ])
}

fn records() -> Vec<UnifiedViewRecord> {
    let dir = directory();
    let mut shop = booked(1, "E", "45", "2025-07-20T09:15:00", Some(1));
    shop.note = Some("weekly, with \"extras\"".to_string());
    let b = [shop, booked(2, "I", "2500", "2025-07-01T08:00:00", Some(2))]
        .iter()
        .filter_map(|t| map_booked(t, &dir, true))
        .collect();
    let p = map_planned(&plan(7, "Rent", "700", "2025-08-01"))
        .into_iter()
        .collect();
    merge_sorted(b, p)
}

#[test]
fn view_options_become_criteria() {
    let sub = leaf(&[
        "brokee", "tx", "list", "--search", " Groc ", "--kind", "income", "--from",
        "2025-07-01", "--to", "2025-07-31", "--min", "10", "--recurring",
    ]);
    let criteria = commands::criteria_from(&sub).unwrap();
    assert_eq!(
        criteria,
        FilterCriteria {
            query: "Groc".to_string(),
            kind: Some(Kind::Income),
            from: Some(d(2025, 7, 1)),
            to: Some(d(2025, 7, 31)),
            min: Some(Decimal::new(10, 0)),
            max: None,
            recurring: true,
        }
    );

    let plain = leaf(&["brokee", "tx", "list"]);
    let criteria = commands::criteria_from(&plain).unwrap();
    assert!(!criteria.is_active());
    assert_eq!(plain.get_one::<usize>("page"), Some(&0));
}

#[test]
fn bad_view_options_are_reported() {
    let sub = leaf(&["brokee", "tx", "list", "--kind", "transfer"]);
    assert!(commands::criteria_from(&sub).is_err());
    let sub = leaf(&["brokee", "tx", "list", "--from", "31/07/2025"]);
    assert!(commands::criteria_from(&sub).is_err());
}

#[test]
fn plan_query_from_options() {
    let sub = leaf(&[
        "brokee", "plan", "list", "--title", "rent", "--from", "2025-08-01", "--max", "900",
    ]);
    let query = planned::query_from(&sub).unwrap();
    assert_eq!(query.title.as_deref(), Some("rent"));
    assert_eq!(query.due_from, Some(d(2025, 8, 1)));
    assert_eq!(query.due_to, None);
    assert_eq!(query.max, Some(Decimal::new(900, 0)));
}

#[test]
fn projection_lists_rule_dates() {
    let sub = leaf(&[
        "brokee", "plan", "project", "--frequency", "monthly", "--anchor", "2025-01-31",
        "--from", "2025-02-01", "--to", "2025-04-30",
    ]);
    let (rule, dates) = planned::projection(&sub).unwrap();
    assert_eq!(rule.interval(), 1);
    assert_eq!(dates, vec![d(2025, 2, 28), d(2025, 3, 31), d(2025, 4, 30)]);

    let zero = leaf(&[
        "brokee", "plan", "project", "--frequency", "weekly", "--interval", "0", "--anchor",
        "2025-01-01", "--from", "2025-01-01", "--to", "2025-02-01",
    ]);
    assert!(planned::projection(&zero).is_err());
}

#[test]
fn view_rows_follow_day_groups() {
    let items = records();
    let view = compute_view(&items, &FilterCriteria::default(), 0, 10, 2);
    let rows = transactions::view_rows(&view);
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
    assert_eq!(rows[0].amount, "-45.00");
    assert_eq!(rows[0].time, "09:15");
    assert_eq!(rows[1].amount, "+2500.00");
    assert_eq!(rows[1].category, "Salary");
    assert!(rows.iter().all(|r| !r.planned));
}

#[test]
fn budget_rows_name_categories() {
    let budgets = [
        Budget {
            category_id: 9,
            amount: Decimal::new(5, 0),
        },
        Budget {
            category_id: 1,
            amount: Decimal::new(30050, 2),
        },
    ];
    let rows = budgets::budget_rows(&budgets, &directory());
    assert_eq!(rows[0].category, "#9");
    assert_eq!(rows[1].category, "Groceries");
    assert_eq!(rows[1].amount, "300.50");
}

#[test]
fn export_csv_quotes_and_signs() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("view.csv");
    exporter::write_records(&records(), "csv", &out).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "p-7");
    assert_eq!(&rows[0][3], "-700.00");
    assert_eq!(&rows[0][6], "true");
    assert_eq!(&rows[1][5], "weekly, with \"extras\"");
    assert_eq!(&rows[2][2], "income");
    assert_eq!(&rows[2][3], "2500.00");
}

#[test]
fn export_json_is_an_array() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("view.json");
    exporter::write_records(&records(), "json", &out).unwrap();

    let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[1]["id"], "1");
    assert_eq!(items[1]["category"], "Groceries");
    assert_eq!(items[1]["date"], "2025-07-20T09:15:00");
    assert_eq!(items[0]["planned"], true);
}

#[test]
fn export_rejects_unknown_format() {
    let dir = tempdir().unwrap();
    let err = exporter::write_records(&records(), "xlsx", &dir.path().join("x")).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
}

#[test]
fn flow_rows_are_in_month_order_with_net() {
    let flows = vec![
        MonthFlow {
            month: "2025-02".to_string(),
            expenses: Decimal::from(900),
            income: Decimal::from(800),
        },
        MonthFlow {
            month: "2025-01".to_string(),
            expenses: Decimal::from(-400),
            income: Decimal::from(1000),
        },
    ];
    let rows = reports::flow_rows(&flows);
    assert_eq!(rows[0].month, "2025-01");
    assert_eq!(rows[0].expenses, Decimal::from(400));
    assert_eq!(rows[0].net, Decimal::from(600));
    assert_eq!(rows[1].net, Decimal::from(-100));
}

#[test]
fn series_rows_skip_non_numeric_points() {
    let mut series = ExpenseSeries::new();
    series.insert("2025-07-02".to_string(), LooseNumber::Text("12.5".to_string()));
    series.insert("2025-07-01".to_string(), LooseNumber::Number(serde_json::Number::from(7u32)));
    series.insert("2025-07-03".to_string(), LooseNumber::Text("n/a".to_string()));
    let rows = reports::series_rows(&series);
    assert_eq!(
        rows,
        vec![
            ("2025-07-01".to_string(), Decimal::from(7)),
            ("2025-07-02".to_string(), Decimal::new(125, 1)),
        ]
    );
}

#[test]
fn breakdown_is_largest_first_with_shares() {
    let spends = vec![
        CategorySpend {
            category: "Transport".to_string(),
            amount: Decimal::from(25),
        },
        CategorySpend {
            category: "Groceries".to_string(),
            amount: Decimal::from(75),
        },
    ];
    let rows = reports::breakdown_rows(&spends);
    assert_eq!(rows[0].category, "Groceries");
    assert_eq!(rows[0].share, Decimal::from(75));
    assert_eq!(rows[1].share, Decimal::from(25));

    let idle = reports::breakdown_rows(&[CategorySpend {
        category: "Rent".to_string(),
        amount: Decimal::ZERO,
    }]);
    assert_eq!(idle[0].share, Decimal::ZERO);
}

#[test]
fn month_key_defaults_and_validates() {
    let today = d(2025, 7, 20);
    assert_eq!(reports::month_key(None, today).unwrap(), "2025-07");
    assert_eq!(reports::month_key(Some(" 2024-03 "), today).unwrap(), "2024-03");
    assert!(reports::month_key(Some("2024-13"), today).is_err());
    assert!(reports::month_key(Some("march"), today).is_err());
}

fn coin(symbol: &str, free: i64, value: i64) -> CoinHolding {
    CoinHolding {
        symbol: symbol.to_string(),
        free: Decimal::from(free),
        locked: Decimal::ONE,
        value: Decimal::from(value),
        trades: Vec::new(),
    }
}

#[test]
fn holdings_are_sorted_by_value() {
    let p = Portfolio {
        top_market_coins: Vec::new(),
        my_coins: vec![coin("ETH", 2, 5000), coin("BTC", 1, 60000), coin("ADA", 100, 40)],
        total_value: Decimal::from(65040),
    };
    let rows = portfolio::holding_rows(&p);
    let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, ["BTC", "ETH", "ADA"]);
    assert_eq!(rows[0].quantity, Decimal::from(2));
}

#[test]
fn exchange_keys_are_masked() {
    assert_eq!(portfolio::mask_key("AbCdEfGh1234"), "****1234");
    assert_eq!(portfolio::mask_key("abc"), "****");
}

#[test]
fn currency_codes_are_normalised() {
    assert_eq!(portfolio::currency_code(None).unwrap(), "EUR");
    assert_eq!(portfolio::currency_code(Some("usd")).unwrap(), "USD");
    assert!(portfolio::currency_code(Some("euro")).is_err());
    assert!(portfolio::currency_code(Some("U$D")).is_err());
}

#[test]
fn acknowledged_prefers_the_backend_message() {
    let (data, message) =
        commands::acknowledged(ServiceResponse::ok("Budget saved", 1), "Saved").unwrap();
    assert_eq!((data, message.as_str()), (Some(1), "Budget saved"));
    let (_, message) = commands::acknowledged(ServiceResponse::ok("  ", 1), "Saved").unwrap();
    assert_eq!(message, "Saved");
    let rejected = ServiceResponse::<i32>::rejected(409, "Duplicate");
    assert!(commands::acknowledged(rejected, "Saved").is_err());
}
