// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use brokee::error::ViewError;
use brokee::models::RuleResponse;
use brokee::view::mapper::expand_planned;
use brokee::view::{Frequency, RecurringRule, ViewId};
use chrono::{Datelike, NaiveDate};
use common::{d, planned};
use rstest::rstest;

fn rule(frequency: Frequency, interval: u32, end: Option<NaiveDate>) -> RecurringRule {
    RecurringRule::new(frequency, interval, end).unwrap()
}

#[rstest]
#[case::daily(Frequency::Daily, 1)]
#[case::every_third_day(Frequency::Daily, 3)]
#[case::weekly(Frequency::Weekly, 1)]
#[case::fortnightly(Frequency::Weekly, 2)]
#[case::monthly(Frequency::Monthly, 1)]
#[case::quarterly(Frequency::Monthly, 3)]
fn occurrences_stay_in_window_and_increase(#[case] frequency: Frequency, #[case] interval: u32) {
    let anchor = d(2024, 11, 30);
    let (start, end) = (d(2025, 1, 10), d(2025, 12, 31));
    let r = rule(frequency, interval, Some(d(2025, 9, 15)));
    let dates: Vec<_> = r.project(anchor, start, end).collect();
    assert!(!dates.is_empty());
    assert!(dates.iter().all(|&x| x >= start && x <= d(2025, 9, 15)));
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
    // every emitted date is an exact step from the anchor
    for x in &dates {
        let mut k = 0;
        while r.nth(anchor, k).is_some_and(|n| n < *x) {
            k += 1;
        }
        assert_eq!(r.nth(anchor, k), Some(*x));
    }
}

#[test]
fn weekly_spacing_is_exact() {
    let r = rule(Frequency::Weekly, 2, None);
    let dates: Vec<_> = r.project(d(2025, 1, 6), d(2025, 1, 1), d(2025, 3, 1)).collect();
    assert!(dates.windows(2).all(|w| (w[1] - w[0]).num_days() == 14));
    assert_eq!(dates.first(), Some(&d(2025, 1, 6)));
}

#[rstest]
#[case::common_year(2025, 28)]
#[case::leap_year(2024, 29)]
fn month_end_anchor_clamps_to_february(#[case] year: i32, #[case] last_day: u32) {
    let r = rule(Frequency::Monthly, 1, None);
    let dates: Vec<_> = r
        .project(d(year, 1, 31), d(year, 2, 1), d(year, 3, 31))
        .collect();
    assert_eq!(dates, vec![d(year, 2, last_day), d(year, 3, 31)]);
    assert!(dates.iter().all(|x| x.month() != 3 || x.day() == 31));
}

#[test]
fn end_date_cuts_the_window() {
    let r = rule(Frequency::Daily, 1, Some(d(2025, 7, 3)));
    let dates: Vec<_> = r.project(d(2025, 7, 1), d(2025, 7, 1), d(2025, 7, 31)).collect();
    assert_eq!(dates, vec![d(2025, 7, 1), d(2025, 7, 2), d(2025, 7, 3)]);
}

#[test]
fn anchor_after_window_yields_nothing() {
    let r = rule(Frequency::Monthly, 1, None);
    assert_eq!(r.project(d(2026, 1, 1), d(2025, 7, 1), d(2025, 7, 31)).count(), 0);
}

#[test]
fn inverted_window_is_empty() {
    let r = rule(Frequency::Daily, 1, None);
    assert_eq!(r.project(d(2025, 1, 1), d(2025, 7, 31), d(2025, 7, 1)).count(), 0);
}

#[test]
fn zero_interval_is_rejected() {
    assert_eq!(
        RecurringRule::new(Frequency::Weekly, 0, None),
        Err(ViewError::ZeroInterval)
    );
}

#[test]
fn projection_is_repeatable() {
    let r = rule(Frequency::Weekly, 1, None);
    let a: Vec<_> = r.project(d(2025, 1, 3), d(2025, 2, 1), d(2025, 4, 1)).collect();
    let b: Vec<_> = r.project(d(2025, 1, 3), d(2025, 2, 1), d(2025, 4, 1)).collect();
    assert_eq!(a, b);
}

#[test]
fn planned_template_expands_into_the_month() {
    let mut plan = planned(7, "Gym", "30", "2025-06-02T07:00:00");
    plan.rule = Some(RuleResponse {
        frequency: Frequency::Weekly,
        interval: 1,
        end_date: None,
    });
    let records = expand_planned(&plan, d(2025, 7, 1), d(2025, 7, 31));
    let days: Vec<u32> = records.iter().map(|r| r.day().day()).collect();
    assert_eq!(days, vec![7, 14, 21, 28]);
    assert!(records.iter().all(|r| r.id == ViewId::Planned(7)));
    assert!(records.iter().all(|r| r.date.format("%H:%M").to_string() == "07:00"));
}

#[test]
fn invalid_rule_falls_back_to_due_date() {
    let mut plan = planned(8, "Rent", "700", "2025-07-01");
    plan.rule = Some(RuleResponse {
        frequency: Frequency::Monthly,
        interval: 0,
        end_date: None,
    });
    let records = expand_planned(&plan, d(2025, 7, 1), d(2025, 7, 31));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].day(), d(2025, 7, 1));
}
