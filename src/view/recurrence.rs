// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Occurrence projection for recurring planned transactions.
//!
//! Occurrence `k` is always derived from the anchor as `anchor + k * interval`
//! units, so a monthly rule anchored on the 31st clamps to the last day of
//! shorter months without drifting (31 Jan, 29 Feb, 31 Mar, ...).

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ViewError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(format!(
                "Unknown frequency '{}', expected daily|weekly|monthly",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurringRule {
    frequency: Frequency,
    interval: u32,
    end_date: Option<NaiveDate>,
}

impl RecurringRule {
    pub fn new(
        frequency: Frequency,
        interval: u32,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, ViewError> {
        if interval == 0 {
            return Err(ViewError::ZeroInterval);
        }
        Ok(Self {
            frequency,
            interval,
            end_date,
        })
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn label(&self) -> String {
        let unit = match self.frequency {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
        };
        match self.interval {
            1 => format!("every {}", unit),
            n => format!("every {} {}s", n, unit),
        }
    }

    /// Date of occurrence `k` counted from `anchor`.
    pub fn nth(&self, anchor: NaiveDate, k: u64) -> Option<NaiveDate> {
        let steps = k.checked_mul(u64::from(self.interval))?;
        match self.frequency {
            Frequency::Daily => anchor.checked_add_days(Days::new(steps)),
            Frequency::Weekly => anchor.checked_add_days(Days::new(steps.checked_mul(7)?)),
            Frequency::Monthly => {
                anchor.checked_add_months(Months::new(u32::try_from(steps).ok()?))
            }
        }
    }

    /// Occurrences of the rule inside `[window_start, window_end]`, also
    /// bounded by the rule's own end date.
    pub fn project(
        &self,
        anchor: NaiveDate,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Occurrences {
        let bound = match self.end_date {
            Some(end) => end.min(window_end),
            None => window_end,
        };
        let empty = window_start > window_end;
        let step = if empty {
            0
        } else {
            self.first_step(anchor, window_start)
        };
        Occurrences {
            rule: *self,
            anchor,
            bound,
            step,
            done: empty,
        }
    }

    /// Smallest `k` whose occurrence is not before `start`.
    fn first_step(&self, anchor: NaiveDate, start: NaiveDate) -> u64 {
        if start <= anchor {
            return 0;
        }
        let interval = u64::from(self.interval);
        let mut k = match self.frequency {
            Frequency::Daily | Frequency::Weekly => {
                let unit = if self.frequency == Frequency::Weekly {
                    interval * 7
                } else {
                    interval
                };
                let span = (start - anchor).num_days().unsigned_abs();
                return span.div_ceil(unit);
            }
            Frequency::Monthly => {
                let months = (start.year() - anchor.year()) * 12 + start.month() as i32
                    - anchor.month() as i32;
                u64::try_from(months.max(0)).unwrap_or(0) / interval
            }
        };
        while self.nth(anchor, k).is_some_and(|d| d < start) {
            k += 1;
        }
        k
    }
}

/// Lazy sequence of occurrence dates. A pure function of the rule, anchor and
/// window: projecting again with the same inputs yields the same dates.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: RecurringRule,
    anchor: NaiveDate,
    bound: NaiveDate,
    step: u64,
    done: bool,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.done {
            return None;
        }
        match self.rule.nth(self.anchor, self.step) {
            Some(date) if date <= self.bound => {
                self.step += 1;
                Some(date)
            }
            _ => {
                self.done = true;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for Occurrences {}
