// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The unified transaction view: booked and planned transactions mapped
//! into one shape, filtered, grouped by day and paged.

pub mod controller;
pub mod directory;
pub mod filter;
pub mod forms;
pub mod icons;
pub mod mapper;
pub mod paging;
pub mod record;
pub mod recurrence;

pub use controller::{Modal, Notice, NoticeLevel, Phase, ViewController, ViewState};
pub use directory::CategoryDirectory;
pub use filter::FilterCriteria;
pub use forms::{PlanForm, TxForm};
pub use paging::{DayGroups, PageView, PagingMode};
pub use record::{UnifiedViewRecord, ViewId};
pub use recurrence::{Frequency, RecurringRule};
