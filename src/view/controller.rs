// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fetch, map, filter, group and page orchestration for the transaction view,
//! plus the modal round-trips that mutate backend state.
//!
//! [`ViewState`] holds everything the view shows and changes only through
//! its transition methods, so it can be driven and inspected without a
//! backend. [`ViewController`] pairs it with a [`FinanceApi`] and a
//! [`Locator`].

use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::api::{ApiResult, FinanceApi};
use crate::error::{ApiError, ViewError};
use crate::geo::{self, Locator};
use crate::models::{PlannedQuery, TxResponse};
use crate::utils::month_window;
use crate::view::directory::CategoryDirectory;
use crate::view::filter::{self, FilterCriteria};
use crate::view::forms::{PlanForm, TxForm};
use crate::view::mapper::{expand_planned, map_booked, map_planned};
use crate::view::paging::{PageView, PagingMode, compute_view, merge_sorted};
use crate::view::record::{UnifiedViewRecord, ViewId};

const SAVED: &str = "Saved";
const SAVE_FAILED: &str = "Could not save the transaction";
const DELETED: &str = "Deleted";
const DELETE_FAILED: &str = "Could not delete the transaction";
const LOAD_FAILED: &str = "Could not load the transaction";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
}

/// Overlay shown on top of the list, independent of [`Phase`].
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    View(UnifiedViewRecord),
    Delete(UnifiedViewRecord),
    QuickEdit(TxForm),
    FullEdit(TxForm),
    PlanEdit(PlanForm),
    NewTx(TxForm),
    NewPlan(PlanForm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// User-visible outcome of a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: &str, fallback: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: pick_message(Some(message), fallback),
        }
    }

    fn failure(error: &ApiError, fallback: &str) -> Self {
        Self {
            level: NoticeLevel::Failure,
            message: pick_message(error.user_message(), fallback),
        }
    }
}

fn pick_message(message: Option<&str>, fallback: &str) -> String {
    match message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => m.to_string(),
        None => fallback.to_string(),
    }
}

/// Issued when a fetch starts; only the newest ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    page: usize,
}

impl FetchTicket {
    pub fn page(&self) -> usize {
        self.page
    }
}

/// Result of the two reads behind one page, already mapped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLoad {
    pub booked: Vec<UnifiedViewRecord>,
    pub planned: Vec<UnifiedViewRecord>,
    /// Backend-reported total of booked transactions.
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    phase: Phase,
    modal: Option<Modal>,
    items: Vec<UnifiedViewRecord>,
    criteria: FilterCriteria,
    page: usize,
    /// Backend page the resident items came from.
    server_page: usize,
    page_size: usize,
    server_total: u64,
    view: PageView,
    generation: u64,
    notice: Option<Notice>,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            phase: Phase::Idle,
            modal: None,
            items: Vec::new(),
            criteria: FilterCriteria::default(),
            page: 0,
            server_page: 0,
            page_size: page_size.max(1),
            server_total: 0,
            view: PageView::default(),
            generation: 0,
            notice: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn items(&self) -> &[UnifiedViewRecord] {
        &self.items
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Starts a fetch and supersedes any fetch still in flight.
    pub fn begin_fetch(&mut self, page: usize) -> FetchTicket {
        self.generation += 1;
        self.phase = Phase::Loading;
        FetchTicket {
            generation: self.generation,
            page,
        }
    }

    /// Applies a finished fetch. Returns `false` and leaves the state
    /// untouched when a newer fetch has started since `ticket` was issued.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, load: PageLoad) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded page load"
            );
            return false;
        }
        self.items = merge_sorted(load.booked, load.planned);
        self.server_total = load.total;
        self.server_page = ticket.page;
        self.phase = Phase::Ready;
        if !self.criteria.is_active() {
            self.page = ticket.page;
        }
        self.recalc();
        true
    }

    /// Replaces the filter. Turning filtering on or off resets the page to
    /// 0. Returns `true` when the resident items are not backend page 0 and
    /// server paging resumed, so page 0 has to be fetched.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> bool {
        let flipped = self.criteria.is_active() != criteria.is_active();
        self.criteria = criteria;
        if flipped {
            self.page = 0;
        }
        self.recalc();
        flipped && !self.criteria.is_active() && self.server_page != 0
    }

    /// Recomputes the visible page from the resident items.
    pub fn recalc(&mut self) {
        self.view = compute_view(
            &self.items,
            &self.criteria,
            self.page,
            self.page_size,
            self.server_total,
        );
        if self.view.mode == PagingMode::Client && self.page >= self.view.total_pages {
            self.page = 0;
            self.view = compute_view(&self.items, &self.criteria, 0, self.page_size, 0);
        }
    }

    /// Moves within the filtered in-memory set. Only meaningful in client
    /// paging mode; returns whether the page changed.
    pub fn set_client_page(&mut self, page: usize) -> bool {
        if !self.criteria.is_active() || page >= self.view.total_pages || page == self.page {
            return false;
        }
        self.page = page;
        self.recalc();
        true
    }

    /// All resident records passing the current filter, unpaged.
    pub fn filtered(&self) -> Vec<UnifiedViewRecord> {
        filter::apply(&self.items, &self.criteria)
    }

    pub fn find(&self, id: ViewId) -> Option<&UnifiedViewRecord> {
        self.items.iter().find(|r| r.id == id)
    }

    pub fn open(&mut self, modal: Modal) {
        self.modal = Some(modal);
    }

    pub fn close_modal(&mut self) -> Option<Modal> {
        self.modal.take()
    }

    fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }
}

/// Drives a [`ViewState`] against the backend.
pub struct ViewController<A, L> {
    api: A,
    locator: L,
    directory: CategoryDirectory,
    state: ViewState,
    geo_timeout: Duration,
    today: NaiveDate,
}

impl<A: FinanceApi, L: Locator> ViewController<A, L> {
    pub fn new(api: A, locator: L, page_size: usize, geo_timeout: Duration) -> Self {
        Self {
            api,
            locator,
            directory: CategoryDirectory::default(),
            state: ViewState::new(page_size),
            geo_timeout,
            today: Local::now().date_naive(),
        }
    }

    /// Pins the date that selects the planned-transaction month window.
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn directory(&self) -> &CategoryDirectory {
        &self.directory
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.state.take_notice()
    }

    /// Loads category names. A failed read leaves the directory empty.
    pub async fn load_categories(&mut self) {
        self.directory = match self.api.categories().await.and_then(|r| r.into_result()) {
            Ok(categories) => CategoryDirectory::new(categories.unwrap_or_default()),
            Err(err) => {
                warn!(%err, "categories unavailable");
                CategoryDirectory::default()
            }
        };
    }

    /// Reads the booked page and the planned month window concurrently.
    /// Each source degrades to empty on failure, independently of the other.
    pub async fn load_page(&self, page: usize) -> PageLoad {
        let (first, last) = month_window(self.today);
        let window = PlannedQuery::window(first, last);
        let (booked, planned) = futures::join!(
            self.api.transactions_page(page, self.state.page_size),
            self.api.planned_transactions(&window)
        );

        let (booked, total) = match booked.and_then(|r| r.into_result()) {
            Ok(Some(p)) => {
                let records = p
                    .items
                    .iter()
                    .filter_map(|tx| map_booked(tx, &self.directory, true))
                    .collect();
                (records, p.total)
            }
            Ok(None) => (Vec::new(), 0),
            Err(err) => {
                warn!(%err, page, "booked transactions unavailable");
                (Vec::new(), 0)
            }
        };
        let planned = match planned.and_then(|r| r.into_result()) {
            Ok(list) => list
                .unwrap_or_default()
                .iter()
                .flat_map(|plan| expand_planned(plan, first, last))
                .collect(),
            Err(err) => {
                warn!(%err, "planned transactions unavailable");
                Vec::new()
            }
        };
        PageLoad {
            booked,
            planned,
            total,
        }
    }

    /// Fetches `page` and makes it the visible page.
    pub async fn fetch_page(&mut self, page: usize) -> bool {
        let ticket = self.state.begin_fetch(page);
        let load = self.load_page(page).await;
        self.state.complete_fetch(ticket, load)
    }

    pub async fn set_criteria(&mut self, criteria: FilterCriteria) {
        if self.state.set_criteria(criteria) {
            self.fetch_page(0).await;
        }
    }

    pub async fn next_page(&mut self) -> bool {
        self.goto_page(self.state.page + 1).await
    }

    pub async fn prev_page(&mut self) -> bool {
        match self.state.page.checked_sub(1) {
            Some(page) => self.goto_page(page).await,
            None => false,
        }
    }

    /// Server mode fetches the page; client mode re-slices the filtered set.
    pub async fn goto_page(&mut self, page: usize) -> bool {
        match self.state.view.mode {
            PagingMode::Client => self.state.set_client_page(page),
            PagingMode::Server if page < self.state.view.total_pages => self.fetch_page(page).await,
            PagingMode::Server => false,
        }
    }

    /// Recently booked transactions. The endpoint returns abbreviated
    /// payloads, so the records must be hydrated before editing.
    pub async fn recent(&self, limit: usize) -> Result<Vec<UnifiedViewRecord>, ApiError> {
        let list = self
            .api
            .recent_transactions(limit)
            .await?
            .into_result()?
            .unwrap_or_default();
        Ok(list
            .iter()
            .filter_map(|tx| map_booked(tx, &self.directory, false))
            .collect())
    }

    /// Finds a record by id among the resident items, falling back to the
    /// backend.
    pub async fn locate(&self, id: ViewId) -> Result<UnifiedViewRecord, ApiError> {
        if let Some(record) = self.state.find(id) {
            return Ok(record.clone());
        }
        let not_found = || ApiError::Rejected {
            status: 404,
            message: format!("Transaction {} not found", id),
        };
        match id {
            ViewId::Booked(raw) => {
                let tx = self.fetch_full(raw).await?;
                map_booked(&tx, &self.directory, true).ok_or_else(not_found)
            }
            ViewId::Planned(raw) => {
                let list = self
                    .api
                    .planned_transactions(&PlannedQuery::default())
                    .await?
                    .into_result()?
                    .unwrap_or_default();
                list.iter()
                    .find(|plan| plan.id == raw)
                    .and_then(map_planned)
                    .ok_or_else(not_found)
            }
        }
    }

    async fn fetch_full(&self, id: i64) -> Result<TxResponse, ApiError> {
        self.api
            .transaction(id)
            .await?
            .into_result()?
            .ok_or_else(|| ApiError::Rejected {
                status: 404,
                message: format!("Transaction {} not found", id),
            })
    }

    pub fn open_view(&mut self, record: UnifiedViewRecord) {
        self.state.open(Modal::View(record));
    }

    pub fn open_delete(&mut self, record: UnifiedViewRecord) {
        self.state.open(Modal::Delete(record));
    }

    /// Opens the edit modal matching the record. Abbreviated booked records
    /// are hydrated by id first; a failed hydration opens nothing.
    pub async fn open_edit(&mut self, record: &UnifiedViewRecord) -> bool {
        if record.is_planned() {
            self.state.open(Modal::PlanEdit(PlanForm::from_record(record)));
            return true;
        }
        if record.has_full {
            self.state.open(Modal::FullEdit(TxForm::from_record(record)));
            return true;
        }
        let hydrated = self
            .fetch_full(record.id.raw())
            .await
            .map(|tx| map_booked(&tx, &self.directory, true));
        match hydrated {
            Ok(Some(full)) => {
                self.state.open(Modal::QuickEdit(TxForm::from_record(&full)));
                true
            }
            Ok(None) => {
                self.state.notify(Notice {
                    level: NoticeLevel::Failure,
                    message: LOAD_FAILED.to_string(),
                });
                false
            }
            Err(err) => {
                warn!(%err, id = %record.id, "hydration failed");
                self.state.notify(Notice::failure(&err, LOAD_FAILED));
                false
            }
        }
    }

    pub fn open_new_tx(&mut self, now: NaiveDateTime) {
        self.state.open(Modal::NewTx(TxForm::blank(now)));
    }

    pub fn open_new_plan(&mut self) {
        self.state.open(Modal::NewPlan(PlanForm::blank(self.today)));
    }

    /// The open transaction form, if any.
    pub fn tx_form_mut(&mut self) -> Option<&mut TxForm> {
        match self.state.modal.as_mut()? {
            Modal::QuickEdit(form) | Modal::FullEdit(form) | Modal::NewTx(form) => Some(form),
            _ => None,
        }
    }

    pub fn plan_form_mut(&mut self) -> Option<&mut PlanForm> {
        match self.state.modal.as_mut()? {
            Modal::PlanEdit(form) | Modal::NewPlan(form) => Some(form),
            _ => None,
        }
    }

    pub fn close_modal(&mut self) {
        self.state.close_modal();
    }

    /// Saves the open edit modal.
    ///
    /// `Err` means the form is incomplete and nothing was sent. `Ok(false)`
    /// means the backend call failed; the modal stays open and a failure
    /// notice is set.
    pub async fn save_edit(&mut self) -> Result<bool, ViewError> {
        match self.state.modal.clone() {
            Some(Modal::QuickEdit(form)) | Some(Modal::FullEdit(form)) => {
                let id = form.id.ok_or(ViewError::NothingSelected)?;
                let request = self.with_location(form).await.to_request()?;
                let result = self.api.update_transaction(id, &request).await;
                Ok(self.finish_save(result).await)
            }
            Some(Modal::PlanEdit(form)) => {
                let id = form.id.ok_or(ViewError::NothingSelected)?;
                let request = form.to_request()?;
                let result = self.api.update_planned(id, &request).await;
                Ok(self.finish_save(result).await)
            }
            _ => Err(ViewError::NoForm),
        }
    }

    /// Saves the open create modal. Same outcomes as [`Self::save_edit`].
    pub async fn save_new(&mut self) -> Result<bool, ViewError> {
        match self.state.modal.clone() {
            Some(Modal::NewTx(form)) => {
                let request = self.with_location(form).await.to_request()?;
                let result = self.api.create_transaction(&request).await;
                Ok(self.finish_save(result).await)
            }
            Some(Modal::NewPlan(form)) => {
                let request = form.to_request()?;
                let result = self.api.create_planned(&request).await;
                Ok(self.finish_save(result).await)
            }
            _ => Err(ViewError::NoForm),
        }
    }

    async fn with_location(&self, mut form: TxForm) -> TxForm {
        // Only a complete form is worth a location lookup.
        if form.use_geo && form.to_request().is_ok() {
            if let Some(position) = geo::resolve(&self.locator, self.geo_timeout).await {
                form.coordinates = Some(position);
            }
        }
        form
    }

    async fn finish_save<T>(&mut self, result: ApiResult<T>) -> bool {
        self.finish_mutation(result, SAVED, SAVE_FAILED).await
    }

    async fn finish_mutation<T>(
        &mut self,
        result: ApiResult<T>,
        done: &str,
        failed: &str,
    ) -> bool {
        let outcome = result.and_then(|envelope| {
            let message = envelope.message.clone();
            envelope.into_result().map(|_| message)
        });
        match outcome {
            Ok(message) => {
                info!(message = %message, "mutation accepted");
                self.state.notify(Notice::success(&message, done));
                self.state.close_modal();
                let page = self.state.server_page;
                self.fetch_page(page).await;
                true
            }
            Err(err) => {
                warn!(%err, "mutation failed");
                self.state.notify(Notice::failure(&err, failed));
                false
            }
        }
    }

    /// Deletes the record in the open delete modal, dispatching on its id.
    pub async fn confirm_delete(&mut self) -> Result<bool, ViewError> {
        let Some(Modal::Delete(record)) = self.state.modal.as_ref() else {
            return Err(ViewError::NothingSelected);
        };
        let result = match record.id {
            ViewId::Booked(id) => self.api.delete_transaction(id).await,
            ViewId::Planned(id) => self.api.delete_planned(id).await,
        };
        Ok(self.finish_mutation(result, DELETED, DELETE_FAILED).await)
    }
}
