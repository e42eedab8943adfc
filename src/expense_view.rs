//! State behind the expense management table.
//!
//! [ExpenseView] owns the filter set, the sort configuration and the last
//! list of records received from the backend. Every fetch is issued with a
//! [FetchTicket] carrying a generation number, and only the completion of the
//! most recently issued ticket is applied. A response that arrives after a
//! newer fetch was issued is dropped, so a slow reply can never overwrite
//! newer results.
//!
//! [ExpenseViewModel] shares an [ExpenseView] with the UI and performs the
//! fetches through an [ApiClient], waiting for filter edits to settle first.

use std::{
    cell::{Cell, RefCell},
    future::Future,
    rc::Rc,
    time::Duration,
};

use log::{debug, info, warn};

use crate::{
    api::ApiClient,
    error::{ApiError, Failure},
    expense::Expense,
    filter::{ExpenseFilter, FilterPatch},
    sort::{sorted, SortConfig, SortKey},
};

pub const EXPENSES_PATH: &str = "/api/expenses";

/// A fetch that has been issued but not yet completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    query: Vec<(&'static str, String)>,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &[(&'static str, String)] {
        &self.query
    }
}

/// What happened to a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The records were replaced with this many rows.
    Applied(usize),
    /// A newer fetch or filter edit superseded this one, nothing changed.
    Discarded,
    /// The fetch failed, the previous records are still shown.
    Failed(Failure),
}

/// The filter set, sort configuration and records of the expense table.
#[derive(Debug, Default)]
pub struct ExpenseView {
    filter: ExpenseFilter,
    sort: SortConfig,
    records: Vec<Expense>,
    issued: u64,
    loading: bool,
    error: Option<Failure>,
}

impl ExpenseView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &ExpenseFilter {
        &self.filter
    }

    pub fn sort(&self) -> SortConfig {
        self.sort
    }

    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    /// Whether the latest fetch is still waiting for its response.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The failure of the latest completed fetch, if it failed.
    pub fn error(&self) -> Option<&Failure> {
        self.error.as_ref()
    }

    /// Replace the filter set with `patch` merged on top of it.
    pub fn apply_filter(&mut self, patch: FilterPatch) {
        self.filter = self.filter.merged(patch);
    }

    /// Issue a fetch for the current filter set.
    ///
    /// Any fetch issued before this one becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;

        FetchTicket {
            generation: self.issued,
            query: self.filter.to_query(),
        }
    }

    /// Apply the result of the fetch `ticket` was issued for, unless a newer
    /// fetch has been issued since.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Expense>, ApiError>,
    ) -> FetchOutcome {
        if ticket.generation != self.issued {
            debug!(
                "discarding response to fetch #{}, fetch #{} is newer",
                ticket.generation, self.issued
            );
            return FetchOutcome::Discarded;
        }

        self.loading = false;

        match result {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                self.error = None;
                FetchOutcome::Applied(count)
            }
            Err(error) => {
                let failure = Failure::Fetch(error);
                self.error = Some(failure.clone());
                FetchOutcome::Failed(failure)
            }
        }
    }

    /// Sort by `key`, or flip the direction if already sorted by it.
    pub fn set_sort(&mut self, key: SortKey) {
        self.sort = self.sort.clicked(key);
    }

    /// The records in display order.
    pub fn derived_view(&self) -> Vec<Expense> {
        sorted(&self.records, self.sort)
    }
}

/// Lets a burst of edits trigger a single action once they settle.
///
/// Each call to [Debounce::arm] invalidates every token handed out before it.
#[derive(Debug, Default)]
pub struct Debounce {
    delay: Duration,
    armed: Cell<u64>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            armed: Cell::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Register an edit and return its token.
    pub fn arm(&self) -> u64 {
        let token = self.armed.get() + 1;
        self.armed.set(token);
        token
    }

    /// Whether no edit has been registered since `token` was handed out.
    pub fn is_current(&self, token: u64) -> bool {
        self.armed.get() == token
    }
}

#[cfg(not(test))]
async fn sleep(delay: Duration) {
    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
    gloo_timers::future::TimeoutFuture::new(millis).await;
}

// Browser timers need a JS event loop; tests run on tokio.
#[cfg(test)]
async fn sleep(delay: Duration) {
    tokio::time::sleep(delay).await;
}

/// Drives an [ExpenseView] against the backend.
#[derive(Clone)]
pub struct ExpenseViewModel {
    view: Rc<RefCell<ExpenseView>>,
    client: ApiClient,
    debounce: Rc<Debounce>,
}

impl ExpenseViewModel {
    pub fn new(client: ApiClient, debounce_delay: Duration) -> Self {
        Self {
            view: Rc::new(RefCell::new(ExpenseView::new())),
            client,
            debounce: Rc::new(Debounce::new(debounce_delay)),
        }
    }

    pub fn with_view<R>(&self, f: impl FnOnce(&ExpenseView) -> R) -> R {
        f(&self.view.borrow())
    }

    pub fn derived_view(&self) -> Vec<Expense> {
        self.view.borrow().derived_view()
    }

    pub fn set_sort(&self, key: SortKey) {
        self.view.borrow_mut().set_sort(key);
    }

    /// Update the filter set and re-query once edits have settled.
    pub async fn set_filter(&self, patch: FilterPatch) -> FetchOutcome {
        let token = self.stage_filter(patch);
        self.fetch_when_settled(token).await
    }

    /// Update the filter set now and return the debounce token of this edit.
    ///
    /// Pass the token to [ExpenseViewModel::fetch_when_settled] to issue the
    /// fetch.
    pub fn stage_filter(&self, patch: FilterPatch) -> u64 {
        self.view.borrow_mut().apply_filter(patch);
        self.debounce.arm()
    }

    /// Wait out the debounce delay and report whether the edit `token` was
    /// handed out for is still the latest one.
    pub async fn settled(&self, token: u64) -> bool {
        let delay = self.debounce.delay();

        if delay.is_zero() {
            return true;
        }

        sleep(delay).await;

        let current = self.debounce.is_current(token);
        if !current {
            debug!("filter edit superseded before it settled");
        }
        current
    }

    /// Wait out the debounce delay, then re-query unless another edit came in.
    pub async fn fetch_when_settled(&self, token: u64) -> FetchOutcome {
        if !self.settled(token).await {
            return FetchOutcome::Discarded;
        }

        self.refetch().await
    }

    /// Query the backend with the current filter set.
    ///
    /// The fetch is issued, and the view marked as loading, before this
    /// returns. The returned future completes it.
    pub fn refetch(&self) -> impl Future<Output = FetchOutcome> + 'static {
        let ticket = self.view.borrow_mut().begin_fetch();
        debug!("fetch #{} with {:?}", ticket.generation(), ticket.query());
        let model = self.clone();

        async move {
            let result = model
                .client
                .get::<Vec<Expense>>(EXPENSES_PATH, ticket.query())
                .await;

            let outcome = model.view.borrow_mut().complete_fetch(ticket, result);
            match &outcome {
                FetchOutcome::Applied(count) => info!("loaded {count} expenses"),
                FetchOutcome::Failed(failure) => {
                    warn!("could not load expenses: {}", failure.error())
                }
                FetchOutcome::Discarded => {}
            }

            outcome
        }
    }
}
