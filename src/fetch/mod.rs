//! Data source seam and request ordering.
//!
//! The store never fetches on its own. A consuming layer decides when to ask
//! a [`DataSource`] for rows and feeds the answer back through the store's
//! actions. [`FetchCoordinator`] does that feeding with a monotonic request
//! sequence: every request is tagged when it is dispatched and responses are
//! applied in dispatch order. A replacing request supersedes everything
//! dispatched before it, so a late response to an older query is dropped
//! instead of overwriting newer rows. Appended pages are never dropped for
//! being older; one that arrives early waits for the pages before it.
//!
//! The `loading` flag is left to the caller on both the success and the error
//! path.

mod sequence;

pub use sequence::{RequestSequence, RequestTicket};

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;

use crate::error::Result;
use crate::layout::VisibleRange;
use crate::store::GridStore;
use crate::types::{DataSourceParams, DataSourceResult, GridState};

/// Asynchronous provider of pages of rows.
///
/// The source applies the sort and filter criteria in the params; rows come
/// back already in display order.
pub trait DataSource {
    fn fetch(&self, params: DataSourceParams) -> impl Future<Output = Result<DataSourceResult>>;
}

impl<F, Fut> DataSource for F
where
    F: Fn(DataSourceParams) -> Fut,
    Fut: Future<Output = Result<DataSourceResult>>,
{
    fn fetch(&self, params: DataSourceParams) -> impl Future<Output = Result<DataSourceResult>> {
        self(params)
    }
}

/// How a response is merged into the loaded rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Replace the loaded rows (`set_rows`). Supersedes every earlier request.
    #[default]
    Replace,
    /// Append to the loaded rows (`add_rows`), for infinite scroll. Applied in
    /// the order the requests were issued.
    Append,
}

/// What happened to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Rows and total were written to the store
    Applied,
    /// An earlier request is still outstanding; the response is held and
    /// written as soon as the earlier ones have been applied
    Deferred,
    /// A newer `Replace` request (or a failure) superseded it; the response
    /// was dropped
    Stale,
}

/// Dispatches data source requests for a store and applies their responses
/// in issue order.
///
/// A `Replace` request supersedes everything issued before it. `Append`
/// requests are separate slices of the same result set, so a response that
/// arrives ahead of an earlier append is held until that one is applied.
#[derive(Debug, Clone)]
pub struct FetchCoordinator {
    store: GridStore,
    sequence: RequestSequence,
    deferred: Rc<RefCell<BTreeMap<u64, (FetchMode, DataSourceResult)>>>,
}

impl FetchCoordinator {
    pub fn new(store: GridStore) -> Self {
        Self {
            store,
            sequence: RequestSequence::new(),
            deferred: Rc::default(),
        }
    }

    pub fn store(&self) -> &GridStore {
        &self.store
    }

    pub fn sequence(&self) -> &RequestSequence {
        &self.sequence
    }

    /// Number of responses held behind an outstanding earlier request.
    pub fn deferred_count(&self) -> usize {
        self.deferred.borrow().len()
    }

    /// Tag a request at dispatch time. A `Replace` ticket makes every ticket
    /// issued before it stale.
    pub fn begin(&self, params: DataSourceParams, mode: FetchMode) -> RequestTicket {
        let ticket = self.sequence.issue(params, mode);
        if mode == FetchMode::Replace {
            self.deferred.borrow_mut().clear();
        }
        log::debug!(
            "fetch #{} ({:?}): rows {}..={}",
            ticket.seq(),
            mode,
            ticket.params().start_row,
            ticket.params().end_row
        );
        ticket
    }

    /// Apply a response, or hold it until the requests issued before it have
    /// been applied.
    ///
    /// Each applied response writes the rows (replace or append) and then the
    /// reported total, as two store actions. Held responses that become due
    /// are written right after, in issue order.
    pub fn apply(&self, ticket: RequestTicket, result: DataSourceResult) -> FetchOutcome {
        if self.sequence.is_stale(&ticket) {
            log::debug!(
                "fetch #{}: discarded, superseded before #{}",
                ticket.seq(),
                self.sequence.next()
            );
            return FetchOutcome::Stale;
        }
        if !self.sequence.is_next(&ticket) {
            log::debug!(
                "fetch #{}: held until #{} is applied",
                ticket.seq(),
                self.sequence.next()
            );
            self.deferred
                .borrow_mut()
                .insert(ticket.seq(), (ticket.mode(), result));
            return FetchOutcome::Deferred;
        }

        self.write(ticket.seq(), ticket.mode(), result);
        loop {
            let next = self.sequence.next();
            let due = self.deferred.borrow_mut().remove(&next);
            let Some((mode, result)) = due else {
                break;
            };
            self.write(next, mode, result);
        }
        FetchOutcome::Applied
    }

    /// Record a failed request.
    ///
    /// If the request was not already superseded, every outstanding request
    /// is made stale and held responses are dropped, since appending them
    /// would leave a gap. A failed `Append` also rewinds `current_page` to
    /// the last page actually loaded (never past the failed one) so the next
    /// [`fetch_next_page`](Self::fetch_next_page) asks for the first missing
    /// page again. Returns `true` if the sequence was reset.
    pub fn fail(&self, ticket: &RequestTicket) -> bool {
        if self.sequence.is_stale(ticket) {
            return false;
        }
        self.sequence.reset();
        self.deferred.borrow_mut().clear();
        if ticket.mode() == FetchMode::Append {
            let snapshot = self.store.snapshot();
            let page_size = snapshot.page_size.max(1);
            let failed_page = ticket.params().start_row / page_size;
            let loaded_pages = snapshot.rows.len().div_ceil(page_size);
            let resume_after = failed_page.min(loaded_pages).saturating_sub(1);
            if snapshot.current_page > resume_after {
                log::debug!("fetch #{}: rewinding to page {resume_after}", ticket.seq());
                self.store.update(|s| GridState {
                    current_page: resume_after,
                    ..s.clone()
                });
            }
        }
        true
    }

    fn write(&self, seq: u64, mode: FetchMode, result: DataSourceResult) {
        log::debug!(
            "fetch #{seq}: applying {} rows, total {}",
            result.rows.len(),
            result.total_rows
        );
        self.sequence.mark_applied(seq);
        match mode {
            FetchMode::Replace => self.store.set_rows(result.rows),
            FetchMode::Append => self.store.add_rows(result.rows),
        }
        self.store.set_total_rows(result.total_rows);
    }

    /// Dispatch, await and apply one request.
    ///
    /// # Errors
    /// Returns the data source's error unchanged. No rows are written in that
    /// case; see [`fail`](Self::fail) for what happens to outstanding requests.
    pub async fn fetch<S: DataSource>(
        &self,
        source: &S,
        params: DataSourceParams,
        mode: FetchMode,
    ) -> Result<FetchOutcome> {
        let ticket = self.begin(params, mode);
        match source.fetch(ticket.params().clone()).await {
            Ok(result) => Ok(self.apply(ticket, result)),
            Err(e) => {
                log::warn!("fetch #{} failed: {e}", ticket.seq());
                self.fail(&ticket);
                Err(e)
            }
        }
    }

    /// Load the rows covering a virtual window, with the store's current
    /// sort and filter criteria. Returns `None` without dispatching when the
    /// window is empty.
    ///
    /// # Errors
    /// Returns the data source's error unchanged.
    pub async fn fetch_window<S: DataSource>(
        &self,
        source: &S,
        range: &VisibleRange,
    ) -> Result<Option<FetchOutcome>> {
        let Some(params) = DataSourceParams::from_window(&self.store.snapshot(), range) else {
            return Ok(None);
        };
        self.fetch(source, params, FetchMode::Replace).await.map(Some)
    }

    /// Load the store's current page, replacing the loaded rows.
    ///
    /// # Errors
    /// Returns the data source's error unchanged.
    pub async fn fetch_page<S: DataSource>(&self, source: &S) -> Result<FetchOutcome> {
        let params = DataSourceParams::for_page(&self.store.snapshot());
        self.fetch(source, params, FetchMode::Replace).await
    }

    /// Advance the page and append its rows (infinite scroll).
    ///
    /// Several calls may be in flight at once; their pages are appended in
    /// page order whatever order the responses arrive in.
    ///
    /// # Errors
    /// Returns the data source's error unchanged. The page counter is rewound
    /// so the failed page is requested again by the next call.
    pub async fn fetch_next_page<S: DataSource>(&self, source: &S) -> Result<FetchOutcome> {
        self.store.increment_page();
        let params = DataSourceParams::for_page(&self.store.snapshot());
        self.fetch(source, params, FetchMode::Append).await
    }
}
