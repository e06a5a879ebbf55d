use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::notify::Notifier;
use super::query::{Filters, ListQuery, SEARCH_KEY};
use super::state::{ListState, ListStatus};
use crate::api::ApiError;
use crate::config;
use crate::models::Page;

/// Where a list gets its pages from.
pub trait PageSource<T>: Send + Sync + 'static {
    fn fetch(&self, query: ListQuery) -> BoxFuture<'static, Result<Page<T>, ApiError>>;
}

#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Quiet period after the last search keystroke before it is committed.
    pub debounce: Duration,
    pub per_page: u32,
    pub filters: Filters,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(config::DEFAULT_SEARCH_DEBOUNCE_MS),
            per_page: config::DEFAULT_PER_PAGE,
            filters: Filters::default(),
        }
    }
}

impl ListOptions {
    pub fn from_env() -> Self {
        Self {
            debounce: config::get_search_debounce(),
            per_page: config::get_default_per_page(),
            filters: Filters::default(),
        }
    }
}

#[derive(Default)]
struct Tasks {
    in_flight: Option<JoinHandle<()>>,
    debounce: Option<JoinHandle<()>>,
}

struct Inner<T> {
    source: Arc<dyn PageSource<T>>,
    debounce: Duration,
    notifier: Notifier,
    // Lock order: tasks, then state.
    tasks: Mutex<Tasks>,
    state: Mutex<ListState<T>>,
    changed: watch::Sender<u64>,
}

/// Keeps one server-backed table in sync with its filters and page cursor.
///
/// Search input is debounced; discrete filters and pagination commit at once.
/// Every committed change issues exactly one request and aborts the one still
/// pending, so only the latest request can ever update the rows.
///
/// Methods spawn onto the current tokio runtime and must be called from
/// within one. Dropping the controller aborts all pending work.
pub struct ListController<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Send + 'static> ListController<T> {
    pub fn new(source: Arc<dyn PageSource<T>>, options: ListOptions, notifier: Notifier) -> Self {
        let query = ListQuery::new(options.per_page).with_filters(options.filters);
        let (changed, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                source,
                debounce: options.debounce,
                notifier,
                tasks: Mutex::new(Tasks::default()),
                state: Mutex::new(ListState::new(query)),
                changed,
            }),
        }
    }

    /// Initial fetch.
    pub fn load(&self) {
        Inner::refresh(&self.inner);
    }

    /// Re-issue the current query.
    pub fn refresh(&self) {
        Inner::refresh(&self.inner);
    }

    /// Feed one change of the search box. Only the value still present after
    /// the debounce period is committed.
    pub fn input_search(&self, text: &str) {
        let mut tasks = self.inner.tasks.lock().unwrap();
        if let Some(pending) = tasks.debounce.take() {
            pending.abort();
        }
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        let delay = self.inner.debounce;
        tasks.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            Inner::commit_filter(&inner, SEARCH_KEY, &text);
        }));
    }

    /// Set a discrete filter; an empty value clears it.
    pub fn set_filter(&self, key: &str, value: &str) {
        Inner::commit_filter(&self.inner, key, value);
    }

    pub fn clear_filter(&self, key: &str) {
        Inner::commit_filter(&self.inner, key, "");
    }

    pub fn clear_filters(&self) {
        self.reset_filters(Filters::default());
    }

    /// Replace the whole filter set with `baseline` in one committed change.
    pub fn reset_filters(&self, baseline: Filters) {
        let changed = {
            let mut state = self.inner.state.lock().unwrap();
            if state.query.filters == baseline {
                false
            } else {
                state.query.filters = baseline;
                state.reset_page();
                true
            }
        };
        if changed {
            Inner::refresh(&self.inner);
        }
    }

    pub fn set_page(&self, page: u32) {
        let page = page.max(1);
        let changed = {
            let mut state = self.inner.state.lock().unwrap();
            if state.query.page == page {
                false
            } else {
                state.query.page = page;
                true
            }
        };
        if changed {
            Inner::refresh(&self.inner);
        }
    }

    pub fn next_page(&self) {
        let target = {
            let state = self.inner.state.lock().unwrap();
            (state.query.page < state.pagination.total_pages()).then(|| state.query.page + 1)
        };
        match target {
            Some(page) => self.set_page(page),
            None => self.inner.notifier.warning("Already on the last page"),
        }
    }

    pub fn prev_page(&self) {
        let target = {
            let state = self.inner.state.lock().unwrap();
            (state.query.page > 1).then(|| state.query.page - 1)
        };
        match target {
            Some(page) => self.set_page(page),
            None => self.inner.notifier.warning("Already on the first page"),
        }
    }

    /// Change the page size; always goes back to page 1.
    pub fn set_per_page(&self, per_page: u32) {
        if per_page == 0 {
            self.inner.notifier.warning("Page size must be greater than zero");
            return;
        }
        let changed = {
            let mut state = self.inner.state.lock().unwrap();
            if state.query.per_page == per_page && state.query.page == 1 {
                false
            } else {
                state.query.per_page = per_page;
                state.pagination.per_page = per_page;
                state.reset_page();
                true
            }
        };
        if changed {
            Inner::refresh(&self.inner);
        }
    }

    pub fn query(&self) -> ListQuery {
        self.inner.state.lock().unwrap().query.clone()
    }

    pub fn status(&self) -> ListStatus {
        self.inner.state.lock().unwrap().status.clone()
    }

    /// Ticks on every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changed.subscribe()
    }
}

impl<T: Clone + Send + 'static> ListController<T> {
    pub fn snapshot(&self) -> ListState<T> {
        self.inner.state.lock().unwrap().clone()
    }
}

impl<T> Drop for ListController<T> {
    fn drop(&mut self) {
        if let Ok(mut tasks) = self.inner.tasks.lock() {
            if let Some(h) = tasks.debounce.take() {
                h.abort();
            }
            if let Some(h) = tasks.in_flight.take() {
                h.abort();
            }
        }
    }
}

impl<T: Send + 'static> Inner<T> {
    fn commit_filter(this: &Arc<Self>, key: &str, value: &str) {
        let changed = {
            let mut state = this.state.lock().unwrap();
            let changed = state.query.filters.set(key, value);
            if changed {
                state.reset_page();
            }
            changed
        };
        if changed {
            tracing::debug!(key, value, "Filter committed");
            Inner::refresh(this);
        }
    }

    fn refresh(this: &Arc<Self>) {
        let mut tasks = this.tasks.lock().unwrap();
        if let Some(previous) = tasks.in_flight.take() {
            previous.abort();
        }
        let (generation, query) = {
            let mut state = this.state.lock().unwrap();
            state.generation += 1;
            state.status = ListStatus::Loading;
            (state.generation, state.query.clone())
        };
        tracing::debug!(generation, ?query, "Fetching list page");
        let fetch = this.source.fetch(query);
        let inner = Arc::clone(this);
        tasks.in_flight = Some(tokio::spawn(async move {
            let result = fetch.await;
            inner.apply(generation, result);
        }));
        drop(tasks);
        this.bump();
    }

    fn apply(&self, generation: u64, result: Result<Page<T>, ApiError>) {
        {
            let mut state = self.state.lock().unwrap();
            if state.generation != generation {
                tracing::debug!(generation, latest = state.generation, "Discarding superseded list response");
                return;
            }
            match result {
                Ok(page) => state.apply_page(page),
                Err(e) if e.is_cancelled() => state.status = ListStatus::Idle,
                Err(e) => {
                    tracing::warn!(error = %e, "List fetch failed");
                    state.status = ListStatus::Error(e.to_string());
                    self.notifier.error(e.to_string());
                }
            }
        }
        self.bump();
    }

    fn bump(&self) {
        self.changed.send_modify(|v| *v = v.wrapping_add(1));
    }
}
