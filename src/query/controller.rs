use std::sync::Arc;

use tracing::{debug, warn};

use super::error::QueryError;
use super::filter::{apply, ListFilters};
use super::view::{ListCondition, ListView, Pagination};
use crate::client::CategoryApi;
use crate::error::ClientResult;
use crate::models::Category;

/// Lifecycle of the last `refresh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Server page last requested, kept for "retry".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerWindow {
    pub page_number: usize,
    pub page_size: usize,
}

/// Owns the fetched records and the search/filter/page state layered on top.
///
/// Search and filters run client-side over whatever the last refresh
/// returned; the visible page is a second pagination layer over that set.
pub struct CategoryList {
    api: Arc<dyn CategoryApi>,
    records: Vec<Category>,
    state: LoadState,
    server_window: Option<ServerWindow>,
    search_term: String,
    filters: ListFilters,
    current_page: usize,
    page_size: usize,
    allowed_page_sizes: Vec<usize>,
}

impl CategoryList {
    pub fn new(api: Arc<dyn CategoryApi>) -> Self {
        let list = &crate::config::config().list;
        Self::with_page_sizes(api, list.default_page_size, list.page_sizes.clone())
    }

    pub fn with_page_sizes(api: Arc<dyn CategoryApi>, page_size: usize, allowed_page_sizes: Vec<usize>) -> Self {
        Self {
            api,
            records: Vec::new(),
            state: LoadState::Idle,
            server_window: None,
            search_term: String::new(),
            filters: ListFilters::default(),
            current_page: 1,
            page_size: page_size.max(1),
            allowed_page_sizes,
        }
    }

    /// Fetch one server page. On failure the previous records stay in place.
    pub async fn refresh(&mut self, page_number: usize, page_size: usize) -> ClientResult<()> {
        self.state = LoadState::Loading;
        self.server_window = Some(ServerWindow { page_number, page_size });
        debug!(page_number, page_size, "Refreshing categories");

        match self.api.list(page_number, page_size).await {
            Ok(page) => {
                self.records = page.records;
                self.state = LoadState::Loaded;
                self.current_page = self.pagination().page_number;
                Ok(())
            }
            Err(err) => {
                warn!("Category refresh failed: {}", err);
                self.state = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Repeat the last refresh, or load the first page if there was none.
    pub async fn retry(&mut self) -> ClientResult<()> {
        let window = self.server_window.unwrap_or(ServerWindow {
            page_number: 1,
            page_size: self.page_size,
        });
        self.refresh(window.page_number, window.page_size).await
    }

    pub fn records(&self) -> &[Category] {
        &self.records
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.current_page = 1;
    }

    pub fn clear_search(&mut self) {
        self.set_search_term(String::new());
    }

    pub fn filters(&self) -> &ListFilters {
        &self.filters
    }

    pub fn apply_filters(&mut self, filters: ListFilters) {
        self.filters = filters;
        self.current_page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.apply_filters(ListFilters::default());
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<(), QueryError> {
        if !self.allowed_page_sizes.contains(&size) {
            return Err(QueryError::InvalidPageSize {
                size,
                allowed: self.allowed_page_sizes.clone(),
            });
        }
        self.page_size = size;
        self.current_page = 1;
        Ok(())
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.pagination().total_pages
    }

    /// Jump to `page`, clamped to the available pages. Returns whether the
    /// page changed.
    pub fn set_page(&mut self, page: usize) -> bool {
        let target = page.clamp(1, self.total_pages().max(1));
        let changed = target != self.current_page;
        self.current_page = target;
        changed
    }

    pub fn go_to_first(&mut self) -> bool {
        self.set_page(1)
    }

    pub fn go_to_previous(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.set_page(self.current_page - 1)
    }

    pub fn go_to_next(&mut self) -> bool {
        if self.current_page >= self.total_pages() {
            return false;
        }
        self.set_page(self.current_page + 1)
    }

    pub fn go_to_last(&mut self) -> bool {
        self.set_page(self.total_pages())
    }

    pub fn filtered(&self) -> Vec<&Category> {
        apply(&self.records, &self.search_term, &self.filters)
    }

    fn has_query(&self) -> bool {
        !self.search_term.trim().is_empty() || self.filters.is_active()
    }

    fn pagination(&self) -> Pagination {
        Pagination::new(self.filtered().len(), self.page_size, self.current_page)
    }

    /// Derived view for the current state.
    pub fn view(&self) -> ListView {
        let filtered = self.filtered();
        let pagination = Pagination::new(filtered.len(), self.page_size, self.current_page);
        let items: Vec<Category> = pagination.slice(&filtered).iter().map(|c| (*c).clone()).collect();

        let condition = match &self.state {
            LoadState::Loading => ListCondition::Loading,
            LoadState::Failed(message) => ListCondition::Failed {
                message: message.clone(),
                stale: !self.records.is_empty(),
            },
            LoadState::Idle | LoadState::Loaded if self.records.is_empty() => ListCondition::Empty,
            LoadState::Idle | LoadState::Loaded if filtered.is_empty() && self.has_query() => ListCondition::NoResults,
            LoadState::Idle | LoadState::Loaded => ListCondition::Populated,
        };

        ListView {
            condition,
            items,
            pagination,
        }
    }
}
