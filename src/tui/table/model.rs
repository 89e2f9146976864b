//! Bugs table state machine
//!
//! Pure model for the table screen, separated from the iocraft view so the
//! pagination, sorting, and search transitions can be unit tested without a
//! terminal or a network. Transitions that talk to the remote layer return a
//! `TableRequest` describing the call to make; results come back through
//! `apply` tagged with the generation of the request that produced them, and
//! responses from superseded requests are discarded.

use crate::remote::{BugQuery, SortSpec};
use crate::types::{BugRecord, SortDirection, SortField};

/// Which transition issued a list request; decides how its results apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    Sort,
    Paginate,
    Search,
}

/// A remote call the view should run for the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRequest {
    List {
        generation: u64,
        kind: LoadKind,
        query: BugQuery,
    },
    Search {
        generation: u64,
        title: String,
    },
}

impl TableRequest {
    pub fn generation(&self) -> u64 {
        match self {
            TableRequest::List { generation, .. } | TableRequest::Search { generation, .. } => {
                *generation
            }
        }
    }
}

/// Successful results of a table request.
#[derive(Debug, Clone)]
pub struct TableResponse {
    pub generation: u64,
    pub kind: LoadKind,
    pub results: Vec<BugRecord>,
}

/// Pagination direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    Next,
    Prev,
}

/// State of the bugs table screen.
#[derive(Debug, Clone)]
pub struct TableModel {
    /// Currently displayed bugs
    pub results: Vec<BugRecord>,
    /// Whether a load is in flight (drives the loading indicator)
    pub loading: bool,
    /// Current page number, starting at 0
    pub page: u32,
    /// Direction the next issued sort uses after its flip
    pub direction: SortDirection,
    /// Column the results are sorted by; `None` means no sort indicator
    pub sort_column: Option<SortField>,
    /// Whether the page after the current one is known to be empty
    pub last_page: bool,
    /// Title filter text, applied to sort/paginate/search calls
    pub title_filter: String,
    /// Monotonically increasing tag for issued requests
    generation: u64,
}

impl TableModel {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
            loading: true,
            page: 0,
            direction: SortDirection::Descending,
            sort_column: None,
            last_page: false,
            title_filter: String::new(),
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_title_filter(&mut self, filter: String) {
        self.title_filter = filter;
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn title_param(&self) -> Option<String> {
        if self.title_filter.is_empty() {
            None
        } else {
            Some(self.title_filter.clone())
        }
    }

    fn sort_spec(&self) -> Option<SortSpec> {
        self.sort_column.map(|field| SortSpec {
            field,
            direction: self.direction,
        })
    }

    /// Initial load: fetch everything, no parameters.
    pub fn initial_load(&mut self) -> TableRequest {
        self.loading = true;
        TableRequest::List {
            generation: self.next_generation(),
            kind: LoadKind::Initial,
            query: BugQuery::default(),
        }
    }

    /// Sort by a column: the stored direction flips first, and the issued
    /// query carries the flipped direction, the current page, and the title
    /// filter. Consecutive sorts alternate direction no matter which other
    /// transitions run in between.
    pub fn sort(&mut self, field: SortField) -> TableRequest {
        self.sort_column = Some(field);
        self.direction = self.direction.toggle();
        TableRequest::List {
            generation: self.next_generation(),
            kind: LoadKind::Sort,
            query: BugQuery {
                sort: self.sort_spec(),
                page: Some(self.page),
                title: self.title_param(),
            },
        }
    }

    /// Move a page forward or back. `Next` is refused on the last page,
    /// `Prev` on page 0; a refused move issues no request. The issued query
    /// always carries the page number, and the sort only when a sort column
    /// is active.
    pub fn paginate(&mut self, direction: PageMove) -> Option<TableRequest> {
        let current = self.page;
        match direction {
            PageMove::Next if !self.last_page => self.page += 1,
            PageMove::Prev if self.page > 0 => self.page -= 1,
            _ => {}
        }
        if self.page == current {
            return None;
        }
        Some(TableRequest::List {
            generation: self.next_generation(),
            kind: LoadKind::Paginate,
            query: BugQuery {
                sort: self.sort_spec(),
                page: Some(self.page),
                title: self.title_param(),
            },
        })
    }

    /// Search by the current title filter. Page and sort state are left
    /// untouched.
    pub fn search(&mut self) -> TableRequest {
        TableRequest::Search {
            generation: self.next_generation(),
            title: self.title_filter.clone(),
        }
    }

    /// A delete succeeded: back to page 0 with the sort indicator cleared,
    /// then reload from scratch.
    pub fn delete_succeeded(&mut self) -> TableRequest {
        self.sort_column = None;
        self.page = 0;
        self.last_page = false;
        self.initial_load()
    }

    /// Apply the results of a finished request. Responses whose generation
    /// was superseded by a later request are discarded, so a slow earlier
    /// call can never overwrite newer results.
    pub fn apply(&mut self, response: TableResponse) {
        if response.generation != self.generation {
            tracing::debug!(
                "discarding stale table response (generation {} superseded by {})",
                response.generation,
                self.generation
            );
            return;
        }
        self.loading = false;
        match response.kind {
            LoadKind::Initial | LoadKind::Sort | LoadKind::Search => {
                self.results = response.results;
            }
            LoadKind::Paginate => {
                // Page boundary detection: an empty page means we ran past
                // the end. Roll back and remember, keeping current results.
                if response.results.is_empty() {
                    self.page = self.page.saturating_sub(1);
                    self.last_page = true;
                } else {
                    self.results = response.results;
                    self.last_page = false;
                }
            }
        }
    }

    /// A request failed: displayed state stays untouched, only the loading
    /// indicator clears.
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }
}

impl Default for TableModel {
    fn default() -> Self {
        Self::new()
    }
}
