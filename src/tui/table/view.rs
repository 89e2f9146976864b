//! Bugs table screen
//!
//! Renders the bug list with sorting, pagination, and title search, and
//! hands the selected record to the form screen through the hand-off
//! channel. All state transitions live in the model; this component wires
//! keyboard events and async requests to it.

use iocraft::prelude::*;

use crate::config::Config;
use crate::error::{BugboardError, Result};
use crate::handoff::handoff;
use crate::remote::{BugProvider, HttpBugsApi};
use crate::tui::components::{
    BugList, Footer, Header, SearchBox, search_shortcuts, table_shortcuts,
};
use crate::tui::route::Route;
use crate::tui::theme::theme;
use crate::types::{BugRecord, SORT_COLUMNS};

use super::model::{LoadKind, PageMove, TableModel, TableRequest, TableResponse};

/// Active pane in the table screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Pane {
    #[default]
    List,
    Search,
}

/// Props for the BugsTable component
#[derive(Default, Props)]
pub struct BugsTableProps {
    /// Route state of the app, for navigating to the form screens
    pub route: Option<State<Route>>,
}

/// Main bugs table component
///
/// Layout:
/// ```text
/// +------------------------------------------+
/// | Header                                    |
/// +------------------------------------------+
/// | SearchBox                                 |
/// +------------------------------------------+
/// | BugList (sortable columns, pagination)    |
/// +------------------------------------------+
/// | Footer                                    |
/// +------------------------------------------+
/// ```
#[component]
pub fn BugsTable<'a>(props: &BugsTableProps, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();

    let mut model: State<TableModel> = hooks.use_state(TableModel::new);
    let mut search_query = hooks.use_state(String::new);
    let mut selected_index = hooks.use_state(|| 0usize);
    let mut scroll_offset = hooks.use_state(|| 0usize);
    let mut active_pane = hooks.use_state(|| Pane::List);
    let mut should_exit = hooks.use_state(|| false);
    let mut needs_initial_load = hooks.use_state(|| true);
    let route = props.route;

    // Async fetch: run the request against the API and apply the results to
    // the model. Failures only clear the loading indicator; displayed state
    // is never rolled back.
    let fetch_handler: Handler<TableRequest> = hooks.use_async_handler({
        let model = model;
        move |request: TableRequest| {
            let mut model = model;
            async move {
                match run_table_request(&request).await {
                    Ok(results) => {
                        let response = TableResponse {
                            generation: request.generation(),
                            kind: request_kind(&request),
                            results,
                        };
                        let mut next = model.read().clone();
                        next.apply(response);
                        model.set(next);
                    }
                    Err(e) => {
                        tracing::warn!("table request failed: {e}");
                        let mut next = model.read().clone();
                        next.finish_loading();
                        model.set(next);
                    }
                }
            }
        }
    });

    // Async delete: on a true success flag, reset the table and reload.
    let delete_handler: Handler<u64> = hooks.use_async_handler({
        let model = model;
        let fetch_handler = fetch_handler.clone();
        move |id: u64| {
            let mut model = model;
            let fetch_handler = fetch_handler.clone();
            async move {
                match run_delete(id).await {
                    Ok(true) => {
                        let mut next = model.read().clone();
                        let request = next.delete_succeeded();
                        model.set(next);
                        fetch_handler(request);
                    }
                    Ok(false) => {
                        tracing::warn!("delete of bug {id} was refused by the server");
                    }
                    Err(e) => {
                        tracing::warn!("delete of bug {id} failed: {e}");
                    }
                }
            }
        }
    });

    // Issue the initial load exactly once.
    if needs_initial_load.get() {
        needs_initial_load.set(false);
        let mut next = model.read().clone();
        let request = next.initial_load();
        model.set(next);
        fetch_handler(request);
    }

    let snapshot = model.read().clone();
    let result_count = snapshot.results.len();

    // Total height - header (1) - search box (3) - footer (1), leaving the
    // rest to the bordered list (its own border eats 2 more).
    let list_height = height.saturating_sub(7) as usize;

    // Keyboard event handling
    hooks.use_terminal_events({
        let results_for_events: Vec<BugRecord> = snapshot.results.clone();
        let fetch_handler = fetch_handler.clone();
        let delete_handler = delete_handler.clone();
        move |event| {
            let TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event
            else {
                return;
            };
            if kind == KeyEventKind::Release {
                return;
            }

            match active_pane.get() {
                Pane::Search => match code {
                    KeyCode::Esc => {
                        search_query.set(String::new());
                        active_pane.set(Pane::List);
                    }
                    KeyCode::Enter => {
                        // Apply the search; page and sort state stay as they
                        // are.
                        let mut next = model.read().clone();
                        next.set_title_filter(search_query.to_string());
                        let request = next.search();
                        model.set(next);
                        fetch_handler(request);
                        active_pane.set(Pane::List);
                    }
                    KeyCode::Tab => {
                        active_pane.set(Pane::List);
                    }
                    KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => {
                        should_exit.set(true);
                    }
                    _ => {}
                },
                Pane::List => match code {
                    KeyCode::Char('q') => {
                        should_exit.set(true);
                    }
                    KeyCode::Char('/') => {
                        active_pane.set(Pane::Search);
                    }
                    KeyCode::Char('j') | KeyCode::Down => {
                        if !results_for_events.is_empty() {
                            let new_idx =
                                (selected_index.get() + 1).min(results_for_events.len() - 1);
                            selected_index.set(new_idx);
                            if new_idx >= scroll_offset.get() + list_height {
                                scroll_offset.set(new_idx.saturating_sub(list_height - 1));
                            }
                        }
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        let new_idx = selected_index.get().saturating_sub(1);
                        selected_index.set(new_idx);
                        if new_idx < scroll_offset.get() {
                            scroll_offset.set(new_idx);
                        }
                    }
                    KeyCode::Char('g') => {
                        selected_index.set(0);
                        scroll_offset.set(0);
                    }
                    KeyCode::Char('G') => {
                        if !results_for_events.is_empty() {
                            let new_idx = results_for_events.len() - 1;
                            selected_index.set(new_idx);
                            if new_idx >= list_height {
                                scroll_offset.set(new_idx.saturating_sub(list_height - 1));
                            }
                        }
                    }
                    KeyCode::Char(c @ '1'..='5') => {
                        // Sort by the numbered column.
                        let column_index = (c as usize) - ('1' as usize);
                        if let Some(field) = SORT_COLUMNS.get(column_index) {
                            let mut next = model.read().clone();
                            next.set_title_filter(search_query.to_string());
                            let request = next.sort(*field);
                            model.set(next);
                            fetch_handler(request);
                        }
                    }
                    KeyCode::Char('l') | KeyCode::Right => {
                        let mut next = model.read().clone();
                        next.set_title_filter(search_query.to_string());
                        let request = next.paginate(PageMove::Next);
                        model.set(next);
                        if let Some(request) = request {
                            selected_index.set(0);
                            scroll_offset.set(0);
                            fetch_handler(request);
                        }
                    }
                    KeyCode::Char('h') | KeyCode::Left => {
                        let mut next = model.read().clone();
                        next.set_title_filter(search_query.to_string());
                        let request = next.paginate(PageMove::Prev);
                        model.set(next);
                        if let Some(request) = request {
                            selected_index.set(0);
                            scroll_offset.set(0);
                            fetch_handler(request);
                        }
                    }
                    KeyCode::Char('a') => {
                        if let Some(mut route) = route {
                            route.set(Route::AddBug);
                        }
                    }
                    KeyCode::Char('e') | KeyCode::Enter => {
                        // Hand the selected record to the form screen, then
                        // navigate.
                        if let Some(bug) = results_for_events.get(selected_index.get()) {
                            handoff().publish(bug.clone());
                            if let Some(mut route) = route {
                                route.set(Route::EditBug);
                            }
                        }
                    }
                    KeyCode::Char('d') => {
                        if let Some(bug) = results_for_events.get(selected_index.get())
                            && let Some(id) = bug.id
                        {
                            delete_handler(id);
                        }
                    }
                    _ => {}
                },
            }
        }
    });

    // Exit if requested
    if should_exit.get() {
        system.exit();
    }

    // Reset selection if it's out of bounds after a reload
    if selected_index.get() >= result_count && result_count > 0 {
        selected_index.set(result_count - 1);
    }
    if scroll_offset.get() > selected_index.get() {
        scroll_offset.set(selected_index.get());
    }

    let theme = theme();
    let shortcuts = match active_pane.get() {
        Pane::Search => search_shortcuts(),
        Pane::List => table_shortcuts(),
    };

    element! {
        View(
            width,
            height,
            flex_direction: FlexDirection::Column,
            background_color: theme.background,
        ) {
            Header(
                subtitle: Some("Bugs"),
                bug_count: Some(result_count),
                page: Some(snapshot.page),
            )

            View(
                width: 100pct,
                padding_left: 1,
                padding_right: 1,
            ) {
                SearchBox(
                    value: Some(search_query),
                    has_focus: active_pane.get() == Pane::Search,
                )
            }

            View(
                flex_grow: 1.0,
                width: 100pct,
                padding_left: 1,
                padding_right: 1,
            ) {
                BugList(
                    bugs: snapshot.results.clone(),
                    selected_index: selected_index.get(),
                    scroll_offset: scroll_offset.get(),
                    has_focus: active_pane.get() == Pane::List,
                    visible_height: list_height,
                    loading: snapshot.loading,
                    sort_column: snapshot.sort_column,
                    sort_direction: snapshot.direction,
                )
            }

            Footer(shortcuts: shortcuts)
        }
    }
}

fn request_kind(request: &TableRequest) -> LoadKind {
    match request {
        TableRequest::List { kind, .. } => *kind,
        TableRequest::Search { .. } => LoadKind::Search,
    }
}

/// Run a table request against the configured API, bounded by the remote
/// timeout.
async fn run_table_request(request: &TableRequest) -> Result<Vec<BugRecord>> {
    let config = Config::load()?;
    let api = HttpBugsApi::from_config(&config)?;
    let operation = async {
        match request {
            TableRequest::List { query, .. } => api.list(query).await,
            TableRequest::Search { title, .. } => api.search(title).await,
        }
    };
    match tokio::time::timeout(config.remote_timeout(), operation).await {
        Ok(result) => result,
        Err(_) => Err(BugboardError::Remote {
            cause: format!(
                "remote operation timed out after {} seconds",
                config.remote_timeout().as_secs()
            ),
        }),
    }
}

/// Run a delete against the configured API, bounded by the remote timeout.
async fn run_delete(id: u64) -> Result<bool> {
    let config = Config::load()?;
    let api = HttpBugsApi::from_config(&config)?;
    match tokio::time::timeout(config.remote_timeout(), api.delete(id)).await {
        Ok(result) => result,
        Err(_) => Err(BugboardError::Remote {
            cause: format!(
                "remote operation timed out after {} seconds",
                config.remote_timeout().as_secs()
            ),
        }),
    }
}
