//! Root component: route-based screen switching.
//!
//! Holds the current route and renders the matching screen. Screens receive
//! the route state and navigate by setting it; unknown paths land on the
//! error screen.

use iocraft::prelude::*;

use crate::tui::components::{Footer, Header, error_shortcuts};
use crate::tui::form::BugsForm;
use crate::tui::route::Route;
use crate::tui::table::BugsTable;
use crate::tui::theme::theme;

/// Props for the App component
#[derive(Default, Props)]
pub struct AppProps {
    /// Route to open on startup
    pub initial_route: Route,
}

/// Root application component
#[component]
pub fn App(props: &AppProps, mut hooks: Hooks) -> impl Into<AnyElement<'static>> {
    let initial = props.initial_route.clone();
    let route: State<Route> = hooks.use_state(move || initial);

    let current = route.read().clone();
    let screen: AnyElement<'static> = match current {
        Route::Table => element! {
            BugsTable(route: Some(route))
        }
        .into(),
        Route::AddBug | Route::EditBug => element! {
            BugsForm(route: Some(route))
        }
        .into(),
        Route::NotFound(path) => element! {
            ErrorPage(path: path, route: Some(route))
        }
        .into(),
    };
    screen
}

/// Props for the error screen
#[derive(Default, Props)]
pub struct ErrorPageProps {
    /// The path that did not resolve to a screen
    pub path: String,
    /// Route state of the app, for navigating back to the table
    pub route: Option<State<Route>>,
}

/// Error screen for unknown routes
#[component]
pub fn ErrorPage(props: &ErrorPageProps, mut hooks: Hooks) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let mut should_exit = hooks.use_state(|| false);
    let route = props.route;

    hooks.use_terminal_events(move |event| {
        let TerminalEvent::Key(KeyEvent { code, kind, .. }) = event else {
            return;
        };
        if kind == KeyEventKind::Release {
            return;
        }
        match code {
            KeyCode::Char('q') => should_exit.set(true),
            KeyCode::Esc => {
                if let Some(mut route) = route {
                    route.set(Route::Table);
                }
            }
            _ => {}
        }
    });

    if should_exit.get() {
        system.exit();
    }

    element! {
        View(
            width,
            height,
            flex_direction: FlexDirection::Column,
            background_color: theme.background,
        ) {
            Header(subtitle: Some("Error"))
            View(
                flex_grow: 1.0,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                gap: 1,
            ) {
                Text(
                    content: "Nothing to see here",
                    color: theme.error,
                    weight: Weight::Bold,
                )
                Text(
                    content: format!("'{}' is not a page", props.path),
                    color: theme.text_dimmed,
                )
            }
            Footer(shortcuts: error_shortcuts())
        }
    }
}
