//! Screen routes.
//!
//! The client keeps the original UI surface's route paths: `/` opens the
//! bugs table, `/addBug` and `/editBug` open the shared form screen, and any
//! other path lands on the error screen.

use std::fmt;

/// A navigable screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Table,
    AddBug,
    EditBug,
    NotFound(String),
}

impl Route {
    /// Resolve a route path. Unknown paths resolve to the error screen
    /// rather than failing.
    pub fn parse(path: &str) -> Route {
        match path.trim() {
            "" | "/" => Route::Table,
            "/addBug" => Route::AddBug,
            "/editBug" => Route::EditBug,
            other => Route::NotFound(other.to_string()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Table => write!(f, "/"),
            Route::AddBug => write!(f, "/addBug"),
            Route::EditBug => write!(f, "/editBug"),
            Route::NotFound(path) => write!(f, "{path}"),
        }
    }
}
