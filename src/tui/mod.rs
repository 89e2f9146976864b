//! TUI module for the interactive screens
//!
//! This module provides the two main screens and their plumbing:
//! - `table` - bugs table with sorting, pagination, and title search
//! - `form` - create/edit form with comment accumulation

pub mod app;
pub mod components;
pub mod form;
pub mod route;
pub mod table;
pub mod theme;

pub use app::{App, AppProps};
pub use form::{BugsForm, FormModel};
pub use route::Route;
pub use table::{BugsTable, TableModel};
pub use theme::Theme;
