//! Shared TUI components
//!
//! This module contains reusable UI components for the bugs table and the
//! bug form screens.

pub mod bug_list;
pub mod footer;
pub mod header;
pub mod search_box;

pub use bug_list::{BugList, BugListProps, BugRow, BugRowProps};
pub use footer::{
    Footer, FooterProps, Shortcut, error_shortcuts, form_shortcuts, search_shortcuts,
    table_shortcuts,
};
pub use header::{Header, HeaderProps};
pub use search_box::{SearchBox, SearchBoxProps};
