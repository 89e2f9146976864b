pub mod commands;
pub mod config;
pub mod error;
pub mod handoff;
pub mod remote;
pub mod tui;
pub mod types;

pub use config::Config;
pub use error::{BugboardError, Result};
pub use handoff::{EditHandoff, handoff};
pub use remote::{BugDraft, BugProvider, BugQuery, HttpBugsApi, SortSpec};
pub use tui::Route;
pub use types::{BugPriority, BugRecord, Comment, SortDirection, SortField};
