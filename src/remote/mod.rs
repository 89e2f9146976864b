//! Remote access layer for the bugs API.
//!
//! This module defines the provider seam the screens talk through, the query
//! types for list-style calls, and the uniform retry policy: every remote
//! operation is retried exactly once on failure, and a second failure
//! surfaces as a single `Remote` error carrying the underlying cause.

pub mod http;

use async_trait::async_trait;
use jiff::Timestamp;

use crate::error::{BugboardError, Result};
use crate::types::{BugPriority, BugRecord, Comment, SortDirection, SortField};

pub use http::HttpBugsApi;

/// Sort portion of a list query, serialized as `field,asc|desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Value for the `sort` query parameter.
    pub fn as_param(&self) -> String {
        format!("{},{}", self.field.wire_name(), self.direction.as_param())
    }
}

/// Query for list-style calls. Parameters left unset are omitted from the
/// request entirely rather than sent empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugQuery {
    pub sort: Option<SortSpec>,
    pub page: Option<u32>,
    pub title: Option<String>,
}

impl BugQuery {
    /// Render the query as request parameters, omitting unset fields.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.as_param()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(title) = &self.title {
            pairs.push(("title", title.clone()));
        }
        pairs
    }
}

/// The user-entered fields of a bug, as collected by the form. Timestamps and
/// comments are attached by the request builders below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugDraft {
    pub title: String,
    pub description: String,
    pub priority: BugPriority,
    pub reporter: String,
    pub status: String,
}

/// Build the POST body for a create call: no id, no comments, both
/// timestamps stamped to the client's "now".
pub fn create_body(draft: &BugDraft, now: Timestamp) -> BugRecord {
    BugRecord {
        id: None,
        title: draft.title.clone(),
        description: draft.description.clone(),
        priority: draft.priority,
        reporter: draft.reporter.clone(),
        status: draft.status.clone(),
        created_at: now,
        updated_at: now,
        comments: None,
    }
}

/// Build the PUT body for an update call: the original `created_at` is
/// resent verbatim, `updated_at` is restamped, and the full merged comment
/// sequence rides along. The id travels in the URL, not the body.
pub fn update_body(
    draft: &BugDraft,
    created_at: Timestamp,
    comments: Vec<Comment>,
    now: Timestamp,
) -> BugRecord {
    BugRecord {
        id: None,
        title: draft.title.clone(),
        description: draft.description.clone(),
        priority: draft.priority,
        reporter: draft.reporter.clone(),
        status: draft.status.clone(),
        created_at,
        updated_at: now,
        comments: Some(comments),
    }
}

/// Common interface to the bugs API.
#[async_trait]
pub trait BugProvider: Send + Sync {
    /// Fetch bugs, optionally sorted, paginated, and filtered by title.
    async fn list(&self, query: &BugQuery) -> Result<Vec<BugRecord>>;

    /// Create a new bug. The server assigns the id.
    async fn create(&self, draft: &BugDraft) -> Result<BugRecord>;

    /// Full-replace update of an existing bug.
    async fn update(
        &self,
        id: u64,
        draft: &BugDraft,
        created_at: Timestamp,
        comments: Vec<Comment>,
    ) -> Result<BugRecord>;

    /// Delete a bug, returning the server's success flag.
    async fn delete(&self, id: u64) -> Result<bool>;

    /// Fetch bugs whose title matches the filter.
    async fn search(&self, title: &str) -> Result<Vec<BugRecord>>;
}

/// Run a remote operation, retrying exactly once on failure.
///
/// The first failure is logged and the operation re-executed; a second
/// failure is final and surfaces as `BugboardError::Remote`. There is never a
/// third attempt.
pub(crate) async fn with_retry<T, E, F, Fut>(mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    match operation().await {
        Ok(value) => Ok(value),
        Err(first) => {
            tracing::warn!("remote call failed, retrying once: {first}");
            operation().await.map_err(|err| BugboardError::Remote {
                cause: err.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_query_pairs_omit_unset_fields() {
        let query = BugQuery::default();
        assert!(query.query_pairs().is_empty());

        let query = BugQuery {
            sort: None,
            page: Some(0),
            title: None,
        };
        assert_eq!(query.query_pairs(), vec![("page", "0".to_string())]);
    }

    #[test]
    fn test_query_pairs_full() {
        let query = BugQuery {
            sort: Some(SortSpec {
                field: SortField::Priority,
                direction: SortDirection::Ascending,
            }),
            page: Some(2),
            title: Some("crash".to_string()),
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("sort", "priority,asc".to_string()),
                ("page", "2".to_string()),
                ("title", "crash".to_string()),
            ]
        );
    }

    fn draft() -> BugDraft {
        BugDraft {
            title: "Login button unresponsive".to_string(),
            description: "d".repeat(60),
            priority: BugPriority::P1,
            reporter: "QA".to_string(),
            status: "Open".to_string(),
        }
    }

    #[test]
    fn test_create_body_stamps_both_timestamps_to_now() {
        let now = Timestamp::now();
        let body = create_body(&draft(), now);
        assert_eq!(body.id, None);
        assert_eq!(body.comments, None);
        assert_eq!(body.created_at, now);
        assert_eq!(body.updated_at, now);
    }

    #[test]
    fn test_update_body_preserves_created_at() {
        let created: Timestamp = "2023-11-05T08:00:00Z".parse().unwrap();
        let now = Timestamp::now();
        let comments = vec![Comment {
            id: None,
            reporter: "QA".to_string(),
            description: "still broken".to_string(),
        }];
        let body = update_body(&draft(), created, comments.clone(), now);
        assert_eq!(body.created_at, created);
        assert_eq!(body.updated_at, now);
        assert_eq!(body.comments, Some(comments));
        assert_eq!(body.id, None);
    }

    #[tokio::test]
    async fn test_retry_succeeds_on_second_attempt() {
        let attempts = AtomicU32::new(0);
        let result = with_retry(|| async {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err("connection reset".to_string())
            } else {
                Ok(42u32)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_stops_after_two_attempts() {
        let attempts = AtomicU32::new(0);
        let result: Result<u32> = with_retry(|| async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err::<u32, _>("HTTP 500".to_string())
        })
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Something went wrong: HTTP 500");
    }

    #[tokio::test]
    async fn test_retry_passes_through_first_success() {
        let attempts = AtomicU32::new(0);
        let result = with_retry(|| async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>("ok")
        })
        .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
