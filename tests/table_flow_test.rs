//! Table and form flow tests against a scripted provider
//!
//! These complement the unit tests in `src/tui/table/model.rs` and
//! `src/tui/form/model.rs` by driving the state machines through the
//! `BugProvider` seam the way the views do, and asserting what actually
//! reaches the wire.

use async_trait::async_trait;
use jiff::Timestamp;
use parking_lot::Mutex;

use bugboard::error::{BugboardError, Result};
use bugboard::handoff::EditHandoff;
use bugboard::remote::{BugDraft, BugProvider, BugQuery};
use bugboard::tui::form::{FormModel, SaveRequest};
use bugboard::tui::table::{LoadKind, PageMove, TableModel, TableRequest, TableResponse};
use bugboard::types::{BugPriority, BugRecord, Comment, SortDirection, SortField};

// ============================================================================
// Test Helpers
// ============================================================================

fn mock_bug(id: u64, title: &str) -> BugRecord {
    BugRecord {
        id: Some(id),
        title: title.to_string(),
        description: "d".repeat(60),
        priority: BugPriority::P2,
        reporter: "QA".to_string(),
        status: "Open".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        comments: None,
    }
}

/// Provider that serves fixed pages and records everything it is asked.
#[derive(Default)]
struct ScriptedProvider {
    pages: Vec<Vec<BugRecord>>,
    list_calls: Mutex<Vec<BugQuery>>,
    search_calls: Mutex<Vec<String>>,
    delete_calls: Mutex<Vec<u64>>,
    update_calls: Mutex<Vec<(u64, Timestamp, Vec<Comment>)>>,
}

impl ScriptedProvider {
    fn with_pages(pages: Vec<Vec<BugRecord>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }
}

#[async_trait]
impl BugProvider for ScriptedProvider {
    async fn list(&self, query: &BugQuery) -> Result<Vec<BugRecord>> {
        self.list_calls.lock().push(query.clone());
        let page = query.page.unwrap_or(0) as usize;
        Ok(self.pages.get(page).cloned().unwrap_or_default())
    }

    async fn create(&self, _draft: &BugDraft) -> Result<BugRecord> {
        Err(BugboardError::Other("create is not scripted".to_string()))
    }

    async fn update(
        &self,
        id: u64,
        draft: &BugDraft,
        created_at: Timestamp,
        comments: Vec<Comment>,
    ) -> Result<BugRecord> {
        self.update_calls
            .lock()
            .push((id, created_at, comments.clone()));
        let mut record = mock_bug(id, &draft.title);
        record.created_at = created_at;
        record.comments = Some(comments);
        Ok(record)
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        self.delete_calls.lock().push(id);
        Ok(true)
    }

    async fn search(&self, title: &str) -> Result<Vec<BugRecord>> {
        self.search_calls.lock().push(title.to_string());
        Ok(self
            .pages
            .first()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|bug| bug.title.contains(title))
            .collect())
    }
}

/// Run a table request the way the view does and apply its results.
async fn run(provider: &ScriptedProvider, model: &mut TableModel, request: TableRequest) {
    let (generation, kind, results) = match &request {
        TableRequest::List {
            generation,
            kind,
            query,
        } => (*generation, *kind, provider.list(query).await.unwrap()),
        TableRequest::Search { generation, title } => (
            *generation,
            LoadKind::Search,
            provider.search(title).await.unwrap(),
        ),
    };
    model.apply(TableResponse {
        generation,
        kind,
        results,
    });
}

// ============================================================================
// Table flow
// ============================================================================

#[tokio::test]
async fn test_pagination_boundary_through_provider() {
    let provider = ScriptedProvider::with_pages(vec![
        vec![mock_bug(1, "a"), mock_bug(2, "b")],
        vec![], // page 1 is empty
    ]);
    let mut model = TableModel::new();

    let request = model.initial_load();
    run(&provider, &mut model, request).await;
    assert_eq!(model.results.len(), 2);

    let request = model.paginate(PageMove::Next).unwrap();
    run(&provider, &mut model, request).await;

    assert_eq!(model.page, 0);
    assert!(model.last_page);
    assert_eq!(model.results.len(), 2, "page 0 results must survive");

    // The empty probe actually asked the server for page 1.
    let calls = provider.list_calls.lock();
    assert_eq!(calls.last().unwrap().page, Some(1));
}

#[tokio::test]
async fn test_sort_directions_alternate_on_the_wire() {
    let provider = ScriptedProvider::with_pages(vec![vec![mock_bug(1, "a")], vec![mock_bug(2, "b")]]);
    let mut model = TableModel::new();

    let request = model.sort(SortField::Priority);
    run(&provider, &mut model, request).await;

    // Pagination in between must not disturb the alternation.
    let request = model.paginate(PageMove::Next).unwrap();
    run(&provider, &mut model, request).await;

    let request = model.sort(SortField::Priority);
    run(&provider, &mut model, request).await;

    let calls = provider.list_calls.lock();
    let sort_params: Vec<String> = calls
        .iter()
        .filter_map(|query| query.sort.map(|s| s.as_param()))
        .collect();
    assert_eq!(
        sort_params,
        vec![
            "priority,asc".to_string(),
            "priority,asc".to_string(), // the paginate call reuses the active sort
            "priority,desc".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_pagination_always_sends_page_and_omits_empty_title() {
    let provider = ScriptedProvider::with_pages(vec![vec![mock_bug(1, "a")], vec![mock_bug(2, "b")]]);
    let mut model = TableModel::new();

    let request = model.paginate(PageMove::Next).unwrap();
    run(&provider, &mut model, request).await;

    let calls = provider.list_calls.lock();
    let query = calls.last().unwrap();
    assert_eq!(query.page, Some(1));
    assert_eq!(query.title, None);
    assert_eq!(query.sort, None);
}

#[tokio::test]
async fn test_delete_resets_and_reloads_unfiltered() {
    let provider = ScriptedProvider::with_pages(vec![vec![mock_bug(1, "a")]]);
    let mut model = TableModel::new();

    model.sort(SortField::Status);
    model.set_title_filter("crash".to_string());
    let deleted = provider.delete(1).await.unwrap();
    assert!(deleted);

    let request = model.delete_succeeded();
    run(&provider, &mut model, request).await;

    assert_eq!(model.page, 0);
    assert_eq!(model.sort_column, None);
    assert_eq!(model.direction, SortDirection::Ascending, "direction survives");

    let calls = provider.list_calls.lock();
    assert_eq!(calls.last().unwrap(), &BugQuery::default());
    assert_eq!(provider.delete_calls.lock().as_slice(), &[1]);
}

#[tokio::test]
async fn test_search_reaches_provider_with_filter_text() {
    let provider = ScriptedProvider::with_pages(vec![vec![
        mock_bug(1, "login broken"),
        mock_bug(2, "layout glitch"),
    ]]);
    let mut model = TableModel::new();
    model.set_title_filter("login".to_string());

    let request = model.search();
    run(&provider, &mut model, request).await;

    assert_eq!(provider.search_calls.lock().as_slice(), &["login".to_string()]);
    assert_eq!(model.results.len(), 1);
    assert_eq!(model.results[0].title, "login broken");
}

// ============================================================================
// Form flow
// ============================================================================

#[tokio::test]
async fn test_edit_submit_sends_merged_comments_and_original_created_at() {
    let created_at: Timestamp = "2023-11-05T08:00:00Z".parse().unwrap();
    let mut record = mock_bug(17, "Login button unresponsive");
    record.created_at = created_at;
    record.comments = Some(vec![Comment {
        id: Some(1),
        reporter: "DEV".to_string(),
        description: "existing".to_string(),
    }]);

    // The hand-off channel is how the record reaches the form.
    let handoff = EditHandoff::new();
    handoff.publish(record);
    let mut model = match handoff.take() {
        Some(record) => FormModel::edit(record),
        None => FormModel::create(),
    };
    assert!(model.is_edit());

    model.fields.comment_reporter = "QA".to_string();
    model.fields.comment_description = "still broken".to_string();
    model.add_comment();

    let provider = ScriptedProvider::default();
    match model.submit().unwrap() {
        SaveRequest::Update {
            id,
            draft,
            created_at: sent,
            comments,
        } => {
            let updated = provider
                .update(id, &draft, sent, comments)
                .await
                .unwrap();
            assert_eq!(updated.created_at, created_at);
        }
        SaveRequest::Create { .. } => panic!("expected an update"),
    }

    let calls = provider.update_calls.lock();
    let (id, sent, comments) = &calls[0];
    assert_eq!(*id, 17);
    assert_eq!(*sent, created_at);
    let descriptions: Vec<&str> = comments.iter().map(|c| c.description.as_str()).collect();
    assert_eq!(descriptions, vec!["existing", "still broken"]);
}

#[test]
fn test_handoff_expires_after_one_second() {
    let handoff = EditHandoff::new();
    handoff.publish(mock_bug(1, "stale"));
    std::thread::sleep(std::time::Duration::from_millis(1100));
    assert!(handoff.take().is_none());
}
