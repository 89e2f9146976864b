//! Bug form state machine
//!
//! Pure model for the form screen: create-vs-edit mode, field values, and
//! the locally accumulated comments that only materialize at submit time.
//! The mode is decided once at screen initialization (from the hand-off
//! channel) and never changes afterwards.

use jiff::Timestamp;

use crate::remote::BugDraft;
use crate::types::{BugPriority, BugRecord, Comment};

use super::validator::{FieldError, validate};

/// The editing mode. `Edit` is only entered for records that have been
/// persisted, so the id is always available at submit time.
#[derive(Debug, Clone, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit {
        id: u64,
        original: Box<BugRecord>,
    },
}

/// Raw values of the form fields, including the two comment drafts.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pub title: String,
    pub description: String,
    pub priority: Option<BugPriority>,
    pub reporter: String,
    pub status: String,
    pub comment_reporter: String,
    pub comment_description: String,
}

/// The remote call a submit should make.
#[derive(Debug, Clone)]
pub enum SaveRequest {
    Create {
        draft: BugDraft,
    },
    Update {
        id: u64,
        draft: BugDraft,
        created_at: Timestamp,
        comments: Vec<Comment>,
    },
}

/// State of the bug form screen.
#[derive(Debug, Clone, Default)]
pub struct FormModel {
    pub mode: FormMode,
    pub fields: FormFields,
    /// Comments added in this session, not yet sent anywhere
    pub pending_comments: Vec<Comment>,
    /// Set after a successful save; drives the acknowledgment message
    pub saved: bool,
}

impl FormModel {
    pub fn create() -> Self {
        Self::default()
    }

    /// Enter edit mode for a record delivered through the hand-off channel.
    /// A record that was never persisted cannot be edited and falls back to
    /// create mode.
    pub fn edit(record: BugRecord) -> Self {
        let Some(id) = record.id else {
            return Self::create();
        };
        let fields = FormFields {
            title: record.title.clone(),
            description: record.description.clone(),
            priority: Some(record.priority),
            reporter: record.reporter.clone(),
            status: record.status.clone(),
            comment_reporter: String::new(),
            comment_description: String::new(),
        };
        Self {
            mode: FormMode::Edit {
                id,
                original: Box::new(record),
            },
            fields,
            pending_comments: Vec::new(),
            saved: false,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    /// Append the comment drafts to the pending list and clear them. Blank
    /// drafts are ignored.
    pub fn add_comment(&mut self) {
        if self.fields.comment_reporter.trim().is_empty()
            && self.fields.comment_description.trim().is_empty()
        {
            return;
        }
        self.pending_comments.push(Comment {
            id: None,
            reporter: std::mem::take(&mut self.fields.comment_reporter),
            description: std::mem::take(&mut self.fields.comment_description),
        });
    }

    /// The comment sequence an update sends: the record's existing comments
    /// in order, with the pending ones appended after.
    pub fn merged_comments(&self) -> Vec<Comment> {
        let mut merged = match &self.mode {
            FormMode::Edit { original, .. } => original.comments.clone().unwrap_or_default(),
            FormMode::Create => Vec::new(),
        };
        merged.extend(self.pending_comments.iter().cloned());
        merged
    }

    fn draft(&self) -> BugDraft {
        BugDraft {
            title: self.fields.title.clone(),
            description: self.fields.description.clone(),
            priority: self.fields.priority.unwrap_or_default(),
            reporter: self.fields.reporter.clone(),
            status: self.fields.status.clone(),
        }
    }

    /// Validate the fields and build the payload a submit should send.
    pub fn submit(&self) -> Result<SaveRequest, Vec<FieldError>> {
        let errors = validate(&self.fields);
        if !errors.is_empty() {
            return Err(errors);
        }
        match &self.mode {
            FormMode::Create => Ok(SaveRequest::Create {
                draft: self.draft(),
            }),
            FormMode::Edit { id, original } => Ok(SaveRequest::Update {
                id: *id,
                draft: self.draft(),
                created_at: original.created_at,
                comments: self.merged_comments(),
            }),
        }
    }

    /// A save succeeded: set the acknowledgment flag and reset the fields.
    /// The mode stays what it was for the lifetime of the screen.
    pub fn saved(&mut self) {
        self.saved = true;
        self.fields = FormFields::default();
        self.pending_comments.clear();
    }
}
