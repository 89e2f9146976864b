//! Bug form screen
//!
//! Shared by the add and edit routes: the mode is decided once at
//! initialization from the hand-off channel and stays fixed. Field values,
//! pending comments, and submit payloads live in the model; this component
//! renders the fields and wires keyboard input and the async save.

use iocraft::prelude::*;

use crate::config::Config;
use crate::error::{BugboardError, Result};
use crate::handoff::handoff;
use crate::remote::{BugProvider, HttpBugsApi};
use crate::tui::components::{Footer, Header, form_shortcuts};
use crate::tui::route::Route;
use crate::tui::theme::theme;
use crate::types::{BugPriority, BugRecord, REPORTERS, STATUSES};

use super::model::{FormFields, FormModel, SaveRequest};
use super::validator::{Field, required_fields};

/// Seconds the saved acknowledgment stays up before navigating back.
const POST_SAVE_DELAY_SECS: u64 = 5;

/// Which field is currently focused in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FormField {
    #[default]
    Title,
    Priority,
    Reporter,
    Status,
    Description,
    CommentReporter,
    CommentDescription,
}

impl FormField {
    /// Get the next field (wrapping)
    fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Priority,
            FormField::Priority => FormField::Reporter,
            FormField::Reporter => FormField::Status,
            FormField::Status => FormField::Description,
            FormField::Description => FormField::CommentReporter,
            FormField::CommentReporter => FormField::CommentDescription,
            FormField::CommentDescription => FormField::Title,
        }
    }

    /// Get the previous field (wrapping)
    fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::CommentDescription,
            FormField::Priority => FormField::Title,
            FormField::Reporter => FormField::Priority,
            FormField::Status => FormField::Reporter,
            FormField::Description => FormField::Status,
            FormField::CommentReporter => FormField::Description,
            FormField::CommentDescription => FormField::CommentReporter,
        }
    }
}

/// Props for the BugsForm component
#[derive(Default, Props)]
pub struct BugsFormProps {
    /// Route state of the app, for navigating back to the table
    pub route: Option<State<Route>>,
}

/// Bug form component for both create and edit
#[component]
pub fn BugsForm<'a>(props: &BugsFormProps, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let theme = theme();
    let (width, height) = hooks.use_terminal_size();

    // The hand-off channel decides the mode exactly once. An empty or
    // expired slot means a fresh create form.
    let mut model: State<FormModel> = hooks.use_state(|| match handoff().take() {
        Some(record) => FormModel::edit(record),
        None => FormModel::create(),
    });

    let mut focused_field = hooks.use_state(FormField::default);
    let mut should_save = hooks.use_state(|| false);
    let mut is_saving = hooks.use_state(|| false);
    let mut error_text = hooks.use_state(String::new);
    let route = props.route;

    // Async save handler: on success flag the model, then navigate back to
    // the table after the fixed delay. Remote failures are logged and leave
    // the form in place for a retry.
    let save_handler: Handler<SaveRequest> = hooks.use_async_handler({
        let model = model;
        move |request: SaveRequest| {
            let mut model = model;
            let mut is_saving = is_saving;
            let route = route;
            async move {
                match run_save(request).await {
                    Ok(_) => {
                        let mut next = model.read().clone();
                        next.saved();
                        model.set(next);
                        is_saving.set(false);

                        tokio::time::sleep(std::time::Duration::from_secs(POST_SAVE_DELAY_SECS))
                            .await;
                        if let Some(mut route) = route {
                            route.set(Route::Table);
                        }
                    }
                    Err(e) => {
                        tracing::error!("saving bug failed: {e}");
                        is_saving.set(false);
                    }
                }
            }
        }
    });

    // Handle save logic
    if should_save.get() && !is_saving.get() {
        should_save.set(false);
        match model.read().submit() {
            Ok(request) => {
                error_text.set(String::new());
                is_saving.set(true);
                save_handler(request);
            }
            Err(errors) => {
                let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                error_text.set(joined.join("; "));
            }
        }
    }

    // Keyboard handling
    hooks.use_terminal_events({
        let mut model = model;
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

            // Global shortcuts (work in any field)
            if modifiers.contains(KeyModifiers::CONTROL) {
                match code {
                    KeyCode::Char('s') => {
                        should_save.set(true);
                        return;
                    }
                    KeyCode::Char('a') => {
                        let mut next = model.read().clone();
                        next.add_comment();
                        model.set(next);
                        return;
                    }
                    _ => {}
                }
            }

            match code {
                KeyCode::Esc => {
                    if let Some(mut route) = route {
                        route.set(Route::Table);
                    }
                    return;
                }
                KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => {
                    focused_field.set(focused_field.get().prev());
                    return;
                }
                KeyCode::Tab => {
                    focused_field.set(focused_field.get().next());
                    return;
                }
                KeyCode::BackTab => {
                    focused_field.set(focused_field.get().prev());
                    return;
                }
                _ => {}
            }

            // Field-specific handling
            match focused_field.get() {
                FormField::Title => edit_text(&mut model, |f| &mut f.title, code),
                FormField::Priority => cycle_priority(&mut model, code),
                FormField::Reporter => {
                    cycle_select(&mut model, |f| &mut f.reporter, REPORTERS, code)
                }
                FormField::Status => cycle_select(&mut model, |f| &mut f.status, STATUSES, code),
                FormField::Description => {
                    edit_multiline(&mut model, |f| &mut f.description, code)
                }
                FormField::CommentReporter => {
                    cycle_select(&mut model, |f| &mut f.comment_reporter, REPORTERS, code)
                }
                FormField::CommentDescription => {
                    edit_text(&mut model, |f| &mut f.comment_description, code)
                }
            }
        }
    });

    let snapshot = model.read().clone();
    let is_edit = snapshot.is_edit();
    let required = required_fields(&snapshot.fields);

    let subtitle = if is_edit { "Edit Bug" } else { "New Bug" };
    let priority_label = snapshot
        .fields
        .priority
        .map(|p| format!("P{p}"))
        .unwrap_or_else(|| "-".to_string());

    // Mandatory markers track `required_fields`, so the status asterisk
    // appears and disappears as the reporter changes.
    let field_label = |validated: Field, label: &str| -> String {
        if required.contains(&validated) {
            format!("{label}*:")
        } else {
            format!("{label}:")
        }
    };

    let label_color = |field: FormField| {
        if focused_field.get() == field {
            theme.border_focused
        } else {
            theme.text_dimmed
        }
    };
    let border_color = |field: FormField| {
        if focused_field.get() == field {
            theme.border_focused
        } else {
            theme.border
        }
    };

    let description_lines: Vec<String> = snapshot
        .fields
        .description
        .lines()
        .map(|line| line.to_string())
        .collect();
    let description_count = snapshot.fields.description.chars().count();

    element! {
        View(
            width,
            height,
            flex_direction: FlexDirection::Column,
            background_color: theme.background,
        ) {
            Header(
                subtitle: Some(subtitle),
            )

            // Saved acknowledgment
            #(if snapshot.saved {
                Some(element! {
                    View(width: 100pct, padding_left: 1, margin_top: 1) {
                        Text(
                            content: format!(
                                "Bug saved - returning to the bug list in {POST_SAVE_DELAY_SECS} seconds"
                            ),
                            color: theme.success,
                            weight: Weight::Bold,
                        )
                    }
                })
            } else {
                None
            })

            // Validation errors (if any)
            #(if error_text.to_string().is_empty() {
                None
            } else {
                Some(element! {
                    View(width: 100pct, padding_left: 1, margin_top: 1) {
                        Text(
                            content: error_text.to_string(),
                            color: theme.error,
                        )
                    }
                })
            })

            // Form content
            View(
                flex_grow: 1.0,
                width: 100pct,
                padding: 1,
                flex_direction: FlexDirection::Column,
                gap: 1,
                overflow: Overflow::Hidden,
            ) {
                // Title field
                View(flex_direction: FlexDirection::Column) {
                    Text(
                        content: field_label(Field::Title, "Title"),
                        color: label_color(FormField::Title),
                    )
                    View(
                        border_style: BorderStyle::Round,
                        border_color: border_color(FormField::Title),
                        padding_left: 1,
                        padding_right: 1,
                        width: 100pct,
                    ) {
                        Text(
                            content: format!("{}_", snapshot.fields.title),
                            color: theme.text,
                        )
                    }
                }

                // Row: Priority, Reporter, Status selectors
                View(flex_direction: FlexDirection::Row, gap: 2) {
                    View(flex_direction: FlexDirection::Row, gap: 1) {
                        Text(
                            content: field_label(Field::Priority, "Priority"),
                            color: label_color(FormField::Priority),
                        )
                        View(
                            border_style: BorderStyle::Round,
                            border_color: border_color(FormField::Priority),
                            padding_left: 1,
                            padding_right: 1,
                            min_width: 6,
                        ) {
                            View(flex_direction: FlexDirection::Row, gap: 1) {
                                Text(
                                    content: priority_label.clone(),
                                    color: snapshot.fields.priority
                                        .map(|p| theme.priority_color(p))
                                        .unwrap_or(theme.text_dimmed),
                                )
                                Text(content: "v", color: theme.text_dimmed)
                            }
                        }
                    }

                    View(flex_direction: FlexDirection::Row, gap: 1) {
                        Text(
                            content: field_label(Field::Reporter, "Reporter"),
                            color: label_color(FormField::Reporter),
                        )
                        View(
                            border_style: BorderStyle::Round,
                            border_color: border_color(FormField::Reporter),
                            padding_left: 1,
                            padding_right: 1,
                            min_width: 8,
                        ) {
                            View(flex_direction: FlexDirection::Row, gap: 1) {
                                Text(
                                    content: display_option(&snapshot.fields.reporter),
                                    color: theme.text,
                                )
                                Text(content: "v", color: theme.text_dimmed)
                            }
                        }
                    }

                    View(flex_direction: FlexDirection::Row, gap: 1) {
                        Text(
                            content: field_label(Field::Status, "Status"),
                            color: label_color(FormField::Status),
                        )
                        View(
                            border_style: BorderStyle::Round,
                            border_color: border_color(FormField::Status),
                            padding_left: 1,
                            padding_right: 1,
                            min_width: 14,
                        ) {
                            View(flex_direction: FlexDirection::Row, gap: 1) {
                                Text(
                                    content: display_option(&snapshot.fields.status),
                                    color: theme.status_color(&snapshot.fields.status),
                                )
                                Text(content: "v", color: theme.text_dimmed)
                            }
                        }
                    }
                }

                // Description field
                View(flex_direction: FlexDirection::Column, flex_grow: 1.0) {
                    View(flex_direction: FlexDirection::Row, gap: 1) {
                        Text(
                            content: field_label(Field::Description, "Description"),
                            color: label_color(FormField::Description),
                        )
                        Text(
                            content: format!("({description_count}/50-1000 chars)"),
                            color: theme.text_dimmed,
                        )
                    }
                    View(
                        flex_grow: 1.0,
                        width: 100pct,
                        border_style: BorderStyle::Round,
                        border_color: border_color(FormField::Description),
                        padding: 1,
                        overflow: Overflow::Hidden,
                    ) {
                        View(flex_direction: FlexDirection::Column, height: 100pct) {
                            #(if description_lines.is_empty() {
                                vec![element! {
                                    Text(content: "_", color: theme.text)
                                }.into()]
                            } else {
                                let mut elements: Vec<AnyElement<'static>> = Vec::new();
                                for line in &description_lines {
                                    let line_owned = line.clone();
                                    elements.push(element! {
                                        Text(content: line_owned, color: theme.text)
                                    }.into());
                                }
                                if focused_field.get() == FormField::Description {
                                    elements.push(element! {
                                        Text(content: "_", color: theme.highlight)
                                    }.into());
                                }
                                elements
                            })
                        }
                    }
                }

                // Separator
                View(
                    width: 100pct,
                    border_edges: Edges::Bottom,
                    border_style: BorderStyle::Single,
                    border_color: theme.border,
                )

                // Comments: existing on the record, pending, and the drafts
                View(flex_direction: FlexDirection::Column) {
                    Text(
                        content: format!(
                            "Comments ({} on record, {} pending)",
                            existing_comment_count(&snapshot),
                            snapshot.pending_comments.len()
                        ),
                        color: theme.text_dimmed,
                    )
                    #(snapshot.pending_comments.iter().map(|comment| {
                        let line = format!("+ {}: {}", comment.reporter, comment.description);
                        element! {
                            View(height: 1, padding_left: 2) {
                                Text(content: line, color: theme.text)
                            }
                        }
                    }))
                    View(flex_direction: FlexDirection::Row, gap: 2, margin_top: 1) {
                        View(flex_direction: FlexDirection::Row, gap: 1) {
                            Text(
                                content: "Comment reporter:",
                                color: label_color(FormField::CommentReporter),
                            )
                            View(
                                border_style: BorderStyle::Round,
                                border_color: border_color(FormField::CommentReporter),
                                padding_left: 1,
                                padding_right: 1,
                                min_width: 8,
                            ) {
                                Text(
                                    content: display_option(&snapshot.fields.comment_reporter),
                                    color: theme.text,
                                )
                            }
                        }
                        View(flex_direction: FlexDirection::Row, gap: 1, flex_grow: 1.0) {
                            Text(
                                content: "Comment:",
                                color: label_color(FormField::CommentDescription),
                            )
                            View(
                                border_style: BorderStyle::Round,
                                border_color: border_color(FormField::CommentDescription),
                                padding_left: 1,
                                padding_right: 1,
                                flex_grow: 1.0,
                            ) {
                                Text(
                                    content: format!("{}_", snapshot.fields.comment_description),
                                    color: theme.text,
                                )
                            }
                        }
                    }
                }
            }

            Footer(shortcuts: form_shortcuts())
        }
    }
}

fn display_option(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn existing_comment_count(model: &FormModel) -> usize {
    match &model.mode {
        super::model::FormMode::Edit { original, .. } => {
            original.comments.as_ref().map(|c| c.len()).unwrap_or(0)
        }
        super::model::FormMode::Create => 0,
    }
}

/// Append/delete characters on a single-line text field.
fn edit_text(
    model: &mut State<FormModel>,
    select: impl Fn(&mut FormFields) -> &mut String,
    code: KeyCode,
) {
    let mut next = model.read().clone();
    let field = select(&mut next.fields);
    match code {
        KeyCode::Char(c) => field.push(c),
        KeyCode::Backspace => {
            field.pop();
        }
        _ => return,
    }
    model.set(next);
}

/// Append/delete characters on the description field, with newlines.
fn edit_multiline(
    model: &mut State<FormModel>,
    select: impl Fn(&mut FormFields) -> &mut String,
    code: KeyCode,
) {
    let mut next = model.read().clone();
    let field = select(&mut next.fields);
    match code {
        KeyCode::Char(c) => field.push(c),
        KeyCode::Backspace => {
            field.pop();
        }
        KeyCode::Enter => field.push('\n'),
        _ => return,
    }
    model.set(next);
}

/// Cycle a string-valued selector through its options.
fn cycle_select(
    model: &mut State<FormModel>,
    select: impl Fn(&mut FormFields) -> &mut String,
    options: &[&str],
    code: KeyCode,
) {
    let step: isize = match code {
        KeyCode::Left | KeyCode::Char('h') => -1,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter | KeyCode::Char(' ') => 1,
        _ => return,
    };
    let mut next = model.read().clone();
    let field = select(&mut next.fields);
    let current = options
        .iter()
        .position(|option| option == field)
        .unwrap_or(0) as isize;
    let count = options.len() as isize;
    let index = (current + step).rem_euclid(count) as usize;
    *field = options[index].to_string();
    model.set(next);
}

/// Cycle the priority selector.
fn cycle_priority(model: &mut State<FormModel>, code: KeyCode) {
    let forward = match code {
        KeyCode::Left | KeyCode::Char('h') => false,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter | KeyCode::Char(' ') => true,
        _ => return,
    };
    let mut next = model.read().clone();
    next.fields.priority = match (next.fields.priority, forward) {
        (None, _) => Some(BugPriority::default()),
        (Some(p), true) => Some(p.next()),
        (Some(p), false) => Some(p.prev()),
    };
    model.set(next);
}

/// Run a save against the configured API, bounded by the remote timeout.
async fn run_save(request: SaveRequest) -> Result<BugRecord> {
    let config = Config::load()?;
    let api = HttpBugsApi::from_config(&config)?;
    let operation = async {
        match &request {
            SaveRequest::Create { draft } => api.create(draft).await,
            SaveRequest::Update {
                id,
                draft,
                created_at,
                comments,
            } => api.update(*id, draft, *created_at, comments.clone()).await,
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
