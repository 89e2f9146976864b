//! Scrollable bugs table component
//!
//! Displays the bug list with column headers, sort indicators, selection
//! highlighting, and scrolling support.

use iocraft::prelude::*;

use crate::tui::theme::theme;
use crate::types::{BugRecord, SORT_COLUMNS, SortDirection, SortField};

/// Props for the BugList component
#[derive(Default, Props)]
pub struct BugListProps {
    /// Bugs to display
    pub bugs: Vec<BugRecord>,
    /// Index of the currently selected row
    pub selected_index: usize,
    /// Current scroll offset (first visible row index)
    pub scroll_offset: usize,
    /// Whether the list has focus
    pub has_focus: bool,
    /// Number of visible rows, for scroll indicator calculations
    pub visible_height: usize,
    /// Whether a list request is in flight
    pub loading: bool,
    /// Column the results are sorted by, if any
    pub sort_column: Option<SortField>,
    /// Direction of the active sort
    pub sort_direction: SortDirection,
}

/// Column widths, aligned between the header row and bug rows.
const PRIORITY_WIDTH: u16 = 10;
const REPORTER_WIDTH: u16 = 10;
const CREATED_WIDTH: u16 = 12;
const STATUS_WIDTH: u16 = 13;

/// Scrollable bugs table with a sortable header row
#[component]
pub fn BugList(props: &BugListProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let border_color = if props.has_focus {
        theme.border_focused
    } else {
        theme.border
    };

    if props.loading {
        return element! {
            View(
                width: 100pct,
                height: 100pct,
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Round,
                border_color: border_color,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
            ) {
                Text(
                    content: "Loading...",
                    color: theme.text_dimmed,
                )
            }
        };
    }

    // Header row takes one line; indicators take one line each when shown.
    let start = props.scroll_offset;
    let total = props.bugs.len();
    let has_more_above = start > 0;
    let above_indicator_lines = if has_more_above { 1 } else { 0 };

    let tentative_rows = props
        .visible_height
        .saturating_sub(1 + above_indicator_lines);
    let tentative_end = (start + tentative_rows).min(total);
    let has_more_below = tentative_end < total;
    let below_indicator_lines = if has_more_below { 1 } else { 0 };

    let available_rows = props
        .visible_height
        .saturating_sub(1 + above_indicator_lines + below_indicator_lines);
    let end = (start + available_rows).min(total);
    let visible_bugs: Vec<_> = props.bugs[start..end].to_vec();
    let has_more_below = end < total;

    let sort_column = props.sort_column;
    let sort_direction = props.sort_direction;

    element! {
        View(
            width: 100pct,
            height: 100pct,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: border_color,
        ) {
            // Column header row; sorted column carries the direction arrow
            View(
                height: 1,
                width: 100pct,
                flex_direction: FlexDirection::Row,
                padding_left: 1,
                padding_right: 1,
            ) {
                View(width: 2, flex_shrink: 0.0) {
                    Text(content: " ", color: theme.text_dimmed)
                }
                #(SORT_COLUMNS.iter().enumerate().map(|(i, column)| {
                    let is_sorted = sort_column == Some(*column);
                    let label = if is_sorted {
                        format!("[{}] {} {}", i + 1, column.label(), sort_direction.arrow())
                    } else {
                        format!("[{}] {}", i + 1, column.label())
                    };
                    let color = if is_sorted { theme.border_focused } else { theme.text_dimmed };
                    match column {
                        SortField::Title => element! {
                            View(flex_grow: 1.0, overflow: Overflow::Hidden) {
                                Text(content: label, color: color, weight: Weight::Bold)
                            }
                        },
                        SortField::Priority => element! {
                            View(width: PRIORITY_WIDTH, flex_shrink: 0.0) {
                                Text(content: label, color: color, weight: Weight::Bold)
                            }
                        },
                        SortField::Reporter => element! {
                            View(width: REPORTER_WIDTH, flex_shrink: 0.0) {
                                Text(content: label, color: color, weight: Weight::Bold)
                            }
                        },
                        SortField::CreatedAt => element! {
                            View(width: CREATED_WIDTH, flex_shrink: 0.0) {
                                Text(content: label, color: color, weight: Weight::Bold)
                            }
                        },
                        SortField::Status => element! {
                            View(width: STATUS_WIDTH, flex_shrink: 0.0) {
                                Text(content: label, color: color, weight: Weight::Bold)
                            }
                        },
                    }
                }))
            }

            // "More above" indicator
            #(if has_more_above {
                Some(element! {
                    View(height: 1, padding_left: 1) {
                        Text(
                            content: format!("  {} more above", start),
                            color: theme.text_dimmed,
                        )
                    }
                })
            } else {
                None
            })

            // Bug rows
            #(visible_bugs.iter().enumerate().map(|(i, bug)| {
                let actual_index = start + i;
                let is_selected = actual_index == props.selected_index;
                element! {
                    BugRow(
                        bug: Some(bug.clone()),
                        is_selected: is_selected,
                    )
                }
            }))

            // "More below" indicator
            #(if has_more_below {
                Some(element! {
                    View(height: 1, padding_left: 1) {
                        Text(
                            content: format!("  {} more below", props.bugs.len() - end),
                            color: theme.text_dimmed,
                        )
                    }
                })
            } else {
                None
            })

            // Empty state inside the table frame
            #(if total == 0 {
                Some(element! {
                    View(flex_grow: 1.0, justify_content: JustifyContent::Center, align_items: AlignItems::Center) {
                        Text(content: "No bugs to show", color: theme.text_dimmed)
                    }
                })
            } else {
                None
            })
        }
    }
}

/// Props for a single bug row
#[derive(Default, Props)]
pub struct BugRowProps {
    /// The bug to display. Optional only to satisfy Props; rows are always
    /// rendered with a bug.
    pub bug: Option<BugRecord>,
    /// Whether this row is selected
    pub is_selected: bool,
}

/// Single bug row in the table
#[component]
pub fn BugRow(props: &BugRowProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    let Some(bug) = props.bug.clone() else {
        return element! {
            View(height: 1, width: 100pct) {
                Text(content: "", color: theme.text)
            }
        };
    };

    let bg_color = if props.is_selected {
        Some(theme.highlight)
    } else {
        None
    };
    let text_color = if props.is_selected {
        theme.highlight_text
    } else {
        theme.text
    };
    let indicator = if props.is_selected { ">" } else { " " };
    let created = format!("{}", bug.created_at.strftime("%Y-%m-%d"));
    let status_color = if props.is_selected {
        theme.highlight_text
    } else {
        theme.status_color(&bug.status)
    };
    let priority_color = if props.is_selected {
        theme.highlight_text
    } else {
        theme.priority_color(bug.priority)
    };

    element! {
        View(
            height: 1,
            width: 100pct,
            flex_direction: FlexDirection::Row,
            padding_left: 1,
            padding_right: 1,
            background_color: bg_color,
        ) {
            View(width: 2, flex_shrink: 0.0) {
                Text(content: indicator, color: text_color)
            }
            View(flex_grow: 1.0, overflow: Overflow::Hidden) {
                Text(content: bug.title.clone(), color: text_color)
            }
            View(width: PRIORITY_WIDTH, flex_shrink: 0.0) {
                Text(content: format!("P{}", bug.priority), color: priority_color)
            }
            View(width: REPORTER_WIDTH, flex_shrink: 0.0) {
                Text(content: bug.reporter.clone(), color: text_color)
            }
            View(width: CREATED_WIDTH, flex_shrink: 0.0) {
                Text(content: created, color: if props.is_selected { theme.highlight_text } else { theme.id_color })
            }
            View(width: STATUS_WIDTH, flex_shrink: 0.0) {
                Text(content: bug.status.clone(), color: status_color)
            }
        }
    }
}
