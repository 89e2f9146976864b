//! App header bar component
//!
//! Displays the application title and optional bug count.

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Props for the Header component
#[derive(Default, Props)]
pub struct HeaderProps<'a> {
    /// Title (defaults to "Bugboard")
    pub title: Option<&'a str>,

    /// Subtitle
    pub subtitle: Option<&'a str>,

    /// Bug count for the current screen
    pub bug_count: Option<usize>,

    /// Current page number (table screen)
    pub page: Option<u32>,
}

/// App header bar showing title and bug count
#[component]
pub fn Header<'a>(props: &HeaderProps<'a>) -> impl Into<AnyElement<'a>> {
    let theme = theme();

    let title = props.title.unwrap_or("Bugboard");
    let left_text = match props.subtitle {
        Some(sub) => format!("{title} - {sub}"),
        None => title.to_string(),
    };

    element! {
        View(
            width: 100pct,
            height: 1,
            flex_direction: FlexDirection::Row,
            flex_shrink: 0.0,
            justify_content: JustifyContent::SpaceBetween,
            padding_left: 1,
            padding_right: 1,
            background_color: theme.highlight,
        ) {
            Text(
                content: left_text,
                color: theme.text,
                weight: Weight::Bold,
            )
            View(flex_direction: FlexDirection::Row, gap: 1) {
                #(props.page.map(|page| element! {
                    Text(
                        content: format!("page {}", page),
                        color: theme.text_dimmed,
                    )
                }))
                #(props.bug_count.map(|count| element! {
                    Text(
                        content: format!("{} bugs", count),
                        color: theme.text_dimmed,
                    )
                }))
            }
        }
    }
}
