//! Theme system for TUI colors and styles

use iocraft::prelude::Color;

use crate::types::BugPriority;

/// Theme configuration for TUI components
#[derive(Debug, Clone)]
pub struct Theme {
    // Status colors
    pub status_open: Color,
    pub status_in_progress: Color,
    pub status_resolved: Color,
    pub status_rejected: Color,

    // Priority colors
    pub priority_p1: Color,
    pub priority_p2: Color,
    pub priority_default: Color,

    // UI colors
    pub border: Color,
    pub border_focused: Color,
    pub background: Color,
    pub text: Color,
    pub text_dimmed: Color,
    pub highlight: Color,
    pub highlight_text: Color,
    pub success: Color,
    pub error: Color,
    pub id_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            status_open: Color::Yellow,
            status_in_progress: Color::Cyan,
            status_resolved: Color::Green,
            status_rejected: Color::Rgb {
                r: 120,
                g: 120,
                b: 120,
            },

            priority_p1: Color::Red,
            priority_p2: Color::Yellow,
            priority_default: Color::White,

            border: Color::Rgb {
                r: 120,
                g: 120,
                b: 120,
            },
            border_focused: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            text_dimmed: Color::Rgb {
                r: 120,
                g: 120,
                b: 120,
            },
            highlight: Color::Blue,
            highlight_text: Color::White,
            success: Color::Green,
            error: Color::Red,
            id_color: Color::Cyan,
        }
    }
}

impl Theme {
    /// Get the color for a bug status label
    pub fn status_color(&self, status: &str) -> Color {
        match status {
            "Open" => self.status_open,
            "In progress" => self.status_in_progress,
            "Resolved" => self.status_resolved,
            "Rejected" => self.status_rejected,
            _ => self.text,
        }
    }

    /// Get the color for a bug priority
    pub fn priority_color(&self, priority: BugPriority) -> Color {
        match priority {
            BugPriority::P1 => self.priority_p1,
            BugPriority::P2 => self.priority_p2,
            _ => self.priority_default,
        }
    }
}

/// Global theme instance
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

/// Get a reference to the global theme
pub fn theme() -> &'static Theme {
    &THEME
}
