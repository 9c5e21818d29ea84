//! Warehouse-slate palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ────────────────────────────────────────────────────

pub const AMBER: Color = Color::Rgb(255, 183, 77); // #ffb74d
pub const STEEL_BLUE: Color = Color::Rgb(100, 181, 246); // #64b5f6
pub const SUCCESS_GREEN: Color = Color::Rgb(129, 199, 132); // #81c784
pub const ERROR_RED: Color = Color::Rgb(229, 115, 115); // #e57373
pub const WARNING_ORANGE: Color = Color::Rgb(255, 138, 101); // #ff8a65

// ── Extended Palette ────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(207, 216, 220); // #cfd8dc
pub const BORDER_GRAY: Color = Color::Rgb(84, 110, 122); // #546e7a
pub const BG_HIGHLIGHT: Color = Color::Rgb(38, 50, 56); // #263238
pub const BG_DARK: Color = Color::Rgb(27, 36, 41); // #1b2429

// ── Semantic Styles ─────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(STEEL_BLUE).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(AMBER)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(STEEL_BLUE)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Status bar / key hint text.
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(STEEL_BLUE).add_modifier(Modifier::BOLD)
}

/// Field label in a form.
pub fn form_label() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Inline validation / error message.
pub fn error_text() -> Style {
    Style::default().fg(ERROR_RED)
}

/// Inline success message.
pub fn success_text() -> Style {
    Style::default().fg(SUCCESS_GREEN)
}

/// Inline warning message (e.g. no matching recipient).
pub fn warning_text() -> Style {
    Style::default().fg(WARNING_ORANGE)
}
