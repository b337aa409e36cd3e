//! Switchboard palette and semantic styling for the console.

use ratatui::style::{Color, Modifier, Style};

use dialdeck_api::{CallStatus, CampaignStatus};

// ── Core palette ──────────────────────────────────────────────────────

pub const AMBER: Color = Color::Rgb(255, 179, 71); // #ffb347
pub const TEAL: Color = Color::Rgb(94, 234, 212); // #5eead4
pub const SKY: Color = Color::Rgb(125, 211, 252); // #7dd3fc
pub const GREEN: Color = Color::Rgb(134, 239, 172); // #86efac
pub const RED: Color = Color::Rgb(252, 129, 129); // #fc8181
pub const VIOLET: Color = Color::Rgb(196, 167, 255); // #c4a7ff

// ── Extended palette ──────────────────────────────────────────────────

pub const FG_DIM: Color = Color::Rgb(176, 184, 201); // #b0b8c9
pub const BORDER: Color = Color::Rgb(90, 101, 130); // #5a6582
pub const BG_HIGHLIGHT: Color = Color::Rgb(39, 44, 58); // #272c3a
pub const BG_DARK: Color = Color::Rgb(24, 27, 36); // #181b24

// ── Semantic styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(TEAL)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(AMBER)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(FG_DIM)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(TEAL)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(FG_DIM)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

/// Color for a campaign status value.
pub fn campaign_status_color(status: CampaignStatus) -> Color {
    match status {
        CampaignStatus::InProgress => GREEN,
        CampaignStatus::Pending | CampaignStatus::Scheduled => SKY,
        CampaignStatus::Paused => AMBER,
        CampaignStatus::Completed => TEAL,
        CampaignStatus::Failed | CampaignStatus::PermanentlyFailed => RED,
        CampaignStatus::Cancelled => FG_DIM,
    }
}

/// Color for a call status value.
pub fn call_status_color(status: CallStatus) -> Color {
    match status {
        CallStatus::InProgress => GREEN,
        CallStatus::Pending => SKY,
        CallStatus::Completed => TEAL,
        CallStatus::Failed | CallStatus::PermanentlyFailed => RED,
    }
}
