//! Styled status badges for campaign and call statuses.

use ratatui::style::Style;
use ratatui::text::Span;

use dialdeck_api::{CallStatus, CampaignStatus};

use crate::theme;

/// A colored span for a campaign status, in wire spelling.
pub fn campaign_status_span(status: CampaignStatus) -> Span<'static> {
    Span::styled(
        status.to_string(),
        Style::default().fg(theme::campaign_status_color(status)),
    )
}

/// A colored span for a call status, in wire spelling.
pub fn call_status_span(status: CallStatus) -> Span<'static> {
    Span::styled(
        status.to_string(),
        Style::default().fg(theme::call_status_color(status)),
    )
}

/// The dot indicator used next to campaign rows.
pub fn campaign_status_dot(status: CampaignStatus) -> Span<'static> {
    let symbol = match status {
        CampaignStatus::InProgress => "●",
        CampaignStatus::Paused => "◐",
        CampaignStatus::Pending | CampaignStatus::Scheduled => "○",
        _ => "·",
    };
    Span::styled(
        symbol,
        Style::default().fg(theme::campaign_status_color(status)),
    )
}
