//! Campaigns screen — campaign table, detail pane, and paginated calls.
//!
//! Left: the campaign list with status and progress. Right (when a
//! campaign is selected): campaign detail plus the current page of its
//! calls under the active status filter. Lifecycle keys act on the
//! highlighted row; which are offered depends on the row's status.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use tokio::sync::mpsc::UnboundedSender;

use dialdeck_api::{CallStatus, Campaign};
use dialdeck_core::CallPager;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{num_fmt, status_badge};

/// Cycle order for the call-status filter; `None` is the "all" sentinel.
fn next_filter(current: Option<CallStatus>) -> Option<CallStatus> {
    match current {
        None => Some(CallStatus::Pending),
        Some(CallStatus::Pending) => Some(CallStatus::InProgress),
        Some(CallStatus::InProgress) => Some(CallStatus::Completed),
        Some(CallStatus::Completed) => Some(CallStatus::Failed),
        Some(CallStatus::Failed) => Some(CallStatus::PermanentlyFailed),
        Some(CallStatus::PermanentlyFailed) => None,
    }
}

fn filter_label(filter: Option<CallStatus>) -> String {
    filter.map_or_else(|| "ALL".to_owned(), |s| s.to_string())
}

/// Campaigns screen state. All data fields are snapshots pushed by the
/// data bridge; the screen never reads the session directly.
pub struct CampaignsScreen {
    focused: bool,
    campaigns: Vec<Campaign>,
    selected: Option<Campaign>,
    pager: CallPager,
    cursor: usize,
}

impl CampaignsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            campaigns: Vec::new(),
            selected: None,
            pager: CallPager::default(),
            cursor: 0,
        }
    }

    fn highlighted(&self) -> Option<&Campaign> {
        self.campaigns.get(self.cursor)
    }

    fn move_cursor(&mut self, delta: i64) {
        if self.campaigns.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.campaigns.len() - 1;
        let next = self.cursor as i64 + delta;
        self.cursor = next.clamp(0, last as i64) as usize;
    }

    /// Render the campaign table.
    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Campaigns ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        if self.campaigns.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  No campaigns yet — press n to create one").style(theme::key_hint()),
                inner,
            );
            return;
        }

        let header = Row::new(vec!["", "Name", "Status", "Done", "Prio"]).style(theme::table_header());

        let rows: Vec<Row> = self
            .campaigns
            .iter()
            .map(|c| {
                Row::new(vec![
                    Cell::from(status_badge::campaign_status_dot(c.status)),
                    Cell::from(c.name.clone()),
                    Cell::from(status_badge::campaign_status_span(c.status)),
                    Cell::from(num_fmt::fmt_ratio(
                        c.metrics.completed_calls,
                        c.metrics.total_calls,
                    )),
                    Cell::from(c.priority.to_string()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(1),
                Constraint::Min(16),
                Constraint::Length(18),
                Constraint::Length(11),
                Constraint::Length(4),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected())
        .block(block);

        let mut state = TableState::default().with_selected(Some(self.cursor));
        frame.render_stateful_widget(table, area, &mut state);
    }

    /// Render the detail pane: campaign summary plus its call page.
    fn render_detail(&self, frame: &mut Frame, area: Rect, campaign: &Campaign) {
        let rows = Layout::vertical([Constraint::Length(7), Constraint::Min(5)]).split(area);
        self.render_summary(frame, rows[0], campaign);
        self.render_calls(frame, rows[1]);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, campaign: &Campaign) {
        let block = Block::default()
            .title(format!(" {} ", campaign.name))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let m = &campaign.metrics;
        let mut lines = vec![
            Line::from(vec![
                Span::styled("  Status ", theme::table_row()),
                status_badge::campaign_status_span(campaign.status),
                Span::styled(
                    format!(
                        "   Priority {}   Concurrency {}",
                        campaign.priority, campaign.concurrency_limit
                    ),
                    theme::table_row(),
                ),
            ]),
            Line::from(Span::styled(
                format!(
                    "  Calls {}  done {}  active {}  pending {}  failed {}",
                    m.total_calls, m.completed_calls, m.in_progress_calls, m.pending_calls,
                    m.failed_calls + m.permanently_failed_calls,
                ),
                theme::table_row(),
            )),
        ];
        if let Some(desc) = &campaign.description {
            lines.push(Line::from(Span::styled(
                format!("  {desc}"),
                theme::key_hint(),
            )));
        }
        if let Some(hours) = &campaign.business_hours {
            lines.push(Line::from(Span::styled(
                format!(
                    "  Window {}–{} {} [{}]",
                    hours.start_time.format("%H:%M"),
                    hours.end_time.format("%H:%M"),
                    hours.timezone,
                    hours.allowed_days,
                ),
                theme::key_hint(),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_calls(&self, frame: &mut Frame, area: Rect) {
        let next_marker = if self.pager.has_more() { "]" } else { " " };
        let title = format!(
            " Calls · page {} [{}] {}",
            self.pager.page(),
            filter_label(self.pager.filter()),
            next_marker,
        );

        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        if self.pager.rows().is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  no calls on this page").style(theme::key_hint()),
                inner,
            );
            return;
        }

        let header =
            Row::new(vec!["Number", "Status", "Tries", "Len", "Reason"]).style(theme::table_header());

        let rows: Vec<Row> = self
            .pager
            .rows()
            .iter()
            .map(|call| {
                let duration = call
                    .call_duration_seconds
                    .map_or_else(|| "─".to_owned(), num_fmt::fmt_duration_secs);
                Row::new(vec![
                    Cell::from(call.phone_number.clone()),
                    Cell::from(status_badge::call_status_span(call.status)),
                    Cell::from(call.retry_count.to_string()),
                    Cell::from(duration),
                    Cell::from(call.failure_reason.clone().unwrap_or_default()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Length(19),
                Constraint::Length(5),
                Constraint::Length(6),
                Constraint::Min(8),
            ],
        )
        .header(header)
        .block(block);

        frame.render_widget(table, area);
    }
}

impl Component for CampaignsScreen {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(-1);
                None
            }
            KeyCode::Enter => self
                .highlighted()
                .map(|c| Action::SelectCampaign(Box::new(c.clone()))),

            // Lifecycle keys act on the highlighted row, only when offered
            KeyCode::Char('a') => self
                .highlighted()
                .filter(|c| c.status.can_start())
                .map(|c| Action::StartCampaign(c.id)),
            KeyCode::Char('p') => self
                .highlighted()
                .filter(|c| c.status.can_pause())
                .map(|c| Action::PauseCampaign(c.id)),
            KeyCode::Char('x') => self
                .highlighted()
                .filter(|c| c.status.can_cancel())
                .map(|c| Action::CancelCampaign(c.id)),

            // Call-list cursor (meaningful only with a selection)
            KeyCode::Char(']') => self.selected.as_ref().map(|_| Action::NextPage),
            KeyCode::Char('[') => self.selected.as_ref().map(|_| Action::PrevPage),
            KeyCode::Char('f') => self
                .selected
                .as_ref()
                .map(|_| Action::SetCallFilter(next_filter(self.pager.filter()))),

            KeyCode::Char('n') => Some(Action::OpenCreateForm),
            KeyCode::Char('t') => Some(Action::OpenQuickCall),
            KeyCode::Char('l') => Some(Action::OpenSimulation),

            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::CampaignsUpdated(campaigns) => {
                self.campaigns.clone_from(campaigns);
                if !self.campaigns.is_empty() {
                    self.cursor = self.cursor.min(self.campaigns.len() - 1);
                }
            }
            Action::SelectionUpdated(selected) => {
                self.selected.clone_from(selected);
            }
            Action::CallsUpdated(pager) => {
                self.pager = pager.clone();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        match (&self.selected, area.width >= 90) {
            (Some(campaign), true) => {
                let columns =
                    Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                        .split(area);
                self.render_list(frame, columns[0]);
                self.render_detail(frame, columns[1], campaign);
            }
            (Some(campaign), false) => {
                // Narrow terminal: detail replaces the list
                self.render_detail(frame, area, campaign);
            }
            (None, _) => self.render_list(frame, area),
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Campaigns"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_cycles_through_all_statuses_and_back() {
        let mut filter = None;
        let mut seen = Vec::new();
        for _ in 0..6 {
            filter = next_filter(filter);
            seen.push(filter);
        }
        assert_eq!(seen[0], Some(CallStatus::Pending));
        assert_eq!(seen[4], Some(CallStatus::PermanentlyFailed));
        assert_eq!(seen[5], None, "cycle returns to the all sentinel");
    }

    #[test]
    fn cursor_clamps_to_list_bounds() {
        let mut screen = CampaignsScreen::new();
        screen.move_cursor(-1);
        assert_eq!(screen.cursor, 0);

        let campaign: Campaign = serde_json::from_value(serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "name": "A",
            "status": "PENDING",
            "concurrencyLimit": 1,
            "priority": 1
        }))
        .expect("valid campaign");
        screen.campaigns = vec![campaign.clone(), campaign];

        screen.move_cursor(10);
        assert_eq!(screen.cursor, 1);
        screen.move_cursor(-10);
        assert_eq!(screen.cursor, 0);
    }
}
