//! Dashboard screen — global metrics overview, the home screen.
//!
//! Layout:
//! ┌─ Fleet ────────┐  ┌─ Call Volume ──────────────────┐
//! │ campaigns by   │  │ totals by call status          │
//! │ status         │  └────────────────────────────────┘
//! │                │  ┌─ Capacity ─────────────────────┐
//! └────────────────┘  │ worker / concurrency gauges    │
//!                     │ queue depth, throughput        │
//!                     └────────────────────────────────┘

use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use dialdeck_api::{Campaign, CampaignStatus, GlobalMetrics};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::num_fmt;

/// Dashboard screen state.
pub struct DashboardScreen {
    focused: bool,
    metrics: Option<GlobalMetrics>,
    campaigns: Vec<Campaign>,
    /// Tracks when we last received a data update (for the title bar).
    last_data_update: Option<Instant>,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            metrics: None,
            campaigns: Vec::new(),
            last_data_update: None,
        }
    }

    /// Format the data age as a human-readable string for the title bar.
    fn refresh_age_str(&self) -> String {
        match self.last_data_update {
            Some(t) => {
                let secs = t.elapsed().as_secs();
                if secs < 5 {
                    "just now".into()
                } else if secs < 60 {
                    format!("{secs}s ago")
                } else {
                    format!("{}m ago", secs / 60)
                }
            }
            None => "no data".into(),
        }
    }

    fn count_status(&self, status: CampaignStatus) -> usize {
        self.campaigns.iter().filter(|c| c.status == status).count()
    }

    /// Render the Fleet panel (left column).
    fn render_fleet(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Fleet ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let running = self.count_status(CampaignStatus::InProgress);
        let paused = self.count_status(CampaignStatus::Paused);
        let pending =
            self.count_status(CampaignStatus::Pending) + self.count_status(CampaignStatus::Scheduled);
        let done = self.count_status(CampaignStatus::Completed);
        let failed = self.count_status(CampaignStatus::Failed)
            + self.count_status(CampaignStatus::PermanentlyFailed);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {} Campaigns", self.campaigns.len()),
                theme::title_style(),
            )),
            Line::from(""),
            status_count_line("●", theme::GREEN, running, "running"),
            status_count_line("◐", theme::AMBER, paused, "paused"),
            status_count_line("○", theme::SKY, pending, "pending"),
            status_count_line("·", theme::TEAL, done, "completed"),
            status_count_line("·", theme::RED, failed, "failed"),
        ];

        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Render the Call Volume panel (top-right).
    fn render_call_volume(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Call Volume ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(m) = &self.metrics else {
            frame.render_widget(
                Paragraph::new("  waiting for first poll…").style(theme::key_hint()),
                inner,
            );
            return;
        };

        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Total      ", theme::table_row()),
                Span::styled(m.total_calls.to_string(), Style::default().fg(theme::TEAL)),
                Span::styled("     Retries  ", theme::table_row()),
                Span::styled(m.total_retries.to_string(), Style::default().fg(theme::VIOLET)),
            ]),
            Line::from(vec![
                Span::styled("  Completed  ", theme::table_row()),
                Span::styled(
                    m.completed_calls.to_string(),
                    Style::default().fg(theme::GREEN),
                ),
                Span::styled("     Pending  ", theme::table_row()),
                Span::styled(m.pending_calls.to_string(), Style::default().fg(theme::SKY)),
            ]),
            Line::from(vec![
                Span::styled("  In flight  ", theme::table_row()),
                Span::styled(
                    m.in_progress_calls.to_string(),
                    Style::default().fg(theme::AMBER),
                ),
                Span::styled("     Failed   ", theme::table_row()),
                Span::styled(
                    format!("{} (+{} permanent)", m.failed_calls, m.permanently_failed_calls),
                    Style::default().fg(theme::RED),
                ),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Render the Capacity panel (bottom-right): gauges + throughput.
    fn render_capacity(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Capacity ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(m) = &self.metrics else {
            return;
        };
        if inner.height < 5 {
            return;
        }

        let rows = Layout::vertical([
            Constraint::Length(1), // worker label
            Constraint::Length(1), // worker gauge
            Constraint::Length(1), // concurrency label
            Constraint::Length(1), // concurrency gauge
            Constraint::Min(1),    // throughput line
        ])
        .split(inner);

        let worker_label = Line::from(vec![
            Span::styled("  Workers      ", theme::table_row()),
            Span::styled(
                format!("{}/{}", m.active_worker_threads, m.worker_pool_size),
                Style::default().fg(theme::TEAL),
            ),
        ]);
        frame.render_widget(Paragraph::new(worker_label), rows[0]);
        frame.render_widget(utilization_gauge(m.worker_thread_utilization_percent), rows[1]);

        let slots_label = Line::from(vec![
            Span::styled("  Concurrency  ", theme::table_row()),
            Span::styled(
                format!("{}/{}", m.active_concurrency_slots, m.total_concurrency_slots),
                Style::default().fg(theme::TEAL),
            ),
        ]);
        frame.render_widget(Paragraph::new(slots_label), rows[2]);
        frame.render_widget(utilization_gauge(m.concurrency_utilization_percent), rows[3]);

        let throughput = Line::from(vec![
            Span::styled("  Queue ", theme::table_row()),
            Span::styled(m.queue_depth.to_string(), Style::default().fg(theme::AMBER)),
            Span::styled("   Rate ", theme::table_row()),
            Span::styled(
                format!("{:.1} calls/s", m.calls_per_second),
                Style::default().fg(theme::SKY),
            ),
            Span::styled("   Avg call ", theme::table_row()),
            Span::styled(
                format!("{:.1}s", m.avg_call_duration_seconds),
                Style::default().fg(theme::SKY),
            ),
        ]);
        frame.render_widget(Paragraph::new(throughput), rows[4]);
    }
}

fn status_count_line(
    dot: &'static str,
    color: ratatui::style::Color,
    count: usize,
    label: &'static str,
) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {dot} "), Style::default().fg(color)),
        Span::styled(format!("{count} {label}"), theme::table_row()),
    ])
}

fn utilization_gauge(percent: f64) -> Gauge<'static> {
    let clamped = percent.clamp(0.0, 100.0);
    let color = if clamped >= 80.0 {
        theme::RED
    } else if clamped >= 50.0 {
        theme::AMBER
    } else {
        theme::GREEN
    };
    Gauge::default()
        .ratio(clamped / 100.0)
        .label(num_fmt::fmt_percent(clamped))
        .gauge_style(Style::default().fg(color).bg(theme::BG_DARK))
}

impl Component for DashboardScreen {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        // Dashboard has no screen-specific key handlers beyond globals
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::MetricsUpdated(metrics) => {
                self.metrics = Some(metrics.clone());
                self.last_data_update = Some(Instant::now());
            }
            Action::CampaignsUpdated(campaigns) => {
                self.campaigns.clone_from(campaigns);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title_line = Line::from(vec![
            Span::styled(" Dial Deck ", theme::title_style()),
            Span::styled(
                format!(" [{}] ", self.refresh_age_str()),
                Style::default().fg(theme::BORDER),
            ),
        ]);

        let block = Block::default()
            .title(title_line)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 40 || inner.height < 10 {
            // Minimal mode — just show a summary line
            let summary = match &self.metrics {
                Some(m) => format!(
                    "Campaigns: {} │ Calls: {} │ Queue: {}",
                    m.total_campaigns, m.total_calls, m.queue_depth
                ),
                None => "waiting for first poll…".into(),
            };
            frame.render_widget(Paragraph::new(summary).style(theme::table_row()), inner);
            return;
        }

        let left_width = 26u16.min(inner.width / 3);
        let columns =
            Layout::horizontal([Constraint::Length(left_width), Constraint::Min(30)]).split(inner);

        self.render_fleet(frame, columns[0]);

        let right = Layout::vertical([Constraint::Length(6), Constraint::Min(7)]).split(columns[1]);
        self.render_call_volume(frame, right[0]);
        self.render_capacity(frame, right[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Dashboard"
    }
}
