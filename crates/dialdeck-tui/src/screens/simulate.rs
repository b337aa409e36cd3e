//! Bulk-simulation modal — configures and tracks one provisioning batch.
//!
//! While a batch is running the modal cannot be dismissed and the run
//! key is dead, so a second batch can never be started from this
//! console instance until the first reports completion.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use dialdeck_core::{SimulationConfig, SimulationPhase, SimulationProgress};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Campaigns,
    CallsPer,
    Concurrency,
    AutoStart,
}

const FIELD_ORDER: [Field; 4] = [
    Field::Campaigns,
    Field::CallsPer,
    Field::Concurrency,
    Field::AutoStart,
];

/// Simulation modal state.
pub struct SimulateModal {
    num_campaigns: String,
    calls_per_campaign: String,
    concurrency: String,
    auto_start: bool,
    focus_idx: usize,
    running: bool,
    progress: Option<SimulationProgress>,
    outcome: Option<String>,
    error: Option<String>,
}

impl SimulateModal {
    pub fn new() -> Self {
        let defaults = SimulationConfig::default();
        Self {
            num_campaigns: defaults.num_campaigns.to_string(),
            calls_per_campaign: defaults.calls_per_campaign.to_string(),
            concurrency: defaults.concurrency_limit.to_string(),
            auto_start: defaults.auto_start,
            focus_idx: 0,
            running: false,
            progress: None,
            outcome: None,
            error: None,
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    fn focus(&self) -> Field {
        FIELD_ORDER[self.focus_idx]
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus() {
            Field::Campaigns => Some(&mut self.num_campaigns),
            Field::CallsPer => Some(&mut self.calls_per_campaign),
            Field::Concurrency => Some(&mut self.concurrency),
            Field::AutoStart => None,
        }
    }

    fn build_config(&mut self) -> Option<SimulationConfig> {
        let parse = |value: &str, field: &str, error: &mut Option<String>| -> Option<usize> {
            match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    *error = Some(format!("{field} must be a positive number"));
                    None
                }
            }
        };

        let num_campaigns = parse(&self.num_campaigns, "campaigns", &mut self.error)?;
        let calls = parse(&self.calls_per_campaign, "calls per campaign", &mut self.error)?;
        let concurrency = parse(&self.concurrency, "concurrency", &mut self.error)?;

        self.error = None;
        Some(SimulationConfig {
            num_campaigns,
            calls_per_campaign: calls,
            concurrency_limit: u32::try_from(concurrency).unwrap_or(u32::MAX),
            auto_start: self.auto_start,
            settle: Duration::from_secs(1),
        })
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect) {
        let Some(progress) = &self.progress else {
            return;
        };

        let phase_label = match progress.phase {
            SimulationPhase::Idle => "idle",
            SimulationPhase::CreatingBatch => "creating",
            SimulationPhase::StartingBatch => "starting",
            SimulationPhase::Done => "done",
        };

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);

        let ratio = if progress.total == 0 {
            0.0
        } else {
            progress.current as f64 / progress.total as f64
        };
        let gauge = Gauge::default()
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("{phase_label} {}/{}", progress.current, progress.total))
            .gauge_style(Style::default().fg(theme::TEAL).bg(theme::BG_DARK));
        frame.render_widget(gauge, rows[0]);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("  {}", progress.message),
                theme::table_row(),
            ))),
            rows[1],
        );
    }
}

impl Component for SimulateModal {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.running {
            // No dismissal and no re-entry until the batch reports back
            return Ok(None);
        }

        match key.code {
            KeyCode::Esc => return Ok(Some(Action::CloseModal)),
            KeyCode::Tab | KeyCode::Down => {
                self.focus_idx = (self.focus_idx + 1) % FIELD_ORDER.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_idx = (self.focus_idx + FIELD_ORDER.len() - 1) % FIELD_ORDER.len();
            }
            KeyCode::Char(' ') if self.focus() == Field::AutoStart => {
                self.auto_start = !self.auto_start;
            }
            KeyCode::Enter => {
                if let Some(config) = self.build_config() {
                    self.running = true;
                    self.outcome = None;
                    self.progress = None;
                    return Ok(Some(Action::RunSimulation(config)));
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(field) = self.field_mut() {
                    field.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.field_mut() {
                    field.pop();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SimulationProgress(progress) => {
                self.progress = Some(progress.clone());
            }
            Action::SimulationFinished(summary) => {
                self.running = false;
                self.outcome = Some(summary.clone());
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 56u16.min(area.width.saturating_sub(4));
        let height = 14u16.min(area.height.saturating_sub(2));
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let modal_area = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .title(" Bulk Simulation ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let field_line = |field: Field, value: String| {
            let focused = !self.running && self.focus() == field;
            let marker = if focused { "▸ " } else { "  " };
            let label = match field {
                Field::Campaigns => "Campaigns",
                Field::CallsPer => "Calls per campaign",
                Field::Concurrency => "Concurrency limit",
                Field::AutoStart => "Auto-start",
            };
            Line::from(vec![
                Span::styled(
                    format!("  {marker}{label:<20}"),
                    if focused {
                        theme::key_hint_key()
                    } else {
                        theme::table_row()
                    },
                ),
                Span::styled(value, Style::default().fg(theme::TEAL)),
            ])
        };

        let mut lines = vec![
            Line::from(""),
            field_line(Field::Campaigns, self.num_campaigns.clone()),
            field_line(Field::CallsPer, self.calls_per_campaign.clone()),
            field_line(Field::Concurrency, self.concurrency.clone()),
            field_line(
                Field::AutoStart,
                if self.auto_start { "yes".into() } else { "no".into() },
            ),
            Line::from(""),
        ];

        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                format!("  ✗ {error}"),
                Style::default().fg(theme::RED),
            )));
        }
        if let Some(outcome) = &self.outcome {
            lines.push(Line::from(Span::styled(
                format!("  ✓ {outcome}"),
                Style::default().fg(theme::GREEN),
            )));
        }
        lines.push(Line::from(Span::styled(
            if self.running {
                "  running… the modal unlocks when the batch completes"
            } else {
                "  Enter run · Space toggle · Esc close"
            },
            theme::key_hint(),
        )));

        let text_height = lines.len() as u16;
        let rows =
            Layout::vertical([Constraint::Length(text_height), Constraint::Min(2)]).split(inner);
        frame.render_widget(Paragraph::new(lines), rows[0]);
        self.render_progress(frame, rows[1]);
    }

    fn id(&self) -> &str {
        "BulkSimulation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(modal: &mut SimulateModal, code: KeyCode) -> Option<Action> {
        modal
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .expect("key handling")
    }

    #[test]
    fn enter_starts_a_run_with_the_configured_batch() {
        let mut modal = SimulateModal::new();
        // Default 5 campaigns; trim to 3
        press(&mut modal, KeyCode::Backspace);
        press(&mut modal, KeyCode::Char('3'));

        let action = press(&mut modal, KeyCode::Enter);
        match action {
            Some(Action::RunSimulation(config)) => {
                assert_eq!(config.num_campaigns, 3);
                assert!(config.auto_start);
            }
            other => panic!("expected RunSimulation, got {other:?}"),
        }
        assert!(modal.running());
    }

    #[test]
    fn running_modal_ignores_input_until_finished() {
        let mut modal = SimulateModal::new();
        press(&mut modal, KeyCode::Enter);
        assert!(modal.running());

        // Esc does not close, Enter does not re-run
        assert!(press(&mut modal, KeyCode::Esc).is_none());
        assert!(press(&mut modal, KeyCode::Enter).is_none());

        modal
            .update(&Action::SimulationFinished("Created 5 of 5".into()))
            .expect("update");
        assert!(!modal.running());
        assert!(matches!(
            press(&mut modal, KeyCode::Esc),
            Some(Action::CloseModal)
        ));
    }

    #[test]
    fn zero_values_are_rejected_locally() {
        let mut modal = SimulateModal::new();
        press(&mut modal, KeyCode::Backspace);
        press(&mut modal, KeyCode::Char('0'));

        assert!(press(&mut modal, KeyCode::Enter).is_none());
        assert!(!modal.running());
        assert!(modal.error.is_some());
    }
}
