//! Create-campaign modal — a form over [`CampaignForm`].
//!
//! Validation is local: a submission that fails to compose shows the
//! error in the footer and sends nothing. The phone-number source is
//! either the free-text area or a file path, toggled per the contract's
//! two mutually exclusive sources.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use dialdeck_core::{CampaignForm, PhoneSource, compose::WEEKDAYS};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// Which form field holds input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Description,
    Source,
    Phones,
    PhoneFile,
    Concurrency,
    Priority,
    MaxRetries,
    CallbackTimeout,
    HoursToggle,
    StartTime,
    EndTime,
    Timezone,
    Days,
}

const FIELD_ORDER: [Field; 14] = [
    Field::Name,
    Field::Description,
    Field::Source,
    Field::Phones,
    Field::PhoneFile,
    Field::Concurrency,
    Field::Priority,
    Field::MaxRetries,
    Field::CallbackTimeout,
    Field::HoursToggle,
    Field::StartTime,
    Field::EndTime,
    Field::Timezone,
    Field::Days,
];

impl Field {
    fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Description => "Description",
            Self::Source => "Number source",
            Self::Phones => "Numbers (one per line)",
            Self::PhoneFile => "Numbers file",
            Self::Concurrency => "Concurrency",
            Self::Priority => "Priority",
            Self::MaxRetries => "Max retries",
            Self::CallbackTimeout => "Callback timeout (ms)",
            Self::HoursToggle => "Business hours",
            Self::StartTime => "Start (HH:MM)",
            Self::EndTime => "End (HH:MM)",
            Self::Timezone => "Timezone",
            Self::Days => "Days (toggle 1-7)",
        }
    }
}

/// Create-campaign modal state.
pub struct CreateModal {
    form: CampaignForm,
    /// Path of the numbers file when the file source is active.
    file_path: String,
    focus_idx: usize,
    error: Option<String>,
}

impl CreateModal {
    pub fn new() -> Self {
        Self {
            form: CampaignForm::default(),
            file_path: String::new(),
            focus_idx: 0,
            error: None,
        }
    }

    fn focus(&self) -> Field {
        FIELD_ORDER[self.focus_idx]
    }

    fn cycle_focus(&mut self, forward: bool) {
        let len = FIELD_ORDER.len();
        self.focus_idx = if forward {
            (self.focus_idx + 1) % len
        } else {
            (self.focus_idx + len - 1) % len
        };
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus() {
            Field::Name => Some(&mut self.form.name),
            Field::Description => Some(&mut self.form.description),
            Field::Phones => Some(&mut self.form.phone_text),
            Field::PhoneFile => Some(&mut self.file_path),
            Field::Concurrency => Some(&mut self.form.concurrency_limit),
            Field::Priority => Some(&mut self.form.priority),
            Field::MaxRetries => Some(&mut self.form.max_retries),
            Field::CallbackTimeout => Some(&mut self.form.callback_timeout_ms),
            Field::StartTime => Some(&mut self.form.start_time),
            Field::EndTime => Some(&mut self.form.end_time),
            Field::Timezone => Some(&mut self.form.timezone),
            Field::Source | Field::HoursToggle | Field::Days => None,
        }
    }

    fn toggle(&mut self) {
        match self.focus() {
            Field::Source => {
                self.form.source = match self.form.source {
                    PhoneSource::Text => PhoneSource::File,
                    PhoneSource::File => PhoneSource::Text,
                };
            }
            Field::HoursToggle => {
                self.form.business_hours_enabled = !self.form.business_hours_enabled;
            }
            _ => {}
        }
    }

    /// Compose and submit. A file source reads the path right here so
    /// the composer only ever sees line-oriented content.
    fn submit(&mut self) -> Option<Action> {
        if self.form.source == PhoneSource::File {
            match std::fs::read_to_string(self.file_path.trim()) {
                Ok(content) => self.form.file_content = content,
                Err(e) => {
                    self.error = Some(format!("cannot read {}: {e}", self.file_path.trim()));
                    return None;
                }
            }
        }

        match self.form.compose() {
            Ok(payload) => {
                self.error = None;
                Some(Action::CreateCampaign(Box::new(payload)))
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    fn value_line(&self, field: Field) -> Line<'static> {
        let focused = self.focus() == field;
        let marker = if focused { "▸ " } else { "  " };
        let label_style = if focused {
            theme::key_hint_key()
        } else {
            theme::table_row()
        };

        let value = match field {
            Field::Name => self.form.name.clone(),
            Field::Description => self.form.description.clone(),
            Field::Source => match self.form.source {
                PhoneSource::Text => "free text".into(),
                PhoneSource::File => "file".into(),
            },
            Field::Phones => format!("{} number(s)", self.form.phone_numbers().len()),
            Field::PhoneFile => self.file_path.clone(),
            Field::Concurrency => self.form.concurrency_limit.clone(),
            Field::Priority => self.form.priority.clone(),
            Field::MaxRetries => self.form.max_retries.clone(),
            Field::CallbackTimeout => self.form.callback_timeout_ms.clone(),
            Field::HoursToggle => {
                if self.form.business_hours_enabled {
                    "enabled".into()
                } else {
                    "disabled".into()
                }
            }
            Field::StartTime => self.form.start_time.clone(),
            Field::EndTime => self.form.end_time.clone(),
            Field::Timezone => self.form.timezone.clone(),
            Field::Days => self
                .form
                .allowed_days
                .iter()
                .zip(WEEKDAYS)
                .map(|(&on, day)| if on { &day[..2] } else { "··" })
                .collect::<Vec<_>>()
                .join(" "),
        };

        Line::from(vec![
            Span::styled(format!("  {marker}{:<22}", field.label()), label_style),
            Span::styled(value, Style::default().fg(theme::TEAL)),
        ])
    }
}

impl Component for CreateModal {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return Ok(self.submit());
        }

        match key.code {
            KeyCode::Esc => return Ok(Some(Action::CloseModal)),
            KeyCode::Tab | KeyCode::Down => self.cycle_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.cycle_focus(false),
            KeyCode::Enter => {
                // Newline inside the textarea; submit from anywhere else
                if self.focus() == Field::Phones {
                    self.form.phone_text.push('\n');
                } else {
                    return Ok(self.submit());
                }
            }
            KeyCode::Char(c @ '1'..='7') if self.focus() == Field::Days => {
                let idx = (c as u8 - b'1') as usize;
                self.form.allowed_days[idx] = !self.form.allowed_days[idx];
            }
            KeyCode::Char(' ') if self.field_mut().is_none() => self.toggle(),
            KeyCode::Char(c) => {
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

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 64u16.min(area.width.saturating_sub(4));
        let height = 22u16.min(area.height.saturating_sub(2));
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let modal_area = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .title(" New Campaign ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let mut lines: Vec<Line> = FIELD_ORDER
            .iter()
            .filter(|&&field| {
                // Hide the inactive source's field and the hours sub-fields
                match field {
                    Field::Phones => self.form.source == PhoneSource::Text,
                    Field::PhoneFile => self.form.source == PhoneSource::File,
                    Field::StartTime | Field::EndTime | Field::Timezone | Field::Days => {
                        self.form.business_hours_enabled
                    }
                    _ => true,
                }
            })
            .map(|&field| self.value_line(field))
            .collect();

        lines.push(Line::from(""));
        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                format!("  ✗ {error}"),
                Style::default().fg(theme::RED),
            )));
        }
        lines.push(Line::from(Span::styled(
            "  Tab next · Space toggle · Ctrl+S create · Esc cancel",
            theme::key_hint(),
        )));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn id(&self) -> &str {
        "CreateCampaign"
    }
}
