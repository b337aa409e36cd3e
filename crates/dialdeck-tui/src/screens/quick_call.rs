//! Quick-call modal — a one-line prompt that triggers a single ad-hoc
//! call. Enter submits the number, Esc dismisses; an empty submit is
//! ignored rather than issuing a request.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// Quick-call modal state: the number as typed so far.
pub struct QuickCallModal {
    number: String,
}

impl QuickCallModal {
    pub fn new() -> Self {
        Self {
            number: String::new(),
        }
    }
}

impl Component for QuickCallModal {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => {
                let number = self.number.trim().to_owned();
                if number.is_empty() {
                    None
                } else {
                    Some(Action::TriggerCall(number))
                }
            }
            KeyCode::Char(c) => {
                self.number.push(c);
                None
            }
            KeyCode::Backspace => {
                self.number.pop();
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 44u16.min(area.width.saturating_sub(4));
        let x = (area.width.saturating_sub(width)) / 2;
        let y = area.height / 2;
        let modal_area = Rect::new(area.x + x, area.y + y.saturating_sub(2), width, 4);

        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .title(" Quick Call ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let lines = vec![
            Line::from(vec![
                Span::styled("  Number: ", theme::table_row()),
                Span::styled(self.number.clone(), Style::default().fg(theme::TEAL)),
                Span::styled("█", Style::default().fg(theme::AMBER)),
            ]),
            Line::from(Span::styled("  Enter dial · Esc cancel", theme::key_hint())),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn id(&self) -> &str {
        "QuickCall"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(modal: &mut QuickCallModal, code: KeyCode) -> Option<Action> {
        modal
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .expect("key handling")
    }

    #[test]
    fn typed_number_is_submitted_on_enter() {
        let mut modal = QuickCallModal::new();
        for c in "+15551234567".chars() {
            press(&mut modal, KeyCode::Char(c));
        }
        press(&mut modal, KeyCode::Backspace);

        match press(&mut modal, KeyCode::Enter) {
            Some(Action::TriggerCall(number)) => assert_eq!(number, "+1555123456"),
            other => panic!("expected TriggerCall, got {other:?}"),
        }
    }

    #[test]
    fn empty_submit_is_ignored() {
        let mut modal = QuickCallModal::new();
        assert!(press(&mut modal, KeyCode::Enter).is_none());

        // Whitespace-only is still empty after trimming
        press(&mut modal, KeyCode::Char(' '));
        assert!(press(&mut modal, KeyCode::Enter).is_none());
    }

    #[test]
    fn esc_closes_the_prompt() {
        let mut modal = QuickCallModal::new();
        press(&mut modal, KeyCode::Char('5'));
        assert!(matches!(
            press(&mut modal, KeyCode::Esc),
            Some(Action::CloseModal)
        ));
    }
}
