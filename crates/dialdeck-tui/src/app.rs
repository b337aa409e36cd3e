//! Application core — event loop, screen management, action dispatch.
//!
//! Session-bound work (lifecycle actions, creation, the bulk batch) is
//! spawned onto the runtime; outcomes come back into the loop as
//! actions, so the UI never blocks on a backend round-trip.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use dialdeck_core::{Session, SimulationDriver};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::run_data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create::CreateModal;
use crate::screens::create_screens;
use crate::screens::quick_call::QuickCallModal;
use crate::screens::simulate::SimulateModal;
use crate::theme;
use crate::tui::Tui;

const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// The modal currently on top of the active screen, if any.
enum Modal {
    Create(CreateModal),
    Simulate(SimulateModal),
    QuickCall(QuickCallModal),
}

/// Top-level application state and event loop.
pub struct App {
    session: Session,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    modal: Option<Modal>,
    /// Re-entrancy guard: one provisioning batch at a time.
    simulation_running: bool,
    running: bool,
    help_visible: bool,
    notification: Option<(Notification, Instant)>,
    terminal_size: (u16, u16),
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(session: Session) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            session,
            active_screen: ScreenId::Dashboard,
            screens,
            modal: None,
            simulation_running: false,
            running: true,
            help_visible: false,
            notification: None,
            terminal_size: (0, 0),
            action_tx,
            action_rx,
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));
        self.init_screens()?;

        // Background plumbing: session polling + the snapshot bridge
        self.session.start_polling();
        let bridge_cancel = CancellationToken::new();
        let bridge = tokio::spawn(run_data_bridge(
            self.session.clone(),
            self.action_tx.clone(),
            bridge_cancel.clone(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        bridge_cancel.cancel();
        let _ = bridge.await;
        self.session.stop_polling();
        info!("event loop ended");
        Ok(())
    }

    /// Map a key event to an action. A modal captures everything; global
    /// keys come next; the rest is delegated to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(modal) = &mut self.modal {
            return match modal {
                Modal::Create(form) => form.handle_key_event(key),
                Modal::Simulate(sim) => sim.handle_key_event(key),
                Modal::QuickCall(prompt) => prompt.handle_key_event(key),
            };
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        // Global keybindings
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::RefreshData)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='2')) => {
                let n = c as u8 - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::ClearSelection)),

            _ => {}
        }

        // Delegate to active screen component
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Process a single action — update app state and propagate.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                self.terminal_size = (*w, *h);
            }

            Action::Tick => {
                let expired = self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown_at)| shown_at.elapsed() > NOTIFICATION_TTL);
                if expired {
                    self.notification = None;
                }
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            // ── Selection & cursor: synchronous session calls ─────────
            Action::SelectCampaign(campaign) => {
                self.session.select((**campaign).clone());
            }
            Action::ClearSelection => {
                self.session.clear_selection();
            }
            Action::NextPage => {
                self.session.next_page();
            }
            Action::PrevPage => {
                self.session.prev_page();
            }
            Action::SetCallFilter(filter) => {
                self.session.set_filter(*filter);
            }
            Action::RefreshData => {
                let session = self.session.clone();
                tokio::spawn(async move { session.refresh_all().await });
            }

            // ── Campaign commands: spawned, outcome returns as Notify ─
            Action::StartCampaign(id) => self.spawn_lifecycle("started", *id, LifecycleKind::Start),
            Action::PauseCampaign(id) => self.spawn_lifecycle("paused", *id, LifecycleKind::Pause),
            Action::CancelCampaign(id) => {
                self.spawn_lifecycle("cancelled", *id, LifecycleKind::Cancel);
            }

            Action::CreateCampaign(payload) => {
                self.modal = None;
                let session = self.session.clone();
                let tx = self.action_tx.clone();
                let payload = (**payload).clone();
                tokio::spawn(async move {
                    let notification = match session.create_campaign(&payload).await {
                        Ok(created) => Notification::success(format!("created '{}'", created.name)),
                        Err(e) => Notification::error(format!("create failed: {e}")),
                    };
                    let _ = tx.send(Action::Notify(notification));
                });
            }

            Action::TriggerCall(number) => {
                self.modal = None;
                let session = self.session.clone();
                let tx = self.action_tx.clone();
                let number = number.clone();
                tokio::spawn(async move {
                    let notification = match session.trigger_call(&number).await {
                        Ok(call) => Notification::success(format!("call queued to {number} ({})", call.status)),
                        Err(e) => Notification::error(format!("call failed: {e}")),
                    };
                    let _ = tx.send(Action::Notify(notification));
                });
            }

            // ── Modals ────────────────────────────────────────────────
            Action::OpenCreateForm => {
                self.modal = Some(Modal::Create(CreateModal::new()));
            }
            Action::OpenSimulation => {
                if !self.simulation_running {
                    self.modal = Some(Modal::Simulate(SimulateModal::new()));
                }
            }
            Action::OpenQuickCall => {
                self.modal = Some(Modal::QuickCall(QuickCallModal::new()));
            }
            Action::CloseModal => {
                // Never tear down the view of a live batch
                let locked = matches!(&self.modal, Some(Modal::Simulate(sim)) if sim.running());
                if !locked {
                    self.modal = None;
                }
            }

            // ── Bulk simulation ───────────────────────────────────────
            Action::RunSimulation(config) => {
                if self.simulation_running {
                    warn!("simulation already in flight; ignoring");
                } else {
                    self.simulation_running = true;
                    self.spawn_simulation(config.clone());
                }
            }
            Action::SimulationFinished(summary) => {
                self.simulation_running = false;
                self.notification = Some((Notification::success(summary.clone()), Instant::now()));
                if let Some(Modal::Simulate(sim)) = &mut self.modal {
                    sim.update(action)?;
                }
            }
            Action::SimulationProgress(_) => {
                if let Some(Modal::Simulate(sim)) = &mut self.modal {
                    sim.update(action)?;
                }
            }

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }
            Action::DismissNotification => {
                self.notification = None;
            }

            // Render is handled in the main loop, not here
            Action::Render => {}

            // Data snapshots go to every screen so background screens
            // stay warm when the user switches to them.
            other => {
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn spawn_lifecycle(&self, verb: &'static str, id: dialdeck_api::CampaignId, kind: LifecycleKind) {
        let session = self.session.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = match kind {
                LifecycleKind::Start => session.start_campaign(id).await,
                LifecycleKind::Pause => session.pause_campaign(id).await,
                LifecycleKind::Cancel => session.cancel_campaign(id).await,
            };
            let notification = match result {
                Ok(campaign) => Notification::success(format!("{verb} '{}'", campaign.name)),
                Err(e) => Notification::error(format!("action failed: {e}")),
            };
            let _ = tx.send(Action::Notify(notification));
        });
    }

    fn spawn_simulation(&self, config: dialdeck_core::SimulationConfig) {
        let session = self.session.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let driver = SimulationDriver::new(session.client().clone(), config);

            let mut progress = driver.subscribe();
            let forward_tx = tx.clone();
            let forwarder = tokio::spawn(async move {
                while progress.changed().await.is_ok() {
                    let snapshot = progress.borrow_and_update().clone();
                    if forward_tx.send(Action::SimulationProgress(snapshot)).is_err() {
                        break;
                    }
                }
            });

            let report = driver.run().await;
            drop(driver);
            let _ = forwarder.await;

            let summary = format!(
                "Created {} campaign(s), started {}",
                report.created_ok(),
                report.started_ok(),
            );
            let _ = tx.send(Action::SimulationFinished(summary));

            // Completion triggers a reload so the new batch shows up
            session.refresh_all().await;
        });
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }

        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some(modal) = &self.modal {
            match modal {
                Modal::Create(form) => form.render(frame, area),
                Modal::Simulate(sim) => sim.render(frame, area),
                Modal::QuickCall(prompt) => prompt.render(frame, area),
            }
        }

        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some((notification, _)) = &self.notification {
            let color = match notification.level {
                NotificationLevel::Success => theme::GREEN,
                NotificationLevel::Error => theme::RED,
                NotificationLevel::Info => theme::SKY,
            };
            Line::from(Span::styled(
                format!(" {}", notification.message),
                Style::default().fg(color),
            ))
        } else {
            let sim = if self.simulation_running {
                Span::styled("◐ batch running ", Style::default().fg(theme::AMBER))
            } else {
                Span::raw(" ")
            };
            Line::from(vec![
                sim,
                Span::styled("│ ? help  r refresh  q quit", theme::key_hint()),
            ])
        };

        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let help_width = 58u16.min(area.width.saturating_sub(4));
        let help_height = 18u16.min(area.height.saturating_sub(4));
        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(Clear, help_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let entry = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            Line::from(Span::styled("  Navigation", Style::default().fg(theme::TEAL))),
            entry("1-2 Tab", "Switch screen"),
            entry("j/k ↑/↓", "Move in the campaign list"),
            entry("Enter", "Select campaign"),
            entry("Esc", "Clear selection / close"),
            Line::from(""),
            Line::from(Span::styled("  Campaigns", Style::default().fg(theme::TEAL))),
            entry("a p x", "Start / pause / cancel"),
            entry("[ ]", "Call page back / forward"),
            entry("f", "Cycle call-status filter"),
            entry("n", "New campaign"),
            entry("t", "Trigger a single call"),
            entry("l", "Bulk simulation"),
            Line::from(""),
            entry("r", "Refresh now"),
            entry("q", "Quit"),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

#[derive(Clone, Copy)]
enum LifecycleKind {
    Start,
    Pause,
    Cancel,
}
