//! Application core — event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stowage_core::{
    Inventory, LineWedge, LoadState, PackageInput, PackageSubmission, Role, ScanEvent, Scanner,
    ScannerState, UserRegistration,
};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::run_data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// How many ticks (at 4 Hz) a notification stays on the status bar.
const NOTIFICATION_TICKS: u8 = 20;

/// Top-level application state and event loop.
pub struct App {
    role: Role,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    terminal_size: (u16, u16),

    load_state: LoadState,
    scan_state: ScannerState,
    notification: Option<(Notification, u8)>,

    inventory: Inventory,
    submission: PackageSubmission,
    registration: UserRegistration,
    scanner: Option<Scanner<LineWedge>>,
    /// Moved into the data bridge when the loop starts.
    scan_events: Option<mpsc::UnboundedReceiver<ScanEvent>>,

    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(
        inventory: Inventory,
        scanner: Option<(Scanner<LineWedge>, mpsc::UnboundedReceiver<ScanEvent>)>,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> = create_screens().into_iter().collect();
        let (scanner, scan_events) = match scanner {
            Some((scanner, events)) => (Some(scanner), Some(events)),
            None => (None, None),
        };

        Self {
            role: Role::Guest,
            active_screen: ScreenId::Login,
            screens,
            running: true,
            help_visible: false,
            terminal_size: (0, 0),
            load_state: LoadState::Idle,
            scan_state: ScannerState::Idle,
            notification: None,
            submission: PackageSubmission::new(inventory.clone()),
            registration: UserRegistration::new(inventory.clone()),
            inventory,
            scanner,
            scan_events,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));

        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }

        // Background bridge: store + scanner → actions
        let bridge_cancel = CancellationToken::new();
        let bridge = tokio::spawn(run_data_bridge(
            self.inventory.clone(),
            self.scan_events.take(),
            self.scanner.as_ref().map(Scanner::state),
            self.action_tx.clone(),
            bridge_cancel.clone(),
        ));

        // Warm the store before anyone logs in.
        self.spawn_refresh();

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

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
        if let Some(scanner) = &mut self.scanner {
            scanner.shutdown().await;
        }
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// everything else is delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            self.help_visible = false;
            return Ok(None);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (_, KeyCode::F(1)) => return Ok(Some(Action::ToggleHelp)),
            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    fn switch_screen(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    /// Process a single action — update app state and propagate to
    /// components.
    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                self.terminal_size = (*w, *h);
            }

            Action::Tick => {
                if let Some((_, ticks)) = &mut self.notification {
                    *ticks = ticks.saturating_sub(1);
                }
                if matches!(self.notification, Some((_, 0))) {
                    self.notification = None;
                }
            }

            Action::Render => {}

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), NOTIFICATION_TICKS));
            }

            // ── Session ────────────────────────────────────────────
            Action::LoginAdmin => {
                self.role = Role::Admin;
                self.switch_screen(ScreenId::for_role(self.role));
                self.spawn_refresh();
            }

            Action::LoginUser(_) => {
                self.role = Role::User;
                self.switch_screen(ScreenId::for_role(self.role));
                self.broadcast(action)?;
                self.spawn_refresh();
            }

            Action::Logout => {
                self.role = Role::Guest;
                self.switch_screen(ScreenId::for_role(self.role));
                if let Some(scanner) = &self.scanner {
                    scanner.stop();
                }
                self.broadcast(action)?;
                self.notification =
                    Some((Notification::info("Logged out."), NOTIFICATION_TICKS));
            }

            // ── Inventory commands ─────────────────────────────────
            Action::Refresh => self.spawn_refresh(),
            Action::SubmitPackage(input) => self.spawn_submit(input.clone()),
            Action::RegisterUser { name, email } => {
                self.spawn_register(name.clone(), email.clone());
            }
            Action::MarkDelivered(id) => self.spawn_mark_delivered(id.clone()),

            // ── Scanner ────────────────────────────────────────────
            Action::StartScan => match &mut self.scanner {
                Some(scanner) => {
                    if let Err(err) = scanner.start() {
                        warn!("scan start rejected: {err}");
                        self.notification = Some((
                            Notification::warning(err.to_string()),
                            NOTIFICATION_TICKS,
                        ));
                    }
                }
                None => {
                    self.notification = Some((
                        Notification::warning("No scanner configured."),
                        NOTIFICATION_TICKS,
                    ));
                }
            },

            Action::StopScan => {
                if let Some(scanner) = &self.scanner {
                    scanner.stop();
                }
            }

            Action::ScanFailed(message) => {
                self.notification = Some((
                    Notification::warning(format!("Scan failed: {message}")),
                    NOTIFICATION_TICKS,
                ));
            }

            // ── State mirrored for the status bar, then broadcast ──
            Action::LoadStateChanged(state) => {
                self.load_state = state.clone();
                self.broadcast(action)?;
            }
            Action::ScanStateChanged(state) => {
                self.scan_state = *state;
                self.broadcast(action)?;
            }

            // ── Store snapshots go to every screen ─────────────────
            Action::PackagesUpdated(_) | Action::UsersUpdated(_) => {
                self.broadcast(action)?;
            }

            // Everything else concerns only the active screen
            other => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Send an action to every screen, queueing any follow-ups.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Async command dispatch ──────────────────────────────────────

    fn spawn_refresh(&self) {
        let inventory = self.inventory.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if let Err(err) = inventory.refresh().await {
                let _ = tx.send(Action::Notify(Notification::error(err.to_string())));
            }
        });
    }

    fn spawn_submit(&self, input: PackageInput) {
        let submission = self.submission.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let wanted_notify = input.notify.send;
            match submission.submit(input).await {
                Ok(recipient) => {
                    let _ = tx.send(Action::PackageSubmitted);
                    let _ = tx.send(Action::Notify(Notification::success("Package registered.")));
                    if wanted_notify && recipient.user().is_none() {
                        let _ = tx.send(Action::Notify(Notification::warning(
                            "No registered user matches this surname; no email will be sent.",
                        )));
                    }
                }
                Err(err) => {
                    let _ = tx.send(Action::SubmitFailed(err.to_string()));
                }
            }
        });
    }

    fn spawn_register(&self, name: String, email: String) {
        let registration = self.registration.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match registration.register(&name, &email).await {
                Ok(user) => {
                    let _ = tx.send(Action::UserRegistered(user.name.clone()));
                    let _ = tx.send(Action::Notify(Notification::success(format!(
                        "User {} registered.",
                        user.name
                    ))));
                }
                Err(err) => {
                    let _ = tx.send(Action::RegisterFailed(err.to_string()));
                }
            }
        });
    }

    fn spawn_mark_delivered(&self, id: String) {
        let inventory = self.inventory.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match inventory.mark_delivered(&id).await {
                Ok(()) => {
                    let _ = tx.send(Action::Notify(Notification::success(format!(
                        "{id} marked delivered."
                    ))));
                }
                Err(err) => {
                    let _ = tx.send(Action::Notify(Notification::error(err.to_string())));
                }
            }
        });
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }

        self.render_status_bar(frame, layout[1]);

        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let load_indicator = match &self.load_state {
            LoadState::Ready => {
                Span::styled("● ready", Style::default().fg(theme::SUCCESS_GREEN))
            }
            LoadState::Loading => {
                Span::styled("◐ loading", Style::default().fg(theme::AMBER))
            }
            LoadState::Errored(_) => {
                Span::styled("○ offline", Style::default().fg(theme::ERROR_RED))
            }
            LoadState::Idle => Span::styled("○ idle", theme::key_hint()),
        };

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(self.role.to_string(), theme::key_hint_key()),
            Span::styled(" │ ", theme::key_hint()),
            load_indicator,
        ];

        if self.scan_state == ScannerState::Active {
            spans.push(Span::styled(" │ ", theme::key_hint()));
            spans.push(Span::styled(
                "scanning",
                Style::default().fg(theme::WARNING_ORANGE),
            ));
        }

        if let Some((notification, _)) = &self.notification {
            let style = match notification.level {
                NotificationLevel::Success => theme::success_text(),
                NotificationLevel::Warning => theme::warning_text(),
                NotificationLevel::Error => theme::error_text(),
                NotificationLevel::Info => theme::key_hint(),
            };
            spans.push(Span::styled(" │ ", theme::key_hint()));
            spans.push(Span::styled(notification.message.clone(), style));
        } else {
            spans.push(Span::styled(" │ F1 help  Ctrl+C quit", theme::key_hint()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    #[allow(clippy::unused_self)]
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let panel = crate::widgets::centered_rect(52, 18, area);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            panel,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let row = |keys: &str, what: &str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<12}"), theme::key_hint_key()),
                Span::styled(what.to_owned(), theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            row("↑/↓ j/k", "Move selection"),
            row("Tab", "Next pane / field"),
            row("Enter", "Confirm / submit"),
            row("Esc", "Back / log out"),
            Line::from(""),
            row("r", "Refresh inventory"),
            row("d", "Mark selected package delivered"),
            row("/", "Filter packages by surname"),
            row("a", "Add user"),
            row("Ctrl+s", "Start / cancel scan (in the form)"),
            Line::from(""),
            row("F1", "This help"),
            row("Ctrl+C", "Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "                 press any key to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use stowage_core::InventoryConfig;

    use super::*;

    fn app() -> App {
        let inventory = Inventory::new(&InventoryConfig::default()).unwrap();
        App::new(inventory, None)
    }

    #[tokio::test]
    async fn login_routes_to_the_screen_for_the_role() {
        let mut app = app();
        assert_eq!(app.active_screen, ScreenId::Login);

        app.process_action(&Action::LoginAdmin).unwrap();
        assert_eq!(app.role, Role::Admin);
        assert_eq!(app.active_screen, ScreenId::for_role(app.role));

        app.process_action(&Action::Logout).unwrap();
        assert_eq!(app.role, Role::Guest);
        assert_eq!(app.active_screen, ScreenId::Login);
    }

    #[tokio::test]
    async fn logout_leaves_a_status_line_note_that_expires() {
        let mut app = app();
        app.process_action(&Action::LoginUser("Rossi".into())).unwrap();
        app.process_action(&Action::Logout).unwrap();

        let level = app.notification.as_ref().map(|(n, _)| n.level);
        assert_eq!(level, Some(NotificationLevel::Info));

        for _ in 0..NOTIFICATION_TICKS {
            app.process_action(&Action::Tick).unwrap();
        }
        assert!(app.notification.is_none());
    }
}
