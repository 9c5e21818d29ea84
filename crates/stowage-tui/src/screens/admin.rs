//! Admin dashboard — package intake, delivery marking, user registry.
//!
//! Left pane: the in-storage package table with a summary strip and an
//! optional surname filter (`/`). Right pane: the intake form and the
//! registered-user list. `a` opens the add-user modal; `Ctrl+s` drives
//! the scanner from inside the form.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use stowage_core::{
    LoadState, NotifyOptions, Package, PackageInput, RecipientMatch, ScannerState, Summary, User,
    resolve_recipient,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{centered_rect, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Packages,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Id,
    Surname,
    Weight,
    Notify,
    Message,
}

impl FormField {
    fn next(self, notify: bool) -> Self {
        match self {
            Self::Id => Self::Surname,
            Self::Surname => Self::Weight,
            Self::Weight => Self::Notify,
            Self::Notify => {
                if notify {
                    Self::Message
                } else {
                    Self::Id
                }
            }
            Self::Message => Self::Id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModalField {
    Name,
    Email,
}

pub struct AdminScreen {
    focus: Focus,

    // Data from the store
    packages: Arc<Vec<Arc<Package>>>,
    users: Arc<Vec<Arc<User>>>,
    load_state: LoadState,
    selected: usize,
    filter_input: String,
    filter_editing: bool,

    // Intake form
    field: FormField,
    id_input: String,
    surname_input: String,
    weight_input: String,
    notify: bool,
    message_input: String,
    form_error: Option<String>,
    submitting: bool,
    scan_state: ScannerState,

    // Add-user modal
    modal_open: bool,
    modal_field: ModalField,
    name_input: String,
    email_input: String,
    modal_error: Option<String>,
    registering: bool,
}

impl AdminScreen {
    pub fn new() -> Self {
        Self {
            focus: Focus::Packages,
            packages: Arc::new(Vec::new()),
            users: Arc::new(Vec::new()),
            load_state: LoadState::Idle,
            selected: 0,
            filter_input: String::new(),
            filter_editing: false,
            field: FormField::Id,
            id_input: String::new(),
            surname_input: String::new(),
            weight_input: String::new(),
            notify: false,
            message_input: String::new(),
            form_error: None,
            submitting: false,
            scan_state: ScannerState::Idle,
            modal_open: false,
            modal_field: ModalField::Name,
            name_input: String::new(),
            email_input: String::new(),
            modal_error: None,
            registering: false,
        }
    }

    fn reset_form(&mut self) {
        self.field = FormField::Id;
        self.id_input.clear();
        self.surname_input.clear();
        self.weight_input.clear();
        self.notify = false;
        self.message_input.clear();
        self.form_error = None;
    }

    fn reset_modal(&mut self) {
        self.modal_field = ModalField::Name;
        self.name_input.clear();
        self.email_input.clear();
        self.modal_error = None;
    }

    /// In-storage packages, narrowed by the surname filter when one is
    /// set (case-insensitive substring).
    fn visible(&self) -> Vec<Arc<Package>> {
        let needle = self.filter_input.trim().to_lowercase();
        self.packages
            .iter()
            .filter(|p| p.status.is_in_storage())
            .filter(|p| needle.is_empty() || p.surname.to_lowercase().contains(&needle))
            .map(Arc::clone)
            .collect()
    }

    fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Id => Some(&mut self.id_input),
            FormField::Surname => Some(&mut self.surname_input),
            FormField::Weight => Some(&mut self.weight_input),
            FormField::Message => Some(&mut self.message_input),
            FormField::Notify => None,
        }
    }

    fn submit(&mut self) -> Option<Action> {
        if self.submitting {
            return None;
        }
        self.submitting = true;
        self.form_error = None;

        let message = Some(self.message_input.clone()).filter(|m| !m.trim().is_empty());
        Some(Action::SubmitPackage(PackageInput {
            id: self.id_input.clone(),
            surname: self.surname_input.clone(),
            weight: self.weight_input.clone(),
            notify: NotifyOptions {
                send: self.notify,
                message,
            },
        }))
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc if !self.registering => {
                self.modal_open = false;
                self.reset_modal();
            }
            KeyCode::Tab => {
                self.modal_field = match self.modal_field {
                    ModalField::Name => ModalField::Email,
                    ModalField::Email => ModalField::Name,
                };
            }
            KeyCode::Enter if !self.registering => {
                self.registering = true;
                self.modal_error = None;
                return Some(Action::RegisterUser {
                    name: self.name_input.clone(),
                    email: self.email_input.clone(),
                });
            }
            KeyCode::Backspace => {
                match self.modal_field {
                    ModalField::Name => self.name_input.pop(),
                    ModalField::Email => self.email_input.pop(),
                };
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                match self.modal_field {
                    ModalField::Name => self.name_input.push(c),
                    ModalField::Email => self.email_input.push(c),
                }
            }
            _ => {}
        }
        None
    }

    fn handle_packages_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.filter_editing {
            match key.code {
                KeyCode::Esc => {
                    self.filter_input.clear();
                    self.filter_editing = false;
                    self.selected = 0;
                }
                KeyCode::Enter => self.filter_editing = false,
                KeyCode::Backspace => {
                    self.filter_input.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.filter_input.push(c);
                    self.selected = 0;
                }
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Tab => self.focus = Focus::Form,
            KeyCode::Esc => return Some(Action::Logout),
            KeyCode::Char('r') => return Some(Action::Refresh),
            KeyCode::Char('/') => self.filter_editing = true,
            KeyCode::Char('a') => {
                self.modal_open = true;
                self.reset_modal();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.visible().len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
            }
            KeyCode::Char('d') => {
                let package = self.visible().into_iter().nth(self.selected)?;
                return Some(Action::MarkDelivered(package.id.clone()));
            }
            _ => {}
        }
        None
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Ctrl+s: single toggle for the scan session.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return Some(if self.scan_state == ScannerState::Idle {
                Action::StartScan
            } else {
                Action::StopScan
            });
        }

        match key.code {
            KeyCode::Esc => self.focus = Focus::Packages,
            KeyCode::Tab => self.field = self.field.next(self.notify),
            KeyCode::Enter => return self.submit(),
            KeyCode::Char(' ') if self.field == FormField::Notify => {
                self.notify = !self.notify;
            }
            KeyCode::Backspace => {
                if let Some(input) = self.active_input_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(input) = self.active_input_mut() {
                    input.push(c);
                }
            }
            _ => {}
        }
        None
    }
}

impl Component for AdminScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.modal_open {
            return Ok(self.handle_modal_key(key));
        }
        Ok(match self.focus {
            Focus::Packages => self.handle_packages_key(key),
            Focus::Form => self.handle_form_key(key),
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::PackagesUpdated(snapshot) => {
                self.packages = snapshot.clone();
                let last = self.visible().len().saturating_sub(1);
                self.selected = self.selected.min(last);
            }
            Action::UsersUpdated(snapshot) => {
                self.users = snapshot.clone();
            }
            Action::LoadStateChanged(state) => {
                self.load_state = state.clone();
            }
            Action::PackageSubmitted => {
                self.submitting = false;
                self.reset_form();
            }
            Action::SubmitFailed(message) => {
                self.submitting = false;
                self.form_error = Some(message.clone());
            }
            Action::UserRegistered(_) => {
                self.registering = false;
                self.modal_open = false;
                self.reset_modal();
            }
            Action::RegisterFailed(message) => {
                self.registering = false;
                self.modal_error = Some(message.clone());
            }
            Action::ScanDecoded(text) => {
                self.id_input = text.clone();
                self.focus = Focus::Form;
                self.form_error = None;
            }
            Action::ScanStateChanged(state) => {
                self.scan_state = *state;
            }
            Action::Logout => {
                self.focus = Focus::Packages;
                self.selected = 0;
                self.filter_input.clear();
                self.filter_editing = false;
                self.modal_open = false;
                self.reset_form();
                self.reset_modal();
                self.submitting = false;
                self.registering = false;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let columns =
            Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)])
                .split(area);

        self.render_packages(frame, columns[0]);

        let right =
            Layout::vertical([Constraint::Min(14), Constraint::Min(5)]).split(columns[1]);
        self.render_form(frame, right[0]);
        self.render_users(frame, right[1]);

        if self.modal_open {
            self.render_modal(frame, area);
        }
    }
}

// ── Rendering ───────────────────────────────────────────────────────

impl AdminScreen {
    fn render_packages(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).split(area);

        let visible = self.visible();
        let summary = Summary::of(&visible);

        let mut strip = vec![Span::styled(
            format!(
                " {} in storage, {} total",
                summary.package_count,
                fmt::weight(summary.total_weight_kg),
            ),
            theme::form_label(),
        )];
        if self.filter_editing || !self.filter_input.is_empty() {
            let cursor = if self.filter_editing { "█" } else { "" };
            strip.push(Span::styled("  │  surname: ", theme::key_hint()));
            strip.push(Span::styled(
                format!("{}{cursor}", self.filter_input),
                Style::default().fg(theme::AMBER),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(strip)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_default()),
            ),
            layout[0],
        );

        let border = if self.focus == Focus::Packages && !self.modal_open {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(Span::styled(" Packages ", theme::title_style()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        if let LoadState::Errored(message) = &self.load_state {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("  Could not load inventory: {message}"),
                    theme::error_text(),
                )),
                Line::from(""),
                Line::from(Span::styled("  Press r to retry.", theme::key_hint())),
            ];
            frame.render_widget(Paragraph::new(lines).block(block), layout[1]);
            return;
        }

        let rows: Vec<Row> = visible
            .iter()
            .map(|p| {
                Row::new(vec![
                    Cell::from(p.id.clone()),
                    Cell::from(p.surname.clone()),
                    Cell::from(fmt::weight(p.weight_kg)),
                    Cell::from(fmt::arrival(p.arrival)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Min(14),
                Constraint::Length(14),
                Constraint::Length(9),
                Constraint::Length(17),
            ],
        )
        .header(
            Row::new(vec!["Tracking ID", "Surname", "Weight", "Arrived"])
                .style(theme::table_header()),
        )
        .row_highlight_style(theme::table_selected())
        .block(block);

        let mut state = TableState::default();
        state.select(Some(self.selected.min(visible.len().saturating_sub(1))));
        frame.render_stateful_widget(table, layout[1], &mut state);
    }

    fn form_line(&self, label: &str, value: &str, field: FormField) -> Line<'static> {
        let active = self.focus == Focus::Form && self.field == field && !self.modal_open;
        let cursor = if active { "█" } else { "" };
        let value_style = if active {
            Style::default().fg(theme::AMBER)
        } else {
            Style::default().fg(theme::DIM_WHITE)
        };
        Line::from(vec![
            Span::styled(format!(" {label:<9}"), theme::form_label()),
            Span::styled(format!("{value}{cursor}"), value_style),
        ])
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let border = if self.focus == Focus::Form && !self.modal_open {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(Span::styled(" Register Package ", theme::title_style()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let mut lines = vec![
            self.form_line("ID", &self.id_input, FormField::Id),
            self.form_line("Surname", &self.surname_input, FormField::Surname),
            self.form_line("Weight", &self.weight_input, FormField::Weight),
            self.form_line(
                "Notify",
                if self.notify { "[x]" } else { "[ ]" },
                FormField::Notify,
            ),
        ];
        if self.notify {
            lines.push(self.form_line("Message", &self.message_input, FormField::Message));
        }
        lines.push(Line::from(""));

        // Recipient hint: how the surname maps onto the user registry.
        let surname = self.surname_input.trim();
        if !surname.is_empty() {
            match resolve_recipient(&self.users, surname) {
                RecipientMatch::Exact(user) => lines.push(Line::from(Span::styled(
                    format!(" Recipient: {} <{}>", user.name, user.email),
                    theme::success_text(),
                ))),
                RecipientMatch::Fuzzy(user) => lines.push(Line::from(Span::styled(
                    format!(" Closest match: {} <{}>", user.name, user.email),
                    theme::warning_text(),
                ))),
                RecipientMatch::None => {
                    if self.notify {
                        lines.push(Line::from(Span::styled(
                            " No registered user matches this surname.",
                            theme::warning_text(),
                        )));
                    }
                }
            }
        }

        if let Some(err) = &self.form_error {
            lines.push(Line::from(Span::styled(
                format!(" {err}"),
                theme::error_text(),
            )));
        }
        if self.submitting {
            lines.push(Line::from(Span::styled(" Submitting…", theme::key_hint())));
        }
        match self.scan_state {
            ScannerState::Idle => {}
            ScannerState::Starting => lines.push(Line::from(Span::styled(
                " Scanner: starting…",
                theme::key_hint(),
            ))),
            ScannerState::Active => lines.push(Line::from(Span::styled(
                " Scanner: waiting for code (Ctrl+s cancels)",
                theme::warning_text(),
            ))),
            ScannerState::Stopping => lines.push(Line::from(Span::styled(
                " Scanner: stopping…",
                theme::key_hint(),
            ))),
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_users(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Span::styled(" Users ", theme::title_style()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let rows: Vec<Row> = self
            .users
            .iter()
            .map(|u| {
                Row::new(vec![
                    Cell::from(u.name.clone()),
                    Cell::from(u.email.clone()),
                    Cell::from(u.status.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Min(20),
                Constraint::Length(9),
            ],
        )
        .header(Row::new(vec!["Name", "Email", "Status"]).style(theme::table_header()))
        .block(block);

        frame.render_widget(table, area);
    }

    fn render_modal(&self, frame: &mut Frame, area: Rect) {
        let panel = centered_rect(50, 10, area);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            panel,
        );

        let block = Block::default()
            .title(Span::styled(" Add User ", theme::title_style()))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let field_line = |label: &str, value: &str, field: ModalField| {
            let active = self.modal_field == field;
            let cursor = if active { "█" } else { "" };
            let style = if active {
                Style::default().fg(theme::AMBER)
            } else {
                Style::default().fg(theme::DIM_WHITE)
            };
            Line::from(vec![
                Span::styled(format!(" {label:<8}"), theme::form_label()),
                Span::styled(format!("{value}{cursor}"), style),
            ])
        };

        let mut lines = vec![
            Line::from(""),
            field_line("Surname", &self.name_input, ModalField::Name),
            field_line("Email", &self.email_input, ModalField::Email),
            Line::from(""),
        ];
        if let Some(err) = &self.modal_error {
            lines.push(Line::from(Span::styled(
                format!(" {err}"),
                theme::error_text(),
            )));
        }
        if self.registering {
            lines.push(Line::from(Span::styled(" Registering…", theme::key_hint())));
        } else {
            lines.push(Line::from(Span::styled(
                " Tab switch field   Enter save   Esc cancel",
                theme::key_hint(),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}
