//! Role-selection screen — the entry point of every session.
//!
//! Two-step flow: pick a role; the end-user role additionally asks for
//! the surname whose packages the session should show.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::centered_rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    PickRole,
    EnterSurname,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoleChoice {
    Admin,
    User,
}

impl RoleChoice {
    const ALL: [RoleChoice; 2] = [Self::Admin, Self::User];

    fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::User => "User",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Admin => "Register packages and users, mark deliveries",
            Self::User => "View packages in storage for your surname",
        }
    }
}

pub struct LoginScreen {
    step: Step,
    selected: usize,
    surname_input: String,
    error: Option<String>,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            step: Step::PickRole,
            selected: 0,
            surname_input: String::new(),
            error: None,
        }
    }

    fn confirm(&mut self) -> Option<Action> {
        match self.step {
            Step::PickRole => match RoleChoice::ALL[self.selected] {
                RoleChoice::Admin => Some(Action::LoginAdmin),
                RoleChoice::User => {
                    self.step = Step::EnterSurname;
                    self.error = None;
                    None
                }
            },
            Step::EnterSurname => {
                let surname = self.surname_input.trim();
                if surname.is_empty() {
                    self.error = Some("A surname is required.".into());
                    return None;
                }
                Some(Action::LoginUser(surname.to_owned()))
            }
        }
    }
}

impl Component for LoginScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.step {
            Step::PickRole => match key.code {
                KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Up | KeyCode::Char('k') => {
                    self.selected = self.selected.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.selected = (self.selected + 1).min(RoleChoice::ALL.len() - 1);
                }
                KeyCode::Enter => return Ok(self.confirm()),
                _ => {}
            },
            Step::EnterSurname => match key.code {
                KeyCode::Esc => {
                    self.step = Step::PickRole;
                    self.surname_input.clear();
                    self.error = None;
                }
                KeyCode::Enter => return Ok(self.confirm()),
                KeyCode::Backspace => {
                    self.surname_input.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.surname_input.push(c);
                }
                _ => {}
            },
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        // Returning to the login screen resets the flow.
        if matches!(action, Action::Logout) {
            self.step = Step::PickRole;
            self.selected = 0;
            self.surname_input.clear();
            self.error = None;
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let panel = centered_rect(54, 14, area);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            panel,
        );

        let block = Block::default()
            .title(Line::from(Span::styled(" Stowage ", theme::title_style())))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let layout = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(4),
            Constraint::Length(2),
        ])
        .split(inner);

        let heading = match self.step {
            Step::PickRole => "Who is using this terminal?",
            Step::EnterSurname => "Which surname are your packages under?",
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(heading, theme::form_label())))
                .alignment(Alignment::Center),
            layout[0],
        );

        match self.step {
            Step::PickRole => self.render_roles(frame, layout[1]),
            Step::EnterSurname => self.render_surname(frame, layout[1]),
        }

        let hint = match self.step {
            Step::PickRole => " ↑/↓ select   Enter confirm   q quit",
            Step::EnterSurname => " Enter confirm   Esc back",
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(hint, theme::key_hint()))),
            layout[2],
        );
    }
}

impl LoginScreen {
    fn render_roles(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = RoleChoice::ALL
            .iter()
            .enumerate()
            .flat_map(|(i, role)| {
                let marker = if i == self.selected { "› " } else { "  " };
                let style = if i == self.selected {
                    Style::default()
                        .fg(theme::AMBER)
                        .add_modifier(Modifier::BOLD)
                } else {
                    theme::table_row()
                };
                vec![
                    Line::from(Span::styled(format!("{marker}{}", role.label()), style)),
                    Line::from(Span::styled(
                        format!("    {}", role.description()),
                        theme::key_hint(),
                    )),
                ]
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_surname(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(vec![
                Span::styled("  Surname: ", theme::form_label()),
                Span::styled(
                    format!("{}█", self.surname_input),
                    Style::default().fg(theme::DIM_WHITE),
                ),
            ]),
            Line::from(""),
        ];
        if let Some(err) = &self.error {
            lines.push(Line::from(Span::styled(
                format!("  {err}"),
                theme::error_text(),
            )));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }
}
