//! End-user view — packages currently in storage for one surname.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table};

use stowage_core::{LoadState, Package, PackageFilter, Summary};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt;

pub struct UserScreen {
    surname: String,
    packages: Arc<Vec<Arc<Package>>>,
    load_state: LoadState,
}

impl UserScreen {
    pub fn new() -> Self {
        Self {
            surname: String::new(),
            packages: Arc::new(Vec::new()),
            load_state: LoadState::Idle,
        }
    }

    fn visible(&self) -> Vec<Arc<Package>> {
        PackageFilter::for_surname(&self.surname).apply(&self.packages)
    }
}

impl Component for UserScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('r') => Ok(Some(Action::Refresh)),
            KeyCode::Esc | KeyCode::Char('q') => Ok(Some(Action::Logout)),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LoginUser(surname) => {
                self.surname = surname.clone();
            }
            Action::PackagesUpdated(snapshot) => {
                self.packages = snapshot.clone();
            }
            Action::LoadStateChanged(state) => {
                self.load_state = state.clone();
            }
            _ => {}
        }
        Ok(None)
    }

    #[allow(clippy::too_many_lines)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).split(area);

        let visible = self.visible();
        let summary = Summary::of(&visible);

        // ── Summary strip ────────────────────────────────────────────
        let summary_line = Line::from(vec![
            Span::styled(" In storage for ", theme::form_label()),
            Span::styled(&self.surname, theme::title_style()),
            Span::styled(
                format!(
                    ":  {} package{}, {}",
                    summary.package_count,
                    if summary.package_count == 1 { "" } else { "s" },
                    fmt::weight(summary.total_weight_kg),
                ),
                theme::form_label(),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(summary_line).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_default()),
            ),
            layout[0],
        );

        // ── Package table / placeholder states ───────────────────────
        let block = Block::default()
            .title(Span::styled(" My Packages ", theme::title_style()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        match &self.load_state {
            LoadState::Errored(message) => {
                let lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("  Could not load packages: {message}"),
                        theme::error_text(),
                    )),
                    Line::from(""),
                    Line::from(Span::styled("  Press r to retry.", theme::key_hint())),
                ];
                frame.render_widget(Paragraph::new(lines).block(block), layout[1]);
            }
            LoadState::Idle | LoadState::Loading => {
                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled(
                        "  Loading…",
                        theme::key_hint(),
                    )))
                    .block(block),
                    layout[1],
                );
            }
            LoadState::Ready => {
                if visible.is_empty() {
                    frame.render_widget(
                        Paragraph::new(Line::from(Span::styled(
                            "  No packages waiting for you.",
                            theme::key_hint(),
                        )))
                        .block(block),
                        layout[1],
                    );
                    return;
                }

                let rows: Vec<Row> = visible
                    .iter()
                    .map(|p| {
                        Row::new(vec![
                            Cell::from(p.id.clone()),
                            Cell::from(fmt::weight(p.weight_kg)),
                            Cell::from(fmt::arrival(p.arrival)),
                        ])
                        .style(theme::table_row())
                    })
                    .collect();

                let table = Table::new(
                    rows,
                    [
                        Constraint::Min(16),
                        Constraint::Length(10),
                        Constraint::Length(18),
                    ],
                )
                .header(
                    Row::new(vec!["Tracking ID", "Weight", "Arrived"])
                        .style(theme::table_header()),
                )
                .block(block);

                frame.render_widget(table, layout[1]);
            }
        }
    }
}
