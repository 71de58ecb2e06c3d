//! Relate view - step 2
//!
//! Selector form for the join configuration: left sheet, right sheet, one
//! key column per side, and the join kind. The right-sheet choice set always
//! excludes the selected left sheet, so a self-join cannot be configured.
//! A successful merge shows a preview and unlocks the advance to Visualize;
//! with no merge yet, the skip path uses the left sheet verbatim.

use super::layout::{draw_header, draw_help_bar, view_layout};
use super::table::build_table_lines;
use super::ViewContext;
use crate::model::{JoinKind, JoinSpec, WizardSession};
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const PREVIEW_ROWS: usize = 6;

/// The selector currently holding focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelateField {
    LeftSheet,
    RightSheet,
    LeftKey,
    RightKey,
    Kind,
}

impl RelateField {
    fn next(&self) -> RelateField {
        match self {
            RelateField::LeftSheet => RelateField::RightSheet,
            RelateField::RightSheet => RelateField::LeftKey,
            RelateField::LeftKey => RelateField::RightKey,
            RelateField::RightKey => RelateField::Kind,
            RelateField::Kind => RelateField::LeftSheet,
        }
    }

    fn prev(&self) -> RelateField {
        match self {
            RelateField::LeftSheet => RelateField::Kind,
            RelateField::RightSheet => RelateField::LeftSheet,
            RelateField::LeftKey => RelateField::RightSheet,
            RelateField::RightKey => RelateField::LeftKey,
            RelateField::Kind => RelateField::RightKey,
        }
    }
}

/// Relate view state: selector indices into the session's choice sets
pub struct RelateComponent {
    pub focus: RelateField,
    pub left_sheet: usize,
    /// Index into the right-sheet choice set (left sheet excluded)
    pub right_sheet: usize,
    pub left_key: usize,
    pub right_key: usize,
    pub kind: usize,
}

impl Default for RelateComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl RelateComponent {
    pub fn new() -> Self {
        Self {
            focus: RelateField::LeftSheet,
            left_sheet: 0,
            right_sheet: 0,
            left_key: 0,
            right_key: 0,
            kind: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Cycle the focused selector forward
    pub fn selection_next(&mut self, session: &WizardSession) {
        self.cycle(session, 1);
    }

    /// Cycle the focused selector backward
    pub fn selection_prev(&mut self, session: &WizardSession) {
        self.cycle(session, -1);
    }

    fn cycle(&mut self, session: &WizardSession, delta: isize) {
        let count = self.option_count(session);
        if count == 0 {
            return;
        }
        let step = |idx: usize| ((idx as isize + delta).rem_euclid(count as isize)) as usize;

        match self.focus {
            RelateField::LeftSheet => {
                self.left_sheet = step(self.left_sheet);
                // Dependent choice sets shift with the left sheet
                self.right_sheet = 0;
                self.left_key = 0;
                self.right_key = 0;
            }
            RelateField::RightSheet => {
                self.right_sheet = step(self.right_sheet);
                self.right_key = 0;
            }
            RelateField::LeftKey => self.left_key = step(self.left_key),
            RelateField::RightKey => self.right_key = step(self.right_key),
            RelateField::Kind => self.kind = step(self.kind),
        }
    }

    fn option_count(&self, session: &WizardSession) -> usize {
        match self.focus {
            RelateField::LeftSheet => session.store.len(),
            RelateField::RightSheet => self.right_choices(session).len(),
            RelateField::LeftKey => self
                .left_name(session)
                .and_then(|n| session.store.get(&n).ok())
                .map(|t| t.column_count())
                .unwrap_or(0),
            RelateField::RightKey => self
                .right_name(session)
                .and_then(|n| session.store.get(&n).ok())
                .map(|t| t.column_count())
                .unwrap_or(0),
            RelateField::Kind => JoinKind::all().len(),
        }
    }

    pub fn left_name(&self, session: &WizardSession) -> Option<String> {
        session
            .store
            .names()
            .get(self.left_sheet)
            .map(|s| s.to_string())
    }

    fn right_choices(&self, session: &WizardSession) -> Vec<String> {
        match self.left_name(session) {
            Some(left) => session.right_sheet_choices(&left),
            None => Vec::new(),
        }
    }

    fn right_name(&self, session: &WizardSession) -> Option<String> {
        self.right_choices(session).get(self.right_sheet).cloned()
    }

    fn left_key_name(&self, session: &WizardSession) -> Option<String> {
        let name = self.left_name(session)?;
        let table = session.store.get(&name).ok()?;
        table.columns.get(self.left_key).cloned()
    }

    fn right_key_name(&self, session: &WizardSession) -> Option<String> {
        let name = self.right_name(session)?;
        let table = session.store.get(&name).ok()?;
        table.columns.get(self.right_key).cloned()
    }

    fn kind(&self) -> JoinKind {
        JoinKind::all()[self.kind % JoinKind::all().len()]
    }

    /// Clamp indices after the underlying choice sets may have changed
    pub fn clamp(&mut self, session: &WizardSession) {
        self.left_sheet = self.left_sheet.min(session.store.len().saturating_sub(1));
        let right_count = self.right_choices(session).len();
        self.right_sheet = self.right_sheet.min(right_count.saturating_sub(1));
    }

    /// Build the merge configuration, if a genuine join is possible
    ///
    /// Returns `None` with fewer than two sheets loaded; the skip path is
    /// then the only legal exit.
    pub fn join_spec(&self, session: &WizardSession) -> Option<JoinSpec> {
        Some(JoinSpec {
            left: self.left_name(session)?,
            right: self.right_name(session)?,
            left_key: self.left_key_name(session)?,
            right_key: self.right_key_name(session)?,
            kind: self.kind(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    pub fn draw_view(&mut self, frame: &mut Frame, area: Rect, ctx: &ViewContext) -> Result<()> {
        let layout = view_layout(area);
        draw_header(frame, layout.header, ctx.session.step);

        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8),
                Constraint::Length(5),
                Constraint::Min(0),
            ])
            .split(layout.body);

        self.draw_sheet_panels(frame, body[0], ctx.session);
        self.draw_join_config(frame, body[1], ctx.session);
        self.draw_result_panel(frame, body[2], ctx);

        let hints: &[(&str, &str)] = if ctx.session.final_table.is_some() {
            &[
                ("Enter", "Next: Visualize"),
                ("m", "Merge again"),
                ("Tab", "Focus"),
                ("↑/↓", "Select"),
                ("Esc", "Back"),
            ]
        } else {
            &[
                ("m", "Merge Sheets"),
                ("s", "Skip Merge & Use Base Sheet"),
                ("Tab", "Focus"),
                ("↑/↓", "Select"),
                ("Esc", "Back"),
            ]
        };
        draw_help_bar(frame, layout.help, hints);

        Ok(())
    }

    fn selector_line(&self, label: &str, value: &str, field: RelateField) -> Line<'static> {
        let value_style = if self.focus == field {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(vec![
            Span::styled(
                format!("{:<12}", label),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("< {} >", value), value_style),
        ])
    }

    fn draw_sheet_panels(&self, frame: &mut Frame, area: Rect, session: &WizardSession) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let left_name = self.left_name(session).unwrap_or_default();
        let left_columns = session
            .store
            .get(&left_name)
            .map(|t| t.columns.join(", "))
            .unwrap_or_default();

        let left_lines = vec![
            self.selector_line("Sheet", &left_name, RelateField::LeftSheet),
            Line::from(""),
            Line::from(vec![
                Span::styled("Columns: ", Style::default().fg(Color::DarkGray)),
                Span::raw(left_columns),
            ]),
        ];
        let left = Paragraph::new(left_lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Left Table (Base) ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(ratatui::widgets::Wrap { trim: true });
        frame.render_widget(left, chunks[0]);

        let right_lines = match self.right_name(session) {
            Some(right_name) => {
                let right_columns = session
                    .store
                    .get(&right_name)
                    .map(|t| t.columns.join(", "))
                    .unwrap_or_default();
                vec![
                    self.selector_line("Sheet", &right_name, RelateField::RightSheet),
                    Line::from(""),
                    Line::from(vec![
                        Span::styled("Columns: ", Style::default().fg(Color::DarkGray)),
                        Span::raw(right_columns),
                    ]),
                ]
            }
            None => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Only one sheet is loaded.",
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(Span::styled(
                    "Press 's' to skip the merge and use the base sheet.",
                    Style::default().fg(Color::Yellow),
                )),
            ],
        };
        let right = Paragraph::new(right_lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Right Table (To Join) ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(ratatui::widgets::Wrap { trim: true });
        frame.render_widget(right, chunks[1]);
    }

    fn draw_join_config(&self, frame: &mut Frame, area: Rect, session: &WizardSession) {
        let left_key = self.left_key_name(session).unwrap_or_default();
        let right_key = self.right_key_name(session).unwrap_or_default();

        let lines = vec![
            self.selector_line("Key (Left)", &left_key, RelateField::LeftKey),
            self.selector_line("Key (Right)", &right_key, RelateField::RightKey),
            self.selector_line("Join Type", self.kind().name(), RelateField::Kind),
        ];

        let config = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Join Configuration ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(config, area);
    }

    fn draw_result_panel(&self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
        let mut lines = Vec::new();

        if let Some(error) = ctx.error {
            lines.push(Line::from(vec![Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )]));
            lines.push(Line::from(""));
        }
        if let Some(status) = ctx.status {
            lines.push(Line::from(vec![Span::styled(
                status.to_string(),
                Style::default().fg(Color::Green),
            )]));
            lines.push(Line::from(""));
        }

        match &ctx.session.final_table {
            Some(table) => {
                lines.extend(build_table_lines(
                    &table.columns,
                    table.head(PREVIEW_ROWS),
                    0,
                ));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!(
                        "{} rows × {} columns",
                        table.row_count(),
                        table.column_count()
                    ),
                    Style::default().fg(Color::Yellow),
                )));
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "No merge yet. Configure the join above and press 'm'.",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        let panel = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Merge Result ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(panel, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NamedTable, Value};

    fn session_with(names: &[&str]) -> WizardSession {
        let mut session = WizardSession::new();
        session.load_sheets(
            names
                .iter()
                .map(|n| {
                    NamedTable::new(
                        *n,
                        vec!["id".to_string(), "v".to_string()],
                        vec![vec![Value::Number(1.0), Value::Text("x".into())]],
                    )
                })
                .collect(),
        );
        session
    }

    #[test]
    fn test_right_choices_never_include_left() {
        let session = session_with(&["a", "b", "c"]);
        let mut relate = RelateComponent::new();

        for left in 0..3 {
            relate.left_sheet = left;
            let left_name = relate.left_name(&session).unwrap();
            assert!(!relate.right_choices(&session).contains(&left_name));
        }
    }

    #[test]
    fn test_join_spec_none_with_single_sheet() {
        let session = session_with(&["only"]);
        let relate = RelateComponent::new();
        assert!(relate.join_spec(&session).is_none());
    }

    #[test]
    fn test_join_spec_complete_with_two_sheets() {
        let session = session_with(&["a", "b"]);
        let relate = RelateComponent::new();

        let spec = relate.join_spec(&session).unwrap();
        assert_eq!(spec.left, "a");
        assert_eq!(spec.right, "b");
        assert_eq!(spec.left_key, "id");
        assert_eq!(spec.right_key, "id");
        assert_eq!(spec.kind, JoinKind::Inner);
    }

    #[test]
    fn test_left_change_resets_dependent_selectors() {
        let session = session_with(&["a", "b", "c"]);
        let mut relate = RelateComponent::new();
        relate.focus = RelateField::RightSheet;
        relate.selection_next(&session);
        assert_eq!(relate.right_sheet, 1);

        relate.focus = RelateField::LeftSheet;
        relate.selection_next(&session);
        assert_eq!(relate.right_sheet, 0);
        assert_eq!(relate.left_key, 0);
    }

    #[test]
    fn test_selection_wraps_both_directions() {
        let session = session_with(&["a", "b"]);
        let mut relate = RelateComponent::new();
        relate.focus = RelateField::Kind;

        relate.selection_prev(&session);
        assert_eq!(relate.kind(), JoinKind::Outer);
        relate.selection_next(&session);
        assert_eq!(relate.kind(), JoinKind::Inner);
    }
}
