//! Upload view - step 1
//!
//! Prompts for a workbook path until a load succeeds, then previews the
//! loaded sheets. The path prompt reuses the text-input idiom of a setup
//! wizard: type to edit, Enter to submit.

use super::layout::{draw_header, draw_help_bar, view_layout};
use super::table::build_table_lines;
use super::ViewContext;
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const PREVIEW_ROWS: usize = 12;

/// Upload view state
pub struct UploadComponent {
    /// Workbook path being typed
    pub input: String,
    /// Which loaded sheet the preview shows
    pub selected_sheet: usize,
}

impl Default for UploadComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadComponent {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            selected_sheet: 0,
        }
    }

    pub fn select_next_sheet(&mut self, sheet_count: usize) {
        if sheet_count > 0 {
            self.selected_sheet = (self.selected_sheet + 1) % sheet_count;
        }
    }

    pub fn select_prev_sheet(&mut self, sheet_count: usize) {
        if sheet_count > 0 {
            self.selected_sheet = (self.selected_sheet + sheet_count - 1) % sheet_count;
        }
    }

    pub fn draw_view(&mut self, frame: &mut Frame, area: Rect, ctx: &ViewContext) -> Result<()> {
        let layout = view_layout(area);
        draw_header(frame, layout.header, ctx.session.step);

        if ctx.session.store.is_empty() {
            self.draw_prompt(frame, layout.body, ctx);
            draw_help_bar(
                frame,
                layout.help,
                &[("Enter", "Load"), ("Esc", "Quit"), ("", "Type to edit")],
            );
        } else {
            self.draw_preview(frame, layout.body, ctx);
            draw_help_bar(
                frame,
                layout.help,
                &[
                    ("Enter", "Next: Build Relationships"),
                    ("Tab", "Next sheet"),
                    ("Esc", "Quit"),
                ],
            );
        }

        Ok(())
    }

    fn draw_prompt(&self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
        let mut lines = vec![
            Line::from(""),
            Line::from("Enter the path to a spreadsheet file containing multiple sheets:"),
            Line::from(vec![Span::styled(
                "(.xlsx and .xls are accepted)",
                Style::default().fg(Color::DarkGray),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{}_", &self.input),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if let Some(error) = ctx.error {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )]));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Upload Your Data ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_preview(&mut self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
            .split(area);

        let tables = ctx.session.store.tables();
        self.selected_sheet = self.selected_sheet.min(tables.len().saturating_sub(1));

        // Sheet list
        let mut list_lines = Vec::with_capacity(tables.len() + 2);
        for (i, table) in tables.iter().enumerate() {
            let style = if i == self.selected_sheet {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            list_lines.push(Line::from(vec![
                Span::styled(format!(" {} ", table.name), style),
                Span::styled(
                    format!(" {}×{}", table.row_count(), table.column_count()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
        if let Some(status) = ctx.status {
            list_lines.push(Line::from(""));
            list_lines.push(Line::from(Span::styled(
                status.to_string(),
                Style::default().fg(Color::Green),
            )));
        }

        let list = Paragraph::new(list_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Loaded Sheets ")
                .border_style(Style::default().fg(Color::Green)),
        );
        frame.render_widget(list, chunks[0]);

        // Preview of the selected sheet
        if let Some(table) = tables.get(self.selected_sheet) {
            let mut lines = build_table_lines(&table.columns, table.head(PREVIEW_ROWS), 0);
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Total rows: {}", table.row_count()),
                Style::default().fg(Color::Yellow),
            )));

            let preview = Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Preview: {} ", table.name))
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(preview, chunks[1]);
        }
    }
}
