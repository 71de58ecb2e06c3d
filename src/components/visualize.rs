//! Visualize view - step 3
//!
//! Hands the final table to the explorer: a scrollable table over the full
//! row set, with CSV export and the session-wide start-over action. Whether
//! the table came from a merge or from the skip path is deliberately not
//! shown; the view only knows "the final table".

use super::layout::{draw_header, draw_help_bar, view_layout};
use super::table::build_table_lines;
use super::ViewContext;
use anyhow::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

const PAGE_SIZE: usize = 10;

/// Visualize view state
#[derive(Default)]
pub struct VisualizeComponent {
    /// First visible row
    pub scroll: usize,
    /// First visible column
    pub col_offset: usize,
    row_count: usize,
    col_count: usize,
}

impl VisualizeComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = (self.scroll + 1).min(self.row_count.saturating_sub(1));
    }

    pub fn page_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(PAGE_SIZE);
    }

    pub fn page_down(&mut self) {
        self.scroll = (self.scroll + PAGE_SIZE).min(self.row_count.saturating_sub(1));
    }

    pub fn scroll_left(&mut self) {
        self.col_offset = self.col_offset.saturating_sub(1);
    }

    pub fn scroll_right(&mut self) {
        self.col_offset = (self.col_offset + 1).min(self.col_count.saturating_sub(1));
    }

    pub fn draw_view(&mut self, frame: &mut Frame, area: Rect, ctx: &ViewContext) -> Result<()> {
        let layout = view_layout(area);
        draw_header(frame, layout.header, ctx.session.step);

        match &ctx.session.final_table {
            Some(table) => {
                self.row_count = table.row_count();
                self.col_count = table.column_count();

                let mut lines = Vec::new();
                if let Some(status) = ctx.status {
                    lines.push(Line::from(Span::styled(
                        status.to_string(),
                        Style::default().fg(Color::Green),
                    )));
                }
                if let Some(error) = ctx.error {
                    lines.push(Line::from(Span::styled(
                        format!("Error: {}", error),
                        Style::default().fg(Color::Red),
                    )));
                }

                let visible = layout.body.height.saturating_sub(4) as usize;
                let start = self.scroll.min(table.row_count());
                let end = (start + visible).min(table.row_count());
                lines.extend(build_table_lines(
                    &table.columns,
                    &table.rows[start..end],
                    self.col_offset,
                ));

                let title = format!(
                    " {} - {} rows × {} columns (rows {}-{}) ",
                    table.name,
                    table.row_count(),
                    table.column_count(),
                    start + 1,
                    end,
                );
                let paragraph = Paragraph::new(lines).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(title)
                        .border_style(Style::default().fg(Color::Cyan)),
                );
                frame.render_widget(paragraph, layout.body);

                if table.row_count() > visible {
                    let mut scrollbar_state =
                        ScrollbarState::new(table.row_count().saturating_sub(visible))
                            .position(self.scroll);
                    frame.render_stateful_widget(
                        Scrollbar::new(ScrollbarOrientation::VerticalRight)
                            .begin_symbol(Some("↑"))
                            .end_symbol(Some("↓")),
                        layout.body.inner(ratatui::layout::Margin {
                            vertical: 1,
                            horizontal: 0,
                        }),
                        &mut scrollbar_state,
                    );
                }
            }
            None => {
                // Unreachable through the guarded transitions, but render
                // something sensible rather than panic
                let warning = Paragraph::new(Line::from(Span::styled(
                    "No data found. Press 's' to start over.",
                    Style::default().fg(Color::Yellow),
                )))
                .block(Block::default().borders(Borders::ALL));
                frame.render_widget(warning, layout.body);
            }
        }

        draw_help_bar(
            frame,
            layout.help,
            &[
                ("j/k", "Scroll"),
                ("h/l", "Columns"),
                ("e", "Export CSV"),
                ("s", "Start Over"),
                ("q", "Quit"),
            ],
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_clamps_at_edges() {
        let mut view = VisualizeComponent::new();
        view.row_count = 3;

        view.scroll_up();
        assert_eq!(view.scroll, 0);

        view.scroll_down();
        view.scroll_down();
        view.scroll_down();
        assert_eq!(view.scroll, 2);

        view.page_down();
        assert_eq!(view.scroll, 2);
        view.page_up();
        assert_eq!(view.scroll, 0);
    }

    #[test]
    fn test_reset_clears_offsets() {
        let mut view = VisualizeComponent::new();
        view.scroll = 5;
        view.col_offset = 2;
        view.reset();
        assert_eq!(view.scroll, 0);
        assert_eq!(view.col_offset, 0);
    }
}
