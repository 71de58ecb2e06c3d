//! Table rendering helpers
//!
//! Renders tabular data with headers, rows, and column alignment, shared by
//! the sheet previews, the merge preview, and the Visualize explorer.

use crate::model::Value;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cap on a single column's display width
const MAX_COL_WIDTH: usize = 40;

/// Build table lines from column names and value rows
///
/// `col_offset` skips leading columns for horizontal scrolling.
pub fn build_table_lines(
    columns: &[String],
    rows: &[Vec<Value>],
    col_offset: usize,
) -> Vec<Line<'static>> {
    if columns.is_empty() {
        return vec![Line::from("Empty sheet")];
    }

    let col_offset = col_offset.min(columns.len().saturating_sub(1));
    let columns = &columns[col_offset..];

    let cell_texts: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .skip(col_offset)
                .map(|v| v.display_text())
                .collect()
        })
        .collect();

    // Column widths from header and data, capped to keep wide text in check
    let mut col_widths: Vec<usize> = columns.iter().map(|c| c.width()).collect();
    for row in &cell_texts {
        for (i, cell) in row.iter().enumerate() {
            if i < col_widths.len() {
                col_widths[i] = col_widths[i].max(cell.width());
            }
        }
    }
    for width in &mut col_widths {
        *width = (*width).min(MAX_COL_WIDTH).max(1);
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);

    let header_spans: Vec<Span> = columns
        .iter()
        .enumerate()
        .flat_map(|(i, c)| {
            vec![
                Span::styled(
                    pad_or_truncate(c, col_widths[i]),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" │ "),
            ]
        })
        .collect();
    lines.push(Line::from(header_spans));

    let separator: String = col_widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("─┼─");
    lines.push(Line::from(Span::styled(
        separator,
        Style::default().fg(Color::DarkGray),
    )));

    for row in &cell_texts {
        let row_spans: Vec<Span> = row
            .iter()
            .enumerate()
            .flat_map(|(i, cell)| {
                let width = col_widths.get(i).copied().unwrap_or(10);
                vec![
                    Span::styled(
                        pad_or_truncate(cell, width),
                        Style::default().fg(Color::White),
                    ),
                    Span::raw(" │ "),
                ]
            })
            .collect();
        lines.push(Line::from(row_spans));
    }

    lines
}

/// Pad `text` to `width` display columns, truncating with "..." when too wide
fn pad_or_truncate(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width <= width {
        let mut out = text.to_string();
        out.push_str(&" ".repeat(width - text_width));
        return out;
    }

    let budget = width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out.push_str("...");

    let out_width = out.width();
    if out_width < width {
        out.push_str(&" ".repeat(width - out_width));
    }
    out
}
