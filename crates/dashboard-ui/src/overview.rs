//! Category overview: a treemap of category totals above a date × category
//! heatmap.

use dashboard_core::formatting::{format_duration, format_number};
use dashboard_data::aggregator::{CategoryShare, HeatmapMatrix};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

/// Ratio constraints are expressed in parts of this denominator.
const RATIO_SCALE: f64 = 10_000.0;

/// Width of the date column in the heatmap.
const DATE_COLUMN_WIDTH: u16 = 10;

// ── Treemap layout ────────────────────────────────────────────────────────────

/// Split `area` into one rectangle per weight, with areas roughly
/// proportional to the weights.
///
/// The weights are divided into two runs of about equal total, the area is
/// cut along its longer side in that ratio and each half is split again.
/// The rectangles tile `area` without overlapping, in input order.
pub fn treemap_layout(area: Rect, weights: &[f64]) -> Vec<Rect> {
    let mut out = Vec::with_capacity(weights.len());
    split_area(area, weights, &mut out);
    out
}

fn split_area(area: Rect, weights: &[f64], out: &mut Vec<Rect>) {
    match weights.len() {
        0 => {}
        1 => out.push(area),
        len => {
            let clean: Vec<f64> = weights
                .iter()
                .map(|w| if w.is_finite() { w.max(0.0) } else { 0.0 })
                .collect();
            let total: f64 = clean.iter().sum();

            let (pivot, first, second) = if total > 0.0 {
                let mut acc = 0.0;
                let mut pivot = len - 1;
                for (i, w) in clean.iter().enumerate() {
                    acc += w;
                    if acc >= total / 2.0 {
                        pivot = i + 1;
                        break;
                    }
                }
                let pivot = pivot.clamp(1, len - 1);
                let head: f64 = clean[..pivot].iter().sum();
                (pivot, head, total - head)
            } else {
                let pivot = len / 2;
                (pivot, pivot as f64, (len - pivot) as f64)
            };

            let sum = first + second;
            let a = ((first / sum) * RATIO_SCALE).round().max(1.0) as u32;
            let b = ((second / sum) * RATIO_SCALE).round().max(1.0) as u32;
            let constraints = [Constraint::Ratio(a, a + b), Constraint::Ratio(b, a + b)];

            // Terminal cells are about twice as tall as they are wide.
            let [head_area, tail_area] = if area.width >= area.height.saturating_mul(2) {
                Layout::horizontal(constraints).areas(area)
            } else {
                Layout::vertical(constraints).areas(area)
            };

            split_area(head_area, &weights[..pivot], out);
            split_area(tail_area, &weights[pivot..], out);
        }
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render the treemap and the heatmap stacked vertically.
///
/// `categories` is the full category list in a fixed order; a tile's colour
/// follows the category's position there, not its rank by usage.
pub fn render_overview(
    frame: &mut Frame,
    area: Rect,
    shares: &[CategoryShare],
    heatmap: &HeatmapMatrix,
    total: f64,
    categories: &[String],
    theme: &Theme,
) {
    let [top, bottom] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    render_treemap(frame, top, shares, total, categories, theme);
    render_heatmap(frame, bottom, heatmap, theme);
}

/// Palette slot of `name`.  Names missing from `categories` take slots
/// after the known ones.
fn palette_index(name: &str, rank: usize, categories: &[String]) -> usize {
    categories
        .iter()
        .position(|c| c == name)
        .unwrap_or(categories.len() + rank)
}

fn render_treemap(
    frame: &mut Frame,
    area: Rect,
    shares: &[CategoryShare],
    total: f64,
    categories: &[String],
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.separator)
        .title(Span::styled(
            format!(" Category Overview [total {}] ", format_duration(total)),
            theme.header,
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let weights: Vec<f64> = shares.iter().map(|s| s.usage).collect();
    for (i, (share, rect)) in shares
        .iter()
        .zip(treemap_layout(inner, &weights))
        .enumerate()
    {
        if rect.width == 0 || rect.height == 0 {
            continue;
        }
        let color = theme.category_color(palette_index(&share.name, i, categories));
        let style = Style::default().bg(color).fg(Color::Black);
        let lines = vec![
            Line::from(share.name.clone()),
            Line::from(format!("{}%", format_number(share.percentage, 1))),
            Line::from(format_duration(share.usage)),
        ];
        frame.render_widget(Paragraph::new(lines).style(style), rect);
    }
}

/// Shorten `text` to at most `width` display columns.
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        let next = format!("{}{}", out, ch);
        if next.width() > width {
            break;
        }
        out = next;
    }
    out
}

fn render_heatmap(frame: &mut Frame, area: Rect, heatmap: &HeatmapMatrix, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.separator)
        .title(Span::styled(" Usage by Date and Category ", theme.header));

    let columns = heatmap.categories.len().max(1) as u16;
    let inner_width = block.inner(area).width.saturating_sub(DATE_COLUMN_WIDTH + 1);
    let cell_width = (inner_width / columns).saturating_sub(1).max(1) as usize;

    let header = Row::new(
        std::iter::once(Cell::from("Date")).chain(
            heatmap
                .categories
                .iter()
                .map(|c| Cell::from(fit(c, cell_width))),
        ),
    )
    .style(theme.table_header);

    let max = heatmap.max();
    let rows: Vec<Row> = heatmap
        .dates
        .iter()
        .zip(&heatmap.cells)
        .map(|(date, cells)| {
            let date_cell = Cell::from(date.format("%Y-%m-%d").to_string()).style(theme.label);
            let value_cells = cells.iter().map(|value| {
                let ratio = if max > 0.0 { value / max } else { 0.0 };
                Cell::from(fit(&format_duration(*value), cell_width))
                    .style(theme.heatmap_style(ratio))
            });
            Row::new(std::iter::once(date_cell).chain(value_cells))
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(DATE_COLUMN_WIDTH))
        .chain(std::iter::repeat(Constraint::Fill(1)).take(heatmap.categories.len()))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .style(theme.text);
    frame.render_widget(table, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
