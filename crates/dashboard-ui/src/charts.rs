//! Line and bar charts for the App-Centered and Time-Centric views, plus the
//! "no data" placeholder.

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;
use dashboard_core::formatting::{format_number, UsageUnit};
use ratatui::{
    layout::Rect,
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::themes::Theme;

/// Usage value in `unit`, without decimals for seconds.
pub fn format_scaled(seconds: f64, unit: UsageUnit) -> String {
    let decimals = match unit {
        UsageUnit::Seconds => 0,
        _ => 1,
    };
    format_number(unit.scale(seconds), decimals)
}

fn chart_block<'a>(title: &str, unit: UsageUnit, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.separator)
        .title(Span::styled(
            format!(" {} [{}] ", title, unit.axis_label()),
            theme.header,
        ))
}

// ── Line chart ────────────────────────────────────────────────────────────────

/// Time axis bounds in epoch seconds.  A single instant gets a minute either
/// side so the axis is never degenerate.
pub fn time_bounds(points: &[(DateTime<Tz>, f64)]) -> [f64; 2] {
    let min = points.iter().map(|(ts, _)| ts.timestamp()).min().unwrap_or(0);
    let max = points.iter().map(|(ts, _)| ts.timestamp()).max().unwrap_or(0);
    if min == max {
        [(min - 60) as f64, (max + 60) as f64]
    } else {
        [min as f64, max as f64]
    }
}

fn time_label(tz: &Tz, secs: f64) -> String {
    tz.timestamp_opt(secs as i64, 0)
        .single()
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Render usage over time as a line chart.
pub fn render_app_series(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    points: &[(DateTime<Tz>, f64)],
    unit: UsageUnit,
    theme: &Theme,
) {
    let data: Vec<(f64, f64)> = points
        .iter()
        .map(|(ts, v)| (ts.timestamp() as f64, unit.scale(*v)))
        .collect();

    let tz = points.first().map(|(ts, _)| ts.timezone()).unwrap_or(Tz::UTC);
    let x_bounds = time_bounds(points);
    let x_mid = (x_bounds[0] + x_bounds[1]) / 2.0;

    let y_peak = data.iter().map(|(_, y)| *y).fold(0.0, f64::max);
    let y_max = if y_peak > 0.0 { y_peak * 1.1 } else { 1.0 };
    let decimals = if y_max < 10.0 { 1 } else { 0 };

    // A single point has no segment to draw.
    let graph_type = if data.len() == 1 {
        GraphType::Scatter
    } else {
        GraphType::Line
    };
    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(graph_type)
        .style(theme.chart_line)
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(chart_block(title, unit, theme))
        .x_axis(
            Axis::default()
                .title(Span::styled("Start Time", theme.label))
                .style(theme.chart_axis)
                .bounds(x_bounds)
                .labels(vec![
                    time_label(&tz, x_bounds[0]),
                    time_label(&tz, x_mid),
                    time_label(&tz, x_bounds[1]),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(unit.suffix(), theme.label))
                .style(theme.chart_axis)
                .bounds([0.0, y_max])
                .labels(vec![
                    format_number(0.0, decimals),
                    format_number(y_max / 2.0, decimals),
                    format_number(y_max, decimals),
                ]),
        );

    frame.render_widget(chart, area);
}

// ── Bar chart ─────────────────────────────────────────────────────────────────

/// Axis label of an hour-of-day bar.
pub fn hour_label(hour: u32) -> String {
    format!("{:02}", hour)
}

/// Axis label of a calendar-date bar.
pub fn date_label(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

/// Render labelled bars.  Bar heights are the raw seconds, the printed value
/// is scaled to `unit`.
pub fn render_bars(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    bars: &[(String, f64)],
    unit: UsageUnit,
    theme: &Theme,
) {
    let block = chart_block(title, unit, theme);
    let inner_width = block.inner(area).width as usize;

    let count = bars.len().max(1);
    let bar_width = (inner_width / count).saturating_sub(1).clamp(1, 8) as u16;

    let bars: Vec<Bar> = bars
        .iter()
        .map(|(label, seconds)| {
            Bar::default()
                .value(seconds.max(0.0).round() as u64)
                .label(Line::from(label.clone()))
                .text_value(format_scaled(*seconds, unit))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .block(block)
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(theme.chart_bar)
        .value_style(theme.bold)
        .label_style(theme.label);

    frame.render_widget(chart, area);
}

// ── Placeholder ───────────────────────────────────────────────────────────────

/// Render a "no data" placeholder in place of a chart.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, reason: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No data", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(reason.to_string(), theme.dim)),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.separator)
                .title(format!(" {} ", title)),
        ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
