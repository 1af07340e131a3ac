use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::components::controls::{render_multiselect, render_selector};
use crate::state::{DashboardState, Focus};
use crate::themes::Theme;

/// Shown in place of the date slider when no events were loaded.
pub const NO_DATA_NOTICE: &str = "No data available for filtering.";

/// Render the filter sidebar: view selector, date range, devices and
/// categories.
pub fn render_sidebar(frame: &mut Frame, area: Rect, state: &DashboardState, theme: &Theme) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.separator)
        .title(Span::styled(" Filters ", theme.header));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let [view_area, date_area, devices_area, categories_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    render_selector(
        frame,
        view_area,
        "Select View",
        state.mode.title(),
        state.focus == Focus::ViewMode,
        theme,
    );
    render_date_range(frame, date_area, state, theme);
    render_multiselect(
        frame,
        devices_area,
        "Select Devices",
        &state.devices,
        state.focus == Focus::Devices,
        theme,
    );
    render_multiselect(
        frame,
        categories_area,
        "Select Categories",
        &state.categories,
        state.focus == Focus::Categories,
        theme,
    );
}

fn render_date_range(frame: &mut Frame, area: Rect, state: &DashboardState, theme: &Theme) {
    let focused = matches!(state.focus, Focus::DateStart | Focus::DateEnd);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(Span::styled(" Select Date Range ", theme.label));

    let lines = match state.date_range {
        Some((start, end)) => {
            let value_style = |f: Focus| {
                if state.focus == f {
                    theme.cursor
                } else {
                    theme.value
                }
            };
            vec![
                Line::from(vec![
                    Span::styled("From ", theme.label),
                    Span::styled(
                        start.format("%Y-%m-%d").to_string(),
                        value_style(Focus::DateStart),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("To   ", theme.label),
                    Span::styled(
                        end.format("%Y-%m-%d").to_string(),
                        value_style(Focus::DateEnd),
                    ),
                ]),
            ]
        }
        None => vec![Line::from(Span::styled(NO_DATA_NOTICE, theme.error))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;
    use dashboard_core::models::{UsageEvent, ViewMode};
    use dashboard_data::categorizer::Categorizer;
    use dashboard_data::reader::UsageLog;
    use dashboard_data::session::Session;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn render_buffer(state: &DashboardState) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(40, 24)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_sidebar(frame, frame.area(), state, &theme))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn render(state: &DashboardState) -> String {
        render_buffer(state)
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_sidebar_shows_date_range() {
        let start_time = Tz::UTC.with_ymd_and_hms(2024, 1, 6, 10, 0, 0).unwrap();
        let mut log = UsageLog::empty(Tz::UTC);
        log.events = vec![UsageEvent {
            app: "Chrome".to_string(),
            device_model: "Pixel".to_string(),
            date: start_time.date_naive(),
            start_time,
            usage: 120.0,
            tz: "UTC".to_string(),
            category: "Miscellaneous".to_string(),
        }];
        let session = Session::from_parts(log, Categorizer::default());
        let state = DashboardState::new(&session, ViewMode::AppCentered);

        let text = render(&state);
        assert!(text.contains("2024-01-06"));
        assert!(text.contains("App-Centered View"));
        assert!(text.contains("[x] Pixel"));
    }

    #[test]
    fn test_sidebar_empty_dataset_notice() {
        let session = Session::from_parts(UsageLog::empty(Tz::UTC), Categorizer::default());
        let state = DashboardState::new(&session, ViewMode::Overview);
        let text = render(&state);
        assert!(text.contains(NO_DATA_NOTICE));
    }

    #[test]
    fn test_sidebar_empty_dataset_notice_uses_error_style() {
        let session = Session::from_parts(UsageLog::empty(Tz::UTC), Categorizer::default());
        let state = DashboardState::new(&session, ViewMode::Overview);
        let buffer = render_buffer(&state);

        let symbols: Vec<&str> = buffer.content().iter().map(|c| c.symbol()).collect();
        let notice: Vec<String> = NO_DATA_NOTICE.chars().map(|c| c.to_string()).collect();
        let start = (0..symbols.len())
            .find(|&i| {
                symbols[i..]
                    .iter()
                    .copied()
                    .take(notice.len())
                    .eq(notice.iter().map(String::as_str))
            })
            .expect("notice rendered");
        assert_eq!(buffer.content()[start].fg, Theme::dark().error.fg.unwrap());
    }
}
