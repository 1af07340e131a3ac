//! Full-screen dashboard layout: header, sidebar, view controls, chart and
//! key help.

use dashboard_core::models::{SelectionMode, ViewMode};
use dashboard_data::session::Session;
use dashboard_data::views::{build_view, ViewData};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::charts::{self, date_label, hour_label};
use crate::components::controls::{render_multiselect, render_selector};
use crate::components::header::Header;
use crate::components::sidebar::render_sidebar;
use crate::overview;
use crate::state::{DashboardState, Focus};
use crate::themes::Theme;

/// Width of the filter sidebar in columns.
pub const SIDEBAR_WIDTH: u16 = 38;

/// Rows the multi-app checkbox list may take above the chart.
const MULTI_APPS_HEIGHT: u16 = 8;

pub const KEY_HELP: &str =
    "Tab/↑↓ focus  ←→ change  Space toggle  a all/none  1/2/3 view  q quit";

/// Render the whole dashboard for the current state.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    session: &Session,
    state: &DashboardState,
    theme: &Theme,
) {
    let criteria = state.criteria();
    let view = session.filtered(&criteria);
    let data = build_view(&view, &state.controls());

    let [header_area, main_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let timezone = session.timezone();
    let header = Header::new(timezone.name(), view.len(), session.events().len(), theme);
    frame.render_widget(Paragraph::new(header.to_lines()), header_area);

    let [sidebar_area, body_area] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .areas(main_area);
    render_sidebar(frame, sidebar_area, state, theme);

    let [controls_area, chart_area] =
        Layout::vertical([Constraint::Length(controls_height(state)), Constraint::Min(0)])
            .areas(body_area);
    render_view_controls(frame, controls_area, state, theme);
    render_view_data(frame, chart_area, &data, &session.category_options(), theme);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(KEY_HELP, theme.dim))),
        footer_area,
    );
}

fn controls_height(state: &DashboardState) -> u16 {
    match (state.mode, state.selection) {
        (ViewMode::AppCentered, SelectionMode::Multi) => 3 + MULTI_APPS_HEIGHT,
        (ViewMode::AppCentered, SelectionMode::Single) | (ViewMode::TimeCentric, _) => 3,
        (ViewMode::Overview, _) => 0,
    }
}

fn render_view_controls(frame: &mut Frame, area: Rect, state: &DashboardState, theme: &Theme) {
    match state.mode {
        ViewMode::AppCentered => {
            let [mode_col, app_col] =
                Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                    .areas(area);
            let [mode_area, _] =
                Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(mode_col);
            let [app_row, _] =
                Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(app_col);
            render_selector(
                frame,
                mode_area,
                "Selection Mode",
                state.selection.title(),
                state.focus == Focus::Selection,
                theme,
            );
            match state.selection {
                SelectionMode::Single => render_selector(
                    frame,
                    app_row,
                    "Select App",
                    state.selected_app().unwrap_or("-"),
                    state.focus == Focus::SingleApp,
                    theme,
                ),
                SelectionMode::Multi => render_multiselect(
                    frame,
                    app_col,
                    "Select Apps",
                    &state.multi_apps,
                    state.focus == Focus::MultiApps,
                    theme,
                ),
            }
        }
        ViewMode::TimeCentric => render_selector(
            frame,
            area,
            "Select Time Period",
            state.period.title(),
            state.focus == Focus::Period,
            theme,
        ),
        ViewMode::Overview => {}
    }
}

/// Draw the chart (or placeholder) for `data`.
pub fn render_view_data(
    frame: &mut Frame,
    area: Rect,
    data: &ViewData,
    categories: &[String],
    theme: &Theme,
) {
    match data {
        ViewData::AppSeries {
            title,
            points,
            unit,
        } => charts::render_app_series(frame, area, title, points, *unit, theme),
        ViewData::HourlyBars { bars, unit } => {
            let labelled: Vec<(String, f64)> =
                bars.iter().map(|(h, v)| (hour_label(*h), *v)).collect();
            charts::render_bars(frame, area, &data.title(), &labelled, *unit, theme);
        }
        ViewData::DailyBars { bars, unit } => {
            let labelled: Vec<(String, f64)> =
                bars.iter().map(|(d, v)| (date_label(*d), *v)).collect();
            charts::render_bars(frame, area, &data.title(), &labelled, *unit, theme);
        }
        ViewData::Overview {
            shares,
            heatmap,
            total,
        } => overview::render_overview(frame, area, shares, heatmap, *total, categories, theme),
        ViewData::Empty { title, reason } => {
            charts::render_no_data(frame, area, title, reason, theme)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use dashboard_core::models::UsageEvent;
    use dashboard_data::categorizer::Categorizer;
    use dashboard_data::reader::UsageLog;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn session() -> Session {
        let mut log = UsageLog::empty(Tz::Asia__Tokyo);
        log.events = [(10, 120.0), (11, 300.0), (19, 60.0)]
            .iter()
            .map(|(hour, usage)| {
                let start_time = Tz::Asia__Tokyo
                    .with_ymd_and_hms(2024, 1, 6, *hour, 0, 0)
                    .unwrap();
                UsageEvent {
                    app: "Chrome".to_string(),
                    device_model: "Pixel".to_string(),
                    date: start_time.date_naive(),
                    start_time,
                    usage: *usage,
                    tz: "Asia/Tokyo".to_string(),
                    category: "Miscellaneous".to_string(),
                }
            })
            .collect();
        Session::from_parts(log, Categorizer::default())
    }

    fn render(session: &Session, state: &DashboardState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 36)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_dashboard(frame, frame.area(), session, state, &theme))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_render_app_view() {
        let s = session();
        let state = DashboardState::new(&s, ViewMode::AppCentered);
        let text = render(&s, &state);
        assert!(text.contains("HUMAN SURVEILLANCE"));
        assert!(text.contains("Asia/Tokyo"));
        assert!(text.contains("3 of 3 events"));
        assert!(text.contains("Usage Over Time for Chrome"));
    }

    #[test]
    fn test_render_every_mode_does_not_panic() {
        let s = session();
        for mode in ViewMode::ALL {
            let mut state = DashboardState::new(&s, mode);
            render(&s, &state);
            state.selection = SelectionMode::Multi;
            render(&s, &state);
            state.period = state.period.toggled();
            render(&s, &state);
        }
    }

    #[test]
    fn test_render_multi_select_keeps_mode_selector() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        let single = render(&s, &state);
        assert!(single.contains("Selection Mode"));
        assert!(single.contains("Single Select"));

        state.selection = SelectionMode::Multi;
        let multi = render(&s, &state);
        assert!(multi.contains("Selection Mode"));
        assert!(multi.contains("Multi Select"));
        assert!(multi.contains("Select Apps (1/1)"));
        assert!(multi.contains("[x] Chrome"));
    }

    #[test]
    fn test_render_time_view_title() {
        let s = session();
        let state = DashboardState::new(&s, ViewMode::TimeCentric);
        assert!(render(&s, &state).contains("App Usage by Hour"));
    }

    #[test]
    fn test_render_empty_selection_placeholder() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        state.focus = Focus::Devices;
        state.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE), &s);
        let text = render(&s, &state);
        assert!(text.contains("No data"));
        assert!(text.contains("0 of 3 events"));
    }

    #[test]
    fn test_render_empty_dataset() {
        let s = Session::from_parts(UsageLog::empty(Tz::UTC), Categorizer::default());
        let state = DashboardState::new(&s, ViewMode::Overview);
        let text = render(&s, &state);
        assert!(text.contains("No data available for filtering."));
        assert!(text.contains("No data"));
    }
}
