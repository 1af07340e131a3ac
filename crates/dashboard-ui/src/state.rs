//! Control values of the dashboard and their keyboard handling.
//!
//! [`DashboardState`] is independent of the terminal so key handling can be
//! tested without a backend.  Every change that can alter an option list
//! (date range, device or category selection) is followed by a
//! [`DashboardState::refresh`] against the session.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dashboard_core::models::{SelectionMode, TimePeriod, ViewMode};
use dashboard_data::filter::{app_options, FilterCriteria};
use dashboard_data::session::Session;
use dashboard_data::views::ViewControls;

// ── MultiSelect ───────────────────────────────────────────────────────────────

/// A list of options with a checked subset and a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSelect {
    options: Vec<String>,
    selected: BTreeSet<String>,
    cursor: usize,
}

impl MultiSelect {
    /// Every option checked.
    pub fn all(options: Vec<String>) -> Self {
        let selected = options.iter().cloned().collect();
        Self {
            options,
            selected,
            cursor: 0,
        }
    }

    /// Only the given options checked; names not in `options` are ignored.
    pub fn with_selected(options: Vec<String>, selected: impl IntoIterator<Item = String>) -> Self {
        let selected = selected
            .into_iter()
            .filter(|s| options.contains(s))
            .collect();
        Self {
            options,
            selected,
            cursor: 0,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self, option: &str) -> bool {
        self.selected.contains(option)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.options.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.options.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    /// Check or uncheck the option under the cursor.
    pub fn toggle_current(&mut self) {
        let Some(option) = self.options.get(self.cursor) else {
            return;
        };
        if !self.selected.remove(option) {
            self.selected.insert(option.clone());
        }
    }

    /// Clear the selection when everything is checked, else check everything.
    pub fn toggle_all(&mut self) {
        if self.selected.len() == self.options.len() {
            self.selected.clear();
        } else {
            self.selected = self.options.iter().cloned().collect();
        }
    }

    /// Replace the option list.
    ///
    /// Checked options that disappear are dropped.  Options that were not in
    /// the previous list are checked when `check_new` is set.
    pub fn set_options(&mut self, options: Vec<String>, check_new: bool) {
        if options == self.options {
            return;
        }
        let mut selected: BTreeSet<String> = self
            .selected
            .iter()
            .filter(|s| options.contains(s))
            .cloned()
            .collect();
        if check_new {
            for option in &options {
                if !self.options.contains(option) {
                    selected.insert(option.clone());
                }
            }
        }
        self.selected = selected;
        self.options = options;
        self.cursor = self.cursor.min(self.options.len().saturating_sub(1));
    }
}

// ── Focus ─────────────────────────────────────────────────────────────────────

/// The control that receives Left / Right / Space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    ViewMode,
    DateStart,
    DateEnd,
    Devices,
    Categories,
    Selection,
    SingleApp,
    MultiApps,
    Period,
}

// ── DashboardState ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub focus: Focus,
    pub mode: ViewMode,
    /// Full date span of the dataset, `None` when it is empty.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    /// Current slider value.  Start never passes end.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub devices: MultiSelect,
    pub categories: MultiSelect,
    pub selection: SelectionMode,
    /// Apps present in the filtered view.
    pub apps: Vec<String>,
    /// Index into `apps` for single-select mode.
    pub single_app: usize,
    pub multi_apps: MultiSelect,
    pub period: TimePeriod,
    pub should_quit: bool,
}

impl DashboardState {
    /// Initial state: full date range, all devices, all categories and the
    /// first app selected.
    pub fn new(session: &Session, mode: ViewMode) -> Self {
        let date_bounds = session.date_bounds();
        let mut state = Self {
            focus: Focus::ViewMode,
            mode,
            date_bounds,
            date_range: date_bounds,
            devices: MultiSelect::all(session.device_options(date_bounds)),
            categories: MultiSelect::all(session.category_options()),
            selection: SelectionMode::default(),
            apps: Vec::new(),
            single_app: 0,
            multi_apps: MultiSelect::default(),
            period: TimePeriod::default(),
            should_quit: false,
        };
        state.refresh(session);
        let first = state.apps.first().cloned();
        state.multi_apps = MultiSelect::with_selected(state.apps.clone(), first);
        state
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            date_range: self.date_range,
            devices: self.devices.selected().clone(),
            categories: self.categories.selected().clone(),
        }
    }

    pub fn controls(&self) -> ViewControls {
        ViewControls {
            mode: self.mode,
            selection: self.selection,
            single_app: self.selected_app().map(str::to_string),
            multi_apps: self.multi_apps.selected().clone(),
            period: self.period,
        }
    }

    pub fn selected_app(&self) -> Option<&str> {
        self.apps.get(self.single_app).map(String::as_str)
    }

    /// Recompute the option lists that depend on other filters.
    pub fn refresh(&mut self, session: &Session) {
        self.devices
            .set_options(session.device_options(self.date_range), true);

        let apps = {
            let criteria = self.criteria();
            let view = session.filtered(&criteria);
            app_options(&view)
        };
        let current = self.selected_app().map(str::to_string);
        self.single_app = current
            .and_then(|name| apps.iter().position(|a| *a == name))
            .unwrap_or(0);
        self.multi_apps.set_options(apps.clone(), false);
        self.apps = apps;
    }

    /// Controls reachable with Tab, in screen order.
    pub fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::ViewMode];
        if self.date_bounds.is_some() {
            order.push(Focus::DateStart);
            order.push(Focus::DateEnd);
        }
        order.push(Focus::Devices);
        order.push(Focus::Categories);
        match self.mode {
            ViewMode::AppCentered => {
                order.push(Focus::Selection);
                order.push(match self.selection {
                    SelectionMode::Single => Focus::SingleApp,
                    SelectionMode::Multi => Focus::MultiApps,
                });
            }
            ViewMode::TimeCentric => order.push(Focus::Period),
            ViewMode::Overview => {}
        }
        order
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent, session: &Session) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.cycle_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.cycle_focus(-1),
            KeyCode::Left => self.adjust(-1, session),
            KeyCode::Right => self.adjust(1, session),
            KeyCode::Char(' ') => self.toggle(session),
            KeyCode::Char('a') | KeyCode::Char('A') => self.toggle_all(session),
            KeyCode::Char('1') => self.set_mode(ViewMode::AppCentered),
            KeyCode::Char('2') => self.set_mode(ViewMode::TimeCentric),
            KeyCode::Char('3') => self.set_mode(ViewMode::Overview),
            _ => {}
        }
    }

    fn cycle_focus(&mut self, step: isize) {
        let order = self.focus_order();
        let len = order.len() as isize;
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        self.focus = order[(pos + step).rem_euclid(len) as usize];
    }

    fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.ensure_focus_visible();
    }

    fn ensure_focus_visible(&mut self) {
        if !self.focus_order().contains(&self.focus) {
            self.focus = Focus::ViewMode;
        }
    }

    fn adjust(&mut self, step: isize, session: &Session) {
        match self.focus {
            Focus::ViewMode => {
                let all = ViewMode::ALL;
                let pos = all.iter().position(|m| *m == self.mode).unwrap_or(0) as isize;
                let next = all[(pos + step).rem_euclid(all.len() as isize) as usize];
                self.set_mode(next);
            }
            Focus::DateStart => {
                self.shift_date(true, step);
                self.refresh(session);
            }
            Focus::DateEnd => {
                self.shift_date(false, step);
                self.refresh(session);
            }
            Focus::Devices => self.devices.move_cursor(step),
            Focus::Categories => self.categories.move_cursor(step),
            Focus::Selection => self.selection = self.selection.toggled(),
            Focus::SingleApp => {
                if !self.apps.is_empty() {
                    let last = self.apps.len() as isize - 1;
                    self.single_app = (self.single_app as isize + step).clamp(0, last) as usize;
                }
            }
            Focus::MultiApps => self.multi_apps.move_cursor(step),
            Focus::Period => self.period = self.period.toggled(),
        }
    }

    /// Move one end of the date range by a day, keeping
    /// `min <= start <= end <= max`.
    fn shift_date(&mut self, start_side: bool, step: isize) {
        let (Some((min, max)), Some((start, end))) = (self.date_bounds, self.date_range) else {
            return;
        };
        let moved = |date: NaiveDate| {
            let next = if step < 0 {
                date.checked_sub_days(Days::new(1))
            } else {
                date.checked_add_days(Days::new(1))
            };
            next.unwrap_or(date)
        };
        self.date_range = Some(if start_side {
            (moved(start).clamp(min, end), end)
        } else {
            (start, moved(end).clamp(start, max))
        });
    }

    fn toggle(&mut self, session: &Session) {
        match self.focus {
            Focus::Devices => {
                self.devices.toggle_current();
                self.refresh(session);
            }
            Focus::Categories => {
                self.categories.toggle_current();
                self.refresh(session);
            }
            Focus::MultiApps => self.multi_apps.toggle_current(),
            Focus::Selection => self.selection = self.selection.toggled(),
            Focus::Period => self.period = self.period.toggled(),
            _ => {}
        }
    }

    fn toggle_all(&mut self, session: &Session) {
        match self.focus {
            Focus::Devices => {
                self.devices.toggle_all();
                self.refresh(session);
            }
            Focus::Categories => {
                self.categories.toggle_all();
                self.refresh(session);
            }
            Focus::MultiApps => self.multi_apps.toggle_all(),
            _ => {}
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;
    use dashboard_core::models::{CategoryDefinition, CategoryMap, UsageEvent};
    use dashboard_data::categorizer::Categorizer;
    use dashboard_data::reader::UsageLog;

    fn event(app: &str, device: &str, category: &str, day: u32, usage: f64) -> UsageEvent {
        let start_time = Tz::UTC.with_ymd_and_hms(2024, 1, day, 10, 0, 0).unwrap();
        UsageEvent {
            app: app.to_string(),
            device_model: device.to_string(),
            date: start_time.date_naive(),
            start_time,
            usage,
            tz: "UTC".to_string(),
            category: category.to_string(),
        }
    }

    fn session() -> Session {
        let categorizer = Categorizer::new(CategoryMap::new(vec![
            CategoryDefinition {
                key: "browsers".to_string(),
                name: "Browsers".to_string(),
                apps: vec!["Chrome".to_string()],
            },
            CategoryDefinition {
                key: "social".to_string(),
                name: "Social".to_string(),
                apps: vec!["Instagram".to_string()],
            },
        ]));
        let mut log = UsageLog::empty(Tz::UTC);
        log.events = vec![
            event("Chrome", "Pixel", "Browsers", 5, 100.0),
            event("Instagram", "iPad", "Social", 6, 200.0),
            event("Chrome", "iPad", "Browsers", 7, 300.0),
        ];
        Session::from_parts(log, categorizer)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn press(state: &mut DashboardState, session: &Session, codes: &[KeyCode]) {
        for code in codes {
            state.handle_key(key(*code), session);
        }
    }

    // ── MultiSelect ───────────────────────────────────────────────────────────

    #[test]
    fn test_multiselect_toggle_and_cursor() {
        let mut ms = MultiSelect::all(vec!["a".into(), "b".into(), "c".into()]);
        ms.move_cursor(1);
        ms.toggle_current();
        assert!(!ms.is_selected("b"));
        ms.toggle_current();
        assert!(ms.is_selected("b"));
        ms.move_cursor(10);
        assert_eq!(ms.cursor(), 2);
        ms.move_cursor(-10);
        assert_eq!(ms.cursor(), 0);
    }

    #[test]
    fn test_multiselect_toggle_all() {
        let mut ms = MultiSelect::all(vec!["a".into(), "b".into()]);
        ms.toggle_all();
        assert!(ms.selected().is_empty());
        ms.toggle_all();
        assert_eq!(ms.selected().len(), 2);
    }

    #[test]
    fn test_multiselect_set_options() {
        let mut ms = MultiSelect::with_selected(vec!["a".into(), "b".into()], vec!["a".to_string()]);
        ms.set_options(vec!["a".into(), "c".into()], true);
        assert!(ms.is_selected("a"));
        assert!(ms.is_selected("c"));
        ms.set_options(vec!["c".into(), "d".into()], false);
        assert!(ms.is_selected("c"));
        assert!(!ms.is_selected("d"));
        assert!(!ms.is_selected("a"));
    }

    #[test]
    fn test_multiselect_empty_is_inert() {
        let mut ms = MultiSelect::default();
        ms.move_cursor(1);
        ms.toggle_current();
        assert_eq!(ms.cursor(), 0);
        assert!(ms.selected().is_empty());
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_defaults() {
        let s = session();
        let state = DashboardState::new(&s, ViewMode::AppCentered);
        assert_eq!(state.date_range, Some((d(5), d(7))));
        assert_eq!(state.devices.selected().len(), 2);
        assert_eq!(
            state.categories.options(),
            &["Browsers", "Social", "Miscellaneous"]
        );
        assert_eq!(state.categories.selected().len(), 3);
        assert_eq!(state.selected_app(), Some("Chrome"));
        let multi: Vec<&String> = state.multi_apps.selected().iter().collect();
        assert_eq!(multi, vec!["Chrome"]);
    }

    #[test]
    fn test_default_criteria_keep_all_rows() {
        let s = session();
        let state = DashboardState::new(&s, ViewMode::Overview);
        assert_eq!(s.filtered(&state.criteria()).len(), 3);
    }

    // ── Focus ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_focus_cycles_and_wraps() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        let order = state.focus_order();
        assert_eq!(order.last(), Some(&Focus::SingleApp));
        for _ in 0..order.len() {
            state.handle_key(key(KeyCode::Tab), &s);
        }
        assert_eq!(state.focus, Focus::ViewMode);
        state.handle_key(key(KeyCode::BackTab), &s);
        assert_eq!(state.focus, Focus::SingleApp);
        state.handle_key(key(KeyCode::Down), &s);
        assert_eq!(state.focus, Focus::ViewMode);
    }

    #[test]
    fn test_focus_order_follows_mode() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::TimeCentric);
        assert_eq!(state.focus_order().last(), Some(&Focus::Period));
        state.focus = Focus::Period;
        state.handle_key(key(KeyCode::Char('3')), &s);
        assert_eq!(state.mode, ViewMode::Overview);
        assert_eq!(state.focus, Focus::ViewMode);
    }

    #[test]
    fn test_empty_dataset_has_no_date_controls() {
        let s = Session::from_parts(UsageLog::empty(Tz::UTC), Categorizer::default());
        let state = DashboardState::new(&s, ViewMode::AppCentered);
        assert!(!state.focus_order().contains(&Focus::DateStart));
        assert_eq!(state.criteria().date_range, None);
        assert_eq!(state.selected_app(), None);
    }

    // ── View controls ─────────────────────────────────────────────────────────

    #[test]
    fn test_view_mode_cycles_with_arrows() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        state.handle_key(key(KeyCode::Right), &s);
        assert_eq!(state.mode, ViewMode::TimeCentric);
        state.handle_key(key(KeyCode::Left), &s);
        state.handle_key(key(KeyCode::Left), &s);
        assert_eq!(state.mode, ViewMode::Overview);
    }

    #[test]
    fn test_selection_toggle_swaps_app_control() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        state.focus = Focus::Selection;
        state.handle_key(key(KeyCode::Char(' ')), &s);
        assert_eq!(state.selection, SelectionMode::Multi);
        assert_eq!(state.focus_order().last(), Some(&Focus::MultiApps));
    }

    #[test]
    fn test_single_app_moves_and_clamps() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        state.focus = Focus::SingleApp;
        press(&mut state, &s, &[KeyCode::Right, KeyCode::Right]);
        assert_eq!(state.selected_app(), Some("Instagram"));
        assert_eq!(state.controls().single_app.as_deref(), Some("Instagram"));
    }

    #[test]
    fn test_period_toggle() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::TimeCentric);
        state.focus = Focus::Period;
        state.handle_key(key(KeyCode::Right), &s);
        assert_eq!(state.controls().period, TimePeriod::SevenDays);
    }

    // ── Date range ────────────────────────────────────────────────────────────

    #[test]
    fn test_date_start_never_passes_end() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        state.focus = Focus::DateStart;
        press(&mut state, &s, &[KeyCode::Right; 5]);
        assert_eq!(state.date_range, Some((d(7), d(7))));
        state.focus = Focus::DateEnd;
        state.handle_key(key(KeyCode::Left), &s);
        assert_eq!(state.date_range, Some((d(7), d(7))));
    }

    #[test]
    fn test_date_range_stays_inside_bounds() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        state.focus = Focus::DateStart;
        state.handle_key(key(KeyCode::Left), &s);
        state.focus = Focus::DateEnd;
        state.handle_key(key(KeyCode::Right), &s);
        assert_eq!(state.date_range, Some((d(5), d(7))));
    }

    #[test]
    fn test_date_change_refreshes_options() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        state.focus = Focus::DateStart;
        state.handle_key(key(KeyCode::Right), &s);
        // Only the iPad remains from the 6th on.
        assert_eq!(state.devices.options(), &["iPad"]);
        assert_eq!(s.filtered(&state.criteria()).len(), 2);
    }

    // ── Filters ───────────────────────────────────────────────────────────────

    #[test]
    fn test_clearing_devices_empties_view() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        state.focus = Focus::Devices;
        state.handle_key(key(KeyCode::Char('a')), &s);
        assert!(state.devices.selected().is_empty());
        assert!(s.filtered(&state.criteria()).is_empty());
        assert!(state.apps.is_empty());
        assert_eq!(state.controls().single_app, None);
    }

    #[test]
    fn test_category_toggle_updates_apps() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        state.focus = Focus::Categories;
        // Uncheck "Browsers" (first option).
        state.handle_key(key(KeyCode::Char(' ')), &s);
        assert_eq!(state.apps, vec!["Instagram"]);
        assert_eq!(state.selected_app(), Some("Instagram"));
        // The multi-select loses Chrome and ends up empty.
        assert!(state.multi_apps.selected().is_empty());
    }

    #[test]
    fn test_multi_apps_toggle() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        state.selection = SelectionMode::Multi;
        state.focus = Focus::MultiApps;
        press(&mut state, &s, &[KeyCode::Right, KeyCode::Char(' ')]);
        assert_eq!(state.controls().multi_apps.len(), 2);
    }

    // ── Quit ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_quit_keys() {
        let s = session();
        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        state.handle_key(key(KeyCode::Char('q')), &s);
        assert!(state.should_quit);

        let mut state = DashboardState::new(&s, ViewMode::AppCentered);
        state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &s);
        assert!(state.should_quit);
    }
}
