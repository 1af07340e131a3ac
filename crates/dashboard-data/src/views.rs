//! View selection: turn the filtered view plus the view controls into the
//! data one chart needs.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use dashboard_core::formatting::UsageUnit;
pub use dashboard_core::models::{SelectionMode, TimePeriod, ViewMode};

use crate::aggregator::{CategoryShare, HeatmapMatrix, UsageAggregator};
use crate::filter::FilteredView;

/// Reason shown when the filters leave nothing to plot.
pub const NO_MATCHING_DATA: &str = "No usage matches the current filters.";
/// Reason shown when the multi-select app list is empty.
pub const NO_APPS_SELECTED: &str = "Select at least one app.";

/// Current values of the view-level controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewControls {
    pub mode: ViewMode,
    pub selection: SelectionMode,
    /// App shown in [`SelectionMode::Single`].
    pub single_app: Option<String>,
    /// Apps summed in [`SelectionMode::Multi`].
    pub multi_apps: BTreeSet<String>,
    pub period: TimePeriod,
}

/// Chart-ready data.  Values are in seconds; `unit` only says how to label them.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData {
    /// Line chart over time for one app or the sum of several.
    AppSeries {
        title: String,
        points: Vec<(DateTime<Tz>, f64)>,
        unit: UsageUnit,
    },
    /// Bars per hour of day.
    HourlyBars {
        bars: Vec<(u32, f64)>,
        unit: UsageUnit,
    },
    /// Bars per calendar date.
    DailyBars {
        bars: Vec<(NaiveDate, f64)>,
        unit: UsageUnit,
    },
    /// Category treemap plus date × category heatmap.
    Overview {
        shares: Vec<CategoryShare>,
        heatmap: HeatmapMatrix,
        total: f64,
    },
    /// Nothing to plot.
    Empty { title: String, reason: String },
}

impl ViewData {
    pub fn title(&self) -> String {
        match self {
            ViewData::AppSeries { title, .. } | ViewData::Empty { title, .. } => title.clone(),
            ViewData::HourlyBars { .. } => "App Usage by Hour".to_string(),
            ViewData::DailyBars { .. } => "App Usage Over 7 Days".to_string(),
            ViewData::Overview { .. } => "Category Overview".to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ViewData::Empty { .. })
    }
}

/// Build the data for the active view.
pub fn build_view(view: &FilteredView<'_>, controls: &ViewControls) -> ViewData {
    match controls.mode {
        ViewMode::AppCentered => build_app_view(view, controls),
        ViewMode::TimeCentric => build_time_view(view, controls.period),
        ViewMode::Overview => build_overview(view),
    }
}

fn build_app_view(view: &FilteredView<'_>, controls: &ViewControls) -> ViewData {
    match controls.selection {
        SelectionMode::Single => {
            let Some(app) = controls.single_app.as_deref() else {
                return empty("Usage Over Time", NO_MATCHING_DATA);
            };
            let title = format!("Usage Over Time for {}", app);
            let points = UsageAggregator::app_time_series(view, app);
            if points.is_empty() {
                return empty(&title, NO_MATCHING_DATA);
            }
            let unit = UsageUnit::for_values(points.iter().map(|(_, v)| *v));
            ViewData::AppSeries {
                title,
                points,
                unit,
            }
        }
        SelectionMode::Multi => {
            let title = "Aggregate Usage Over Time for Selected Apps";
            if controls.multi_apps.is_empty() {
                return empty(title, NO_APPS_SELECTED);
            }
            let series = UsageAggregator::sum_by_timestamp(view, &controls.multi_apps);
            if series.is_empty() {
                return empty(title, NO_MATCHING_DATA);
            }
            let unit = UsageUnit::for_values(series.values().copied());
            ViewData::AppSeries {
                title: title.to_string(),
                points: series.into_iter().collect(),
                unit,
            }
        }
    }
}

fn build_time_view(view: &FilteredView<'_>, period: TimePeriod) -> ViewData {
    match period {
        TimePeriod::OneDay => {
            let series = UsageAggregator::sum_by_hour(view);
            if series.is_empty() {
                return empty("App Usage by Hour", NO_MATCHING_DATA);
            }
            let unit = UsageUnit::for_values(series.values().copied());
            ViewData::HourlyBars {
                bars: series.into_iter().collect(),
                unit,
            }
        }
        TimePeriod::SevenDays => {
            let series = UsageAggregator::sum_by_date(view);
            if series.is_empty() {
                return empty("App Usage Over 7 Days", NO_MATCHING_DATA);
            }
            let unit = UsageUnit::for_values(series.values().copied());
            ViewData::DailyBars {
                bars: series.into_iter().collect(),
                unit,
            }
        }
    }
}

fn build_overview(view: &FilteredView<'_>) -> ViewData {
    if view.is_empty() {
        return empty("Category Overview", NO_MATCHING_DATA);
    }
    ViewData::Overview {
        shares: UsageAggregator::category_totals(view),
        heatmap: UsageAggregator::date_category_matrix(view),
        total: UsageAggregator::total_usage(view),
    }
}

fn empty(title: &str, reason: &str) -> ViewData {
    ViewData::Empty {
        title: title.to_string(),
        reason: reason.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use dashboard_core::models::UsageEvent;

    fn event(app: &str, category: &str, day: u32, hour: u32, usage: f64) -> UsageEvent {
        let start_time = Tz::UTC.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap();
        UsageEvent {
            app: app.to_string(),
            device_model: "Pixel".to_string(),
            date: start_time.date_naive(),
            start_time,
            usage,
            tz: "UTC".to_string(),
            category: category.to_string(),
        }
    }

    fn sample() -> Vec<UsageEvent> {
        vec![
            event("Chrome", "Browsers", 6, 10, 120.0),
            event("Instagram", "Social", 6, 10, 900.0),
            event("Chrome", "Browsers", 7, 18, 60.0),
        ]
    }

    fn single(app: &str) -> ViewControls {
        ViewControls {
            single_app: Some(app.to_string()),
            ..Default::default()
        }
    }

    fn view_of(events: &[UsageEvent]) -> FilteredView<'_> {
        FilteredView::new(events.iter().collect())
    }

    // ── App-Centered ──────────────────────────────────────────────────────────

    #[test]
    fn test_single_app_series_stays_in_seconds() {
        let events = vec![event("Chrome", "Browsers", 6, 10, 120.0)];
        match build_view(&view_of(&events), &single("Chrome")) {
            ViewData::AppSeries {
                title,
                points,
                unit,
            } => {
                assert_eq!(title, "Usage Over Time for Chrome");
                assert_eq!(points.len(), 1);
                assert_eq!(points[0].0.hour(), 10);
                assert_eq!(points[0].1, 120.0);
                assert_eq!(unit, UsageUnit::Seconds);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_single_app_without_rows_is_empty() {
        let events = sample();
        let data = build_view(&view_of(&events), &single("Word"));
        assert!(data.is_empty());
        assert_eq!(data.title(), "Usage Over Time for Word");
    }

    #[test]
    fn test_single_without_app_is_empty() {
        let events = sample();
        assert!(build_view(&view_of(&events), &ViewControls::default()).is_empty());
    }

    #[test]
    fn test_multi_select_sums_and_scales() {
        let events = sample();
        let controls = ViewControls {
            selection: SelectionMode::Multi,
            multi_apps: ["Chrome", "Instagram"].iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        match build_view(&view_of(&events), &controls) {
            ViewData::AppSeries { points, unit, .. } => {
                assert_eq!(points.len(), 2);
                assert_eq!(points[0].1, 1_020.0);
                assert_eq!(unit, UsageUnit::Minutes);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_empty_multi_select_is_empty_view() {
        let events = sample();
        let controls = ViewControls {
            selection: SelectionMode::Multi,
            ..Default::default()
        };
        match build_view(&view_of(&events), &controls) {
            ViewData::Empty { reason, .. } => assert_eq!(reason, NO_APPS_SELECTED),
            other => panic!("unexpected view: {:?}", other),
        }
    }

    // ── Time-Centric ──────────────────────────────────────────────────────────

    #[test]
    fn test_one_day_groups_by_hour() {
        let events = sample();
        let controls = ViewControls {
            mode: ViewMode::TimeCentric,
            ..Default::default()
        };
        match build_view(&view_of(&events), &controls) {
            ViewData::HourlyBars { bars, unit } => {
                assert_eq!(bars, vec![(10, 1_020.0), (18, 60.0)]);
                assert_eq!(unit, UsageUnit::Minutes);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_seven_days_groups_by_date() {
        let events = sample();
        let controls = ViewControls {
            mode: ViewMode::TimeCentric,
            period: TimePeriod::SevenDays,
            ..Default::default()
        };
        let data = build_view(&view_of(&events), &controls);
        assert_eq!(data.title(), "App Usage Over 7 Days");
        match data {
            ViewData::DailyBars { bars, .. } => {
                let days: Vec<u32> = bars.iter().map(|(d, _)| chrono::Datelike::day(d)).collect();
                assert_eq!(days, vec![6, 7]);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_time_view_empty_input() {
        let events: Vec<UsageEvent> = Vec::new();
        let controls = ViewControls {
            mode: ViewMode::TimeCentric,
            ..Default::default()
        };
        assert!(build_view(&view_of(&events), &controls).is_empty());
    }

    // ── Overview ──────────────────────────────────────────────────────────────

    #[test]
    fn test_overview_totals_conserved() {
        let events = sample();
        let controls = ViewControls {
            mode: ViewMode::Overview,
            ..Default::default()
        };
        match build_view(&view_of(&events), &controls) {
            ViewData::Overview {
                shares,
                heatmap,
                total,
            } => {
                assert_eq!(total, 1_080.0);
                assert_eq!(shares[0].name, "Social");
                let sum: f64 = shares.iter().map(|s| s.usage).sum();
                assert!((sum - total).abs() < 1e-9);
                assert_eq!(heatmap.dates.len(), 2);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_overview_empty_input() {
        let events: Vec<UsageEvent> = Vec::new();
        let controls = ViewControls {
            mode: ViewMode::Overview,
            ..Default::default()
        };
        let data = build_view(&view_of(&events), &controls);
        assert!(data.is_empty());
        assert_eq!(data.title(), "Category Overview");
    }
}
