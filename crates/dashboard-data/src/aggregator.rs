//! Usage aggregation over the filtered view.
//!
//! Every aggregate sums the `usage` column (seconds) grouped by a key:
//! timestamp, hour of day, calendar date, category, or date × category.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Timelike};
use chrono_tz::Tz;
use dashboard_core::formatting::percentage;
use dashboard_core::models::UsageEvent;

use crate::filter::FilteredView;

/// Summed usage per grouping key, ordered by key.
pub type AggregatedSeries<K> = BTreeMap<K, f64>;

// ── CategoryShare ─────────────────────────────────────────────────────────────

/// One category's slice of the total usage.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub name: String,
    /// Summed usage in seconds.
    pub usage: f64,
    /// Share of the view's total usage, in percent.
    pub percentage: f64,
}

// ── HeatmapMatrix ─────────────────────────────────────────────────────────────

/// Usage summed per (date, category) cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatmapMatrix {
    /// Row labels, ascending.
    pub dates: Vec<NaiveDate>,
    /// Column labels, in first-seen order.
    pub categories: Vec<String>,
    /// `cells[row][column]`; cells without events are `0.0`.
    pub cells: Vec<Vec<f64>>,
}

impl HeatmapMatrix {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.categories.is_empty()
    }

    /// Largest cell value, `0.0` for an empty matrix.
    pub fn max(&self) -> f64 {
        self.cells
            .iter()
            .flat_map(|row| row.iter().copied())
            .fold(0.0, f64::max)
    }

    pub fn get(&self, date: NaiveDate, category: &str) -> Option<f64> {
        let row = self.dates.iter().position(|d| *d == date)?;
        let col = self.categories.iter().position(|c| c == category)?;
        Some(self.cells[row][col])
    }
}

// ── UsageAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups filtered usage events.
pub struct UsageAggregator;

impl UsageAggregator {
    /// Total usage of the view in seconds.
    pub fn total_usage(view: &FilteredView<'_>) -> f64 {
        view.iter().map(|e| e.usage).sum()
    }

    /// The rows of a single app as `(timestamp, usage)` points, oldest first.
    pub fn app_time_series(view: &FilteredView<'_>, app: &str) -> Vec<(DateTime<Tz>, f64)> {
        let mut points: Vec<(DateTime<Tz>, f64)> = view
            .iter()
            .filter(|e| e.app == app)
            .map(|e| (e.start_time, e.usage))
            .collect();
        // Stable sort keeps file order for equal timestamps.
        points.sort_by_key(|(ts, _)| *ts);
        points
    }

    /// Usage of the selected apps summed per timestamp.
    pub fn sum_by_timestamp(
        view: &FilteredView<'_>,
        apps: &BTreeSet<String>,
    ) -> AggregatedSeries<DateTime<Tz>> {
        Self::sum_by_key(view.iter().filter(|e| apps.contains(&e.app)), |e| {
            e.start_time
        })
    }

    /// Usage summed by local hour of day (`0..=23`).
    pub fn sum_by_hour(view: &FilteredView<'_>) -> AggregatedSeries<u32> {
        Self::sum_by_key(view.iter(), |e| e.start_time.hour())
    }

    /// Usage summed by calendar date.
    pub fn sum_by_date(view: &FilteredView<'_>) -> AggregatedSeries<NaiveDate> {
        Self::sum_by_key(view.iter(), |e| e.date)
    }

    /// Per-category totals, largest first.
    ///
    /// The shares always add up to [`Self::total_usage`].
    pub fn category_totals(view: &FilteredView<'_>) -> Vec<CategoryShare> {
        let totals = Self::sum_by_key(view.iter(), |e| e.category.clone());
        let grand_total: f64 = totals.values().sum();

        let mut shares: Vec<CategoryShare> = totals
            .into_iter()
            .map(|(name, usage)| CategoryShare {
                percentage: percentage(usage, grand_total, 2),
                name,
                usage,
            })
            .collect();

        // Ties keep the BTreeMap's name order.
        shares.sort_by(|a, b| {
            b.usage
                .partial_cmp(&a.usage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        shares
    }

    /// Date × category usage matrix for the heatmap.
    pub fn date_category_matrix(view: &FilteredView<'_>) -> HeatmapMatrix {
        let mut categories: Vec<String> = Vec::new();
        let mut column: HashMap<&str, usize> = HashMap::new();
        for event in view.iter() {
            if !column.contains_key(event.category.as_str()) {
                column.insert(event.category.as_str(), categories.len());
                categories.push(event.category.clone());
            }
        }

        let by_cell = Self::sum_by_key(view.iter(), |e| (e.date, column[e.category.as_str()]));
        let dates: Vec<NaiveDate> = by_cell
            .keys()
            .map(|(date, _)| *date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut cells = vec![vec![0.0; categories.len()]; dates.len()];
        for ((date, col), usage) in by_cell {
            // `dates` is sorted, so the row index is a binary search away.
            if let Ok(row) = dates.binary_search(&date) {
                cells[row][col] = usage;
            }
        }

        HeatmapMatrix {
            dates,
            categories,
            cells,
        }
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Generic aggregation driver.
    ///
    /// `key_fn` maps an event to its grouping key.
    fn sum_by_key<'a, K: Ord>(
        events: impl Iterator<Item = &'a UsageEvent>,
        key_fn: impl Fn(&UsageEvent) -> K,
    ) -> AggregatedSeries<K> {
        let mut map: AggregatedSeries<K> = BTreeMap::new();
        for event in events {
            *map.entry(key_fn(event)).or_insert(0.0) += event.usage;
        }
        map
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
