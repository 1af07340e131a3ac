//! Date / device / category filtering.
//!
//! Every predicate is evaluated eagerly over the full dataset; the result is
//! a borrowed view that is rebuilt whenever a filter control changes.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use dashboard_core::models::UsageEvent;

// ── FilterCriteria ────────────────────────────────────────────────────────────

/// The active sidebar filter values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Inclusive `(start, end)` date range, or `None` for no date predicate.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Devices to keep.  Empty keeps nothing.
    pub devices: BTreeSet<String>,
    /// Category display names to keep.  Empty keeps nothing.
    pub categories: BTreeSet<String>,
}

impl FilterCriteria {
    /// `true` when `date` lies inside the range (always `true` without one).
    pub fn date_matches(&self, date: NaiveDate) -> bool {
        match self.date_range {
            Some((start, end)) => start <= date && date <= end,
            None => true,
        }
    }

    pub fn matches(&self, event: &UsageEvent) -> bool {
        self.date_matches(event.date)
            && self.devices.contains(&event.device_model)
            && self.categories.contains(&event.category)
    }
}

// ── FilteredView ──────────────────────────────────────────────────────────────

/// Immutable subset of the dataset that passed every predicate, in file order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    rows: Vec<&'a UsageEvent>,
}

impl<'a> FilteredView<'a> {
    pub fn new(rows: Vec<&'a UsageEvent>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[&'a UsageEvent] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a UsageEvent> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Filter stage ──────────────────────────────────────────────────────────────

/// Apply the date, device and category predicates in that order.
pub fn apply_filters<'a>(events: &'a [UsageEvent], criteria: &FilterCriteria) -> FilteredView<'a> {
    let by_date: Vec<&UsageEvent> = events
        .iter()
        .filter(|e| criteria.date_matches(e.date))
        .collect();

    let by_device: Vec<&UsageEvent> = by_date
        .into_iter()
        .filter(|e| criteria.devices.contains(&e.device_model))
        .collect();

    let rows: Vec<&UsageEvent> = by_device
        .into_iter()
        .filter(|e| criteria.categories.contains(&e.category))
        .collect();

    FilteredView::new(rows)
}

/// Devices present in the date-filtered rows, in first-appearance order.
pub fn device_options(
    events: &[UsageEvent],
    date_range: Option<(NaiveDate, NaiveDate)>,
) -> Vec<String> {
    let criteria = FilterCriteria {
        date_range,
        ..Default::default()
    };
    unique_in_order(
        events
            .iter()
            .filter(|e| criteria.date_matches(e.date))
            .map(|e| e.device_model.as_str()),
    )
}

/// Apps present in the filtered view, in first-appearance order.
pub fn app_options(view: &FilteredView<'_>) -> Vec<String> {
    unique_in_order(view.iter().map(|e| e.app.as_str()))
}

/// Earliest and latest event dates, or `None` for an empty dataset.
pub fn date_bounds(events: &[UsageEvent]) -> Option<(NaiveDate, NaiveDate)> {
    let min = events.iter().map(|e| e.date).min()?;
    let max = events.iter().map(|e| e.date).max()?;
    Some((min, max))
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
