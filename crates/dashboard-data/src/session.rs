//! The loaded dataset, held for the lifetime of the process.

use std::path::Path;
use std::time::Instant;

use chrono::NaiveDate;
use chrono_tz::Tz;
use dashboard_core::models::UsageEvent;
use dashboard_core::Result;
use tracing::{debug, info};

use crate::categorizer::Categorizer;
use crate::filter::{self, FilterCriteria, FilteredView};
use crate::reader::{load_category_map, load_usage_log, UsageLog};

/// Categorized usage events plus the categorizer that labelled them.
#[derive(Debug, Clone)]
pub struct Session {
    log: UsageLog,
    categorizer: Categorizer,
}

impl Session {
    /// Load the category map, then the usage log categorized against it.
    ///
    /// Any failure here is fatal: the dashboard never starts without both
    /// inputs.
    pub fn load(
        usage_path: &Path,
        category_path: &Path,
        tz_override: Option<&str>,
    ) -> Result<Self> {
        let map_start = Instant::now();
        let map = load_category_map(category_path)?;
        debug!(
            "Loaded {} categories in {:.3}s",
            map.len(),
            map_start.elapsed().as_secs_f64()
        );

        let categorizer = Categorizer::new(map);

        let log_start = Instant::now();
        let log = load_usage_log(usage_path, &categorizer, tz_override)?;
        info!(
            "Session ready: {} events, timezone {}, loaded in {:.3}s",
            log.len(),
            log.timezone.name(),
            log_start.elapsed().as_secs_f64()
        );

        Ok(Self::from_parts(log, categorizer))
    }

    pub fn from_parts(log: UsageLog, categorizer: Categorizer) -> Self {
        Self { log, categorizer }
    }

    pub fn events(&self) -> &[UsageEvent] {
        &self.log.events
    }

    pub fn log(&self) -> &UsageLog {
        &self.log
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    pub fn timezone(&self) -> Tz {
        self.log.timezone
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Earliest and latest event dates, `None` when no events were loaded.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        filter::date_bounds(self.events())
    }

    pub fn category_options(&self) -> Vec<String> {
        self.categorizer.category_names()
    }

    pub fn device_options(&self, date_range: Option<(NaiveDate, NaiveDate)>) -> Vec<String> {
        filter::device_options(self.events(), date_range)
    }

    pub fn filtered(&self, criteria: &FilterCriteria) -> FilteredView<'_> {
        filter::apply_filters(self.events(), criteria)
    }

    /// Criteria with every filter at its default: full date range, all
    /// devices and all categories selected.
    pub fn default_criteria(&self) -> FilterCriteria {
        let date_range = self.date_bounds();
        FilterCriteria {
            date_range,
            devices: self.device_options(date_range).into_iter().collect(),
            categories: self.category_options().into_iter().collect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
