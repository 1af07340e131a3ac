use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Category label given to apps that no category in the mapping claims.
pub const FALLBACK_CATEGORY: &str = "Miscellaneous";

/// One logged record of an application being used.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageEvent {
    /// Application identifier as it appears in the log.
    pub app: String,
    /// Device the event was recorded on.
    pub device_model: String,
    /// Start of the usage interval, in the dataset timezone.
    pub start_time: DateTime<Tz>,
    /// Calendar date of `start_time`, used by the date-range filter.
    pub date: NaiveDate,
    /// Usage duration in seconds.
    pub usage: f64,
    /// Timezone label recorded on the row.
    pub tz: String,
    /// Display name of the category the app belongs to.
    pub category: String,
}

/// A single category of the app-to-category mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Key of the entry in the mapping document.
    #[serde(skip)]
    pub key: String,
    /// Human-readable category name.
    pub name: String,
    /// App identifiers that belong to this category.
    #[serde(default)]
    pub apps: Vec<String>,
}

/// The full app-to-category mapping, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    pub categories: Vec<CategoryDefinition>,
}

impl CategoryMap {
    pub fn new(categories: Vec<CategoryDefinition>) -> Self {
        Self { categories }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }
}

// ── View selection ────────────────────────────────────────────────────────────

/// Top-level presentation mode of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Usage of one or several selected apps over time.
    #[default]
    AppCentered,
    /// Usage summed by hour of day or by calendar date.
    TimeCentric,
    /// Category totals (treemap) and a date × category heatmap.
    Overview,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [
        ViewMode::AppCentered,
        ViewMode::TimeCentric,
        ViewMode::Overview,
    ];

    /// Parse a CLI view name.  Unknown names fall back to the default.
    pub fn from_name(name: &str) -> Self {
        match name {
            "time" => ViewMode::TimeCentric,
            "overview" => ViewMode::Overview,
            _ => ViewMode::AppCentered,
        }
    }

    /// The CLI spelling of this mode.
    pub fn as_name(&self) -> &'static str {
        match self {
            ViewMode::AppCentered => "app",
            ViewMode::TimeCentric => "time",
            ViewMode::Overview => "overview",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::AppCentered => "App-Centered View",
            ViewMode::TimeCentric => "Time-Centric View",
            ViewMode::Overview => "Overview",
        }
    }
}

/// Whether the App-Centered view shows one app or the sum of several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Single,
    Multi,
}

impl SelectionMode {
    pub fn title(&self) -> &'static str {
        match self {
            SelectionMode::Single => "Single Select",
            SelectionMode::Multi => "Multi Select",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SelectionMode::Single => SelectionMode::Multi,
            SelectionMode::Multi => SelectionMode::Single,
        }
    }
}

/// Aggregation granularity of the Time-Centric view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimePeriod {
    /// Sum by hour of day.
    #[default]
    OneDay,
    /// Sum by calendar date.
    SevenDays,
}

impl TimePeriod {
    pub fn title(&self) -> &'static str {
        match self {
            TimePeriod::OneDay => "1 Day",
            TimePeriod::SevenDays => "7 Days",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            TimePeriod::OneDay => TimePeriod::SevenDays,
            TimePeriod::SevenDays => TimePeriod::OneDay,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
