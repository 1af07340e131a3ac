//! Usage-log and category-map loading.
//!
//! Reads the CSV event log and the JSON category document, converts raw
//! epoch timestamps into the dataset timezone and categorizes every event.
//! Rows that cannot be turned into a valid event are dropped, never fatal.

use std::io::Read;
use std::path::Path;

use chrono_tz::Tz;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{CategoryDefinition, CategoryMap, UsageEvent};
use dashboard_core::time_utils::{epoch_to_zoned, parse_timezone, resolve_timezone};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::categorizer::Categorizer;

/// Header columns every usage log must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["app", "device_model", "start_time", "usage", "tz"];

/// One CSV row before validation.  Everything is read as text so a bad cell
/// only costs its own row.
#[derive(Debug, Deserialize)]
struct RawUsageRecord {
    app: String,
    device_model: String,
    start_time: String,
    usage: String,
    tz: String,
}

// ── UsageLog ──────────────────────────────────────────────────────────────────

/// The loaded, categorized dataset.
#[derive(Debug, Clone)]
pub struct UsageLog {
    /// Valid events in file order.
    pub events: Vec<UsageEvent>,
    /// Timezone every `start_time` was converted into.
    pub timezone: Tz,
    /// Data rows seen in the file (header excluded).
    pub rows_read: usize,
    /// Rows discarded because they could not be parsed.
    pub rows_dropped: usize,
}

impl UsageLog {
    /// An empty log displayed in `timezone`.
    pub fn empty(timezone: Tz) -> Self {
        Self {
            events: Vec::new(),
            timezone,
            rows_read: 0,
            rows_dropped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ── Category map ──────────────────────────────────────────────────────────────

/// Read the category document at `path`.
pub fn load_category_map(path: &Path) -> Result<CategoryMap> {
    let content = std::fs::read_to_string(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let map = parse_category_map(&content)?;
    debug!("Loaded {} categories from {}", map.len(), path.display());
    Ok(map)
}

/// Parse a category document of the form
/// `{ "key": { "name": "...", "apps": ["..."] }, ... }`, keeping key order.
pub fn parse_category_map(json: &str) -> Result<CategoryMap> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Object(entries) = value else {
        return Err(DashboardError::InvalidCategoryMap(
            "top-level value must be an object".to_string(),
        ));
    };

    let mut categories = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        let mut def: CategoryDefinition = serde_json::from_value(entry).map_err(|e| {
            DashboardError::InvalidCategoryMap(format!("entry \"{}\": {}", key, e))
        })?;
        def.key = key;
        categories.push(def);
    }

    Ok(CategoryMap::new(categories))
}

// ── Usage log ─────────────────────────────────────────────────────────────────

/// Read and categorize the usage log at `path`.
///
/// `tz_override` replaces the timezone recorded in the first row and must
/// be a valid IANA name.
pub fn load_usage_log(
    path: &Path,
    categorizer: &Categorizer,
    tz_override: Option<&str>,
) -> Result<UsageLog> {
    let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let log = parse_usage_log(std::io::BufReader::new(file), categorizer, tz_override)?;
    info!(
        "Loaded {} usage events from {} ({} of {} rows dropped)",
        log.len(),
        path.display(),
        log.rows_dropped,
        log.rows_read
    );
    Ok(log)
}

/// Parse a usage log from any CSV source.
pub fn parse_usage_log<R: Read>(
    source: R,
    categorizer: &Categorizer,
    tz_override: Option<&str>,
) -> Result<UsageLog> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DashboardError::MissingColumn(column.to_string()));
        }
    }

    let mut timezone: Option<Tz> = match tz_override {
        Some(name) => Some(parse_timezone(name).ok_or_else(|| {
            DashboardError::Config(format!("unknown timezone \"{}\"", name))
        })?),
        None => None,
    };
    let mut events: Vec<UsageEvent> = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;

    for result in rdr.deserialize::<RawUsageRecord>() {
        rows_read += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                debug!("Dropping malformed row {}: {}", rows_read, e);
                rows_dropped += 1;
                continue;
            }
        };

        // The first row decides the dataset timezone.
        let tz = *timezone.get_or_insert_with(|| resolve_timezone(&record.tz));

        match build_event(record, &tz, categorizer) {
            Some(event) => events.push(event),
            None => rows_dropped += 1,
        }
    }

    if rows_dropped > 0 {
        debug!("Dropped {} unparseable rows", rows_dropped);
    }
    if events.is_empty() && rows_read > 0 {
        warn!("Usage log has {} rows but none are valid", rows_read);
    }

    Ok(UsageLog {
        events,
        timezone: timezone.unwrap_or(Tz::UTC),
        rows_read,
        rows_dropped,
    })
}

/// Validate one raw record.  Returns `None` when it must be dropped.
fn build_event(record: RawUsageRecord, tz: &Tz, categorizer: &Categorizer) -> Option<UsageEvent> {
    let Some(start_time) = epoch_to_zoned(&record.start_time, tz) else {
        debug!("Dropping row with invalid start_time \"{}\"", record.start_time);
        return None;
    };

    let usage = match record.usage.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            debug!("Dropping row with invalid usage \"{}\"", record.usage);
            return None;
        }
    };

    let category = categorizer.categorize(&record.app).to_string();

    Some(UsageEvent {
        date: start_time.date_naive(),
        start_time,
        usage,
        category,
        app: record.app,
        device_model: record.device_model,
        tz: record.tz,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
