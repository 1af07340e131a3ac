/// Render `value` with `decimals` fraction digits and comma-grouped thousands.
///
/// ```
/// use dashboard_core::formatting::format_number;
///
/// assert_eq!(format_number(86_400.0, 0), "86,400");
/// assert_eq!(format_number(12.25, 1), "12.3");
/// assert_eq!(format_number(-4_321.0, 2), "-4,321.00");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let scale = 10_f64.powi(decimals as i32);
    // Values such as 1.005 are stored just below the midpoint.
    let magnitude = (value.abs() * scale * (1.0 + f64::EPSILON)).round() / scale;
    let fixed = format!("{:.*}", decimals as usize, magnitude);

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    if value < 0.0 && magnitude != 0.0 {
        out.push('-');
    }
    match fixed.split_once('.') {
        Some((whole, fraction)) => {
            out.push_str(&with_commas(whole));
            out.push('.');
            out.push_str(fraction);
        }
        None => out.push_str(&with_commas(&fixed)),
    }
    out
}

/// Format a usage duration given in seconds as a compact string.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_duration;
///
/// assert_eq!(format_duration(45.0),    "45s");
/// assert_eq!(format_duration(120.0),   "2m");
/// assert_eq!(format_duration(3_900.0), "1h 5m");
/// assert_eq!(format_duration(7_200.0), "2h");
/// ```
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    if total < 60 {
        return format!("{}s", total);
    }
    let total_mins = total / 60;
    if total_mins < 60 {
        return format!("{}m", total_mins);
    }
    let hours = total_mins / 60;
    let mins = total_mins % 60;
    if mins == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, mins)
    }
}

/// Share of `part` in `whole` as a percentage rounded to `decimal_places`.
/// An empty `whole` gives `0.0`.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let scale = 10_f64.powi(decimal_places as i32);
    (part * 100.0 * scale / whole).round() / scale
}

// ── Unit scaling ──────────────────────────────────────────────────────────────

/// Display unit for usage values on chart axes.
///
/// Usage is always stored in seconds; the unit only changes how values are
/// labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageUnit {
    Seconds,
    Minutes,
    Hours,
}

impl UsageUnit {
    /// From this many seconds on, a series is shown in minutes.
    pub const MINUTES_THRESHOLD: f64 = 600.0;
    /// From this many seconds on (600 minutes), a series is shown in hours.
    pub const HOURS_THRESHOLD: f64 = 36_000.0;

    /// Pick the unit for a series whose largest value is `max_seconds`.
    ///
    /// ```
    /// use dashboard_core::formatting::UsageUnit;
    ///
    /// assert_eq!(UsageUnit::for_max(120.0), UsageUnit::Seconds);
    /// assert_eq!(UsageUnit::for_max(600.0), UsageUnit::Minutes);
    /// assert_eq!(UsageUnit::for_max(36_000.0), UsageUnit::Hours);
    /// ```
    pub fn for_max(max_seconds: f64) -> Self {
        if max_seconds >= Self::HOURS_THRESHOLD {
            UsageUnit::Hours
        } else if max_seconds >= Self::MINUTES_THRESHOLD {
            UsageUnit::Minutes
        } else {
            UsageUnit::Seconds
        }
    }

    /// Pick the unit for an arbitrary series of second values.
    pub fn for_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let max = values.into_iter().fold(0.0_f64, f64::max);
        Self::for_max(max)
    }

    pub fn seconds_per_unit(&self) -> f64 {
        match self {
            UsageUnit::Seconds => 1.0,
            UsageUnit::Minutes => 60.0,
            UsageUnit::Hours => 3_600.0,
        }
    }

    /// Convert a value in seconds into this unit.
    pub fn scale(&self, seconds: f64) -> f64 {
        seconds / self.seconds_per_unit()
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            UsageUnit::Seconds => "s",
            UsageUnit::Minutes => "min",
            UsageUnit::Hours => "h",
        }
    }

    /// Axis label, e.g. `"Usage Time (min)"`.
    pub fn axis_label(&self) -> String {
        format!("Usage Time ({})", self.suffix())
    }
}

fn with_commas(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
