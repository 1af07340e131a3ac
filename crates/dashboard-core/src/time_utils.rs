use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Uses the `iana-time-zone` crate directly – no subprocess calls.
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── Timezone resolution ──────────────────────────────────────────────────────

/// Parse an IANA timezone identifier.  Surrounding whitespace is ignored.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// Resolve the timezone the dataset is displayed in.
///
/// Unknown names fall back to the system timezone, then to UTC, with a
/// warning either way.
pub fn resolve_timezone(name: &str) -> Tz {
    if let Some(tz) = parse_timezone(name) {
        return tz;
    }

    let system = get_system_timezone();
    match parse_timezone(&system) {
        Some(tz) => {
            warn!(
                "unrecognised timezone \"{}\", falling back to system timezone {}",
                name, system
            );
            tz
        }
        None => {
            warn!("unrecognised timezone \"{}\", falling back to UTC", name);
            Tz::UTC
        }
    }
}

// ── Epoch conversion ─────────────────────────────────────────────────────────

/// Parse a raw epoch-seconds value (integer or fractional) into UTC.
///
/// Returns `None` for empty strings, non-numeric text, non-finite numbers and
/// values outside chrono's representable range.
pub fn parse_epoch_seconds(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(secs) = trimmed.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }

    let value = trimmed.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }

    let whole = value.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    let mut secs = whole as i64;
    let mut nanos = ((value - whole) * 1e9).round() as u32;
    if nanos >= 1_000_000_000 {
        secs = secs.checked_add(1)?;
        nanos -= 1_000_000_000;
    }

    DateTime::from_timestamp(secs, nanos)
}

/// Convert a raw epoch-seconds value straight into the dataset timezone.
pub fn epoch_to_zoned(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    parse_epoch_seconds(raw).map(|dt| dt.with_timezone(tz))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
