use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const STATE_DIR: &str = ".usage-dashboard";
const LAST_USED_FILE: &str = "last_used.json";

// ── Command line ───────────────────────────────────────────────────────────────

/// Terminal dashboard for application-usage logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "usage-dashboard",
    about = "Terminal dashboard for application-usage logs",
    version
)]
pub struct Settings {
    /// CSV usage log (columns: app, device_model, start_time, usage, tz)
    #[arg(long, default_value = "data/usage.csv")]
    pub usage_file: PathBuf,

    /// JSON app-to-category mapping
    #[arg(long, default_value = "data/category.json")]
    pub category_file: PathBuf,

    /// Initial view mode
    #[arg(long, default_value = "app", value_parser = ["app", "time", "overview"])]
    pub view: String,

    /// Display timezone ("auto" uses the timezone recorded in the first row)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Colour theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Log verbosity
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Write logs here instead of ~/.usage-dashboard/logs/
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Shorthand for --log-level DEBUG
    #[arg(long)]
    pub debug: bool,

    /// Forget the remembered file paths, view, timezone and theme
    #[arg(long)]
    pub clear: bool,
}

// ── Remembered parameters ──────────────────────────────────────────────────────

/// Values carried from one run to the next in `~/.usage-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl LastUsedParams {
    /// Location under the current user's home directory.
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::path_under(&home)
    }

    pub fn path_under(home: &Path) -> PathBuf {
        home.join(STATE_DIR).join(LAST_USED_FILE)
    }

    /// A missing or unreadable file yields empty params.
    pub fn read(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Write through a sibling `.tmp` file and rename it into place.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let staged = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&staged, body)?;
        std::fs::rename(&staged, path)
    }

    pub fn forget(path: &Path) -> std::io::Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

impl From<&Settings> for LastUsedParams {
    fn from(settings: &Settings) -> Self {
        Self {
            usage_file: Some(settings.usage_file.clone()),
            category_file: Some(settings.category_file.clone()),
            view: Some(settings.view.clone()),
            timezone: Some(settings.timezone.clone()),
            theme: Some(settings.theme.clone()),
        }
    }
}

// ── Resolution ─────────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments, fill unset flags from the previous run
    /// and remember the outcome for the next one.
    pub fn resolve() -> Self {
        Self::resolve_from(std::env::args_os().collect(), &LastUsedParams::default_path())
    }

    /// [`Settings::resolve`] with explicit arguments and store location.
    pub fn resolve_from(args: Vec<OsString>, store: &Path) -> Self {
        // The typed parse loses value sources, so keep the raw matches too.
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::forget(store) {
                tracing::warn!("could not remove {}: {}", store.display(), e);
            }
        } else {
            let last = LastUsedParams::read(store);
            inherit(&matches, "usage_file", &mut settings.usage_file, last.usage_file);
            inherit(&matches, "category_file", &mut settings.category_file, last.category_file);
            inherit(&matches, "view", &mut settings.view, last.view);
            inherit(&matches, "timezone", &mut settings.timezone, last.timezone);
            inherit(&matches, "theme", &mut settings.theme, last.theme);

            if let Err(e) = LastUsedParams::from(&settings).write(store) {
                tracing::warn!("could not save {}: {}", store.display(), e);
            }
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Explicit timezone override, or `None` when the dataset decides.
    pub fn timezone_override(&self) -> Option<&str> {
        match self.timezone.as_str() {
            "" | "auto" => None,
            other => Some(other),
        }
    }
}

/// Replace `slot` with the remembered value unless `id` was typed on the
/// command line. Arg ids are the field names.
fn inherit<T>(matches: &ArgMatches, id: &str, slot: &mut T, remembered: Option<T>) {
    if matches.value_source(id) == Some(ValueSource::CommandLine) {
        return;
    }
    if let Some(value) = remembered {
        *slot = value;
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
