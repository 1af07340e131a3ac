mod bootstrap;

use anyhow::{Context, Result};
use dashboard_core::models::ViewMode;
use dashboard_core::settings::Settings;
use dashboard_data::session::Session;
use dashboard_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::resolve();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Usage dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Timezone: {}",
        settings.view,
        settings.theme,
        settings.timezone
    );

    // Input problems are reported here, before the terminal is taken over.
    let session = Session::load(
        &settings.usage_file,
        &settings.category_file,
        settings.timezone_override(),
    )
    .with_context(|| {
        format!(
            "failed to load {} with categories from {}",
            settings.usage_file.display(),
            settings.category_file.display()
        )
    })?;

    let app = App::new(&settings.theme, session, ViewMode::from_name(&settings.view));

    // The loop exits on 'q' / Ctrl+C inside the TUI.  Ctrl+C is also raced at
    // the OS level for signals that arrive outside raw mode.
    tokio::select! {
        result = app.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
        }
    }

    tracing::info!("Usage dashboard stopped");
    Ok(())
}
