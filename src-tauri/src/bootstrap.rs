use std::path::{Path, PathBuf};

use shell_db::Database;
use unread_scraper::PermissionKind;

use crate::app::SharedState;
use crate::config::{AppConfig, SettingsManager};
use crate::permissions;
use crate::watch;
use crate::window;

const NOTIFICATION_ICON: &[u8] = include_bytes!("../icons/icon.png");

/// Foundation init (fatal on error): .env, data dir, settings DB, config.
pub fn init_foundation() -> Result<(AppConfig, PathBuf), anyhow::Error> {
    load_dotenv();
    let dir = data_dir();
    std::fs::create_dir_all(&dir)?;

    let db_path = dir.join("settings.db");
    tracing::info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;
    tracing::debug!(schema = db.schema_version()?, "Settings database ready");

    let sm = SettingsManager::new(db);
    if let Err(e) = sm.migrate_from_env() {
        tracing::error!("Failed to migrate from env: {e}");
    }
    sm.initialize_defaults()?;

    let config = AppConfig::load(&sm)?;

    if let Ok(status) = sm.check_feature_status() {
        if !status.missing_settings.is_empty() || !status.warnings.is_empty() {
            tracing::warn!(
                "Missing settings: {:?}, warnings: {:?}",
                status.missing_settings,
                status.warnings
            );
        }
    }

    tracing::info!(
        url = %config.start_url,
        poll_interval_ms = config.poll_interval_ms,
        strategy = ?config.extraction_strategy,
        "Settings loaded"
    );
    Ok((config, dir))
}

/// Write the bundled icon next to the settings DB so notification daemons
/// can load it by path.
pub fn prepare_notification_icon(dir: &Path) -> Option<PathBuf> {
    let path = dir.join("notification-icon.png");
    if path.exists() {
        return Some(path);
    }
    match std::fs::write(&path, NOTIFICATION_ICON) {
        Ok(()) => Some(path),
        Err(e) => {
            tracing::warn!("Failed to write notification icon: {e}");
            None
        }
    }
}

/// Create the main window and start watching it.
pub fn setup(app: &mut tauri::App, state: SharedState) -> Result<(), anyhow::Error> {
    apply_permission_policy(&state);
    let window = window::create_window(app.handle(), &state, window::MAIN_LABEL)?;
    watch::start_watching(&state, &window);
    Ok(())
}

/// Dock icon clicked with no window open.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub fn reopen(app: &tauri::AppHandle, state: &SharedState) {
    use tauri::Manager;

    if app.get_webview_window(window::MAIN_LABEL).is_some() {
        window::focus_window(app, window::MAIN_LABEL);
        return;
    }
    match window::create_window(app, state, window::MAIN_LABEL) {
        Ok(window) => watch::start_watching(state, &window),
        Err(e) => tracing::error!("Failed to recreate window: {e}"),
    }
}

fn apply_permission_policy(state: &SharedState) {
    let policy = state.policy();
    for kind in [
        PermissionKind::Notifications,
        PermissionKind::Media,
        PermissionKind::Geolocation,
        PermissionKind::Clipboard,
        PermissionKind::MidiSysex,
    ] {
        tracing::info!(?kind, decision = ?policy.decide(&kind), "Page permission");
    }
    permissions::request_media_access(policy);
}

/// Determine the data directory for the application.
fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MESSENGER_DESKTOP_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".messenger-desktop")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_icon_is_written_once() {
        let dir = std::env::temp_dir().join(format!("messenger-desktop-icon-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let path = prepare_notification_icon(&dir).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), NOTIFICATION_ICON);
        assert_eq!(prepare_notification_icon(&dir), Some(path));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
