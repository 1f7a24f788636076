//! Messenger windows: creation, navigation policy, focus.

use tauri::{AppHandle, Manager, Url, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tauri_plugin_shell::ShellExt;

use crate::app::SharedState;
use crate::init_script;
use crate::permissions;

pub const MAIN_LABEL: &str = "main";

/// Hosts the shell keeps inside the window; subdomains included.
const INTERNAL_HOSTS: &[&str] = &["messenger.com", "facebook.com", "fbcdn.net", "fbsbx.com"];

/// Whether navigating to `url` stays in the shell.
pub fn is_internal_url(url: &Url) -> bool {
    match url.scheme() {
        "http" | "https" => {}
        "about" | "blob" | "data" => return true,
        _ => return false,
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    INTERNAL_HOSTS.iter().any(|allowed| {
        host == *allowed
            || host
                .strip_suffix(allowed)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Build a messenger window at the configured start URL.
pub fn create_window(
    app: &AppHandle,
    state: &SharedState,
    label: &str,
) -> Result<WebviewWindow, anyhow::Error> {
    let config = state.config();
    let url: Url = config.start_url.parse()?;
    let script = init_script::render(config, state.policy());

    let nav_app = app.clone();
    let window = WebviewWindowBuilder::new(app, label, WebviewUrl::External(url))
        .title(&config.window_title)
        .inner_size(config.window_width as f64, config.window_height as f64)
        .min_inner_size(480.0, 360.0)
        .initialization_script(&script)
        .on_navigation(move |url| {
            if is_internal_url(url) {
                return true;
            }
            open_external(&nav_app, url);
            false
        })
        .build()?;
    permissions::install(&window, state.policy().clone());

    tracing::info!(label, url = %config.start_url, "Window created");
    Ok(window)
}

/// Restore `label` if minimized, show it and give it focus.
pub fn focus_window(app: &AppHandle, label: &str) {
    let Some(window) = app.get_webview_window(label) else {
        tracing::debug!(label, "Window to focus is gone");
        return;
    };
    if window.is_minimized().unwrap_or(false) {
        let _ = window.unminimize();
    }
    let _ = window.show();
    if let Err(e) = window.set_focus() {
        tracing::warn!(label, "Failed to focus window: {e}");
    }
}

/// Mirror the page title onto the native window title.
pub fn sync_title(window: &WebviewWindow, title: &str) {
    if let Err(e) = window.set_title(title) {
        tracing::debug!(label = window.label(), "Failed to set window title: {e}");
    }
}

// `Shell::open` is superseded by `tauri_plugin_opener::OpenerExt::open_url`.
#[allow(deprecated)]
fn open_external(app: &AppHandle, url: &Url) {
    tracing::info!(%url, "Opening external link in the system browser");
    if let Err(e) = app.shell().open(url.as_str(), None) {
        tracing::warn!(%url, "Failed to open external link: {e}");
    }
}
