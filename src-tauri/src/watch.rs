//! One unread poll loop per messenger window.

use tauri::{Manager, WebviewWindow};
use unread_scraper::PollLoop;

use crate::app::SharedState;
use crate::bridge::TauriPage;
use crate::notification::NativeNotifier;

/// Start polling `window` for unread messages until it is destroyed or the
/// app shuts down.
pub fn start_watching(state: &SharedState, window: &WebviewWindow) {
    let label = window.label().to_string();
    if !state.config().notifications_enabled {
        tracing::info!(label, "Notifications disabled, not watching window");
        return;
    }

    let token = state.shutdown_token().child_token();
    state.replace_watcher(&label, token.clone());

    let page = TauriPage::new(window.clone(), state.clone());
    let notifier = NativeNotifier::new(window.app_handle().clone(), label.clone());
    let watch_config = state.config().watch_config(state.notification_icon());
    let poll = PollLoop::new(page, notifier, &watch_config);

    tauri::async_runtime::spawn(async move {
        poll.run(token).await;
        tracing::debug!(label, "Window watcher finished");
    });
}

/// Stop the poll loop of a destroyed window.
pub fn stop_watching(state: &SharedState, label: &str) {
    if state.remove_window(label) {
        tracing::info!(label, "Window closed, poll loop cancelled");
    }
}
