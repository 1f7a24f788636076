//! IPC commands invoked by the init script inside the page.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use tauri::{Manager, WebviewWindow};
use unread_scraper::{Dispatcher, NotificationRequest};

use crate::app::SharedState;
use crate::bridge::ScriptReply;
use crate::notification::NativeNotifier;
use crate::window;

/// Second argument of `window.messengerDesktop.notify(title, options)`.
#[derive(Debug, Default, Deserialize)]
pub struct NotifyOptions {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub silent: Option<bool>,
}

impl NotifyOptions {
    fn into_request(self, title: String, default_silent: bool) -> NotificationRequest {
        NotificationRequest {
            title,
            body: self.body.unwrap_or_default(),
            icon: self.icon.filter(|i| !i.is_empty()).map(PathBuf::from),
            silent: self.silent.unwrap_or(default_silent),
        }
    }
}

#[tauri::command]
pub fn report_title(window: WebviewWindow, state: tauri::State<'_, SharedState>, title: String) {
    if state.set_page_title(window.label(), &title) {
        tracing::debug!(label = window.label(), title = %title, "Page title changed");
        window::sync_title(&window, &title);
    }
}

#[tauri::command]
pub fn script_result(
    state: tauri::State<'_, SharedState>,
    id: u64,
    ok: bool,
    value: Option<Value>,
    error: Option<String>,
) {
    let reply = ScriptReply {
        ok,
        value: value.unwrap_or(Value::Null),
        error,
    };
    state.bridge().resolve(id, reply);
}

/// Manual notification from page code. Returns whether it was shown.
#[tauri::command]
pub fn show_notification(
    window: WebviewWindow,
    state: tauri::State<'_, SharedState>,
    title: String,
    options: Option<NotifyOptions>,
) -> Result<bool, String> {
    let config = state.config();
    if !config.notifications_enabled {
        return Err("notifications are disabled".into());
    }

    let notifier = NativeNotifier::new(window.app_handle().clone(), window.label());
    let dispatcher = Dispatcher::new(notifier, state.notification_icon(), config.notification_silent);
    let request = options
        .unwrap_or_default()
        .into_request(title, config.notification_silent);
    Ok(dispatcher.dispatch_request(&request))
}
