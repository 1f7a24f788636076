//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

/// (key, default, required, description)
type DefTuple = (&'static str, &'static str, bool, &'static str);

const DEFS: &[DefTuple] = &[
    ("START_URL", "https://www.messenger.com", true, "Page loaded into new windows"),
    ("WINDOW_TITLE", "Messenger", false, "Window title until the page reports its own"),
    ("WINDOW_WIDTH", "1200", false, "Initial window width in logical pixels"),
    ("WINDOW_HEIGHT", "800", false, "Initial window height in logical pixels"),
    ("POLL_INTERVAL_MS", "2000", false, "Unread poll interval"),
    ("RESET_THRESHOLD", "5", false, "Consecutive zero-count polls before notified chats re-arm"),
    ("EXTRACTION_STRATEGY", "sidebar", false, "sidebar | conversation"),
    ("DEDUP_POLICY", "composite", false, "composite (name + preview) | chat_name"),
    ("EXTRACT_TRIGGER", "any_unread", false, "any_unread | count_increase"),
    ("UNREAD_FONT_WEIGHT", "600", false, "Minimum font weight of an unread chat name"),
    ("CONVERSATION_SETTLE_MS", "500", false, "Wait after opening a conversation before reading it"),
    ("SCRIPT_TIMEOUT_MS", "10000", false, "Timeout for one page script"),
    ("NOTIFICATIONS_ENABLED", "true", false, "Show native notifications for new messages"),
    ("NOTIFICATION_SILENT", "false", false, "Suppress the notification sound"),
    ("BLOCK_SERVICE_WORKERS", "true", false, "Disable service workers in the page"),
];

#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, required, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    required,
                    description,
                },
            )
        })
        .collect()
});
