//! Script injected into every page before its own scripts run.

use serde_json::{Map, Value};
use unread_scraper::PermissionPolicy;

use crate::config::AppConfig;
use crate::permissions::{self, ENGINE_HANDLER};

const INIT_JS: &str = include_str!("scripts/init.js");

/// Permission names the page may query; anything else answers `denied`.
const WEB_PERMISSIONS: &[&str] = &[
    "notifications",
    "push",
    "camera",
    "microphone",
    "speaker-selection",
    "geolocation",
    "clipboard-read",
    "clipboard-write",
    "midi",
];

pub fn render(config: &AppConfig, policy: &PermissionPolicy) -> String {
    let permissions: Map<String, Value> = WEB_PERMISSIONS
        .iter()
        .map(|name| {
            let state = permissions::page_state(policy, name, ENGINE_HANDLER);
            (name.to_string(), Value::from(state))
        })
        .collect();

    INIT_JS
        .replace("__PERMISSIONS__", &Value::Object(permissions).to_string())
        .replace(
            "__BLOCK_SERVICE_WORKERS__",
            if config.block_service_workers { "true" } else { "false" },
        )
}
