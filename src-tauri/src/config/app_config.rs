//! Runtime application configuration loaded from DB + environment overrides.

use std::path::PathBuf;
use std::time::Duration;

use unread_scraper::{ExtractTrigger, ExtractionStrategy, KeyPolicy, WatchConfig};

use super::manager::SettingsManager;

/// Runtime configuration populated from the settings DB.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub start_url: String,
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub poll_interval_ms: u64,
    pub reset_threshold: u32,
    pub extraction_strategy: ExtractionStrategy,
    pub dedup_policy: KeyPolicy,
    pub extract_trigger: ExtractTrigger,
    pub unread_font_weight: u16,
    pub conversation_settle_ms: u64,
    pub script_timeout_ms: u64,
    pub notifications_enabled: bool,
    pub notification_silent: bool,
    pub block_service_workers: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start_url: "https://www.messenger.com".into(),
            window_title: "Messenger".into(),
            window_width: 1200,
            window_height: 800,
            poll_interval_ms: 2000,
            reset_threshold: 5,
            extraction_strategy: ExtractionStrategy::Sidebar,
            dedup_policy: KeyPolicy::Composite,
            extract_trigger: ExtractTrigger::AnyUnread,
            unread_font_weight: 600,
            conversation_settle_ms: 500,
            script_timeout_ms: 10_000,
            notifications_enabled: true,
            notification_silent: false,
            block_service_workers: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the settings manager (DB-first, env overrides).
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        Self::load_with_env(sm, |key| std::env::var(key).ok())
    }

    pub fn load_with_env(
        sm: &SettingsManager,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };
        let d = Self::default();

        let mut poll_interval_ms = parse_or(&g("POLL_INTERVAL_MS"), d.poll_interval_ms);
        let mut start_url = non_empty_or(g("START_URL"), d.start_url);

        if let Some(v) = env("POLL_INTERVAL_MS") {
            match v.parse::<u64>() {
                Ok(ms) if ms > 0 => poll_interval_ms = ms,
                _ => tracing::warn!("Ignoring invalid POLL_INTERVAL_MS override: {v}"),
            }
        }
        if let Some(v) = env("START_URL").filter(|v| !v.is_empty()) {
            start_url = v;
        }

        Ok(Self {
            start_url,
            window_title: non_empty_or(g("WINDOW_TITLE"), d.window_title),
            window_width: parse_or(&g("WINDOW_WIDTH"), d.window_width),
            window_height: parse_or(&g("WINDOW_HEIGHT"), d.window_height),
            poll_interval_ms,
            reset_threshold: parse_or(&g("RESET_THRESHOLD"), d.reset_threshold),
            extraction_strategy: ExtractionStrategy::from_str_setting(&g("EXTRACTION_STRATEGY")),
            dedup_policy: KeyPolicy::from_str_setting(&g("DEDUP_POLICY")),
            extract_trigger: ExtractTrigger::from_str_setting(&g("EXTRACT_TRIGGER")),
            unread_font_weight: parse_or(&g("UNREAD_FONT_WEIGHT"), d.unread_font_weight),
            conversation_settle_ms: parse_or(&g("CONVERSATION_SETTLE_MS"), d.conversation_settle_ms),
            script_timeout_ms: parse_or(&g("SCRIPT_TIMEOUT_MS"), d.script_timeout_ms),
            notifications_enabled: g("NOTIFICATIONS_ENABLED") != "false",
            notification_silent: g("NOTIFICATION_SILENT") == "true",
            block_service_workers: g("BLOCK_SERVICE_WORKERS") != "false",
        })
    }

    /// Poll-loop configuration for one window.
    pub fn watch_config(&self, icon: Option<PathBuf>) -> WatchConfig {
        WatchConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            reset_threshold: self.reset_threshold,
            key_policy: self.dedup_policy,
            trigger: self.extract_trigger,
            strategy: self.extraction_strategy,
            min_font_weight: self.unread_font_weight,
            settle_delay: Duration::from_millis(self.conversation_settle_ms),
            icon,
            silent: self.notification_silent,
        }
    }

    pub fn script_timeout(&self) -> Duration {
        Duration::from_millis(self.script_timeout_ms)
    }
}

fn parse_or<T: std::str::FromStr>(s: &str, default: T) -> T {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn non_empty_or(s: String, default: String) -> String {
    if s.is_empty() { default } else { s }
}
