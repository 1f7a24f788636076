//! Per-window watcher configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
pub const DEFAULT_RESET_THRESHOLD: u32 = 5;
pub const DEFAULT_MIN_FONT_WEIGHT: u16 = 600;
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Identity used to decide whether a preview was already notified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// `name:preview`; a new preview from the same chat notifies again.
    #[default]
    Composite,
    /// Chat name only; one notification per chat until the next reset.
    ChatName,
}

impl KeyPolicy {
    pub fn from_str_setting(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "chat_name" | "chat-name" | "name" => Self::ChatName,
            _ => Self::Composite,
        }
    }
}

/// When a nonzero count re-runs extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractTrigger {
    /// Every tick with a nonzero count.
    #[default]
    AnyUnread,
    /// Only when the count rose since the previous tick. A nonzero plateau
    /// never extracts, even if new messages arrived.
    CountIncrease,
}

impl ExtractTrigger {
    pub fn from_str_setting(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "count_increase" | "count-increase" | "increase" => Self::CountIncrease,
            _ => Self::AnyUnread,
        }
    }
}

/// Which preview extractor runs inside the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Read the preview line shown in the sidebar row.
    #[default]
    Sidebar,
    /// Open each unread conversation and read its latest incoming message.
    Conversation,
}

impl ExtractionStrategy {
    pub fn from_str_setting(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "conversation" | "conversation_open" | "conversation-open" => Self::Conversation,
            _ => Self::Sidebar,
        }
    }
}

/// Everything one window's poll loop needs to know.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub poll_interval: Duration,
    pub reset_threshold: u32,
    pub key_policy: KeyPolicy,
    pub trigger: ExtractTrigger,
    pub strategy: ExtractionStrategy,
    pub min_font_weight: u16,
    pub settle_delay: Duration,
    pub icon: Option<PathBuf>,
    pub silent: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            reset_threshold: DEFAULT_RESET_THRESHOLD,
            key_policy: KeyPolicy::default(),
            trigger: ExtractTrigger::default(),
            strategy: ExtractionStrategy::default(),
            min_font_weight: DEFAULT_MIN_FONT_WEIGHT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            icon: None,
            silent: false,
        }
    }
}
