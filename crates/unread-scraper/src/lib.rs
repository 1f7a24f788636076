//! Unread-message detection for an embedded web messenger.
//!
//! Reads the unread count from the page title, scrapes sender names and
//! message previews out of the page DOM, de-duplicates them, and hands new
//! items to a native notification backend.

pub mod config;
pub mod dedup;
pub mod dispatch;
pub mod extractor;
pub mod host;
pub mod permission;
pub mod poll;
pub mod preview;
pub mod script;
pub mod title;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ExtractTrigger, ExtractionStrategy, KeyPolicy, WatchConfig};
pub use dedup::Deduplicator;
pub use dispatch::{Dispatcher, NotificationRequest, Notifier};
pub use extractor::{Extractor, PreviewExtractor};
pub use host::PageHost;
pub use permission::{Decision, PermissionKind, PermissionPolicy};
pub use poll::{PollLoop, TickReport};
pub use preview::ChatPreview;
pub use script::PageScript;
pub use title::unread_count;

/// Errors raised while talking to the embedded page.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("page script failed: {0}")]
    Script(String),

    #[error("page script timed out after {0} ms")]
    Timeout(u64),

    #[error("host window is gone")]
    HostGone,

    #[error("unexpected script result: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a notification backend.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notifications are not supported on this platform")]
    Unsupported,

    #[error("notification backend failed: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
