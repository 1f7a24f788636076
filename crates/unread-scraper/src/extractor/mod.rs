//! Preview extraction strategies.
//!
//! Both strategies share the sidebar snapshot and the unread predicate; they
//! differ in where the preview text comes from.

pub mod conversation;
pub mod heuristics;
pub mod predicate;
pub mod sidebar;

use std::future::Future;

pub use conversation::ConversationExtractor;
pub use predicate::{FontWeightPredicate, UnreadPredicate};
pub use sidebar::SidebarExtractor;

use crate::Result;
use crate::config::{ExtractionStrategy, WatchConfig};
use crate::host::PageHost;
use crate::preview::{ChatPreview, is_plausible_name};
use crate::script::{RowSnapshot, SidebarSnapshot};

/// Produces `(chat name, preview)` pairs for chats currently flagged unread.
///
/// A failure for one row yields the "New message" sentinel for that row; an
/// `Err` means the page could not be read at all this tick.
pub trait PreviewExtractor: Send + Sync {
    fn extract<H: PageHost>(&self, host: &H) -> impl Future<Output = Result<Vec<ChatPreview>>> + Send;
}

/// The configured strategy.
#[derive(Clone)]
pub enum Extractor {
    Sidebar(SidebarExtractor),
    Conversation(ConversationExtractor),
}

impl Extractor {
    /// Build the strategy named by `config` with the font-weight predicate.
    pub fn from_config(config: &WatchConfig) -> Self {
        let predicate = FontWeightPredicate::new(config.min_font_weight);
        match config.strategy {
            ExtractionStrategy::Sidebar => Self::Sidebar(SidebarExtractor::new(predicate)),
            ExtractionStrategy::Conversation => {
                Self::Conversation(ConversationExtractor::new(predicate, config.settle_delay))
            }
        }
    }

    pub fn strategy(&self) -> ExtractionStrategy {
        match self {
            Self::Sidebar(_) => ExtractionStrategy::Sidebar,
            Self::Conversation(_) => ExtractionStrategy::Conversation,
        }
    }
}

impl PreviewExtractor for Extractor {
    async fn extract<H: PageHost>(&self, host: &H) -> Result<Vec<ChatPreview>> {
        match self {
            Self::Sidebar(inner) => inner.extract(host).await,
            Self::Conversation(inner) => inner.extract(host).await,
        }
    }
}

/// Rows with a plausible chat name that the predicate marks unread.
pub(crate) fn unread_rows<'a>(
    snapshot: &'a SidebarSnapshot,
    predicate: &'a dyn UnreadPredicate,
) -> impl Iterator<Item = &'a RowSnapshot> + 'a {
    snapshot
        .rows
        .iter()
        .filter(|row| is_plausible_name(&row.name))
        .filter(move |row| predicate.is_unread(row))
}
