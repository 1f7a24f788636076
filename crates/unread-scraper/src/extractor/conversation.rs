//! Preview from the opened conversation.
//!
//! Clicks each unread row, waits for the pane to render and reads the latest
//! incoming message. This changes which conversation is open, so the scan is
//! wrapped in a [`RestoreScope`] that re-opens the original conversation
//! afterwards. Callers must not run two scans against the same page at once.

use std::sync::Arc;
use std::time::Duration;

use crate::Result;
use crate::host::{PageHost, run_typed};
use crate::preview::ChatPreview;
use crate::script::{ConversationSnapshot, PageScript, RowSnapshot, SidebarSnapshot};

use super::heuristics::latest_incoming_preview;
use super::predicate::UnreadPredicate;
use super::{PreviewExtractor, unread_rows};

#[derive(Clone)]
pub struct ConversationExtractor {
    predicate: Arc<dyn UnreadPredicate>,
    settle_delay: Duration,
}

impl ConversationExtractor {
    pub fn new(predicate: impl UnreadPredicate + 'static, settle_delay: Duration) -> Self {
        Self {
            predicate: Arc::new(predicate),
            settle_delay,
        }
    }

    async fn preview_for_row<H: PageHost>(&self, host: &H, row: &RowSnapshot) -> ChatPreview {
        let open = PageScript::OpenRow {
            index: row.index,
            name: row.name.clone(),
        };
        match run_typed::<_, bool>(host, &open).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(chat = %row.name, index = row.index, "Row moved before it could be opened");
                return ChatPreview::sentinel(row.name.clone());
            }
            Err(e) => {
                tracing::warn!(chat = %row.name, "Failed to open conversation: {e}");
                return ChatPreview::sentinel(row.name.clone());
            }
        }

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        match run_typed::<_, ConversationSnapshot>(host, &PageScript::SnapshotConversation).await {
            Ok(snapshot) => ChatPreview::new(row.name.clone(), latest_incoming_preview(&snapshot.messages)),
            Err(e) => {
                tracing::warn!(chat = %row.name, "Failed to read conversation: {e}");
                ChatPreview::sentinel(row.name.clone())
            }
        }
    }
}

impl PreviewExtractor for ConversationExtractor {
    async fn extract<H: PageHost>(&self, host: &H) -> Result<Vec<ChatPreview>> {
        let sidebar: SidebarSnapshot = run_typed(host, &PageScript::SnapshotSidebar).await?;
        let unread: Vec<&RowSnapshot> = unread_rows(&sidebar, self.predicate.as_ref()).collect();
        if unread.is_empty() {
            return Ok(Vec::new());
        }

        let scope = RestoreScope::new(sidebar.active.clone());
        let mut previews = Vec::with_capacity(unread.len());
        for row in unread {
            if !host.is_alive() {
                break;
            }
            previews.push(self.preview_for_row(host, row).await);
        }
        scope.restore(host).await;

        Ok(previews)
    }
}

/// Remembers the conversation open before a scan and re-opens it.
///
/// Matching is by substring of the row's visible text, so a chat whose
/// name is a prefix of another's may restore the wrong row.
struct RestoreScope {
    target: Option<String>,
    restored: bool,
}

impl RestoreScope {
    fn new(target: Option<String>) -> Self {
        Self {
            target,
            restored: false,
        }
    }

    async fn restore<H: PageHost>(mut self, host: &H) {
        self.restored = true;
        let Some(text) = self.target.take() else {
            tracing::debug!("No conversation was open before the scan");
            return;
        };
        match run_typed::<_, bool>(host, &PageScript::OpenByText { text: text.clone() }).await {
            Ok(true) => tracing::debug!(chat = %text, "Restored open conversation"),
            Ok(false) => tracing::warn!(chat = %text, "Original conversation not found for restore"),
            Err(e) => tracing::warn!(chat = %text, "Failed to restore conversation: {e}"),
        }
    }
}

impl Drop for RestoreScope {
    fn drop(&mut self) {
        if !self.restored {
            if let Some(text) = &self.target {
                tracing::debug!(chat = %text, "Conversation scan abandoned before restore");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::ScrapeError;
    use crate::extractor::predicate::FontWeightPredicate;
    use crate::preview::NEW_MESSAGE;
    use crate::testing::FakeHost;

    fn extractor() -> ConversationExtractor {
        ConversationExtractor::new(FontWeightPredicate::new(600), Duration::ZERO)
    }

    fn sidebar() -> serde_json::Value {
        json!({
            "rows": [
                { "index": 0, "name": "Alice", "fontWeight": "700", "texts": ["hi", "1m"] },
                { "index": 1, "name": "Carol", "fontWeight": "400", "texts": ["old", "2d"] },
                { "index": 2, "name": "Bob", "fontWeight": "700", "texts": ["yo", "3m"] }
            ],
            "active": "Carol"
        })
    }

    /// Host that tracks which conversation is open and answers with its messages.
    fn messenger_host() -> FakeHost {
        let open = Mutex::new(String::from("Carol"));
        FakeHost::new("Messenger (2)", move |script| match script {
            PageScript::SnapshotSidebar => Ok(sidebar()),
            PageScript::OpenRow { name, .. } => {
                *open.lock().unwrap() = name.clone();
                Ok(json!(true))
            }
            PageScript::OpenByText { text } => {
                *open.lock().unwrap() = text.clone();
                Ok(json!(true))
            }
            PageScript::SnapshotConversation => {
                let messages = match open.lock().unwrap().as_str() {
                    "Alice" => json!([
                        { "label": "You sent: earlier", "texts": [] },
                        { "label": "Alice sent: see you at 5", "texts": [] }
                    ]),
                    "Bob" => json!([
                        { "label": null, "hasPhoto": true, "texts": [] }
                    ]),
                    _ => json!([]),
                };
                Ok(json!({ "messages": messages }))
            }
        })
    }

    #[tokio::test]
    async fn reads_latest_incoming_message_of_each_unread_chat() {
        let host = messenger_host();
        let previews = extractor().extract(&host).await.unwrap();
        assert_eq!(
            previews,
            vec![
                ChatPreview::new("Alice", "see you at 5"),
                ChatPreview::new("Bob", "Sent a photo"),
            ]
        );
    }

    #[tokio::test]
    async fn reopens_the_original_conversation_afterwards() {
        let host = messenger_host();
        extractor().extract(&host).await.unwrap();

        assert_eq!(
            host.call_names(),
            vec![
                "snapshot_sidebar",
                "open_row",
                "snapshot_conversation",
                "open_row",
                "snapshot_conversation",
                "open_by_text",
            ]
        );
        assert_eq!(
            host.calls().last(),
            Some(&PageScript::OpenByText {
                text: "Carol".into()
            })
        );
    }

    #[tokio::test]
    async fn row_that_cannot_be_opened_gets_sentinel() {
        let host = FakeHost::new("Messenger (1)", |script| match script {
            PageScript::SnapshotSidebar => Ok(json!({
                "rows": [{ "index": 0, "name": "Dana", "fontWeight": "bold", "texts": [] }],
                "active": "Eve"
            })),
            PageScript::OpenRow { .. } => Ok(json!(false)),
            PageScript::OpenByText { .. } => Ok(json!(true)),
            PageScript::SnapshotConversation => Err(ScrapeError::Script("not reached".into())),
        });

        let previews = extractor().extract(&host).await.unwrap();
        assert_eq!(previews, vec![ChatPreview::new("Dana", NEW_MESSAGE)]);
        assert!(!host.call_names().contains(&"snapshot_conversation"));
        assert_eq!(host.call_names().last(), Some(&"open_by_text"));
    }

    #[tokio::test]
    async fn conversation_read_failure_gets_sentinel() {
        let host = FakeHost::new("Messenger (1)", |script| match script {
            PageScript::SnapshotSidebar => Ok(json!({
                "rows": [{ "index": 0, "name": "Dana", "fontWeight": "700", "texts": [] }]
            })),
            PageScript::SnapshotConversation => Err(ScrapeError::Timeout(10)),
            _ => Ok(json!(true)),
        });

        let previews = extractor().extract(&host).await.unwrap();
        assert_eq!(previews, vec![ChatPreview::sentinel("Dana")]);
        assert!(!host.call_names().contains(&"open_by_text"));
    }

    #[tokio::test]
    async fn nothing_unread_opens_nothing() {
        let host = FakeHost::new("Messenger", |script| match script {
            PageScript::SnapshotSidebar => Ok(json!({
                "rows": [{ "index": 0, "name": "Carol", "fontWeight": "400", "texts": ["old"] }],
                "active": "Carol"
            })),
            _ => Err(ScrapeError::Script("unexpected".into())),
        });

        assert!(extractor().extract(&host).await.unwrap().is_empty());
        assert_eq!(host.call_names(), vec!["snapshot_sidebar"]);
    }

    #[tokio::test]
    async fn sidebar_failure_is_an_error() {
        let host = FakeHost::new("Messenger (1)", |_| Err(ScrapeError::Script("boom".into())));
        assert!(extractor().extract(&host).await.is_err());
    }
}
