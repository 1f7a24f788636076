//! Scripts evaluated inside the embedded page and the snapshots they return.
//!
//! The scripts only collect raw DOM data; every heuristic runs on the Rust
//! side against the deserialized snapshot.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const SNAPSHOT_SIDEBAR_JS: &str = include_str!("scripts/snapshot_sidebar.js");
const OPEN_ROW_JS: &str = include_str!("scripts/open_row.js");
const SNAPSHOT_CONVERSATION_JS: &str = include_str!("scripts/snapshot_conversation.js");
const OPEN_BY_TEXT_JS: &str = include_str!("scripts/open_by_text.js");

/// A script the extractors may run in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageScript {
    /// Collect every sidebar row plus the currently open conversation.
    SnapshotSidebar,
    /// Click the row at `index` if it still shows `name`. Yields a bool.
    OpenRow { index: usize, name: String },
    /// Collect the message rows of the open conversation, oldest first.
    SnapshotConversation,
    /// Click the first row whose visible text contains `text`. Yields a bool.
    OpenByText { text: String },
}

impl PageScript {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SnapshotSidebar => "snapshot_sidebar",
            Self::OpenRow { .. } => "open_row",
            Self::SnapshotConversation => "snapshot_conversation",
            Self::OpenByText { .. } => "open_by_text",
        }
    }

    /// Render to a single JS expression whose value is the script result.
    pub fn source(&self) -> String {
        let (body, args) = match self {
            Self::SnapshotSidebar => (SNAPSHOT_SIDEBAR_JS, Value::Null),
            Self::OpenRow { index, name } => (OPEN_ROW_JS, json!({ "index": index, "name": name })),
            Self::SnapshotConversation => (SNAPSHOT_CONVERSATION_JS, Value::Null),
            Self::OpenByText { text } => (OPEN_BY_TEXT_JS, json!({ "text": text })),
        };
        format!("({})({})", body.trim(), args)
    }
}

/// Result of [`PageScript::SnapshotSidebar`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarSnapshot {
    #[serde(default)]
    pub rows: Vec<RowSnapshot>,
    /// Name of the conversation open when the snapshot was taken.
    #[serde(default)]
    pub active: Option<String>,
}

/// One sidebar entry: its name span and the spans after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSnapshot {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    /// Computed `font-weight` of the name span, as the page reports it.
    #[serde(default)]
    pub font_weight: String,
    #[serde(default)]
    pub texts: Vec<String>,
}

/// Result of [`PageScript::SnapshotConversation`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSnapshot {
    #[serde(default)]
    pub messages: Vec<MessageSnapshot>,
}

/// One message row of an open conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSnapshot {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub has_photo: bool,
    #[serde(default)]
    pub has_video: bool,
    #[serde(default)]
    pub texts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_are_embedded_as_json() {
        let src = PageScript::OpenByText {
            text: "O'Brien \"Team\"".into(),
        }
        .source();
        assert!(src.ends_with(r#"({"text":"O'Brien \"Team\""})"#));
        assert!(src.starts_with("((args) =>"));
    }

    #[test]
    fn argumentless_scripts_receive_null() {
        let src = PageScript::SnapshotSidebar.source();
        assert!(src.ends_with("(null)"));
        assert!(src.contains("span[dir=\"auto\"]"));
    }

    #[test]
    fn sidebar_snapshot_tolerates_missing_fields() {
        let snap: SidebarSnapshot = serde_json::from_value(json!({
            "rows": [{ "index": 2, "name": "Bob" }]
        }))
        .unwrap();
        assert_eq!(snap.rows[0].index, 2);
        assert_eq!(snap.rows[0].font_weight, "");
        assert!(snap.rows[0].texts.is_empty());
        assert_eq!(snap.active, None);
    }

    #[test]
    fn conversation_snapshot_uses_camel_case() {
        let snap: ConversationSnapshot = serde_json::from_value(json!({
            "messages": [{ "label": null, "hasPhoto": true, "hasVideo": false, "texts": [] }]
        }))
        .unwrap();
        assert!(snap.messages[0].has_photo);
        assert!(!snap.messages[0].has_video);
    }
}
