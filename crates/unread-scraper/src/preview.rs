//! Chat name / message preview pairs and the limits applied to them.

use serde::{Deserialize, Serialize};

use crate::config::KeyPolicy;

/// Longest sidebar text accepted as a chat name.
pub const MAX_NAME_CHARS: usize = 50;
/// Previews are cut to this many characters before dispatch.
pub const MAX_PREVIEW_CHARS: usize = 100;

pub const NEW_MESSAGE: &str = "New message";
pub const SENT_PHOTO: &str = "Sent a photo";
pub const SENT_VIDEO: &str = "Sent a video";

/// One unread chat as surfaced by an extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPreview {
    pub name: String,
    pub preview: String,
}

impl ChatPreview {
    /// Build a preview, truncating the text and substituting the
    /// "New message" sentinel when nothing usable was found.
    pub fn new(name: impl Into<String>, preview: impl AsRef<str>) -> Self {
        let preview = truncate_chars(preview.as_ref().trim(), MAX_PREVIEW_CHARS);
        Self {
            name: name.into(),
            preview: if preview.is_empty() {
                NEW_MESSAGE.to_string()
            } else {
                preview
            },
        }
    }

    pub fn sentinel(name: impl Into<String>) -> Self {
        Self::new(name, NEW_MESSAGE)
    }

    /// De-duplication identity under the given policy.
    pub fn key(&self, policy: KeyPolicy) -> String {
        match policy {
            KeyPolicy::Composite => format!("{}:{}", self.name, self.preview),
            KeyPolicy::ChatName => self.name.clone(),
        }
    }
}

/// Whether a sidebar text can be a chat name.
pub fn is_plausible_name(name: &str) -> bool {
    let len = name.chars().count();
    len > 0 && len <= MAX_NAME_CHARS
}

/// Keep at most `max` Unicode scalar values.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
