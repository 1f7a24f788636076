//! Text heuristics shared by the extractors.

use std::sync::LazyLock;

use regex::Regex;

use crate::preview::{NEW_MESSAGE, SENT_PHOTO, SENT_VIDEO};
use crate::script::MessageSnapshot;

static RE_RELATIVE_TIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[mhwd]$").unwrap());
static RE_CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d{1,2}:\d{2}(\s?[ap]\.?m\.?)?$").unwrap());
static RE_LABEL_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\b(?:sent|said):?\s+(.+)$").unwrap());

const SELF_MARKERS: &[&str] = &["you sent", "you said", "you reacted"];

const NOISE_WORDS: &[&str] = &[
    "seen",
    "delivered",
    "sent",
    "sending",
    "active now",
    "enter",
    "reply",
    "react",
    "more",
    "forward",
    "edited",
];

/// `1m`, `2h`, `12w`, `3d`.
pub fn is_relative_timestamp(text: &str) -> bool {
    RE_RELATIVE_TIME.is_match(text)
}

/// Accessible label of a message the local user sent or reacted to.
pub fn is_self_message(label: &str) -> bool {
    let lower = label.to_lowercase();
    SELF_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Message text from a `"<Actor> sent <text>"` / `"<Actor> said <text>"` label.
pub fn label_text(label: &str) -> Option<String> {
    let caps = RE_LABEL_TEXT.captures(label)?;
    let text = caps[1].trim();
    if text.is_empty() {
        return None;
    }
    let lower = text.to_lowercase();
    if lower.starts_with("a photo") || lower.starts_with("photos") {
        return Some(SENT_PHOTO.to_string());
    }
    if lower.starts_with("a video") {
        return Some(SENT_VIDEO.to_string());
    }
    Some(text.to_string())
}

/// Reaction, presence and timestamp strings found inside message bubbles.
pub fn is_noise(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || is_relative_timestamp(text) || RE_CLOCK_TIME.is_match(text) {
        return true;
    }
    let lower = text.to_lowercase();
    if NOISE_WORDS.contains(&lower.as_str()) {
        return true;
    }
    if lower.starts_with("active ") && lower.ends_with(" ago") {
        return true;
    }
    lower.contains("reacted")
}

/// Preview text for the most recent message not sent by the local user.
///
/// `messages` is ordered oldest first. Falls back to the "New message"
/// sentinel when nothing usable is found.
pub fn latest_incoming_preview(messages: &[MessageSnapshot]) -> String {
    let incoming = messages.iter().rev().find(|msg| {
        msg.label
            .as_deref()
            .is_none_or(|label| !is_self_message(label))
    });
    let Some(msg) = incoming else {
        return NEW_MESSAGE.to_string();
    };

    if let Some(text) = msg.label.as_deref().and_then(label_text) {
        return text;
    }
    if msg.has_photo {
        return SENT_PHOTO.to_string();
    }
    if msg.has_video {
        return SENT_VIDEO.to_string();
    }
    msg.texts
        .iter()
        .map(|t| t.trim())
        .find(|t| !is_noise(t))
        .map(str::to_string)
        .unwrap_or_else(|| NEW_MESSAGE.to_string())
}
