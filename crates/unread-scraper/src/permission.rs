//! Which web permissions the embedded page gets.

use serde::{Deserialize, Serialize};

/// A permission requested by page content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    Notifications,
    /// Camera and microphone, for calls.
    Media,
    Geolocation,
    Clipboard,
    MidiSysex,
    Other(String),
}

impl PermissionKind {
    /// Map a Permissions API name (`"notifications"`, `"camera"`, ...).
    pub fn from_web_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "notifications" | "push" => Self::Notifications,
            "camera" | "microphone" | "media" | "speaker-selection" => Self::Media,
            "geolocation" => Self::Geolocation,
            "clipboard-read" | "clipboard-write" | "clipboard" => Self::Clipboard,
            "midi" | "midi-sysex" => Self::MidiSysex,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Granted,
    Denied,
}

impl Decision {
    /// Value reported to the page as `Notification.permission` or a
    /// `PermissionStatus.state`.
    pub fn as_web_state(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// Grants notifications and media, denies everything else.
#[derive(Debug, Clone)]
pub struct PermissionPolicy {
    notifications: bool,
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionPolicy {
    pub fn new() -> Self {
        Self {
            notifications: true,
        }
    }

    /// Deny notifications too, e.g. when native notifications are disabled.
    pub fn without_notifications(mut self) -> Self {
        self.notifications = false;
        self
    }

    pub fn decide(&self, kind: &PermissionKind) -> Decision {
        let granted = match kind {
            PermissionKind::Notifications => self.notifications,
            PermissionKind::Media => true,
            PermissionKind::Geolocation
            | PermissionKind::Clipboard
            | PermissionKind::MidiSysex
            | PermissionKind::Other(_) => false,
        };
        let decision = if granted {
            Decision::Granted
        } else {
            Decision::Denied
        };
        tracing::debug!(?kind, ?decision, "Permission decision");
        decision
    }

    /// Decide by Permissions API name.
    pub fn decide_web(&self, name: &str) -> Decision {
        self.decide(&PermissionKind::from_web_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_and_media_are_granted() {
        let policy = PermissionPolicy::new();
        assert_eq!(policy.decide(&PermissionKind::Notifications), Decision::Granted);
        assert_eq!(policy.decide_web("camera"), Decision::Granted);
        assert_eq!(policy.decide_web("microphone"), Decision::Granted);
    }

    #[test]
    fn everything_else_is_denied() {
        let policy = PermissionPolicy::new();
        for name in ["geolocation", "clipboard-read", "midi-sysex", "persistent-storage"] {
            assert_eq!(policy.decide_web(name), Decision::Denied, "{name}");
        }
    }

    #[test]
    fn unknown_names_are_kept() {
        assert_eq!(
            PermissionKind::from_web_name("Bluetooth"),
            PermissionKind::Other("bluetooth".into())
        );
    }

    #[test]
    fn notifications_can_be_switched_off() {
        let policy = PermissionPolicy::new().without_notifications();
        assert_eq!(policy.decide_web("notifications"), Decision::Denied);
        assert_eq!(policy.decide_web("camera"), Decision::Granted);
        assert_eq!(Decision::Denied.as_web_state(), "denied");
    }
}
