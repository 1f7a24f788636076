//! Turning previews into native notification requests.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::NotifyError;
use crate::preview::ChatPreview;

/// What the platform is asked to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub icon: Option<PathBuf>,
    pub silent: bool,
}

/// Platform notification backend. Activating a shown notification is
/// expected to restore and focus the host window.
pub trait Notifier: Send + Sync {
    fn is_supported(&self) -> bool;

    fn show(&self, request: &NotificationRequest) -> Result<(), NotifyError>;
}

/// Wraps a [`Notifier`] so that failures are logged and never propagate.
pub struct Dispatcher<N> {
    notifier: N,
    icon: Option<PathBuf>,
    silent: bool,
}

impl<N: Notifier> Dispatcher<N> {
    pub fn new(notifier: N, icon: Option<PathBuf>, silent: bool) -> Self {
        Self {
            notifier,
            icon,
            silent,
        }
    }

    /// Request for a scraped preview, with the default icon and silence.
    fn request_for(&self, preview: &ChatPreview) -> NotificationRequest {
        NotificationRequest {
            title: preview.name.clone(),
            body: preview.preview.clone(),
            icon: self.icon.clone(),
            silent: self.silent,
        }
    }

    /// Show a notification for `preview`. Returns whether it was handed to
    /// the platform.
    pub fn dispatch(&self, preview: &ChatPreview) -> bool {
        let request = self.request_for(preview);
        self.dispatch_request(&request)
    }

    /// Show an arbitrary request, filling in the default icon when missing.
    pub fn dispatch_request(&self, request: &NotificationRequest) -> bool {
        if !self.notifier.is_supported() {
            tracing::error!(title = %request.title, "Notifications are not supported on this system");
            return false;
        }

        let filled;
        let request = if request.icon.is_none() && self.icon.is_some() {
            filled = NotificationRequest {
                icon: self.icon.clone(),
                ..request.clone()
            };
            &filled
        } else {
            request
        };

        match self.notifier.show(request) {
            Ok(()) => {
                tracing::info!(title = %request.title, "Notification sent");
                true
            }
            Err(e) => {
                tracing::error!(title = %request.title, "Error showing notification: {e}");
                false
            }
        }
    }
}
