//! Native desktop notifications.
//!
//! notify-rust on freedesktop targets, mac-notification-sys on macOS and WinRT
//! toasts on Windows. Clicking a notification restores and focuses the window
//! it was raised for.

use std::sync::atomic::{AtomicUsize, Ordering};

use tauri::AppHandle;
use unread_scraper::{NotificationRequest, Notifier, NotifyError};

/// Threads allowed to sit blocked waiting for a click at once. Beyond this,
/// notifications are shown without click handling.
#[cfg_attr(target_os = "windows", allow(dead_code))]
const MAX_CLICK_WAITERS: usize = 16;

#[cfg(not(target_os = "windows"))]
static CLICK_WAITERS: ClickWaiters = ClickWaiters::new(MAX_CLICK_WAITERS);

/// Shows notifications for one window.
#[derive(Clone)]
pub struct NativeNotifier {
    app: AppHandle,
    label: String,
}

impl NativeNotifier {
    pub fn new(app: AppHandle, label: impl Into<String>) -> Self {
        Self {
            app,
            label: label.into(),
        }
    }

    fn respond(&self, response: Response) {
        respond(&self.app, &self.label, response);
    }
}

/// How the user left a shown notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Response {
    Activated,
    Dismissed,
}

impl Response {
    /// freedesktop action key, as reported by `wait_for_action`.
    #[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
    fn from_action(action: &str) -> Self {
        match action {
            "default" => Self::Activated,
            _ => Self::Dismissed,
        }
    }

    #[cfg(target_os = "macos")]
    fn from_mac(response: &mac_notification_sys::NotificationResponse) -> Self {
        use mac_notification_sys::NotificationResponse;

        match response {
            NotificationResponse::Click | NotificationResponse::ActionButton(_) => Self::Activated,
            _ => Self::Dismissed,
        }
    }

    fn focuses_window(self) -> bool {
        self == Self::Activated
    }
}

fn respond(app: &AppHandle, label: &str, response: Response) {
    if response.focuses_window() {
        crate::window::focus_window(app, label);
    }
}

/// Counts threads parked on a notification.
#[cfg_attr(target_os = "windows", allow(dead_code))]
struct ClickWaiters {
    active: AtomicUsize,
    limit: usize,
}

#[cfg_attr(target_os = "windows", allow(dead_code))]
impl ClickWaiters {
    const fn new(limit: usize) -> Self {
        Self {
            active: AtomicUsize::new(0),
            limit,
        }
    }

    fn try_acquire(&self) -> Option<ClickSlot<'_>> {
        self.active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.limit).then_some(n + 1)
            })
            .ok()
            .map(|_| ClickSlot(self))
    }

    #[cfg(test)]
    fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// Released when the waiting thread returns.
#[cfg_attr(target_os = "windows", allow(dead_code))]
struct ClickSlot<'a>(&'a ClickWaiters);

impl Drop for ClickSlot<'_> {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Notifier for NativeNotifier {
    fn is_supported(&self) -> bool {
        cfg!(any(
            target_os = "linux",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly",
            target_os = "macos",
            target_os = "windows"
        ))
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn show(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        let mut notification = notify_rust::Notification::new();
        notification
            .appname(APP_NAME)
            .summary(&request.title)
            .body(&request.body);
        if let Some(icon) = &request.icon {
            notification.icon(&icon.to_string_lossy());
        }
        if request.silent {
            notification.hint(notify_rust::Hint::SuppressSound(true));
        }

        let Some(slot) = CLICK_WAITERS.try_acquire() else {
            tracing::debug!("Too many notifications awaiting a click, showing without one");
            return notification
                .show()
                .map(|_| ())
                .map_err(|e| NotifyError::Backend(e.to_string()));
        };

        notification.action("default", "Open");
        let handle = notification
            .show()
            .map_err(|e| NotifyError::Backend(e.to_string()))?;

        let notifier = self.clone();
        tauri::async_runtime::spawn_blocking(move || {
            let _slot = slot;
            handle.wait_for_action(|action| notifier.respond(Response::from_action(action)));
        });
        Ok(())
    }

    #[cfg(target_os = "macos")]
    fn show(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        register_mac_application(&self.app);
        let title = request.title.clone();
        let body = request.body.clone();
        let icon = request.icon.as_ref().map(|p| p.to_string_lossy().into_owned());
        let silent = request.silent;

        let Some(slot) = CLICK_WAITERS.try_acquire() else {
            tracing::debug!("Too many notifications awaiting a click, showing without one");
            return send_mac(&title, &body, icon.as_deref(), silent, false).map(|_| ());
        };

        // Waiting for the click blocks inside the send call.
        let notifier = self.clone();
        tauri::async_runtime::spawn_blocking(move || {
            let _slot = slot;
            match send_mac(&title, &body, icon.as_deref(), silent, true) {
                Ok(response) => notifier.respond(Response::from_mac(&response)),
                Err(e) => tracing::warn!(title, "Failed to show notification: {e}"),
            }
        });
        Ok(())
    }

    #[cfg(target_os = "windows")]
    fn show(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        use tauri::Manager;
        use tauri_winrt_notification::{IconCrop, Sound, Toast};

        let app_id = if cfg!(debug_assertions) {
            Toast::POWERSHELL_APP_ID.to_string()
        } else {
            self.app.config().identifier.clone()
        };
        let notifier = self.clone();
        let mut toast = Toast::new(&app_id)
            .title(&request.title)
            .text1(&request.body)
            .sound(if request.silent { None } else { Some(Sound::Default) })
            .on_activated(move |_action| {
                notifier.respond(Response::Activated);
                Ok(())
            });
        if let Some(icon) = &request.icon {
            toast = toast.icon(icon, IconCrop::Square, "");
        }
        toast
            .show()
            .map_err(|e| NotifyError::Backend(format!("{e:?}")))
    }

    #[cfg(not(any(unix, target_os = "windows")))]
    fn show(&self, _request: &NotificationRequest) -> Result<(), NotifyError> {
        Err(NotifyError::Unsupported)
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
const APP_NAME: &str = "Messenger Desktop";

#[cfg(target_os = "macos")]
fn register_mac_application(app: &AppHandle) {
    use tauri::Manager;

    static REGISTER: std::sync::Once = std::sync::Once::new();

    REGISTER.call_once(|| {
        let identifier = &app.config().identifier;
        if let Err(e) = mac_notification_sys::set_application(identifier) {
            tracing::debug!(identifier, "Notifications will use the default sender: {e}");
        }
    });
}

#[cfg(target_os = "macos")]
fn send_mac(
    title: &str,
    body: &str,
    icon: Option<&str>,
    silent: bool,
    wait_for_click: bool,
) -> Result<mac_notification_sys::NotificationResponse, NotifyError> {
    let mut notification = mac_notification_sys::Notification::new();
    notification
        .title(title)
        .message(body)
        .wait_for_click(wait_for_click);
    if let Some(icon) = icon {
        notification.app_icon(icon);
    }
    if !silent {
        notification.sound(mac_notification_sys::Sound::Default);
    }
    notification
        .send()
        .map_err(|e| NotifyError::Backend(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_activation_focuses_window() {
        assert!(Response::Activated.focuses_window());
        assert!(!Response::Dismissed.focuses_window());
    }

    #[test]
    fn test_freedesktop_actions() {
        assert_eq!(Response::from_action("default"), Response::Activated);
        assert_eq!(Response::from_action("__closed"), Response::Dismissed);
        assert_eq!(Response::from_action("reply"), Response::Dismissed);
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_mac_responses() {
        use mac_notification_sys::NotificationResponse;

        assert_eq!(Response::from_mac(&NotificationResponse::Click), Response::Activated);
        assert_eq!(Response::from_mac(&NotificationResponse::None), Response::Dismissed);
        assert_eq!(
            Response::from_mac(&NotificationResponse::CloseButton("Close".into())),
            Response::Dismissed
        );
    }

    #[test]
    fn test_click_waiters_are_bounded() {
        let waiters = ClickWaiters::new(2);
        let first = waiters.try_acquire().unwrap();
        let _second = waiters.try_acquire().unwrap();
        assert!(waiters.try_acquire().is_none());
        assert_eq!(waiters.active(), 2);

        drop(first);
        assert_eq!(waiters.active(), 1);
        assert!(waiters.try_acquire().is_some());
        assert_eq!(waiters.active(), 1);
    }
}
