use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;
use unread_scraper::PermissionPolicy;

use crate::bridge::ScriptBridge;
use crate::config::AppConfig;

/// Application shared state, managed by Tauri and cloned into every poll loop.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    config: AppConfig,
    policy: PermissionPolicy,
    /// Icon attached to notifications that do not bring their own
    notification_icon: Option<PathBuf>,
    shutdown_token: CancellationToken,
    bridge: ScriptBridge,
    /// Latest page title reported by each window
    titles: Mutex<HashMap<String, String>>,
    /// Poll-loop cancellation per window label
    watchers: Mutex<HashMap<String, CancellationToken>>,
}

impl SharedState {
    pub fn new(config: AppConfig, notification_icon: Option<PathBuf>) -> Self {
        let policy = if config.notifications_enabled {
            PermissionPolicy::new()
        } else {
            PermissionPolicy::new().without_notifications()
        };

        Self {
            inner: Arc::new(SharedStateInner {
                config,
                policy,
                notification_icon,
                shutdown_token: CancellationToken::new(),
                bridge: ScriptBridge::default(),
                titles: Mutex::new(HashMap::new()),
                watchers: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn policy(&self) -> &PermissionPolicy {
        &self.inner.policy
    }

    pub fn notification_icon(&self) -> Option<PathBuf> {
        self.inner.notification_icon.clone()
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }

    pub fn bridge(&self) -> &ScriptBridge {
        &self.inner.bridge
    }

    /// Last title `label` reported, or the configured window title.
    pub fn page_title(&self, label: &str) -> String {
        lock(&self.inner.titles)
            .get(label)
            .cloned()
            .unwrap_or_else(|| self.inner.config.window_title.clone())
    }

    /// Record a reported title. Returns `false` if it did not change.
    pub fn set_page_title(&self, label: &str, title: &str) -> bool {
        let mut titles = lock(&self.inner.titles);
        if titles.get(label).is_some_and(|t| t == title) {
            return false;
        }
        titles.insert(label.to_string(), title.to_string());
        true
    }

    /// Register the poll loop of `label`, cancelling any previous one.
    pub fn replace_watcher(&self, label: &str, token: CancellationToken) {
        if let Some(previous) = lock(&self.inner.watchers).insert(label.to_string(), token) {
            previous.cancel();
        }
    }

    /// Cancel the poll loop of `label` and forget its title.
    pub fn remove_window(&self, label: &str) -> bool {
        lock(&self.inner.titles).remove(label);
        match lock(&self.inner.watchers).remove(label) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every poll loop. Returns how many were running.
    pub fn cancel_all_watchers(&self) -> usize {
        let mut watchers = lock(&self.inner.watchers);
        let count = watchers.len();
        for (_, token) in watchers.drain() {
            token.cancel();
        }
        count
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
