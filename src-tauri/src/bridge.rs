//! Running scripts in a webview and getting their results back.
//!
//! `eval` has no return channel, so every call is wrapped in a snippet that
//! posts its value to the `script_result` command under a request id. The
//! bridge keeps one oneshot per outstanding id.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tauri::{Manager, WebviewWindow};
use tokio::sync::oneshot;
use unread_scraper::{PageHost, PageScript, ScrapeError};

use crate::app::SharedState;

/// What the page posted back for one request.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptReply {
    pub ok: bool,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub error: Option<String>,
}

impl ScriptReply {
    pub fn into_result(self) -> unread_scraper::Result<Value> {
        if self.ok {
            return Ok(self.value);
        }
        Err(ScrapeError::Script(
            self.error.unwrap_or_else(|| "script failed without a message".into()),
        ))
    }
}

#[derive(Default)]
pub struct ScriptBridge {
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, oneshot::Sender<ScriptReply>>>,
}

impl ScriptBridge {
    /// Allocate a request id and the receiver its reply will arrive on.
    pub fn register(&self) -> (u64, oneshot::Receiver<ScriptReply>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = oneshot::channel();
        self.pending().insert(id, tx);
        (id, rx)
    }

    /// Deliver a reply. Unknown or already-resolved ids are ignored.
    pub fn resolve(&self, id: u64, reply: ScriptReply) -> bool {
        let Some(tx) = self.pending().remove(&id) else {
            tracing::debug!(id, "Reply for unknown script request");
            return false;
        };
        tx.send(reply).is_ok()
    }

    pub fn cancel(&self, id: u64) {
        self.pending().remove(&id);
    }

    /// Drop every outstanding request so waiting callers fail immediately.
    pub fn fail_all(&self) -> usize {
        let mut pending = self.pending();
        let count = pending.len();
        pending.clear();
        count
    }

    pub fn pending_len(&self) -> usize {
        self.pending().len()
    }

    /// JS that evaluates `source` and posts the outcome under `id`.
    pub fn wrap(id: u64, source: &str) -> String {
        format!(
            "(async () => {{ try {{ const value = await ({source}); \
             window.__messengerDesktopReply({id}, true, value, null); }} \
             catch (e) {{ window.__messengerDesktopReply({id}, false, null, String((e && e.message) || e)); }} }})();"
        )
    }

    fn pending(&self) -> std::sync::MutexGuard<'_, HashMap<u64, oneshot::Sender<ScriptReply>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A Tauri webview window as a [`PageHost`].
pub struct TauriPage {
    window: WebviewWindow,
    state: SharedState,
    timeout: Duration,
}

impl TauriPage {
    pub fn new(window: WebviewWindow, state: SharedState) -> Self {
        let timeout = state.config().script_timeout();
        Self {
            window,
            state,
            timeout,
        }
    }
}

impl PageHost for TauriPage {
    fn is_alive(&self) -> bool {
        !self.state.shutdown_token().is_cancelled()
            && self
                .window
                .app_handle()
                .get_webview_window(self.window.label())
                .is_some()
    }

    fn title(&self) -> String {
        self.state.page_title(self.window.label())
    }

    async fn run_script(&self, script: &PageScript) -> unread_scraper::Result<Value> {
        if !self.is_alive() {
            return Err(ScrapeError::HostGone);
        }

        let bridge = self.state.bridge();
        let (id, rx) = bridge.register();
        let js = ScriptBridge::wrap(id, &script.source());
        if let Err(e) = self.window.eval(&js) {
            bridge.cancel(id);
            return Err(ScrapeError::Script(e.to_string()));
        }
        tracing::trace!(id, script = script.name(), window = self.window.label(), "Page script sent");

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(reply)) => reply.into_result(),
            Ok(Err(_)) => Err(ScrapeError::HostGone),
            Err(_) => {
                bridge.cancel(id);
                Err(ScrapeError::Timeout(self.timeout.as_millis() as u64))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn reply(value: Value) -> ScriptReply {
        ScriptReply {
            ok: true,
            value,
            error: None,
        }
    }

    #[tokio::test]
    async fn test_reply_reaches_its_request() {
        let bridge = ScriptBridge::default();
        let (first, rx1) = bridge.register();
        let (second, rx2) = bridge.register();
        assert!(second > first);

        assert!(bridge.resolve(second, reply(json!("b"))));
        assert!(bridge.resolve(first, reply(json!("a"))));
        assert_eq!(rx1.await.unwrap().value, json!("a"));
        assert_eq!(rx2.await.unwrap().value, json!("b"));
        assert_eq!(bridge.pending_len(), 0);
    }

    #[test]
    fn test_unknown_and_duplicate_replies_are_ignored() {
        let bridge = ScriptBridge::default();
        assert!(!bridge.resolve(42, reply(Value::Null)));

        let (id, _rx) = bridge.register();
        assert!(bridge.resolve(id, reply(Value::Null)));
        assert!(!bridge.resolve(id, reply(Value::Null)));
    }

    #[tokio::test]
    async fn test_fail_all_closes_receivers() {
        let bridge = ScriptBridge::default();
        let (_, rx) = bridge.register();
        assert_eq!(bridge.fail_all(), 1);
        assert!(rx.await.is_err());
    }

    #[test]
    fn test_cancel_forgets_request() {
        let bridge = ScriptBridge::default();
        let (id, _rx) = bridge.register();
        bridge.cancel(id);
        assert_eq!(bridge.pending_len(), 0);
        assert!(!bridge.resolve(id, reply(Value::Null)));
    }

    #[test]
    fn test_error_reply_becomes_script_error() {
        let err = ScriptReply {
            ok: false,
            value: Value::Null,
            error: Some("document.querySelector is not a function".into()),
        }
        .into_result()
        .unwrap_err();
        assert!(matches!(err, ScrapeError::Script(msg) if msg.contains("querySelector")));
    }

    #[test]
    fn test_reply_deserializes_from_command_args() {
        let reply: ScriptReply = serde_json::from_value(json!({ "ok": true })).unwrap();
        assert!(reply.ok);
        assert_eq!(reply.value, Value::Null);
    }

    #[test]
    fn test_wrap_embeds_id_and_source() {
        let js = ScriptBridge::wrap(7, &PageScript::SnapshotSidebar.source());
        assert!(js.contains("__messengerDesktopReply(7, true"));
        assert!(js.contains("__messengerDesktopReply(7, false"));
        assert!(js.starts_with("(async () =>"));
    }
}
