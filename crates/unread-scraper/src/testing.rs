//! Test doubles for the page host and the notification backend.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use crate::dispatch::{NotificationRequest, Notifier};
use crate::host::PageHost;
use crate::script::PageScript;
use crate::{NotifyError, Result};

type Handler = Box<dyn Fn(&PageScript) -> Result<Value> + Send + Sync>;

/// Page host whose scripts are answered by a closure.
pub(crate) struct FakeHost {
    alive: AtomicBool,
    die_on_script: AtomicBool,
    title: Mutex<String>,
    handler: Handler,
    calls: Mutex<Vec<PageScript>>,
    delay: Mutex<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Decrements the in-flight counter even when the script future is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeHost {
    pub fn new(
        title: &str,
        handler: impl Fn(&PageScript) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            alive: AtomicBool::new(true),
            die_on_script: AtomicBool::new(false),
            title: Mutex::new(title.to_string()),
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
            delay: Mutex::new(Duration::ZERO),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Make every script take `delay` before it answers.
    pub fn set_script_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Highest number of scripts that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn set_title(&self, title: &str) {
        *self.title.lock().unwrap() = title.to_string();
    }

    pub fn kill(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Tear the host down while the next script is running.
    pub fn die_during_next_script(&self) {
        self.die_on_script.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<PageScript> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(PageScript::name).collect()
    }
}

impl PageHost for FakeHost {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn title(&self) -> String {
        self.title.lock().unwrap().clone()
    }

    async fn run_script(&self, script: &PageScript) -> Result<Value> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.calls.lock().unwrap().push(script.clone());
        if self.die_on_script.swap(false, Ordering::SeqCst) {
            self.kill();
        }
        (self.handler)(script)
    }
}

/// Notifier that records every request it is asked to show.
#[derive(Clone, Default)]
pub(crate) struct RecordingNotifier {
    sent: Arc<Mutex<Vec<NotificationRequest>>>,
    attempts: Arc<AtomicUsize>,
    unsupported: bool,
    failing: bool,
}

impl RecordingNotifier {
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Notifier for RecordingNotifier {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn show(&self, request: &NotificationRequest) -> std::result::Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(NotifyError::Backend("boom".into()));
        }
        self.sent.lock().unwrap().push(request.clone());
        Ok(())
    }
}
