//! The per-window poll loop.
//!
//! Every interval: read the title, derive the unread count, maybe run the
//! extractor, and notify for previews the deduplicator has not seen. Ticks
//! are awaited inline, so a slow extraction makes the timer skip firings
//! instead of starting a second scan against the same page.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::WatchConfig;
use crate::dedup::Deduplicator;
use crate::dispatch::{Dispatcher, Notifier};
use crate::extractor::{Extractor, PreviewExtractor};
use crate::host::PageHost;
use crate::title::unread_count;


/// Outcome of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub count: u32,
    /// The host was gone; nothing was read or dispatched.
    pub skipped: bool,
    /// The extractor was invoked.
    pub extraction_ran: bool,
    pub extraction_failed: bool,
    pub extracted: usize,
    pub dispatched: usize,
    /// The notified set was cleared on this tick.
    pub reset: bool,
}

pub struct PollLoop<H, N> {
    host: H,
    extractor: Extractor,
    dedup: Deduplicator,
    dispatcher: Dispatcher<N>,
    interval: Duration,
}

impl<H: PageHost, N: Notifier> PollLoop<H, N> {
    pub fn new(host: H, notifier: N, config: &WatchConfig) -> Self {
        Self {
            host,
            extractor: Extractor::from_config(config),
            dedup: Deduplicator::new(config.key_policy, config.trigger, config.reset_threshold),
            dispatcher: Dispatcher::new(notifier, config.icon.clone(), config.silent),
            interval: config.poll_interval.max(Duration::from_millis(1)),
        }
    }

    #[cfg(test)]
    pub(crate) fn deduplicator(&self) -> &Deduplicator {
        &self.dedup
    }

    /// Run one poll cycle.
    pub async fn tick(&mut self) -> TickReport {
        if !self.host.is_alive() {
            return TickReport {
                skipped: true,
                ..TickReport::default()
            };
        }

        let count = unread_count(&self.host.title());
        let observation = self.dedup.observe(count);
        let mut report = TickReport {
            count,
            reset: observation.reset,
            ..TickReport::default()
        };
        if observation.reset {
            tracing::info!("All messages read (sustained), resetting");
        }
        if !observation.extract {
            return report;
        }

        report.extraction_ran = true;
        let chats = match self.extractor.extract(&self.host).await {
            Ok(chats) => chats,
            Err(e) => {
                tracing::error!(count, "Error finding unread chats: {e}");
                report.extraction_failed = true;
                return report;
            }
        };

        if !self.host.is_alive() {
            tracing::debug!("Host closed during extraction, discarding results");
            report.skipped = true;
            return report;
        }

        report.extracted = chats.len();
        if !chats.is_empty() {
            tracing::debug!(count, chats = chats.len(), "Unread chats found");
        }
        for chat in &chats {
            if !self.dedup.admit(chat) {
                continue;
            }
            if self.dispatcher.dispatch(chat) {
                report.dispatched += 1;
            }
        }
        report
    }

    /// Tick on a fixed interval until `shutdown` is cancelled.
    ///
    /// The first tick fires one interval after start. Cancellation drops an
    /// in-flight tick together with anything it extracted.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            strategy = ?self.extractor.strategy(),
            policy = ?self.dedup.policy(),
            "Unread poll loop started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::debug!("Discarding in-flight poll tick");
                    break;
                }
                report = self.tick() => {
                    if report.dispatched > 0 {
                        tracing::debug!(?report, "Poll tick dispatched notifications");
                    }
                }
            }
        }

        tracing::info!("Unread poll loop stopped");
    }
}
