//! Which previews were already notified, and when to forget them.
//!
//! The notified set only grows between resets. A reset is a full clear and
//! happens once the unread count has been zero for `threshold` consecutive
//! ticks, so a momentary zero does not re-arm every chat.

use std::collections::HashSet;

use crate::config::{ExtractTrigger, KeyPolicy};
use crate::preview::ChatPreview;

/// What the poll loop should do after observing a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Run the extractor this tick.
    pub extract: bool,
    /// The notified set was cleared by this observation.
    pub reset: bool,
}

#[derive(Debug)]
pub struct Deduplicator {
    policy: KeyPolicy,
    trigger: ExtractTrigger,
    threshold: u32,
    notified: HashSet<String>,
    zero_streak: u32,
    last_count: u32,
}

impl Deduplicator {
    pub fn new(policy: KeyPolicy, trigger: ExtractTrigger, threshold: u32) -> Self {
        Self {
            policy,
            trigger,
            threshold: threshold.max(1),
            notified: HashSet::new(),
            zero_streak: 0,
            last_count: 0,
        }
    }

    /// Feed the unread count read at the start of a tick.
    pub fn observe(&mut self, count: u32) -> Observation {
        let previous = self.last_count;
        self.last_count = count;

        if count > 0 {
            self.zero_streak = 0;
            let extract = match self.trigger {
                ExtractTrigger::AnyUnread => true,
                ExtractTrigger::CountIncrease => count > previous,
            };
            return Observation {
                extract,
                reset: false,
            };
        }

        self.zero_streak = self.zero_streak.saturating_add(1);
        let mut reset = false;
        if self.zero_streak >= self.threshold && !self.notified.is_empty() {
            self.notified.clear();
            reset = true;
        }
        Observation {
            extract: false,
            reset,
        }
    }

    /// Record `preview` as notified. Returns `false` if its key was already
    /// present, in which case no notification should be shown.
    pub fn admit(&mut self, preview: &ChatPreview) -> bool {
        self.notified.insert(preview.key(self.policy))
    }

    pub fn is_notified(&self, preview: &ChatPreview) -> bool {
        self.notified.contains(&preview.key(self.policy))
    }

    pub fn notified_len(&self) -> usize {
        self.notified.len()
    }

    pub fn zero_streak(&self) -> u32 {
        self.zero_streak
    }

    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dedup(policy: KeyPolicy) -> Deduplicator {
        Deduplicator::new(policy, ExtractTrigger::AnyUnread, 5)
    }

    #[test]
    fn same_key_is_admitted_once() {
        let mut d = dedup(KeyPolicy::Composite);
        let p = ChatPreview::new("Alice", "hello");
        assert!(d.admit(&p));
        assert!(!d.admit(&p));
        assert_eq!(d.notified_len(), 1);
    }

    #[test]
    fn composite_policy_notifies_new_preview_from_same_chat() {
        let mut d = dedup(KeyPolicy::Composite);
        assert!(d.admit(&ChatPreview::new("Alice", "hello")));
        assert!(d.admit(&ChatPreview::new("Alice", "goodbye")));
    }

    #[test]
    fn chat_name_policy_suppresses_second_preview() {
        let mut d = dedup(KeyPolicy::ChatName);
        assert!(d.admit(&ChatPreview::new("Alice", "hello")));
        assert!(!d.admit(&ChatPreview::new("Alice", "goodbye")));
    }

    #[test]
    fn five_zero_ticks_clear_the_set() {
        let mut d = dedup(KeyPolicy::Composite);
        d.observe(2);
        d.admit(&ChatPreview::new("Alice", "hello"));
        d.admit(&ChatPreview::new("Bob", "hi"));

        for _ in 0..4 {
            assert!(!d.observe(0).reset);
        }
        assert_eq!(d.notified_len(), 2);
        assert!(d.observe(0).reset);
        assert_eq!(d.notified_len(), 0);
    }

    #[test]
    fn short_zero_streak_leaves_set_untouched() {
        let mut d = dedup(KeyPolicy::Composite);
        d.admit(&ChatPreview::new("Alice", "hello"));
        for _ in 0..3 {
            d.observe(0);
        }
        assert_eq!(d.zero_streak(), 3);
        assert!(d.is_notified(&ChatPreview::new("Alice", "hello")));
    }

    #[test]
    fn nonzero_count_breaks_the_streak() {
        let mut d = dedup(KeyPolicy::Composite);
        d.admit(&ChatPreview::new("Alice", "hello"));
        for _ in 0..4 {
            d.observe(0);
        }
        d.observe(1);
        assert_eq!(d.zero_streak(), 0);
        for _ in 0..4 {
            d.observe(0);
        }
        assert_eq!(d.notified_len(), 1);
        d.observe(0);
        assert_eq!(d.notified_len(), 0);
    }

    #[test]
    fn any_unread_trigger_extracts_on_plateau() {
        let mut d = Deduplicator::new(KeyPolicy::Composite, ExtractTrigger::AnyUnread, 5);
        assert!(d.observe(3).extract);
        assert!(d.observe(3).extract);
        assert!(d.observe(1).extract);
        assert!(!d.observe(0).extract);
    }

    #[test]
    fn count_increase_trigger_skips_plateau_and_drop() {
        let mut d = Deduplicator::new(KeyPolicy::Composite, ExtractTrigger::CountIncrease, 5);
        assert!(d.observe(2).extract);
        assert!(!d.observe(2).extract);
        assert!(!d.observe(1).extract);
        assert!(d.observe(3).extract);
        d.observe(0);
        assert!(d.observe(1).extract);
    }

    #[test]
    fn zero_threshold_is_treated_as_one() {
        let mut d = Deduplicator::new(KeyPolicy::Composite, ExtractTrigger::AnyUnread, 0);
        d.admit(&ChatPreview::new("Alice", "hello"));
        assert!(d.observe(0).reset);
    }
}
