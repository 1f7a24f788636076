//! Unread count from the window title.

use std::sync::LazyLock;

use regex::Regex;

static RE_COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((\d+)\)").unwrap());

/// Extract the first `(<digits>)` group from a title.
///
/// Returns 0 when the title carries no count. Counts too large for `u32`
/// saturate rather than reading as zero.
pub fn unread_count(title: &str) -> u32 {
    let Some(caps) = RE_COUNT.captures(title) else {
        return 0;
    };
    let digits = &caps[1];
    digits.parse::<u32>().unwrap_or(u32::MAX)
}
