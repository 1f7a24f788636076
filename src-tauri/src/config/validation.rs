//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[A-Za-z0-9.-]+(:\d+)?(/\S*)?$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "START_URL" => {
            if !RE_HTTP_URL.is_match(value) {
                return Err("must be an http(s) URL".into());
            }
        }
        "WINDOW_TITLE" => {
            if value.chars().count() > 200 {
                return Err("must be at most 200 characters".into());
            }
        }
        "WINDOW_WIDTH" => validate_int_range(value, 320, 7680)?,
        "WINDOW_HEIGHT" => validate_int_range(value, 240, 4320)?,
        "POLL_INTERVAL_MS" => validate_int_range(value, 250, 60_000)?,
        "RESET_THRESHOLD" => validate_int_range(value, 1, 100)?,
        "UNREAD_FONT_WEIGHT" => validate_int_range(value, 100, 1000)?,
        "CONVERSATION_SETTLE_MS" => validate_int_range(value, 0, 10_000)?,
        "SCRIPT_TIMEOUT_MS" => validate_int_range(value, 500, 60_000)?,
        "EXTRACTION_STRATEGY" => validate_choice(value, &["sidebar", "conversation"])?,
        "DEDUP_POLICY" => validate_choice(value, &["composite", "chat_name"])?,
        "EXTRACT_TRIGGER" => validate_choice(value, &["any_unread", "count_increase"])?,
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn validate_choice(value: &str, choices: &[&str]) -> Result<(), String> {
    if choices.contains(&value) {
        return Ok(());
    }
    Err(format!("must be one of: {}", choices.join(", ")))
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(
        key,
        "NOTIFICATIONS_ENABLED" | "NOTIFICATION_SILENT" | "BLOCK_SERVICE_WORKERS"
    )
}
