//! SettingsManager: DB-backed settings with defaults, migration, and feature status.

use shell_db::Database;

use super::FeatureStatus;
use super::defaults::DEFAULT_SETTINGS;
use super::validation::validate_setting;

const SETTING_TYPE: &str = "normal";

/// Wraps [`Database`] to provide high-level settings operations.
pub struct SettingsManager {
    db: Database,
}

impl SettingsManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get a setting value. Falls back to default if not in DB.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        if let Some(val) = self.db.get_setting(key)? {
            return Ok(val);
        }
        if let Some(def) = DEFAULT_SETTINGS.get(key) {
            return Ok(def.default.to_string());
        }
        anyhow::bail!("setting not found: {key}");
    }

    /// Set a setting value with validation.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        if !DEFAULT_SETTINGS.contains_key(key) {
            anyhow::bail!("unknown setting key: {key}");
        }
        validate_setting(key, value)
            .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
        self.db.set_setting(key, value, SETTING_TYPE)?;
        Ok(())
    }

    /// Initialize default settings in DB (skip existing).
    pub fn initialize_defaults(&self) -> Result<(), anyhow::Error> {
        for (key, def) in DEFAULT_SETTINGS.iter() {
            if self.db.set_setting_if_absent(key, def.default, SETTING_TYPE)? {
                tracing::debug!(key, description = def.description, "Initialized default setting");
            }
        }
        Ok(())
    }

    /// Migrate settings from environment variables to DB (one-time).
    pub fn migrate_from_env(&self) -> Result<u32, anyhow::Error> {
        self.migrate_from(|key| std::env::var(key).ok())
    }

    /// Copy values from `lookup` for keys the DB does not have yet. Invalid
    /// values are skipped with a warning.
    pub fn migrate_from(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<u32, anyhow::Error> {
        let mut migrated = 0u32;
        for key in DEFAULT_SETTINGS.keys() {
            if self.db.get_setting(key)?.is_some() {
                continue;
            }
            let Some(value) = lookup(key).filter(|v| !v.is_empty()) else {
                continue;
            };
            match self.set_setting(key, &value) {
                Ok(()) => {
                    tracing::info!("Migrated setting from env: {key}");
                    migrated += 1;
                }
                Err(e) => tracing::warn!("Skipping env setting {key}: {e}"),
            }
        }
        if migrated > 0 {
            tracing::info!("Migration completed: {migrated} settings migrated");
        }
        Ok(migrated)
    }

    /// Check which features are properly configured.
    pub fn check_feature_status(&self) -> Result<FeatureStatus, anyhow::Error> {
        let mut status = FeatureStatus {
            notifications_enabled: self.get_setting("NOTIFICATIONS_ENABLED")? == "true",
            ..FeatureStatus::default()
        };

        for def in DEFAULT_SETTINGS.values().filter(|d| d.required) {
            let value = self.get_setting(def.key).unwrap_or_default();
            if value.is_empty() {
                status.missing_settings.push(def.key.to_string());
            } else if let Err(e) = validate_setting(def.key, &value) {
                status.warnings.push(format!("{} is invalid: {e}", def.key));
            }
        }

        if !status.notifications_enabled {
            status
                .warnings
                .push("NOTIFICATIONS_ENABLED is false - unread messages are not announced".into());
        }
        if self.get_setting("EXTRACTION_STRATEGY")? == "conversation" {
            status.warnings.push(
                "EXTRACTION_STRATEGY=conversation opens each unread chat and marks it read".into(),
            );
        }
        if self.get_setting("EXTRACT_TRIGGER")? == "count_increase" {
            status.warnings.push(
                "EXTRACT_TRIGGER=count_increase misses new messages while the count stays flat"
                    .into(),
            );
        }

        Ok(status)
    }
}
