//! Key-value reminder settings
//!
//! The moral equivalent of the platform's per-app preference store: a global
//! enabled flag and a lead time shared by every reminder.

use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::Database;
use crate::error::Result;

const ENABLED_KEY: &str = "reminders.enabled";
const DAYS_BEFORE_KEY: &str = "reminders.days_before";

/// Longest supported reminder lead time, in days
pub const MAX_LEAD_DAYS: u32 = 14;

/// Global reminder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    /// Master switch; disabling clears the pending queue
    pub enabled: bool,
    /// Calendar days ahead of the renewal date to remind
    pub days_before: u32,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            days_before: 3,
        }
    }
}

impl ReminderSettings {
    /// Clamp the lead time into the supported 0..=14 range
    pub fn clamped(self) -> Self {
        Self {
            enabled: self.enabled,
            days_before: self.days_before.min(MAX_LEAD_DAYS),
        }
    }
}

impl Database {
    /// Load reminder settings, falling back to defaults for unset keys
    pub fn reminder_settings(&self) -> Result<ReminderSettings> {
        let defaults = ReminderSettings::default();

        let enabled = match self.get_setting(ENABLED_KEY)? {
            Some(value) => value == "true",
            None => defaults.enabled,
        };
        let days_before = self
            .get_setting(DAYS_BEFORE_KEY)?
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.days_before);

        Ok(ReminderSettings {
            enabled,
            days_before,
        }
        .clamped())
    }

    /// Persist reminder settings (lead time is clamped on the way in)
    pub fn set_reminder_settings(&self, settings: ReminderSettings) -> Result<()> {
        let settings = settings.clamped();
        self.set_setting(ENABLED_KEY, if settings.enabled { "true" } else { "false" })?;
        self.set_setting(DAYS_BEFORE_KEY, &settings.days_before.to_string())?;
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let result: std::result::Result<String, _> = conn.query_row(
            "SELECT value FROM app_settings WHERE key = ?",
            params![key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO app_settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )?;
        Ok(())
    }
}
