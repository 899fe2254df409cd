//! Pending-reminder queue and notification authorization state
//!
//! These rows back `QueueService`; nothing else writes them.

use chrono::NaiveDateTime;
use rusqlite::{params, Row};

use super::Database;
use crate::error::Result;
use crate::reminders::{AuthorizationState, PendingReminder};

const AUTHORIZATION_KEY: &str = "notifications.authorization";
const TRIGGER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn map_reminder(row: &Row<'_>) -> rusqlite::Result<PendingReminder> {
    let trigger_str: String = row.get(1)?;
    Ok(PendingReminder {
        subscription_id: row.get(0)?,
        trigger_at: NaiveDateTime::parse_from_str(&trigger_str, TRIGGER_FORMAT)
            .unwrap_or_else(|_| chrono::Utc::now().naive_utc()),
        title: row.get(2)?,
        body: row.get(3)?,
    })
}

impl Database {
    /// Insert or replace the pending reminder for a subscription
    pub fn upsert_pending_reminder(&self, reminder: &PendingReminder) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO pending_reminders (subscription_id, trigger_at, title, body)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(subscription_id) DO UPDATE SET
                trigger_at = excluded.trigger_at,
                title = excluded.title,
                body = excluded.body
            "#,
            params![
                reminder.subscription_id,
                reminder.trigger_at.format(TRIGGER_FORMAT).to_string(),
                reminder.title,
                reminder.body,
            ],
        )?;
        Ok(())
    }

    /// Remove the pending reminder for a subscription, if any
    pub fn delete_pending_reminder(&self, subscription_id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM pending_reminders WHERE subscription_id = ?",
            params![subscription_id],
        )?;
        Ok(())
    }

    /// Remove every pending reminder
    pub fn clear_pending_reminders(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM pending_reminders", [])?;
        Ok(())
    }

    /// List pending reminders, earliest trigger first
    pub fn list_pending_reminders(&self) -> Result<Vec<PendingReminder>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT subscription_id, trigger_at, title, body FROM pending_reminders ORDER BY trigger_at ASC",
        )?;

        let reminders = stmt
            .query_map([], map_reminder)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(reminders)
    }

    /// Remove and return reminders whose trigger is at or before `now`
    pub fn take_due_reminders(&self, now: NaiveDateTime) -> Result<Vec<PendingReminder>> {
        let now_str = now.format(TRIGGER_FORMAT).to_string();

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT subscription_id, trigger_at, title, body FROM pending_reminders WHERE trigger_at <= ? ORDER BY trigger_at ASC",
        )?;
        let due = stmt
            .query_map(params![now_str], map_reminder)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        conn.execute(
            "DELETE FROM pending_reminders WHERE trigger_at <= ?",
            params![now_str],
        )?;

        Ok(due)
    }

    /// Current notification authorization state (not-determined if never set)
    pub fn notification_authorization(&self) -> Result<AuthorizationState> {
        let conn = self.conn()?;
        let result: std::result::Result<String, _> = conn.query_row(
            "SELECT value FROM app_settings WHERE key = ?",
            params![AUTHORIZATION_KEY],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(value
                .parse()
                .unwrap_or(AuthorizationState::NotDetermined)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(AuthorizationState::NotDetermined),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the notification authorization state
    pub fn set_notification_authorization(&self, state: AuthorizationState) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO app_settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![AUTHORIZATION_KEY, state.as_str()],
        )?;
        Ok(())
    }
}
