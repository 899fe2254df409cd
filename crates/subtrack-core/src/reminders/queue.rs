//! Database-backed notification service
//!
//! The self-hosted stand-in for a platform notification center: pending
//! reminders live in the `pending_reminders` table and are drained by
//! `subtrack remind due`. Registration requires a granted permission, like
//! the platform queue it models.

use async_trait::async_trait;

use super::{AuthorizationState, NotificationService, PendingReminder};
use crate::db::Database;
use crate::error::{Error, Result};

/// Database-backed notification service
pub struct QueueService {
    db: Database,
}

impl QueueService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationService for QueueService {
    fn name(&self) -> &str {
        "queue"
    }

    async fn request_permission(&mut self) -> Result<bool> {
        // A previous refusal sticks until the user flips it explicitly,
        // mirroring platform permission semantics
        match self.db.notification_authorization()? {
            AuthorizationState::Denied => Ok(false),
            _ => {
                self.db
                    .set_notification_authorization(AuthorizationState::Authorized)?;
                Ok(true)
            }
        }
    }

    async fn authorization_state(&self) -> Result<AuthorizationState> {
        self.db.notification_authorization()
    }

    fn register_one_shot(&mut self, reminder: PendingReminder) -> Result<()> {
        if self.db.notification_authorization()? != AuthorizationState::Authorized {
            return Err(Error::Notification(
                "notifications not authorized".to_string(),
            ));
        }
        self.db.upsert_pending_reminder(&reminder)
    }

    fn cancel(&mut self, subscription_id: i64) -> Result<()> {
        self.db.delete_pending_reminder(subscription_id)
    }

    fn cancel_all(&mut self) -> Result<()> {
        self.db.clear_pending_reminders()
    }

    fn pending(&self) -> Result<Vec<PendingReminder>> {
        self.db.list_pending_reminders()
    }
}
