//! In-memory notification service for testing
//!
//! Holds the pending queue in a plain map and never touches the filesystem.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{AuthorizationState, NotificationService, PendingReminder};
use crate::error::{Error, Result};

/// In-memory notification service
#[derive(Debug, Clone, Default)]
pub struct MemoryService {
    reminders: HashMap<i64, PendingReminder>,
    authorization: Option<AuthorizationState>,
    /// When set, `register_one_shot` fails (for exercising failure handling)
    fail_registration: bool,
}

impl MemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service whose permission prompt was already refused
    pub fn denied() -> Self {
        Self {
            authorization: Some(AuthorizationState::Denied),
            ..Self::default()
        }
    }

    /// A service whose registrations always fail
    pub fn failing() -> Self {
        Self {
            fail_registration: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl NotificationService for MemoryService {
    fn name(&self) -> &str {
        "memory"
    }

    async fn request_permission(&mut self) -> Result<bool> {
        match self.authorization {
            Some(AuthorizationState::Denied) => Ok(false),
            _ => {
                self.authorization = Some(AuthorizationState::Authorized);
                Ok(true)
            }
        }
    }

    async fn authorization_state(&self) -> Result<AuthorizationState> {
        Ok(self.authorization.unwrap_or(AuthorizationState::NotDetermined))
    }

    fn register_one_shot(&mut self, reminder: PendingReminder) -> Result<()> {
        if self.fail_registration {
            return Err(Error::Notification(
                "registration rejected by service".to_string(),
            ));
        }
        self.reminders.insert(reminder.subscription_id, reminder);
        Ok(())
    }

    fn cancel(&mut self, subscription_id: i64) -> Result<()> {
        self.reminders.remove(&subscription_id);
        Ok(())
    }

    fn cancel_all(&mut self) -> Result<()> {
        self.reminders.clear();
        Ok(())
    }

    fn pending(&self) -> Result<Vec<PendingReminder>> {
        let mut pending: Vec<PendingReminder> = self.reminders.values().cloned().collect();
        pending.sort_by_key(|r| r.trigger_at);
        Ok(pending)
    }
}
