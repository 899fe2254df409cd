//! Renewal reminder scheduling
//!
//! Maps each active subscription to at most one pending one-shot reminder,
//! keyed by subscription id.
//!
//! # Architecture
//!
//! - `NotificationService` trait: the platform notification queue contract
//! - `QueueService`: database-backed queue (the self-hosted delivery target)
//! - `MemoryService`: in-memory implementation for tests
//! - `ReminderScheduler`: owns a service exclusively and enforces the
//!   one-reminder-per-subscription invariant
//!
//! The scheduler mutates the queue through `&mut self` only, so exclusive
//! ownership of the service is the single-writer discipline: two writers to
//! the same queue cannot coexist without the borrow checker objecting.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dates::notification_date;
use crate::error::Result;
use crate::models::Subscription;

mod memory;
mod queue;

pub use memory::MemoryService;
pub use queue::QueueService;

/// Notification authorization state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationState {
    Authorized,
    Denied,
    NotDetermined,
}

impl AuthorizationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authorized => "authorized",
            Self::Denied => "denied",
            Self::NotDetermined => "not_determined",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Authorized => "Granted",
            Self::Denied => "Denied",
            Self::NotDetermined => "Not Asked",
        }
    }
}

impl std::str::FromStr for AuthorizationState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "authorized" => Ok(Self::Authorized),
            "denied" => Ok(Self::Denied),
            "not_determined" => Ok(Self::NotDetermined),
            _ => Err(format!("Unknown authorization state: {}", s)),
        }
    }
}

impl std::fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered one-shot reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingReminder {
    /// Key: each subscription owns at most one slot
    pub subscription_id: i64,
    /// Local wall-time instant at which the reminder fires
    pub trigger_at: NaiveDateTime,
    pub title: String,
    pub body: String,
}

/// Contract for the platform notification queue
///
/// Permission operations are async (they may suspend on a platform prompt);
/// queue mutation goes through `&mut self` because the underlying resource is
/// not guaranteed safe for concurrent mutation.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Human-readable name for this service
    fn name(&self) -> &str;

    /// Prompt for notification permission; returns whether it was granted
    async fn request_permission(&mut self) -> Result<bool>;

    /// Current authorization state
    async fn authorization_state(&self) -> Result<AuthorizationState>;

    /// Register a one-shot reminder, replacing any pending one with the same
    /// subscription id
    fn register_one_shot(&mut self, reminder: PendingReminder) -> Result<()>;

    /// Remove the pending reminder for a subscription id; no-op when none
    fn cancel(&mut self, subscription_id: i64) -> Result<()>;

    /// Remove every pending reminder
    fn cancel_all(&mut self) -> Result<()>;

    /// List pending reminders, earliest trigger first
    fn pending(&self) -> Result<Vec<PendingReminder>>;
}

/// Render the notification content for a subscription renewal
fn render_reminder(
    subscription: &Subscription,
    days_before: u32,
    trigger_at: NaiveDateTime,
) -> PendingReminder {
    let when = match days_before {
        0 => "today".to_string(),
        1 => "in 1 day".to_string(),
        n => format!("in {} days", n),
    };

    PendingReminder {
        subscription_id: subscription.id,
        trigger_at,
        title: format!("Renewing Soon: {}", subscription.name),
        body: format!(
            "{} renews {} for ${:.2}.",
            subscription.name, when, subscription.cost
        ),
    }
}

/// Schedules renewal reminders against an exclusively-owned service
pub struct ReminderScheduler<S: NotificationService> {
    service: S,
}

impl<S: NotificationService> ReminderScheduler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    /// Schedule (or re-schedule) the reminder for one subscription.
    ///
    /// Any pending reminder for the id is removed first. A new one is
    /// registered only when the subscription is active and the trigger
    /// instant is strictly after `now`; otherwise the net effect is removal.
    /// Registration failures are logged and swallowed: the subscription
    /// simply ends up without a reminder.
    ///
    /// Returns whether a reminder is pending afterwards.
    pub fn schedule(
        &mut self,
        subscription: &Subscription,
        days_before: u32,
        now: NaiveDateTime,
    ) -> Result<bool> {
        self.service.cancel(subscription.id)?;

        if !subscription.is_active {
            debug!(
                subscription = %subscription.name,
                "skipping reminder for inactive subscription"
            );
            return Ok(false);
        }

        let trigger_at = notification_date(subscription.renewal_date, days_before);
        if trigger_at <= now {
            debug!(
                subscription = %subscription.name,
                %trigger_at,
                "skipping reminder with non-future trigger"
            );
            return Ok(false);
        }

        let reminder = render_reminder(subscription, days_before, trigger_at);
        match self.service.register_one_shot(reminder) {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!(
                    subscription = %subscription.name,
                    error = %e,
                    "failed to register reminder"
                );
                Ok(false)
            }
        }
    }

    /// Remove the pending reminder for a subscription id. Idempotent.
    pub fn cancel(&mut self, subscription_id: i64) -> Result<()> {
        self.service.cancel(subscription_id)
    }

    /// Clear every pending reminder, then schedule each active subscription.
    ///
    /// Always a full remove-then-recreate pass, so reminders for deleted
    /// subscriptions or a stale lead time never survive. Returns the number
    /// of reminders registered.
    pub fn reschedule_all(
        &mut self,
        subscriptions: &[Subscription],
        days_before: u32,
        now: NaiveDateTime,
    ) -> Result<usize> {
        self.service.cancel_all()?;

        let mut registered = 0;
        for sub in subscriptions.iter().filter(|s| s.is_active) {
            if self.schedule(sub, days_before, now)? {
                registered += 1;
            }
        }

        Ok(registered)
    }

    /// List pending reminders, earliest trigger first
    pub fn pending(&self) -> Result<Vec<PendingReminder>> {
        self.service.pending()
    }
}

/// Current wall-clock instant in local time, for callers that do not carry
/// their own clock
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillingCycle, Category};
    use chrono::{NaiveDate, Utc};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn sub(id: i64, name: &str, active: bool, renewal: NaiveDate) -> Subscription {
        Subscription {
            id,
            name: name.to_string(),
            cost: 15.49,
            billing_cycle: BillingCycle::Monthly,
            renewal_date: renewal,
            category: Category::Entertainment,
            notes: String::new(),
            is_active: active,
            created_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_schedule_registers_future_trigger() {
        let mut scheduler = ReminderScheduler::new(MemoryService::new());
        let s = sub(1, "Netflix", true, date(2026, 3, 10));

        assert!(scheduler.schedule(&s, 3, now()).unwrap());

        let pending = scheduler.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].subscription_id, 1);
        assert_eq!(
            pending[0].trigger_at,
            date(2026, 3, 7).and_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(pending[0].title, "Renewing Soon: Netflix");
        assert_eq!(pending[0].body, "Netflix renews in 3 days for $15.49.");
    }

    #[test]
    fn test_schedule_is_idempotent_per_id() {
        let mut scheduler = ReminderScheduler::new(MemoryService::new());
        let s = sub(1, "Netflix", true, date(2026, 3, 10));

        for _ in 0..5 {
            scheduler.schedule(&s, 3, now()).unwrap();
        }

        assert_eq!(scheduler.pending().unwrap().len(), 1);
    }

    #[test]
    fn test_schedule_inactive_removes_existing() {
        let mut scheduler = ReminderScheduler::new(MemoryService::new());
        let mut s = sub(1, "Netflix", true, date(2026, 3, 10));

        scheduler.schedule(&s, 3, now()).unwrap();
        assert_eq!(scheduler.pending().unwrap().len(), 1);

        s.is_active = false;
        assert!(!scheduler.schedule(&s, 3, now()).unwrap());
        assert!(scheduler.pending().unwrap().is_empty());
    }

    #[test]
    fn test_schedule_skips_past_trigger() {
        let mut scheduler = ReminderScheduler::new(MemoryService::new());
        // Renewal tomorrow with a 3-day lead puts the trigger in the past
        let s = sub(1, "Netflix", true, date(2026, 3, 2));

        assert!(!scheduler.schedule(&s, 3, now()).unwrap());
        assert!(scheduler.pending().unwrap().is_empty());
    }

    #[test]
    fn test_schedule_trigger_must_be_strictly_future() {
        let trigger = date(2026, 3, 7).and_hms_opt(9, 0, 0).unwrap();
        let mut scheduler = ReminderScheduler::new(MemoryService::new());
        let s = sub(1, "Netflix", true, date(2026, 3, 10));

        // now == trigger: not strictly in the future, so nothing registers
        assert!(!scheduler.schedule(&s, 3, trigger).unwrap());
        assert!(scheduler.pending().unwrap().is_empty());
    }

    #[test]
    fn test_schedule_swallows_registration_failure() {
        let mut scheduler = ReminderScheduler::new(MemoryService::failing());
        let s = sub(1, "Netflix", true, date(2026, 3, 10));

        // Logged and ignored; the subscription just has no reminder
        assert!(!scheduler.schedule(&s, 3, now()).unwrap());
        assert!(scheduler.pending().unwrap().is_empty());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut scheduler = ReminderScheduler::new(MemoryService::new());
        scheduler.cancel(42).unwrap();
        scheduler.cancel(42).unwrap();
        assert!(scheduler.pending().unwrap().is_empty());
    }

    #[test]
    fn test_reschedule_all_clears_stale_reminders() {
        let mut scheduler = ReminderScheduler::new(MemoryService::new());
        let deleted = sub(99, "Deleted", true, date(2026, 3, 20));
        scheduler.schedule(&deleted, 3, now()).unwrap();

        let current = vec![
            sub(1, "Netflix", true, date(2026, 3, 10)),
            sub(2, "Paused", false, date(2026, 3, 10)),
            sub(3, "TooSoon", true, date(2026, 3, 1)),
        ];
        let registered = scheduler.reschedule_all(&current, 3, now()).unwrap();

        assert_eq!(registered, 1);
        let pending = scheduler.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].subscription_id, 1);
    }

    #[test]
    fn test_reschedule_all_applies_new_lead_time() {
        let mut scheduler = ReminderScheduler::new(MemoryService::new());
        let subs = vec![sub(1, "Netflix", true, date(2026, 3, 10))];

        scheduler.reschedule_all(&subs, 3, now()).unwrap();
        scheduler.reschedule_all(&subs, 7, now()).unwrap();

        let pending = scheduler.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(
            pending[0].trigger_at,
            date(2026, 3, 3).and_hms_opt(9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_render_zero_and_singular_lead() {
        let s = sub(1, "Netflix", true, date(2026, 3, 10));
        let trigger = now();

        let today = render_reminder(&s, 0, trigger);
        assert_eq!(today.body, "Netflix renews today for $15.49.");

        let tomorrow = render_reminder(&s, 1, trigger);
        assert_eq!(tomorrow.body, "Netflix renews in 1 day for $15.49.");
    }

    #[tokio::test]
    async fn test_memory_permission_flow() {
        let mut service = MemoryService::new();
        assert_eq!(
            service.authorization_state().await.unwrap(),
            AuthorizationState::NotDetermined
        );
        assert!(service.request_permission().await.unwrap());
        assert_eq!(
            service.authorization_state().await.unwrap(),
            AuthorizationState::Authorized
        );

        let mut denied = MemoryService::denied();
        assert!(!denied.request_permission().await.unwrap());
        assert_eq!(
            denied.authorization_state().await.unwrap(),
            AuthorizationState::Denied
        );
    }
}
