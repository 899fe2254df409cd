//! Subtrack Core Library
//!
//! Shared functionality for the subtrack subscription tracker:
//! - Database access and migrations
//! - Subscription model with derived monthly-cost and renewal fields
//! - Spending aggregates (totals, category breakdown, upcoming renewals)
//! - Renewal date arithmetic
//! - Reminder scheduling against a pluggable notification service
//! - Subscription export (JSON/CSV)
//! - Backup system with pluggable destinations

pub mod backup;
pub mod dates;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod reminders;
pub mod summary;

pub use backup::{BackupDestination, BackupInfo, BackupResult, LocalDestination, PruneResult, RetentionPolicy};
pub use db::{Database, ReminderSettings};
pub use error::{Error, Result};
pub use export::{ExportFormat, SubscriptionExport};
pub use models::{BillingCycle, Category, CategoryTotal, NewSubscription, Subscription, SubscriptionUpdate};
pub use reminders::{
    AuthorizationState, MemoryService, NotificationService, PendingReminder, QueueService,
    ReminderScheduler,
};
