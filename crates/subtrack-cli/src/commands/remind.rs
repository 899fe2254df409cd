//! Reminder management commands

use anyhow::Result;
use subtrack_core::db::{Database, ReminderSettings};
use subtrack_core::models::Subscription;
use subtrack_core::reminders::{
    local_now, NotificationService, QueueService, ReminderScheduler,
};

/// Re-sync the reminder slot for one subscription after a mutation.
///
/// With reminders disabled this degenerates to a cancel, keeping the queue
/// consistent with the setting.
pub(crate) fn sync_subscription_reminder(db: &Database, sub: &Subscription) -> Result<()> {
    let settings = db.reminder_settings()?;
    let mut scheduler = ReminderScheduler::new(QueueService::new(db.clone()));

    if settings.enabled {
        scheduler.schedule(sub, settings.days_before, local_now())?;
    } else {
        scheduler.cancel(sub.id)?;
    }
    Ok(())
}

/// Remove the reminder slot for a deleted subscription
pub(crate) fn drop_subscription_reminder(db: &Database, id: i64) -> Result<()> {
    let mut scheduler = ReminderScheduler::new(QueueService::new(db.clone()));
    scheduler.cancel(id)?;
    Ok(())
}

/// Request permission and rebuild the whole queue from the subscription list
async fn request_and_reschedule(db: &Database) -> Result<()> {
    let settings = db.reminder_settings()?;
    let mut scheduler = ReminderScheduler::new(QueueService::new(db.clone()));

    let granted = scheduler.service_mut().request_permission().await?;
    if !granted {
        println!("❌ Notification permission denied; no reminders will fire.");
        println!("   Re-enable with: subtrack remind enable");
        return Ok(());
    }

    let subs = db.list_subscriptions()?;
    let registered = scheduler.reschedule_all(&subs, settings.days_before, local_now())?;

    println!(
        "🔔 {} reminder{} scheduled ({} day{} before each renewal)",
        registered,
        if registered == 1 { "" } else { "s" },
        settings.days_before,
        if settings.days_before == 1 { "" } else { "s" },
    );

    Ok(())
}

pub async fn cmd_remind_status(db: &Database) -> Result<()> {
    let settings = db.reminder_settings()?;
    let scheduler = ReminderScheduler::new(QueueService::new(db.clone()));
    let state = scheduler.service().authorization_state().await?;

    println!();
    println!("🔔 Reminders");
    println!("   ─────────────────────────────────────────────");
    println!(
        "   Enabled:    {}",
        if settings.enabled { "yes" } else { "no" }
    );
    println!(
        "   Lead time:  {} day{} before renewal",
        settings.days_before,
        if settings.days_before == 1 { "" } else { "s" }
    );
    println!("   Permission: {}", state.label());
    println!("   Delivery:   {}", scheduler.service().name());

    let pending = scheduler.pending()?;
    if pending.is_empty() {
        println!("   Pending:    none");
    } else {
        println!("   Pending:    {}", pending.len());
        for r in &pending {
            println!(
                "      {}  {}",
                r.trigger_at.format("%Y-%m-%d %H:%M"),
                r.title
            );
        }
    }

    Ok(())
}

pub async fn cmd_remind_sync(db: &Database) -> Result<()> {
    let settings = db.reminder_settings()?;
    if !settings.enabled {
        println!("Reminders are disabled. Turn them on with: subtrack remind enable");
        return Ok(());
    }
    request_and_reschedule(db).await
}

pub fn cmd_remind_due(db: &Database) -> Result<()> {
    let due = db.take_due_reminders(local_now())?;

    if due.is_empty() {
        println!("No reminders due.");
        return Ok(());
    }

    for r in &due {
        println!();
        println!("🔔 {}", r.title);
        println!("   {}", r.body);
    }
    println!();
    println!(
        "{} reminder{} delivered",
        due.len(),
        if due.len() == 1 { "" } else { "s" }
    );

    Ok(())
}

pub async fn cmd_remind_enable(db: &Database) -> Result<()> {
    let mut settings = db.reminder_settings()?;
    settings.enabled = true;
    db.set_reminder_settings(settings)?;

    println!("✅ Reminders enabled");
    request_and_reschedule(db).await
}

pub fn cmd_remind_disable(db: &Database) -> Result<()> {
    let mut settings = db.reminder_settings()?;
    settings.enabled = false;
    db.set_reminder_settings(settings)?;

    let mut scheduler = ReminderScheduler::new(QueueService::new(db.clone()));
    scheduler.service_mut().cancel_all()?;

    println!("✅ Reminders disabled and pending queue cleared");
    Ok(())
}

pub async fn cmd_remind_lead_time(db: &Database, days: u32) -> Result<()> {
    let settings = ReminderSettings {
        days_before: days,
        ..db.reminder_settings()?
    }
    .clamped();
    db.set_reminder_settings(settings)?;

    if settings.days_before != days {
        println!(
            "⚠️  Lead time clamped to {} days (max supported)",
            settings.days_before
        );
    } else {
        println!(
            "✅ Lead time set to {} day{} before renewal",
            settings.days_before,
            if settings.days_before == 1 { "" } else { "s" }
        );
    }

    // A changed lead time invalidates every pending trigger
    if settings.enabled {
        request_and_reschedule(db).await?;
    }

    Ok(())
}
