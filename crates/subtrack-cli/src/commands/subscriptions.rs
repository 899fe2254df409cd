//! Subscription command implementations

use anyhow::{Context, Result};
use subtrack_core::dates::renewal_label;
use subtrack_core::db::Database;
use subtrack_core::models::{NewSubscription, SubscriptionUpdate};
use subtrack_core::summary;

use super::remind::{drop_subscription_reminder, sync_subscription_reminder};
use super::{parse_category, parse_cycle, parse_date, truncate};

pub fn cmd_add(
    db: &Database,
    name: &str,
    cost: f64,
    cycle: &str,
    renews: &str,
    category: &str,
    notes: &str,
) -> Result<()> {
    let new = NewSubscription {
        name: name.to_string(),
        cost,
        billing_cycle: parse_cycle(cycle)?,
        renewal_date: parse_date(renews)?,
        category: parse_category(category)?,
        notes: notes.to_string(),
    };
    new.validate()?;

    let id = db.insert_subscription(&new)?;
    let sub = db
        .get_subscription(id)?
        .context("Subscription vanished after insert")?;

    sync_subscription_reminder(db, &sub)?;

    println!(
        "✅ Added {} {} (ID: {}): ${:.2}/{}, ${:.2}/mo equivalent",
        sub.category.icon(),
        sub.name,
        id,
        sub.cost,
        sub.billing_cycle,
        sub.monthly_cost()
    );
    println!("   Renews {}", sub.renewal_date);

    Ok(())
}

pub fn cmd_list(db: &Database, query: Option<&str>, category: Option<&str>) -> Result<()> {
    let category = category.map(parse_category).transpose()?;
    let all = db.list_subscriptions()?;
    let subs = summary::filtered(&all, query.unwrap_or(""), category);

    if subs.is_empty() {
        if all.is_empty() {
            println!("No subscriptions yet. Add one with:");
            println!("  subtrack add \"Netflix\" --cost 15.49 --renews 2026-03-10");
        } else {
            println!("No subscriptions match that filter.");
        }
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();

    println!();
    println!("📋 Subscriptions");
    println!("   ─────────────────────────────────────────────────────────────");

    for sub in &subs {
        let status = if sub.is_active { " " } else { "⏸" };
        println!(
            "   {}{} #{:<4} {:20} │ {:>8}/{:<7} │ {}",
            status,
            sub.category.icon(),
            sub.id,
            truncate(&sub.name, 20),
            format!("${:.2}", sub.cost),
            sub.billing_cycle,
            renewal_label(sub.days_until_renewal(today)),
        );
    }

    println!();
    println!(
        "   {} shown · ${:.2}/mo active total",
        subs.len(),
        summary::monthly_total(&subs)
    );

    Ok(())
}

pub fn cmd_show(db: &Database, id: i64) -> Result<()> {
    let sub = db
        .get_subscription(id)?
        .with_context(|| format!("Subscription {} not found", id))?;

    let today = chrono::Local::now().date_naive();
    let days = sub.days_until_renewal(today);

    println!();
    println!("{} {}  (ID: {})", sub.category.icon(), sub.name, sub.id);
    println!("   ─────────────────────────────────────────────");
    println!("   Cost:      ${:.2}/{}", sub.cost, sub.billing_cycle);
    println!("   Monthly:   ${:.2}", sub.monthly_cost());
    println!(
        "   Renews:    {} ({})",
        sub.renewal_date,
        renewal_label(days)
    );
    println!("   Category:  {}", sub.category.label());
    println!(
        "   Status:    {}",
        if sub.is_active { "active" } else { "paused" }
    );
    if !sub.notes.is_empty() {
        println!("   Notes:     {}", sub.notes);
    }
    println!("   Added:     {}", sub.created_at.format("%Y-%m-%d"));

    let reminder = db
        .list_pending_reminders()?
        .into_iter()
        .find(|r| r.subscription_id == id);
    match reminder {
        Some(r) => println!("   Reminder:  {}", r.trigger_at.format("%Y-%m-%d %H:%M")),
        None => println!("   Reminder:  none pending"),
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_edit(
    db: &Database,
    id: i64,
    name: Option<String>,
    cost: Option<f64>,
    cycle: Option<&str>,
    renews: Option<&str>,
    category: Option<&str>,
    notes: Option<String>,
) -> Result<()> {
    let update = SubscriptionUpdate {
        name,
        cost,
        billing_cycle: cycle.map(parse_cycle).transpose()?,
        renewal_date: renews.map(parse_date).transpose()?,
        category: category.map(parse_category).transpose()?,
        notes,
    };

    if update.is_empty() {
        println!("Nothing to change. Pass at least one of --name/--cost/--cycle/--renews/--category/--notes.");
        return Ok(());
    }
    update.validate()?;

    db.update_subscription(id, &update)?;
    let sub = db
        .get_subscription(id)?
        .with_context(|| format!("Subscription {} not found", id))?;

    sync_subscription_reminder(db, &sub)?;

    println!("✅ Updated {} (ID: {})", sub.name, id);
    Ok(())
}

pub fn cmd_remove(db: &Database, id: i64, yes: bool) -> Result<()> {
    let sub = db
        .get_subscription(id)?
        .with_context(|| format!("Subscription {} not found", id))?;

    if !yes && !super::confirm(&format!("Remove {}?", sub.name))? {
        println!("Aborted.");
        return Ok(());
    }

    db.delete_subscription(id)?;
    drop_subscription_reminder(db, id)?;

    println!("✅ Removed {} (ID: {})", sub.name, id);
    Ok(())
}

pub fn cmd_set_active(db: &Database, id: i64, active: bool) -> Result<()> {
    db.set_subscription_active(id, active)?;
    let sub = db
        .get_subscription(id)?
        .with_context(|| format!("Subscription {} not found", id))?;

    // Scheduling an inactive subscription removes its reminder
    sync_subscription_reminder(db, &sub)?;

    if active {
        println!("▶️  Resumed {}; back in totals and reminders", sub.name);
    } else {
        println!("⏸  Paused {}; excluded from totals and reminders", sub.name);
    }
    Ok(())
}

pub fn cmd_renew(db: &Database, id: i64) -> Result<()> {
    let sub = db.advance_subscription_renewal(id)?;
    sync_subscription_reminder(db, &sub)?;

    println!(
        "✅ {} renewed; next renewal {}",
        sub.name, sub.renewal_date
    );
    Ok(())
}
