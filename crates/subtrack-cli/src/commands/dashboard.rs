//! Dashboard and status command implementations

use std::path::Path;

use anyhow::Result;
use subtrack_core::dates::renewal_label;
use subtrack_core::db::Database;
use subtrack_core::summary::{self, DEFAULT_SOON_WINDOW};

use super::{open_db, truncate};

pub fn cmd_dashboard(db: &Database) -> Result<()> {
    let subs = db.list_subscriptions()?;
    let today = chrono::Local::now().date_naive();

    let active_count = subs.iter().filter(|s| s.is_active).count();
    let paused_count = subs.len() - active_count;

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│         💳 Subtrack Dashboard           │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Active subscriptions: {}", active_count);
    if paused_count > 0 {
        println!("  ⏸  Paused:             {}", paused_count);
    }
    println!();
    println!("  Monthly spend: ${:.2}", summary::monthly_total(&subs));
    println!("  Yearly spend:  ${:.2}", summary::yearly_total(&subs));

    let breakdown = summary::total_by_category(&subs);
    if !breakdown.is_empty() {
        println!();
        println!("  By category:");
        for entry in &breakdown {
            println!(
                "    {} {:15} ${:.2}/mo",
                entry.category.icon(),
                entry.category.label(),
                entry.total
            );
        }
    }

    let soon = summary::renewing_soon(&subs, today, DEFAULT_SOON_WINDOW);
    if soon.is_empty() {
        println!();
        println!("  Nothing renews in the next {} days.", DEFAULT_SOON_WINDOW);
    } else {
        println!();
        println!("  ⏰ Renewing soon:");
        for sub in &soon {
            println!(
                "    {:20} {:>8}  {}",
                truncate(&sub.name, 20),
                format!("${:.2}", sub.cost),
                renewal_label(sub.days_until_renewal(today)),
            );
        }
    }

    Ok(())
}

pub fn cmd_status(db_path: &Path) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Subtrack Status");
    println!("   ─────────────────────────────────────────────");

    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }

        match open_db(db_path) {
            Ok(db) => {
                let subs = db.list_subscriptions()?;
                let active = subs.iter().filter(|s| s.is_active).count();
                let pending = db.list_pending_reminders()?.len();
                let settings = db.reminder_settings()?;

                println!();
                println!("   Subscriptions: {} ({} active)", subs.len(), active);
                println!("   Monthly spend: ${:.2}", summary::monthly_total(&subs));
                println!(
                    "   Reminders: {} ({} pending)",
                    if settings.enabled { "on" } else { "off" },
                    pending
                );
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
        println!();
        println!("   Run: subtrack init");
    }

    println!();
    Ok(())
}
