//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_reset` - Clear subscriptions and reminders

use std::path::Path;

use anyhow::{Context, Result};
use subtrack_core::db::Database;

/// Open the database, running migrations if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    let db = Database::new(path_str).context("Failed to open database")?;
    tracing::debug!("Opened database at {}", path_str);
    Ok(db)
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let _db = open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a subscription:  subtrack add \"Netflix\" --cost 15.49 --renews 2026-03-10");
    println!("  2. See your spending:   subtrack dashboard");
    println!("  3. Set up reminders:    subtrack remind enable");

    Ok(())
}

pub fn cmd_reset(db: &Database, yes: bool) -> Result<()> {
    if !yes
        && !super::confirm("This removes every subscription and pending reminder. Continue?")?
    {
        println!("Aborted.");
        return Ok(());
    }

    db.soft_reset()?;
    println!("✅ Cleared all subscriptions and reminders (settings kept)");
    Ok(())
}
